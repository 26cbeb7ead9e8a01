//! Vault configuration
//!
//! Immutable parameters fixed at construction: capacity cap, withdrawal
//! threshold, oracle heartbeat, dust floor for volatile deposits and the
//! decimal precisions of the three quantities the converter reconciles.

use serde::{Deserialize, Serialize};
use vault_types::numeric::{pow10, NativeAmount, UoaAmount};

use crate::errors::ConfigError;

/// Maximum tolerated age of a price reading, in seconds.
pub const DEFAULT_HEARTBEAT_SECS: i64 = 3600;

/// Smallest accepted volatile deposit: 0.001 of an 18-decimal asset.
pub const DEFAULT_MIN_VOLATILE_DEPOSIT: NativeAmount = 1_000_000_000_000_000;

/// Decimal precisions of the volatile asset, the stable asset and the
/// oracle's reported price.
///
/// The unit of account shares the stable asset's precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precisions {
    pub volatile: u8,
    pub stable: u8,
    pub oracle: u8,
}

impl Default for Precisions {
    fn default() -> Self {
        Self {
            volatile: 18,
            stable: 6,
            oracle: 8,
        }
    }
}

impl Precisions {
    /// `10^(volatile + oracle - stable)`.
    ///
    /// Dividing `native * price` by this factor lands in stable-asset base
    /// units.
    pub fn decimal_factor(&self) -> Result<u128, ConfigError> {
        let numerator = u32::from(self.volatile) + u32::from(self.oracle);
        let exponent = numerator
            .checked_sub(u32::from(self.stable))
            .ok_or_else(|| self.invalid())?;
        pow10(exponent).ok_or_else(|| self.invalid())
    }

    fn invalid(&self) -> ConfigError {
        ConfigError::InvalidPrecisions {
            volatile: self.volatile,
            stable: self.stable,
            oracle: self.oracle,
        }
    }
}

/// Deployment parameters for a [`crate::vault::Vault`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Identity granted the admin role at construction
    pub admin: String,
    /// Maximum aggregate total, unit-of-account base units
    pub cap: UoaAmount,
    /// Maximum unit-of-account value of one withdrawal
    pub withdrawal_threshold: UoaAmount,
    /// Oracle staleness window in seconds
    pub heartbeat_secs: i64,
    /// Dust floor for volatile deposits, native base units
    pub min_volatile_deposit: NativeAmount,
    pub precisions: Precisions,
}

impl Default for VaultConfig {
    fn default() -> Self {
        let usd = 1_000_000; // 6-decimal stable asset
        Self {
            admin: "admin".to_string(),
            cap: 1_000_000 * usd,
            withdrawal_threshold: 10_000 * usd,
            heartbeat_secs: DEFAULT_HEARTBEAT_SECS,
            min_volatile_deposit: DEFAULT_MIN_VOLATILE_DEPOSIT,
            precisions: Precisions::default(),
        }
    }
}

impl VaultConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.trim().is_empty() {
            return Err(ConfigError::InvalidCollaborator(
                "admin identity is empty".to_string(),
            ));
        }
        if self.cap == 0 {
            return Err(ConfigError::InvalidCap);
        }
        if self.withdrawal_threshold == 0 {
            return Err(ConfigError::InvalidThreshold);
        }
        if self.withdrawal_threshold > self.cap {
            return Err(ConfigError::ThresholdExceedsCap {
                threshold: self.withdrawal_threshold,
                cap: self.cap,
            });
        }
        if self.heartbeat_secs <= 0 {
            return Err(ConfigError::InvalidHeartbeat(self.heartbeat_secs));
        }
        self.precisions.decimal_factor()?;
        Ok(())
    }
}
