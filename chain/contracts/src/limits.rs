//! Capacity and withdrawal limits
//!
//! The capacity cap bounds the aggregate unit-of-account total across all
//! holders and assets. The withdrawal threshold bounds the value of any
//! single withdrawal. Both are fixed at construction.

use vault_types::asset::AssetKind;
use vault_types::ids::HolderId;
use vault_types::numeric::{NativeAmount, UoaAmount};

use crate::config::VaultConfig;
use crate::errors::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    cap: UoaAmount,
    threshold: UoaAmount,
    min_volatile_deposit: NativeAmount,
}

impl LimitPolicy {
    pub fn from_config(config: &VaultConfig) -> Self {
        Self {
            cap: config.cap,
            threshold: config.withdrawal_threshold,
            min_volatile_deposit: config.min_volatile_deposit,
        }
    }

    pub fn cap(&self) -> UoaAmount {
        self.cap
    }

    pub fn threshold(&self) -> UoaAmount {
        self.threshold
    }

    pub fn min_volatile_deposit(&self) -> NativeAmount {
        self.min_volatile_deposit
    }

    /// Checks on the raw amount, before any price is read.
    pub fn check_deposit_amount(
        &self,
        asset: AssetKind,
        amount: NativeAmount,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount { asset });
        }
        if asset.is_oracle_priced() && amount < self.min_volatile_deposit {
            return Err(LedgerError::BelowMinimum {
                amount,
                minimum: self.min_volatile_deposit,
            });
        }
        Ok(())
    }

    /// Checks on the converted value against the current aggregate total.
    pub fn check_deposit_value(
        &self,
        asset: AssetKind,
        value: UoaAmount,
        total: UoaAmount,
    ) -> Result<(), LedgerError> {
        if value == 0 {
            return Err(LedgerError::ZeroAmount { asset });
        }
        let new_total = total.checked_add(value).ok_or(LedgerError::MathOverflow)?;
        if new_total > self.cap {
            return Err(LedgerError::CapExceeded {
                total,
                value,
                cap: self.cap,
            });
        }
        Ok(())
    }

    /// Raw amount check, before any price is read.
    pub fn check_withdrawal_amount(
        &self,
        asset: AssetKind,
        amount: NativeAmount,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount { asset });
        }
        Ok(())
    }

    /// Threshold is checked before balance sufficiency.
    pub fn check_withdrawal(
        &self,
        holder: HolderId,
        asset: AssetKind,
        amount: NativeAmount,
        value: UoaAmount,
        balance: NativeAmount,
    ) -> Result<(), LedgerError> {
        self.check_withdrawal_amount(asset, amount)?;
        if value == 0 {
            return Err(LedgerError::ZeroAmount { asset });
        }
        if value > self.threshold {
            return Err(LedgerError::ThresholdExceeded {
                asset,
                value,
                threshold: self.threshold,
            });
        }
        if amount > balance {
            return Err(LedgerError::InsufficientBalance {
                holder,
                asset,
                requested: amount,
                available: balance,
            });
        }
        Ok(())
    }
}
