//! Asset kinds held in custody
//!
//! The vault custodies exactly two asset classes. They are distinguished by
//! an explicit tag rather than a sentinel identifier in the balance table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of custodied asset kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Native asset whose unit-of-account value comes from the price feed
    Volatile,
    /// Pegged asset taken at parity with the unit of account
    Stable,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Volatile, AssetKind::Stable];

    /// Whether converting this asset to unit of account needs a price reading.
    pub fn is_oracle_priced(&self) -> bool {
        matches!(self, AssetKind::Volatile)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Volatile => "volatile",
            AssetKind::Stable => "stable",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown asset kind: {0}")]
pub struct UnknownAssetKind(pub String);

impl FromStr for AssetKind {
    type Err = UnknownAssetKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "volatile" => Ok(AssetKind::Volatile),
            "stable" => Ok(AssetKind::Stable),
            other => Err(UnknownAssetKind(other.to_string())),
        }
    }
}
