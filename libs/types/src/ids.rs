//! Unique identifier types for vault entities
//!
//! Holders use UUID v7 so that identifiers sort by creation time. Price feeds
//! are named by the pair they quote.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a holder of custodied assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(Uuid);

impl HolderId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HolderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Price feed identifier (quoted pair)
///
/// Format: "BASE/QUOTE" (e.g., "ETH/USD")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedId(String);

impl FeedId {
    /// Create a new FeedId from a string
    ///
    /// # Panics
    /// Panics if the format is invalid (must contain '/')
    pub fn new(pair: impl Into<String>) -> Self {
        let s = pair.into();
        assert!(s.contains('/'), "FeedId must be in BASE/QUOTE format");
        Self(s)
    }

    /// Try to create a FeedId, returning None if invalid
    pub fn try_new(pair: impl Into<String>) -> Option<Self> {
        let s = pair.into();
        if Self::is_well_formed(&s) {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Get the pair string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into base and quote symbols
    pub fn split(&self) -> (&str, &str) {
        self.0.split_once('/').unwrap_or((self.0.as_str(), ""))
    }

    fn is_well_formed(s: &str) -> bool {
        matches!(s.split_once('/'), Some((base, quote)) if !base.is_empty() && !quote.is_empty())
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FeedId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
