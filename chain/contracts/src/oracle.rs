//! Price oracle adapter
//!
//! Wraps a single external price source and validates every reading before
//! it is allowed to price anything:
//! - price must be strictly positive
//! - reading must not be older than the heartbeat window
//! - reading must not be timestamped in the future
//!
//! A failed read aborts the calling operation. There is no retry, no
//! fallback source and no last-good-price cache.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;
use vault_types::ids::FeedId;

use crate::errors::{ConfigError, OracleError};

/// Raw reading as reported by a price source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceReading {
    /// Unit-of-account per whole volatile unit, scaled by the source's decimals
    pub price: i128,
    /// Unix seconds of the last update
    pub updated_at: i64,
}

/// A reading that passed positivity and freshness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPrice {
    pub price: u128,
    pub as_of: i64,
}

/// External price feed.
pub trait PriceSource: fmt::Debug {
    fn feed_id(&self) -> FeedId;

    /// Decimal places of the reported price.
    fn decimals(&self) -> u8;

    fn read_latest(&self) -> Result<PriceReading, OracleError>;
}

/// Validate a raw reading against the heartbeat window at `now`.
pub fn validate_reading(
    reading: PriceReading,
    now: i64,
    heartbeat: i64,
) -> Result<ValidatedPrice, OracleError> {
    if reading.price <= 0 {
        return Err(OracleError::OracleInvalid {
            price: reading.price,
        });
    }
    if reading.updated_at > now {
        return Err(OracleError::FutureTimestamp {
            updated_at: reading.updated_at,
            now,
        });
    }
    if now.saturating_sub(reading.updated_at) > heartbeat {
        return Err(OracleError::PriceStale {
            updated_at: reading.updated_at,
            now,
            heartbeat,
        });
    }
    Ok(ValidatedPrice {
        price: reading.price.unsigned_abs(),
        as_of: reading.updated_at,
    })
}

/// Holds the current price source and the rules its readings must satisfy.
#[derive(Debug)]
pub struct PriceOracleAdapter {
    source: Box<dyn PriceSource>,
    heartbeat: i64,
    /// Precision the vault's decimal factor was computed from
    decimals: u8,
}

impl PriceOracleAdapter {
    pub fn new(
        source: Box<dyn PriceSource>,
        heartbeat: i64,
        decimals: u8,
    ) -> Result<Self, ConfigError> {
        if heartbeat <= 0 {
            return Err(ConfigError::InvalidHeartbeat(heartbeat));
        }
        if source.decimals() != decimals {
            return Err(ConfigError::OracleDecimalsMismatch {
                expected: decimals,
                actual: source.decimals(),
            });
        }
        Ok(Self {
            source,
            heartbeat,
            decimals,
        })
    }

    pub fn feed_id(&self) -> FeedId {
        self.source.feed_id()
    }

    pub fn heartbeat(&self) -> i64 {
        self.heartbeat
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Read and validate the current price.
    pub fn read_price(&self, now: i64) -> Result<ValidatedPrice, OracleError> {
        let reading = self.source.read_latest()?;
        validate_reading(reading, now, self.heartbeat).map_err(|e| {
            warn!(feed = %self.source.feed_id(), error = %e, "Rejected price reading");
            e
        })
    }

    /// Replace the price source after validating the candidate.
    ///
    /// The candidate must report the same precision and produce a fresh,
    /// positive reading at `now`. On failure the current source stays.
    /// Returns the identifier of the replaced feed.
    pub fn set_feed(
        &mut self,
        candidate: Box<dyn PriceSource>,
        now: i64,
    ) -> Result<FeedId, OracleError> {
        let feed = candidate.feed_id();
        let invalid = |reason: String| OracleError::FeedInvalid {
            feed: feed.to_string(),
            reason,
        };

        if candidate.decimals() != self.decimals {
            return Err(invalid(format!(
                "reports {} decimals, expected {}",
                candidate.decimals(),
                self.decimals
            )));
        }
        let reading = candidate.read_latest().map_err(|e| invalid(e.to_string()))?;
        validate_reading(reading, now, self.heartbeat).map_err(|e| invalid(e.to_string()))?;

        let previous = std::mem::replace(&mut self.source, candidate);
        Ok(previous.feed_id())
    }
}

/// Push-based price feed.
///
/// An off-chain updater publishes readings through any clone of the handle;
/// the vault reads the latest one. Until the first publish the feed reports
/// itself unavailable.
#[derive(Debug, Clone)]
pub struct PushPriceFeed {
    feed_id: FeedId,
    decimals: u8,
    latest: Arc<Mutex<Option<PriceReading>>>,
}

impl PushPriceFeed {
    pub fn new(feed_id: FeedId, decimals: u8) -> Self {
        Self {
            feed_id,
            decimals,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a feed with an initial reading.
    pub fn with_price(feed_id: FeedId, decimals: u8, price: i128, updated_at: i64) -> Self {
        let feed = Self::new(feed_id, decimals);
        feed.publish(price, updated_at);
        feed
    }

    pub fn publish(&self, price: i128, updated_at: i64) {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest = Some(PriceReading { price, updated_at });
    }

    /// Drop the current reading, making the feed unavailable.
    pub fn clear(&self) {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest = None;
    }
}

impl PriceSource for PushPriceFeed {
    fn feed_id(&self) -> FeedId {
        self.feed_id.clone()
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn read_latest(&self) -> Result<PriceReading, OracleError> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.ok_or_else(|| OracleError::SourceUnavailable {
            reason: format!("no price published for {}", self.feed_id),
        })
    }
}
