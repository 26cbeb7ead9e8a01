//! Contract-specific error types
//!
//! Error taxonomy for configuration, oracle reads, external transfers and the
//! deposit/withdrawal protocols. Every error aborts the current operation
//! with no partial effects; nothing here is retried internally.

use thiserror::Error;
use vault_types::asset::AssetKind;
use vault_types::ids::HolderId;
use vault_types::numeric::{NativeAmount, UoaAmount};

/// Construction-time errors. Any of these prevents the vault from existing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Capacity cap must be positive")]
    InvalidCap,

    #[error("Withdrawal threshold must be positive")]
    InvalidThreshold,

    #[error("Withdrawal threshold {threshold} exceeds capacity cap {cap}")]
    ThresholdExceedsCap { threshold: UoaAmount, cap: UoaAmount },

    #[error("Heartbeat window must be positive, got {0}s")]
    InvalidHeartbeat(i64),

    #[error(
        "Cannot normalize precisions: volatile {volatile} + oracle {oracle} decimals vs stable {stable} decimals"
    )]
    InvalidPrecisions { volatile: u8, stable: u8, oracle: u8 },

    #[error("Invalid collaborator: {0}")]
    InvalidCollaborator(String),

    #[error("Price source reports {actual} decimals, vault configured for {expected}")]
    OracleDecimalsMismatch { expected: u8, actual: u8 },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Price feed errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Oracle reported non-positive price: {price}")]
    OracleInvalid { price: i128 },

    #[error("Price stale: updated at {updated_at}, now {now}, heartbeat {heartbeat}s")]
    PriceStale {
        updated_at: i64,
        now: i64,
        heartbeat: i64,
    },

    #[error("Price timestamp {updated_at} is ahead of current time {now}")]
    FutureTimestamp { updated_at: i64, now: i64 },

    #[error("Price source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    #[error("Feed {feed} rejected: {reason}")]
    FeedInvalid { feed: String, reason: String },
}

/// Failures reported by an external asset contract or value recipient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Transfer rejected: {reason}")]
    Rejected { reason: String },

    #[error("Insufficient allowance: required {required}, approved {approved}")]
    InsufficientAllowance {
        required: NativeAmount,
        approved: NativeAmount,
    },

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: NativeAmount,
        available: NativeAmount,
    },
}

/// Errors surfaced by vault operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount of {asset} must be positive in unit of account")]
    ZeroAmount { asset: AssetKind },

    #[error("Deposit of {amount} is below the minimum of {minimum}")]
    BelowMinimum {
        amount: NativeAmount,
        minimum: NativeAmount,
    },

    #[error("Capacity cap exceeded: total {total} + deposit {value} > cap {cap}")]
    CapExceeded {
        total: UoaAmount,
        value: UoaAmount,
        cap: UoaAmount,
    },

    #[error("Withdrawal of {asset} worth {value} exceeds threshold {threshold}")]
    ThresholdExceeded {
        asset: AssetKind,
        value: UoaAmount,
        threshold: UoaAmount,
    },

    #[error(
        "Insufficient {asset} balance for {holder}: requested {requested}, available {available}"
    )]
    InsufficientBalance {
        holder: HolderId,
        asset: AssetKind,
        requested: NativeAmount,
        available: NativeAmount,
    },

    #[error("Unauthorized: {caller} lacks the required capability")]
    Unauthorized { caller: String },

    #[error("Vault is paused")]
    Paused,

    #[error("Reentrancy detected")]
    Reentrancy,

    #[error("Arithmetic overflow in ledger calculation")]
    MathOverflow,

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Extraction rejected: {0}")]
    TransferFailed(#[from] TransferError),
}
