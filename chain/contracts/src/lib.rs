//! Custody ledger for a volatile native asset and a pegged stable asset
//!
//! Holders deposit and withdraw either asset. Every operation is valued in a
//! common unit of account: the stable asset at par, the volatile asset
//! through an external price feed. A global capacity cap bounds the
//! aggregate total and a per-operation threshold bounds each withdrawal.
//!
//! # Modules
//! - `config`: Deployment parameters and precision normalization
//! - `errors`: Contract-specific error types
//! - `events`: Events appended by committed operations
//! - `oracle`: Price source interface and staleness/positivity validation
//! - `conversion`: Native-to-unit-of-account conversion
//! - `limits`: Capacity cap and withdrawal threshold checks
//! - `ledger`: Balance table, aggregate total, counters, undo journal
//! - `security`: Reentrancy guard, access control, pause
//! - `transfer`: Stable-token and native-value transfer interfaces
//! - `vault`: Deposits, queries, administration
//! - `withdrawal`: Withdrawals under the reentrancy lock

pub mod config;
pub mod conversion;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod limits;
pub mod oracle;
pub mod security;
pub mod transfer;
pub mod vault;
pub mod withdrawal;

pub use config::{Precisions, VaultConfig};
pub use errors::{ConfigError, LedgerError, OracleError, TransferError};
pub use vault::Vault;
