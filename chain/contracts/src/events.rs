//! Vault events
//!
//! Immutable records appended when an operation commits. An operation that
//! is rejected or rolled back leaves no event behind.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vault_types::asset::AssetKind;
use vault_types::ids::{FeedId, HolderId};
use vault_types::numeric::{NativeAmount, UoaAmount};

/// Asset credited to a holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub event_id: Uuid,
    pub holder: HolderId,
    pub asset: AssetKind,
    /// Native base units
    pub amount: NativeAmount,
    /// Unit-of-account value at deposit time
    pub value: UoaAmount,
    /// Aggregate total after the deposit
    pub aggregate_total: UoaAmount,
}

/// Asset debited from a holder and paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub event_id: Uuid,
    pub holder: HolderId,
    pub asset: AssetKind,
    pub amount: NativeAmount,
    pub value: UoaAmount,
    pub aggregate_total: UoaAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSourceRotated {
    pub previous: FeedId,
    pub current: FeedId,
    pub rotated_by: String,
    pub rotated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseChanged {
    pub paused: bool,
    pub changed_by: String,
}

/// Enum wrapper for all vault events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    PriceSourceRotated(PriceSourceRotated),
    PauseChanged(PauseChanged),
}
