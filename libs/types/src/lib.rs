//! Types library for the dual-asset custody vault
//!
//! Shared definitions used by the ledger core and by anything that talks to
//! it: holder and price-feed identifiers, the closed set of custodied asset
//! kinds, and integer/decimal helpers for amounts expressed in base units.
//!
//! # Modules
//! - `ids`: Unique identifiers (HolderId, FeedId)
//! - `asset`: Asset kinds held in custody (Volatile, Stable)
//! - `numeric`: Base-unit amounts, powers of ten, display conversion

pub mod asset;
pub mod ids;
pub mod numeric;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::asset::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
}
