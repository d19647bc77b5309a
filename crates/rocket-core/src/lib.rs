// crates/rocket-core/src/lib.rs
//
// rocket-core: Core types, units, errors, and collaborator traits for the
// Rocket bond desk.
//
// This is the leaf crate that the ledger engine and the CLI depend on. It
// defines the primitive value types, the fixed-point unit helpers, the single
// error enum, and the trait interfaces for the external collaborators (asset
// transfer, price oracle, discount curve, clock).

pub mod error;
pub mod traits;
pub mod types;
pub mod units;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use rocket_core::Amount;`

pub use error::RocketError;
pub use traits::{AssetTransfer, Clock, DiscountCurve, PriceOracle, SystemClock};
pub use types::{
    Address, Amount, AssetId, Discount, Timestamp, DEFAULT_REFERENCE_CURRENCY,
    LOCK_DURATION_SECS, SECONDS_PER_DAY,
};
pub use units::{format_units, mul_div, parse_units, units, DECIMALS, UNIT};
