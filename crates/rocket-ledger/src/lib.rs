// crates/rocket-ledger/src/lib.rs
//
// rocket-ledger: allocation ledger, quoting, order book, and the bond desk
// orchestrator for the Rocket bond desk.
//
// All amounts are in base units of 18-decimal tokens (see rocket_core::units).

pub mod allocation;
pub mod desk;
pub mod events;
pub mod orders;
pub mod quote;
pub mod sandbox;
pub mod shared;
pub mod snapshot;

// Re-export key types for ergonomic access from downstream crates.
pub use allocation::{AllocationLedger, Market};
pub use desk::{BondDesk, Collaborators, DepositReceipt, DeskConfig};
pub use events::{LedgerEvent, DEFAULT_JOURNAL_CAPACITY};
pub use orders::{Order, OrderBook};
pub use quote::{Quote, QuoteEngine};
pub use sandbox::{
    AllowanceEntry, AssetsSnapshot, BalanceEntry, FixedPriceOracle, FlatDiscountCurve,
    InMemoryAssets, ManualClock,
};
pub use shared::SharedBondDesk;
pub use snapshot::LedgerSnapshot;
