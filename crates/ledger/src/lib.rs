//! Monthly stock ledger (single commodity, kilograms).
//!
//! This crate contains the balance-invariant rules for the sequence of
//! monthly stock snapshots, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod snapshot;
pub mod store;

pub use snapshot::{BALANCE_TOLERANCE, PeriodFlows, QuantityField, SnapshotEdit, StockSnapshot};
pub use store::LedgerStore;
