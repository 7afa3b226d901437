//! Derived reporting views over ledger and movement state.
//!
//! Everything here is a pure function of its inputs: these views read the
//! other components' state and never mutate it.

pub mod kpi;
pub mod series;

pub use kpi::{ChangeClass, Distribution, KpiDelta, distribution, kpi_delta, low_stock, status_counts};
pub use series::{SeriesPoint, series_for};
