//! Command/query boundary toward the UI layer.
//!
//! [`InventoryApp`] owns the ledger store, the movement registry and the
//! low-stock threshold; the UI issues commands through it and reads derived
//! views from it. Successful commands are announced on an in-process event
//! bus so observers can re-render without polling.

pub mod app;
pub mod config;
pub mod event;
pub mod sample;

pub use app::InventoryApp;
pub use config::AppConfig;
pub use event::AppEvent;
