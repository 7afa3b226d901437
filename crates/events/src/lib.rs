//! Change-notification plumbing.
//!
//! The domain crates stay notification-agnostic; the application facade
//! publishes typed change events through this bus so external observers
//! (e.g. a UI layer) can re-render without polling.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::InMemoryEventBus;
