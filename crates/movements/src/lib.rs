//! Movement lifecycle domain module.
//!
//! Purchase orders and inter-location transfers share one record shape and
//! one registry; the status state machine is dispatched per variant. Pure
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod movement;
pub mod registry;

pub use movement::{
    Movement, MovementDetail, MovementDraft, MovementKind, MovementStatus, MovementUpdate,
};
pub use registry::{MovementFilter, MovementRegistry};
