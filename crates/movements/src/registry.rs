use chrono::Utc;
use serde::{Deserialize, Serialize};

use kardex_core::{DomainError, DomainResult, MovementId};

use crate::movement::{Movement, MovementDraft, MovementKind, MovementStatus, MovementUpdate};

/// Read filter for [`MovementRegistry::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementFilter {
    pub kind: Option<MovementKind>,
    pub status: Option<MovementStatus>,
}

impl MovementFilter {
    pub fn kind(kind: MovementKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn matches(&self, m: &Movement) -> bool {
        self.kind.is_none_or(|k| m.kind() == k) && self.status.is_none_or(|s| m.status == s)
    }
}

/// Exclusive owner of all movement records.
///
/// Records are kept in insertion order; all mutation goes through the
/// command methods below, and a failing command leaves the registry
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementRegistry {
    movements: Vec<Movement>,
}

impl MovementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    pub fn get(&self, id: MovementId) -> Option<&Movement> {
        self.movements.iter().find(|m| m.id == id)
    }

    /// Create a movement from a draft.
    ///
    /// Assigns a fresh id (never reused) and, for purchase orders, the
    /// immutable `created_at` timestamp; status starts Pending. Fails with
    /// `Validation` listing every violated field.
    pub fn create(&mut self, draft: MovementDraft) -> DomainResult<Movement> {
        let movement = draft.into_movement(MovementId::new(), Utc::now());
        movement.validate()?;

        self.movements.push(movement.clone());
        Ok(movement)
    }

    /// Move a record to `target` status.
    ///
    /// Dispatched through the per-variant transition table; any request the
    /// table does not allow — including an unknown id — fails with
    /// `InvalidTransition` and mutates nothing.
    pub fn transition(&mut self, id: MovementId, target: MovementStatus) -> DomainResult<Movement> {
        let Some(m) = self.movements.iter_mut().find(|m| m.id == id) else {
            return Err(DomainError::invalid_transition(format!(
                "no movement with id {id}"
            )));
        };

        if !m.kind().allows(m.status, target) {
            return Err(DomainError::invalid_transition(format!(
                "{} does not allow {} -> {}",
                m.kind(),
                m.status,
                target
            )));
        }

        m.status = target;
        Ok(m.clone())
    }

    /// Merge a partial update into an existing record.
    ///
    /// Never touches `id`, `status` or `created_at`. The merged record is
    /// re-validated so the registry never holds an invalid movement. Fails
    /// with `NotFound` for an unknown id.
    pub fn update(&mut self, id: MovementId, update: &MovementUpdate) -> DomainResult<Movement> {
        let Some(idx) = self.movements.iter().position(|m| m.id == id) else {
            return Err(DomainError::NotFound);
        };

        let mut merged = self.movements[idx].clone();
        update.apply_to(&mut merged);
        merged.validate()?;

        self.movements[idx] = merged.clone();
        Ok(merged)
    }

    /// Delete a record unconditionally, regardless of status.
    pub fn remove(&mut self, id: MovementId) -> DomainResult<Movement> {
        let Some(idx) = self.movements.iter().position(|m| m.id == id) else {
            return Err(DomainError::NotFound);
        };
        Ok(self.movements.remove(idx))
    }

    /// Copies of matching records, in insertion order.
    pub fn list(&self, filter: &MovementFilter) -> Vec<Movement> {
        self.movements
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect()
    }
}
