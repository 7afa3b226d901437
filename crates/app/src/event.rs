use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kardex_core::MovementId;
use kardex_events::Event;
use kardex_movements::{MovementKind, MovementStatus};

/// Change notifications published after each successful command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    SnapshotAppended {
        period: String,
        occurred_at: DateTime<Utc>,
    },
    LedgerRecomputed {
        from_period: String,
        occurred_at: DateTime<Utc>,
    },
    MovementCreated {
        id: MovementId,
        kind: MovementKind,
        occurred_at: DateTime<Utc>,
    },
    MovementTransitioned {
        id: MovementId,
        status: MovementStatus,
        occurred_at: DateTime<Utc>,
    },
    MovementUpdated {
        id: MovementId,
        occurred_at: DateTime<Utc>,
    },
    MovementRemoved {
        id: MovementId,
        occurred_at: DateTime<Utc>,
    },
    ThresholdChanged {
        value: f64,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for AppEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AppEvent::SnapshotAppended { .. } => "ledger.snapshot.appended",
            AppEvent::LedgerRecomputed { .. } => "ledger.recomputed",
            AppEvent::MovementCreated { .. } => "movement.created",
            AppEvent::MovementTransitioned { .. } => "movement.transitioned",
            AppEvent::MovementUpdated { .. } => "movement.updated",
            AppEvent::MovementRemoved { .. } => "movement.removed",
            AppEvent::ThresholdChanged { .. } => "config.threshold.changed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AppEvent::SnapshotAppended { occurred_at, .. }
            | AppEvent::LedgerRecomputed { occurred_at, .. }
            | AppEvent::MovementCreated { occurred_at, .. }
            | AppEvent::MovementTransitioned { occurred_at, .. }
            | AppEvent::MovementUpdated { occurred_at, .. }
            | AppEvent::MovementRemoved { occurred_at, .. }
            | AppEvent::ThresholdChanged { occurred_at, .. } => *occurred_at,
        }
    }
}
