use std::collections::BTreeMap;
use std::ops::RangeBounds;

use chrono::Utc;
use tracing::{debug, info, warn};

use kardex_core::{DomainError, DomainResult, MovementId};
use kardex_events::{EventBus, InMemoryEventBus, Subscription};
use kardex_ledger::{LedgerStore, PeriodFlows, QuantityField, SnapshotEdit, StockSnapshot};
use kardex_movements::{
    Movement, MovementDraft, MovementFilter, MovementKind, MovementRegistry, MovementStatus,
    MovementUpdate,
};
use kardex_reports::{Distribution, KpiDelta, SeriesPoint};

use crate::config::AppConfig;
use crate::event::AppEvent;

/// The configured threshold is in thousands of kilograms; classification
/// happens in kilograms.
const THRESHOLD_SCALE_KG: f64 = 1000.0;

/// Application facade: single logical writer over the ledger store, the
/// movement registry and the threshold config.
///
/// Commands execute synchronously to completion and either fully apply or
/// leave all state untouched; each successful command is announced on the
/// event bus after the mutation, so subscribers never observe a
/// notification for a rejected command.
#[derive(Debug)]
pub struct InventoryApp {
    ledger: LedgerStore,
    registry: MovementRegistry,
    config: AppConfig,
    bus: InMemoryEventBus<AppEvent>,
}

impl Default for InventoryApp {
    fn default() -> Self {
        Self::with_config(AppConfig::default())
    }
}

impl InventoryApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            ledger: LedgerStore::new(),
            registry: MovementRegistry::new(),
            config,
            bus: InMemoryEventBus::new(),
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> Subscription<AppEvent> {
        self.bus.subscribe()
    }

    fn publish(&self, event: AppEvent) {
        // State is already committed; a failed fan-out only costs observers
        // a refresh.
        if let Err(e) = self.bus.publish(event) {
            warn!(error = ?e, "change notification dropped");
        }
    }

    // ---- ledger commands -------------------------------------------------

    pub fn append_snapshot(&mut self, snapshot: StockSnapshot) -> DomainResult<usize> {
        let period = snapshot.period.clone();
        let len = self.ledger.append_snapshot(snapshot)?;

        info!(%period, sequence_len = len, "snapshot appended");
        self.publish(AppEvent::SnapshotAppended {
            period,
            occurred_at: Utc::now(),
        });
        Ok(len)
    }

    /// Close a period from its flow quantities; opening and closing
    /// balances are derived.
    pub fn close_period(&mut self, period: &str, flows: &PeriodFlows) -> DomainResult<StockSnapshot> {
        let snapshot = self.ledger.close_period(period, flows)?.clone();

        info!(%period, closing = snapshot.closing_balance, "period closed");
        self.publish(AppEvent::SnapshotAppended {
            period: period.to_string(),
            occurred_at: Utc::now(),
        });
        Ok(snapshot)
    }

    /// Edit a past snapshot and cascade the rebuild forward. Returns the
    /// full corrected sequence.
    pub fn recompute_snapshot(
        &mut self,
        index: usize,
        edit: &SnapshotEdit,
    ) -> DomainResult<Vec<StockSnapshot>> {
        let sequence = self.ledger.recompute(index, edit)?;
        let from_period = sequence[index].period.clone();

        info!(%from_period, "ledger recomputed");
        self.publish(AppEvent::LedgerRecomputed {
            from_period,
            occurred_at: Utc::now(),
        });
        Ok(sequence)
    }

    pub fn set_low_stock_threshold(&mut self, value: f64) -> DomainResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::validation(
                "low_stock_threshold must be non-negative",
            ));
        }

        self.config.low_stock_threshold = value;
        info!(threshold = value, "low-stock threshold changed");
        self.publish(AppEvent::ThresholdChanged {
            value,
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    // ---- movement commands -----------------------------------------------

    pub fn create_movement(&mut self, draft: MovementDraft) -> DomainResult<Movement> {
        let movement = self.registry.create(draft)?;

        info!(id = %movement.id, kind = %movement.kind(), "movement created");
        self.publish(AppEvent::MovementCreated {
            id: movement.id,
            kind: movement.kind(),
            occurred_at: Utc::now(),
        });
        Ok(movement)
    }

    pub fn update_movement(
        &mut self,
        id: MovementId,
        update: &MovementUpdate,
    ) -> DomainResult<Movement> {
        let movement = self.registry.update(id, update)?;

        debug!(%id, "movement updated");
        self.publish(AppEvent::MovementUpdated {
            id,
            occurred_at: Utc::now(),
        });
        Ok(movement)
    }

    pub fn transition_movement(
        &mut self,
        id: MovementId,
        target: MovementStatus,
    ) -> DomainResult<Movement> {
        let movement = self.registry.transition(id, target)?;

        info!(%id, status = %target, "movement transitioned");
        self.publish(AppEvent::MovementTransitioned {
            id,
            status: target,
            occurred_at: Utc::now(),
        });
        Ok(movement)
    }

    pub fn remove_movement(&mut self, id: MovementId) -> DomainResult<Movement> {
        let movement = self.registry.remove(id)?;

        info!(%id, "movement removed");
        self.publish(AppEvent::MovementRemoved {
            id,
            occurred_at: Utc::now(),
        });
        Ok(movement)
    }

    // ---- queries ---------------------------------------------------------

    pub fn snapshots(&self) -> &[StockSnapshot] {
        self.ledger.snapshots()
    }

    pub fn latest_snapshot(&self) -> DomainResult<&StockSnapshot> {
        self.ledger.latest()
    }

    pub fn previous_snapshot(&self) -> DomainResult<&StockSnapshot> {
        self.ledger.previous()
    }

    pub fn total_over<R: RangeBounds<usize>>(&self, range: R, field: QuantityField) -> f64 {
        self.ledger.total_over(range, field)
    }

    /// Period-over-period change of `field`, latest vs previous snapshot.
    /// Neutral when fewer than two periods exist.
    pub fn kpi(&self, field: QuantityField) -> KpiDelta {
        let Ok(latest) = self.ledger.latest() else {
            return KpiDelta::neutral();
        };
        let previous = self.ledger.previous().ok().map(|s| field.of(s));
        kardex_reports::kpi_delta(field.of(latest), previous)
    }

    pub fn low_stock_threshold(&self) -> f64 {
        self.config.low_stock_threshold
    }

    /// Whether the named period's closing balance is below the configured
    /// threshold.
    pub fn low_stock_flag(&self, period: &str) -> DomainResult<bool> {
        let snapshot = self.ledger.get(period).ok_or(DomainError::NotFound)?;
        Ok(kardex_reports::low_stock(
            snapshot,
            self.config.low_stock_threshold * THRESHOLD_SCALE_KG,
        ))
    }

    /// Periods currently flagged low, in sequence order.
    pub fn low_stock_periods(&self) -> Vec<String> {
        let threshold_kg = self.config.low_stock_threshold * THRESHOLD_SCALE_KG;
        self.ledger
            .snapshots()
            .iter()
            .filter(|s| kardex_reports::low_stock(s, threshold_kg))
            .map(|s| s.period.clone())
            .collect()
    }

    pub fn status_counts(&self, kind: MovementKind) -> BTreeMap<MovementStatus, usize> {
        kardex_reports::status_counts(&self.registry.list(&MovementFilter::default()), kind)
    }

    pub fn series_for(&self, fields: &[QuantityField]) -> Vec<SeriesPoint> {
        kardex_reports::series_for(self.ledger.snapshots(), fields)
    }

    /// Purchases/sales/closing breakdown over the whole sequence.
    pub fn distribution(&self) -> DomainResult<Distribution> {
        let closing = self.ledger.latest()?.closing_balance;
        Ok(kardex_reports::distribution(
            self.ledger.total_over(.., QuantityField::PurchasesIn),
            self.ledger.total_over(.., QuantityField::SalesOut),
            closing,
        ))
    }

    pub fn list_movements(&self, filter: &MovementFilter) -> Vec<Movement> {
        self.registry.list(filter)
    }

    pub fn get_movement(&self, id: MovementId) -> Option<&Movement> {
        self.registry.get(id)
    }
}
