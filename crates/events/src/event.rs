use chrono::{DateTime, Utc};

/// A domain-agnostic change event.
///
/// Events are immutable facts about a mutation that already happened; the
/// owning component mutates first and publishes second, so observers never
/// see a notification for state that failed to apply.
pub trait Event: Clone + core::fmt::Debug + Send + 'static {
    /// Stable event name (e.g. "ledger.snapshot.appended").
    fn event_type(&self) -> &'static str;

    /// When the change occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
