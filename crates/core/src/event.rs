use chrono::{DateTime, Utc};

/// A domain event emitted by an aggregate decision.
///
/// Events describe what happened; they are logged by the dispatcher and then
/// applied to the aggregate copy that replaces the stored record.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "logbook.entry.return_recorded").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
