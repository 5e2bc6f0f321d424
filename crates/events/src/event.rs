use chrono::{DateTime, Utc};

/// Something a session reports to its observers.
///
/// Payloads are facts: once appended to an [`crate::EventLog`] they are never
/// edited, only drained or discarded.
pub trait Event: Clone + core::fmt::Debug {
    /// Dotted name, e.g. `wizard.step.entered`.
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32;

    fn occurred_at(&self) -> DateTime<Utc>;

    /// `event_type@version`, as written to logs.
    fn qualified_type(&self) -> String {
        format!("{}@{}", self.event_type(), self.version())
    }
}
