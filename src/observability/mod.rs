//! # Observability
//!
//! JSON log lines keyed by a typed [`Event`], plus gateway counters.
//! Nothing here can change or fail a request.
//!
//! ```ignore
//! use sqlgate::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RequestCommitted, &[("endpoint", "orders"), ("rows", "3")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity, UnknownSeverity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log `event` at its default severity
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log `event` at its default severity with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
