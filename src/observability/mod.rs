//! Observability for the certifier
//!
//! - Structured JSON logging with a process-wide severity floor
//! - Typed lifecycle and decision events
//! - Lock-free counters
//!
//! Observability is read-only: nothing here influences a certification
//! decision or the allocation order.
//!
//! # Usage
//!
//! ```ignore
//! use gtidcert::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::ExecutedSetSeeded, &[("gnos", "250")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_accepted();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log an event at its default severity with fields.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
