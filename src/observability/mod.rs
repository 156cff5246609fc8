//! Observability for the word service
//!
//! - Structured JSON logging with a process-wide minimum severity
//! - Typed event names
//! - Monotonic request counters
//! - Begin/complete scopes with elapsed time
//!
//! Observability is read-only: nothing here can fail a request.

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event at INFO (or ERROR for failure events)
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}

fn event_severity(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Error
    } else {
        Severity::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_severity() {
        assert_eq!(event_severity(Event::ConfigLoaded), Severity::Info);
        assert_eq!(event_severity(Event::ServerStart), Severity::Info);
        assert_eq!(event_severity(Event::StoreFailure), Severity::Error);
        assert_eq!(event_severity(Event::RowDecodeFailure), Severity::Error);
    }

    #[test]
    fn test_failure_event_line() {
        let line = logger::capture_log(
            event_severity(Event::StoreFailure),
            Event::StoreFailure.as_str(),
            &[("reason", "refused")],
        );
        assert_eq!(
            line,
            "{\"event\":\"STORE_FAILURE\",\"severity\":\"ERROR\",\"reason\":\"refused\"}\n"
        );
    }
}
