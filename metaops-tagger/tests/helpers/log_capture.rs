//! Log capture utilities for testing
//!
//! Captures tracing events emitted on the current thread while a closure
//! runs, so parallel tests never see each other's logs.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

/// Captured log record
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Structured fields other than the message, as `name=value`
    pub fields: String,
}

/// Log capture layer for testing
#[derive(Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured log records
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Records at exactly this level
    pub fn at_level(&self, level: Level) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level)
            .collect()
    }

    /// Check if any log message matches pattern
    pub fn contains(&self, pattern: &str) -> bool {
        self.records().iter().any(|r| r.message.contains(pattern))
    }

    /// Assert at least one log at `level` matches pattern
    pub fn assert_logged(&self, level: Level, pattern: &str) {
        assert!(
            self.at_level(level).iter().any(|r| r.message.contains(pattern)),
            "Expected {} log matching '{}', but none found. All logs:\n{}",
            level,
            pattern,
            self.dump()
        );
    }

    /// Assert no log at `level` was captured
    pub fn assert_none_at(&self, level: Level) {
        let found = self.at_level(level);
        assert!(
            found.is_empty(),
            "Expected no {} logs, found:\n{}",
            level,
            self.dump()
        );
    }

    fn dump(&self) -> String {
        self.records()
            .iter()
            .map(|r| format!("{} {} {} {}", r.level, r.target, r.message, r.fields))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<S> tracing_subscriber::Layer<S> for LogCapture
where
    S: tracing::Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        use tracing::field::Visit;

        #[derive(Default)]
        struct EventVisitor {
            message: String,
            fields: String,
        }

        impl Visit for EventVisitor {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = value.to_string();
                } else {
                    let _ = write!(self.fields, "{}={} ", field.name(), value);
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = format!("{:?}", value);
                } else {
                    let _ = write!(self.fields, "{}={:?} ", field.name(), value);
                }
            }
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        self.records.lock().unwrap().push(LogRecord {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
            fields: visitor.fields.trim_end().to_string(),
        });
    }
}

/// Run `f` with a capturing subscriber installed for this thread
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogCapture) {
    let capture = LogCapture::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}
