//! Bridge from `tracing` events into a [`Logger`].
//!
//! # Mapping
//! ```text
//! TRACE, DEBUG → debug     target a::b     → logger "a.b"
//! INFO         → info      file:line       → linenum
//! WARN         → warn      `message` field → msg
//! ERROR        → error     other fields    → structured fields
//! ```
//!
//! # Design Decisions
//! - Callsite interest is always "sometimes" so the logger's atomic threshold
//!   is consulted on every event and runtime level changes take effect
//! - An optional `LOGKIT_FILTER` env filter narrows targets on top of the threshold

use std::fmt;

use tracing::field::{Field as TracingField, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::encoder::Caller;
use crate::error::LogError;
use crate::field::Field;
use crate::level::Level;
use crate::logger::Logger;

/// Environment variable holding optional target directives, e.g. `hyper=warn`.
pub const FILTER_ENV: &str = "LOGKIT_FILTER";

/// `tracing_subscriber` layer writing events through a [`Logger`].
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for LoggerLayer {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        !metadata.is_event() || self.logger.enabled(Level::from(*metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Level::from(*metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let target = metadata.target().replace("::", ".");
        let name = if self.logger.name().is_empty() {
            target
        } else {
            format!("{}.{}", self.logger.name(), target)
        };

        let caller = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) if self.logger.adds_caller() => Some(Caller { file, line }),
            _ => None,
        };

        self.logger
            .write_entry(level, &name, &visitor.message, caller, &visitor.fields);
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<Field>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(Field::str(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.fields.push(Field::i64(field.name(), value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.fields.push(Field::u64(field.name(), value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.fields.push(Field::f64(field.name(), value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.push(Field::bool(field.name(), value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.fields.push(Field::str(field.name(), value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(Field::debug(field.name(), value));
        }
    }
}

/// Install `logger` as the process-wide tracing subscriber.
pub fn install(logger: Logger) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_env(FILTER_ENV).ok();

    tracing_subscriber::registry()
        .with(filter)
        .with(LoggerLayer::new(logger))
        .try_init()
        .map_err(|e| LogError::Subscriber(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Record;
    use crate::logger::LoggerBuilder;
    use crate::sink::MemorySink;

    fn records(sink: &MemorySink) -> Vec<Record> {
        sink.lines().iter().map(|l| Record::parse(l).unwrap()).collect()
    }

    #[test]
    fn test_events_follow_runtime_level() {
        let sink = MemorySink::new();
        let logger = LoggerBuilder::new()
            .level(Level::ERROR)
            .sink(sink.clone())
            .build();
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("suppressed");
            logger.level().set_level(Level::DEBUG);
            tracing::info!("emitted");
        });

        let records = records(&sink);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].msg, "emitted");
    }

    #[test]
    fn test_event_fields_and_metadata() {
        let sink = MemorySink::new();
        let logger = LoggerBuilder::new()
            .level(Level::DEBUG)
            .sink(sink.clone())
            .build();
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));

        let line = tracing::subscriber::with_default(subscriber, || {
            let line = line!() + 1;
            tracing::warn!(port = 8080u64, secure = false, peer = ?"10.0.0.1", "bind {}", "failed");
            line
        });

        let record = &records(&sink)[0];
        assert_eq!(record.level, "warn");
        assert_eq!(record.msg, "bind failed");
        assert_eq!(record.logger.as_deref(), Some("logkit.layer.tests"));
        assert_eq!(record.linenum, Some(format!("{}:{}", file!(), line)));
        assert_eq!(record.fields["port"], serde_json::json!(8080));
        assert_eq!(record.fields["secure"], serde_json::json!(false));
        assert_eq!(record.fields["peer"], serde_json::json!("\"10.0.0.1\""));
    }

    #[test]
    fn test_trace_maps_to_debug() {
        let sink = MemorySink::new();
        let logger = LoggerBuilder::new()
            .level(Level::DEBUG)
            .sink(sink.clone())
            .build()
            .named("bridge");
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!(target: "db::pool", "checkout");
        });

        let record = &records(&sink)[0];
        assert_eq!(record.level, "debug");
        assert_eq!(record.logger.as_deref(), Some("bridge.db.pool"));
    }
}
