//! Logger factory and the structured logging surface.
//!
//! # Responsibilities
//! - Compose sinks, encoder and shared threshold from a `LogConfig`
//! - Capture the call site of every logging call
//! - Keep write failures away from log call sites
//!
//! # Design Decisions
//! - `Logger` is a cheap handle over a shared core; `named`/`with` derive
//!   children that write through the same sinks and threshold
//! - Development mode is on by default: `dpanic` panics after writing
//! - `panic` and `fatal` terminate even when their record is filtered out

use std::backtrace::Backtrace;
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::Arc;

use chrono::Utc;

use crate::config::LogConfig;
use crate::encoder::{Caller, Entry, JsonEncoder};
use crate::error::LogError;
use crate::field::Field;
use crate::level::{AtomicLevel, Level};
use crate::sink::{report_error, Console, MultiSink, RotatePolicy, RotatingFile, Sink};
use crate::sugar::SugaredLogger;

/// Build a logger writing JSON to stdout and to the rotating file described by `config`.
pub fn new_logger(config: &LogConfig) -> Result<Logger, LogError> {
    Ok(LoggerBuilder::from_config(config)?.build())
}

/// Same as [`new_logger`], returning the sugared surface.
pub fn new_sugared_logger(config: &LogConfig) -> Result<SugaredLogger, LogError> {
    new_logger(config).map(|logger| logger.sugar())
}

struct Core {
    encoder: JsonEncoder,
    sink: Arc<dyn Sink>,
    file: Option<Arc<RotatingFile>>,
    level: AtomicLevel,
    development: bool,
    error_output: Arc<dyn Sink>,
}

/// Structured logger handle.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: String,
    context: Vec<Field>,
    add_caller: bool,
    stack_level: Option<Level>,
    sugar: bool,
}

/// Step-by-step composition of a [`Logger`].
pub struct LoggerBuilder {
    level: Level,
    sinks: Vec<Arc<dyn Sink>>,
    file: Option<Arc<RotatingFile>>,
    name: String,
    development: bool,
    add_caller: bool,
    stack_level: Option<Level>,
    sugar: bool,
    error_output: Arc<dyn Sink>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            level: Level::INFO,
            sinks: Vec::new(),
            file: None,
            name: String::new(),
            development: true,
            add_caller: true,
            stack_level: None,
            sugar: false,
            error_output: Arc::new(Console::Stderr),
        }
    }

    /// Stdout console plus the rotating file at `config.log_path()`.
    pub fn from_config(config: &LogConfig) -> Result<Self, LogError> {
        Self::from_config_with_console(config, Console::Stdout)
    }

    /// Like [`from_config`](Self::from_config) with a different console stream.
    pub fn from_config_with_console(
        config: &LogConfig,
        console: impl Sink + 'static,
    ) -> Result<Self, LogError> {
        let policy = RotatePolicy::from_config(&config.rotate);
        let file = RotatingFile::open(config.log_path(), policy)?;

        Ok(Self::new()
            .level(config.level)
            .sugar(config.sugar)
            .sink(console)
            .file(file))
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Add an output; records fan out to every sink in insertion order.
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Add a rotating file; it also receives rotation updates from `Logger::reconfigure`.
    pub fn file(mut self, file: RotatingFile) -> Self {
        let file = Arc::new(file);
        self.sinks.push(file.clone());
        self.file = Some(file);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    pub fn add_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    /// Attach a stack trace to records at or above `level`.
    pub fn add_stacktrace(mut self, level: Level) -> Self {
        self.stack_level = Some(level);
        self
    }

    pub fn sugar(mut self, sugar: bool) -> Self {
        self.sugar = sugar;
        self
    }

    /// Where write and backup cleanup failures are reported (stderr by default).
    pub fn error_output(mut self, sink: impl Sink + 'static) -> Self {
        self.error_output = Arc::new(sink);
        self
    }

    pub fn build(mut self) -> Logger {
        if let Some(file) = &self.file {
            file.set_error_output(self.error_output.clone());
        }
        let sink: Arc<dyn Sink> = if self.sinks.len() == 1 {
            self.sinks.remove(0)
        } else {
            Arc::new(MultiSink::new(self.sinks))
        };

        Logger {
            core: Arc::new(Core {
                encoder: JsonEncoder::new(),
                sink,
                file: self.file,
                level: AtomicLevel::new(self.level),
                development: self.development,
                error_output: self.error_output,
            }),
            name: self.name,
            context: Vec::new(),
            add_caller: self.add_caller,
            stack_level: self.stack_level,
            sugar: self.sugar,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Dotted logger name, empty for the root logger.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared threshold; changes apply to every clone and child.
    pub fn level(&self) -> &AtomicLevel {
        &self.core.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.core.level.enabled(level)
    }

    /// Child logger whose name is `<parent>.<name>`.
    pub fn named(&self, name: &str) -> Logger {
        let mut child = self.clone();
        child.name = match (self.name.is_empty(), name.is_empty()) {
            (_, true) => self.name.clone(),
            (true, false) => name.to_string(),
            (false, false) => format!("{}.{}", self.name, name),
        };
        child
    }

    /// Child logger that adds `fields` to every record.
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut child = self.clone();
        child.context.extend(fields);
        child
    }

    pub fn with_stacktrace(&self, level: Level) -> Logger {
        let mut child = self.clone();
        child.stack_level = Some(level);
        child
    }

    pub fn without_caller(&self) -> Logger {
        let mut child = self.clone();
        child.add_caller = false;
        child
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.log_at(Level::DEBUG, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.log_at(Level::INFO, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.log_at(Level::WARN, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.log_at(Level::ERROR, msg, fields, Location::caller());
    }

    /// Panics after writing when the logger is in development mode.
    #[track_caller]
    pub fn dpanic(&self, msg: &str, fields: &[Field]) {
        self.log_at(Level::DPANIC, msg, fields, Location::caller());
    }

    /// Writes, then panics.
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) {
        self.log_at(Level::PANIC, msg, fields, Location::caller());
    }

    /// Writes, flushes, then exits the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) {
        self.log_at(Level::FATAL, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        self.log_at(level, msg, fields, Location::caller());
    }

    pub(crate) fn log_at(
        &self,
        level: Level,
        msg: &str,
        fields: &[Field],
        location: &'static Location<'static>,
    ) {
        if self.enabled(level) {
            let caller = self.add_caller.then(|| Caller::from_location(location));
            self.write_entry(level, &self.name, msg, caller, fields);
        }
        self.terminate(level, msg);
    }

    /// Encode and write one record that already passed the threshold.
    pub(crate) fn write_entry(
        &self,
        level: Level,
        name: &str,
        msg: &str,
        caller: Option<Caller>,
        fields: &[Field],
    ) {
        let stack = self
            .stack_level
            .filter(|threshold| level >= *threshold)
            .map(|_| Backtrace::force_capture().to_string());

        let entry = Entry {
            level,
            time: Utc::now(),
            logger_name: name,
            caller,
            message: msg,
            stack,
        };

        let line = self.core.encoder.encode(&entry, &self.context, fields);
        if let Err(e) = self.core.sink.write_record(&line) {
            self.report_write_error(&e);
        }
    }

    fn terminate(&self, level: Level, msg: &str) {
        if (level == Level::DPANIC && self.core.development) || level == Level::PANIC {
            panic!("{}", msg);
        }
        if level == Level::FATAL {
            let _ = self.sync();
            std::process::exit(1);
        }
    }

    fn report_write_error(&self, err: &io::Error) {
        report_error(self.core.error_output.as_ref(), "write error", err);
    }

    /// Flush every sink.
    pub fn sync(&self) -> io::Result<()> {
        self.core.sink.flush()
    }

    /// Apply the level and rotation thresholds of `config`.
    ///
    /// The file path and sugar flag are fixed at construction.
    pub fn reconfigure(&self, config: &LogConfig) {
        self.core.level.set_level(config.level);

        if let Some(file) = &self.core.file {
            let requested = config.log_path();
            if requested != file.path() {
                tracing::warn!(
                    current = %file.path().display(),
                    requested = %requested.display(),
                    "Log path changes require a restart; keeping current file"
                );
            }
            file.set_policy(RotatePolicy::from_config(&config.rotate));
        }
    }

    /// Sugared view over this logger.
    pub fn sugar(&self) -> SugaredLogger {
        SugaredLogger::new(self.clone())
    }

    /// Sugared view, only when the logger was configured with `sugar = true`.
    pub fn sugared(&self) -> Option<SugaredLogger> {
        self.sugar.then(|| self.sugar())
    }

    pub fn is_development(&self) -> bool {
        self.core.development
    }

    pub(crate) fn adds_caller(&self) -> bool {
        self.add_caller
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.core.level.level())
            .field("context", &self.context.len())
            .field("add_caller", &self.add_caller)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Record;
    use crate::sink::MemorySink;

    fn memory_logger(level: Level) -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let logger = LoggerBuilder::new().level(level).sink(sink.clone()).build();
        (logger, sink)
    }

    fn records(sink: &MemorySink) -> Vec<Record> {
        sink.lines().iter().map(|l| Record::parse(l).unwrap()).collect()
    }

    #[test]
    fn test_below_threshold_is_dropped() {
        let (logger, sink) = memory_logger(Level::INFO);
        logger.debug("hidden", &[]);
        logger.info("shown", &[]);

        let records = records(&sink);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].msg, "shown");
        assert_eq!(records[0].level, "info");
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let (logger, sink) = memory_logger(Level::DEBUG);
        let line = line!() + 1;
        logger.warn("here", &[]);

        let record = &records(&sink)[0];
        assert_eq!(record.linenum.as_deref(), Some(format!("{}:{}", file!(), line).as_str()));
    }

    #[test]
    fn test_without_caller_omits_linenum() {
        let (logger, sink) = memory_logger(Level::DEBUG);
        logger.without_caller().info("quiet", &[]);
        assert_eq!(records(&sink)[0].linenum, None);
    }

    #[test]
    fn test_named_children_join_with_dots() {
        let (logger, sink) = memory_logger(Level::DEBUG);
        logger.named("http").named("router").info("route", &[]);
        logger.named("").info("root", &[]);

        let records = records(&sink);
        assert_eq!(records[0].logger.as_deref(), Some("http.router"));
        assert_eq!(records[1].logger, None);
    }

    #[test]
    fn test_context_fields_precede_call_fields() {
        let (logger, sink) = memory_logger(Level::DEBUG);
        logger
            .with([Field::str("request_id", "r-7")])
            .info("handled", &[Field::u64("status", 200)]);

        let line = &sink.lines()[0];
        assert!(line.contains("\"msg\":\"handled\",\"request_id\":\"r-7\",\"status\":200"));
    }

    #[test]
    fn test_level_change_is_shared_with_children() {
        let (logger, sink) = memory_logger(Level::ERROR);
        let child = logger.named("worker");
        child.info("suppressed", &[]);

        logger.level().set_level(Level::DEBUG);
        child.info("emitted", &[]);

        let records = records(&sink);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].msg, "emitted");
    }

    #[test]
    fn test_stacktrace_attached_at_threshold() {
        let (logger, sink) = memory_logger(Level::DEBUG);
        let logger = logger.with_stacktrace(Level::ERROR);
        logger.warn("no trace", &[]);
        logger.error("trace", &[]);

        let records = records(&sink);
        assert_eq!(records[0].stacktrace, None);
        assert!(records[1].stacktrace.is_some());
    }

    #[test]
    #[should_panic(expected = "invariant broken")]
    fn test_dpanic_panics_in_development() {
        let (logger, _sink) = memory_logger(Level::DEBUG);
        logger.dpanic("invariant broken", &[]);
    }

    #[test]
    fn test_dpanic_only_logs_in_production() {
        let sink = MemorySink::new();
        let logger = LoggerBuilder::new()
            .development(false)
            .sink(sink.clone())
            .build();
        logger.dpanic("recoverable", &[]);
        assert_eq!(records(&sink)[0].level, "dpanic");
    }

    #[test]
    #[should_panic(expected = "filtered but fatal")]
    fn test_panic_fires_even_when_filtered() {
        let (logger, _sink) = memory_logger(Level(10));
        logger.panic("filtered but fatal", &[]);
    }

    #[test]
    fn test_write_failure_is_reported_not_raised() {
        struct Failing;
        impl Sink for Failing {
            fn write_record(&self, _record: &[u8]) -> io::Result<()> {
                Err(io::Error::other("device gone"))
            }
            fn flush(&self) -> io::Result<()> {
                Ok(())
            }
        }

        let healthy = MemorySink::new();
        let errors = MemorySink::new();
        let logger = LoggerBuilder::new()
            .sink(Failing)
            .sink(healthy.clone())
            .error_output(errors.clone())
            .build();

        logger.info("still delivered", &[]);

        assert_eq!(records(&healthy)[0].msg, "still delivered");
        assert!(errors.contents().contains("write error: device gone"));
    }

    #[test]
    fn test_sugared_follows_config_flag() {
        let (logger, _sink) = memory_logger(Level::INFO);
        assert!(logger.sugared().is_none());

        let sugared = LoggerBuilder::new().sugar(true).sink(MemorySink::new()).build();
        assert!(sugared.sugared().is_some());
    }

    #[test]
    fn test_reconfigure_updates_level_and_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let config = LogConfig {
            path: path.to_string_lossy().into_owned(),
            ..Default::default()
        };
        let logger = LoggerBuilder::from_config(&config).unwrap().build();

        let mut updated = config.clone();
        updated.level = Level::WARN;
        updated.rotate.max_size = 5;
        updated.rotate.max_backups = 2;
        logger.reconfigure(&updated);

        assert_eq!(logger.level().level(), Level::WARN);
        let file = logger.core.file.as_ref().unwrap();
        assert_eq!(file.policy().max_bytes, 5 * crate::sink::rotate::MEGABYTE);
        assert_eq!(file.policy().max_backups, 2);
    }
}
