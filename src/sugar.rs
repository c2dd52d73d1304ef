//! Loosely typed convenience surface over [`Logger`].
//!
//! Three call shapes per level:
//! - `info(&[&a, &b])` joins the arguments with spaces
//! - `infof(format_args!(..))` formats a message
//! - `infow(msg, [("key", value.into())])` attaches key/value pairs
//!
//! All of them go through the wrapped logger's threshold, encoder and sinks.

use std::fmt::{self, Display, Write as _};
use std::io;
use std::panic::Location;

use crate::field::{Field, Value};
use crate::level::{AtomicLevel, Level};
use crate::logger::Logger;

/// Sugared logger handle.
#[derive(Debug, Clone)]
pub struct SugaredLogger {
    base: Logger,
}

macro_rules! sugared_levels {
    ($($level:ident => $plain:ident, $formatted:ident, $pairs:ident;)*) => {
        $(
            #[track_caller]
            pub fn $plain(&self, args: &[&dyn Display]) {
                self.log_args(Level::$level, args, Location::caller());
            }

            #[track_caller]
            pub fn $formatted(&self, args: fmt::Arguments<'_>) {
                self.log_fmt(Level::$level, args, Location::caller());
            }

            #[track_caller]
            pub fn $pairs<'a>(&self, msg: &str, pairs: impl IntoIterator<Item = (&'a str, Value)>) {
                self.log_pairs(Level::$level, msg, pairs, Location::caller());
            }
        )*
    };
}

impl SugaredLogger {
    pub fn new(base: Logger) -> Self {
        Self { base }
    }

    /// The strictly typed logger underneath.
    pub fn desugar(&self) -> &Logger {
        &self.base
    }

    pub fn level(&self) -> &AtomicLevel {
        self.base.level()
    }

    pub fn named(&self, name: &str) -> SugaredLogger {
        Self::new(self.base.named(name))
    }

    /// Child logger carrying `pairs` on every record.
    pub fn with<'a>(&self, pairs: impl IntoIterator<Item = (&'a str, Value)>) -> SugaredLogger {
        Self::new(self.base.with(to_fields(pairs)))
    }

    pub fn sync(&self) -> io::Result<()> {
        self.base.sync()
    }

    sugared_levels! {
        DEBUG => debug, debugf, debugw;
        INFO => info, infof, infow;
        WARN => warn, warnf, warnw;
        ERROR => error, errorf, errorw;
        DPANIC => dpanic, dpanicf, dpanicw;
        PANIC => panic, panicf, panicw;
        FATAL => fatal, fatalf, fatalw;
    }

    pub(crate) fn log_args(
        &self,
        level: Level,
        args: &[&dyn Display],
        location: &'static Location<'static>,
    ) {
        let msg = if self.needs_message(level) {
            join_args(args)
        } else {
            String::new()
        };
        self.base.log_at(level, &msg, &[], location);
    }

    fn log_fmt(
        &self,
        level: Level,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
    ) {
        let msg = match args.as_str() {
            Some(s) => s.to_string(),
            None if self.needs_message(level) => args.to_string(),
            None => String::new(),
        };
        self.base.log_at(level, &msg, &[], location);
    }

    /// Filtered records skip formatting, except levels that may terminate with the message.
    fn needs_message(&self, level: Level) -> bool {
        level >= Level::DPANIC || self.base.enabled(level)
    }

    fn log_pairs<'a>(
        &self,
        level: Level,
        msg: &str,
        pairs: impl IntoIterator<Item = (&'a str, Value)>,
        location: &'static Location<'static>,
    ) {
        let fields = to_fields(pairs);
        self.base.log_at(level, msg, &fields, location);
    }
}

fn to_fields<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> Vec<Field> {
    pairs
        .into_iter()
        .map(|(key, value)| Field::new(key, value))
        .collect()
}

fn join_args(args: &[&dyn Display]) -> String {
    let mut msg = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            msg.push(' ');
        }
        let _ = write!(msg, "{}", arg);
    }
    msg
}
