//! JSON record encoding.
//!
//! # Layout
//! ```text
//! {"level":"info","time":"2024-05-01T09:30:00.125Z","logger":"app.db",
//!  "linenum":"src/db.rs:42","msg":"connected",<fields...>,"stacktrace":"..."}\n
//! ```
//!
//! # Design Decisions
//! - Key order and names are fixed; downstream consumers parse them verbatim
//! - `logger`, `linenum` and `stacktrace` are omitted when empty
//! - Durations are floating-point seconds, timestamps ISO-8601 UTC (ms precision)
//! - `linenum` is `Location::file()` plus the line: the path exactly as the
//!   compiler was given it, usually relative to the workspace root
//!   (`src/db.rs`), absolute only for sources compiled from outside it

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::field::{Field, Value};
use crate::level::Level;

pub const LEVEL_KEY: &str = "level";
pub const TIME_KEY: &str = "time";
pub const NAME_KEY: &str = "logger";
pub const CALLER_KEY: &str = "linenum";
pub const MESSAGE_KEY: &str = "msg";
pub const STACKTRACE_KEY: &str = "stacktrace";

/// Source location of a logging call.
///
/// `file` is not canonicalized; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn from_location(location: &'static std::panic::Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Everything about a record except its structured fields.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub logger_name: &'a str,
    pub caller: Option<Caller>,
    pub message: &'a str,
    pub stack: Option<String>,
}

/// Render a timestamp the way records carry it.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Encodes entries as newline-terminated JSON objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode one record: entry metadata, then `context`, then `fields`.
    pub fn encode(&self, entry: &Entry<'_>, context: &[Field], fields: &[Field]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);
        buf.push(b'{');

        write_key(&mut buf, LEVEL_KEY, true);
        write_json(&mut buf, &entry.level.to_string());

        write_key(&mut buf, TIME_KEY, false);
        write_json(&mut buf, &format_time(&entry.time));

        if !entry.logger_name.is_empty() {
            write_key(&mut buf, NAME_KEY, false);
            write_json(&mut buf, entry.logger_name);
        }

        if let Some(caller) = entry.caller {
            write_key(&mut buf, CALLER_KEY, false);
            write_json(&mut buf, &caller.to_string());
        }

        write_key(&mut buf, MESSAGE_KEY, false);
        write_json(&mut buf, entry.message);

        for field in context.iter().chain(fields) {
            write_key(&mut buf, &field.key, false);
            write_value(&mut buf, &field.value);
        }

        if let Some(stack) = entry.stack.as_deref().filter(|s| !s.is_empty()) {
            write_key(&mut buf, STACKTRACE_KEY, false);
            write_json(&mut buf, stack);
        }

        buf.extend_from_slice(b"}\n");
        buf
    }
}

fn write_key(buf: &mut Vec<u8>, key: &str, first: bool) {
    if !first {
        buf.push(b',');
    }
    write_json(buf, key);
    buf.push(b':');
}

fn write_json<T: Serialize + ?Sized>(buf: &mut Vec<u8>, value: &T) {
    // Writing into a Vec only fails for non-string map keys, which Value never produces.
    if serde_json::to_writer(&mut *buf, value).is_err() {
        buf.extend_from_slice(b"null");
    }
}

fn write_float(buf: &mut Vec<u8>, v: f64) {
    if v.is_nan() {
        write_json(buf, "NaN");
    } else if v.is_infinite() {
        write_json(buf, if v > 0.0 { "+Inf" } else { "-Inf" });
    } else {
        write_json(buf, &v);
    }
}

fn write_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Str(s) => write_json(buf, s),
        Value::Bool(b) => write_json(buf, b),
        Value::I64(n) => write_json(buf, n),
        Value::U64(n) => write_json(buf, n),
        Value::F64(f) => write_float(buf, *f),
        Value::Duration(d) => write_float(buf, d.as_secs_f64()),
        Value::Time(t) => write_json(buf, &format_time(t)),
        Value::Json(v) => write_json(buf, v),
    }
}

/// A record parsed back from one encoded line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub level: String,
    pub time: String,
    #[serde(default)]
    pub logger: Option<String>,
    #[serde(default)]
    pub linenum: Option<String>,
    pub msg: String,
    #[serde(default)]
    pub stacktrace: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.time)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}
