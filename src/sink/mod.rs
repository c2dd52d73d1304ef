//! Output destinations for encoded records.
//!
//! # Data Flow
//! ```text
//! Logger (encoded line)
//!     → MultiSink (fan-out, best effort)
//!         → Console (stdout)
//!         → RotatingFile (size/age/count bounded file)
//! ```
//!
//! # Design Decisions
//! - Each record is handed over as one complete line; sinks never split it
//! - Sinks are shared (`Arc<dyn Sink>`) and internally synchronized

pub mod multi;
pub mod rotate;

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::encoder::format_time;

pub use multi::MultiSink;
pub use rotate::{RotatePolicy, RotatingFile};

/// A destination that accepts encoded records.
pub trait Sink: Send + Sync {
    /// Write one complete record.
    fn write_record(&self, record: &[u8]) -> io::Result<()>;

    /// Flush buffered data to the underlying stream.
    fn flush(&self) -> io::Result<()>;
}

impl<T: Sink + ?Sized> Sink for Arc<T> {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        (**self).write_record(record)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Write `<time> <what>: <err>` to an error output, ignoring its own failures.
pub(crate) fn report_error(out: &dyn Sink, what: &str, err: &dyn Display) {
    let line = format!("{} {}: {}\n", format_time(&Utc::now()), what, err);
    let _ = out.write_record(line.as_bytes());
}

/// Process standard stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    Stdout,
    Stderr,
}

impl Sink for Console {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        match self {
            Console::Stdout => io::stdout().lock().write_all(record),
            Console::Stderr => io::stderr().lock().write_all(record),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Console::Stdout => io::stdout().flush(),
            Console::Stderr => io::stderr().flush(),
        }
    }
}

/// In-memory sink; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Written records, one per line.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn clear(&self) {
        self.buf.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Sink for MemorySink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.buf
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(record);
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}
