//! Severity levels and the shared runtime threshold.
//!
//! # Levels
//! ```text
//! debug(-1) < info(0) < warn(1) < error(2) < dpanic(3) < panic(4) < fatal(5)
//! ```
//!
//! # Design Decisions
//! - `Level` is a newtype over `i8` so out-of-range codes from configuration
//!   pass through unchanged instead of being rejected
//! - `AtomicLevel` is a cloneable handle; every clone observes the same threshold

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A log severity. Ordering is by numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(pub i8);

impl Level {
    pub const DEBUG: Level = Level(-1);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(1);
    pub const ERROR: Level = Level(2);
    /// Panics after writing when the logger runs in development mode.
    pub const DPANIC: Level = Level(3);
    pub const PANIC: Level = Level(4);
    pub const FATAL: Level = Level(5);

    /// Raw severity code.
    pub fn code(self) -> i8 {
        self.0
    }

    /// Lowercase name, `None` for codes outside the known range.
    pub fn as_str(self) -> Option<&'static str> {
        match self.0 {
            -1 => Some("debug"),
            0 => Some("info"),
            1 => Some("warn"),
            2 => Some("error"),
            3 => Some("dpanic"),
            4 => Some("panic"),
            5 => Some("fatal"),
            _ => None,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl From<i8> for Level {
    fn from(code: i8) -> Self {
        Level(code)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(name) => f.write_str(name),
            None => write!(f, "Level({})", self.0),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::DEBUG,
            tracing::Level::INFO => Level::INFO,
            tracing::Level::WARN => Level::WARN,
            tracing::Level::ERROR => Level::ERROR,
        }
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized level: {0:?}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::DEBUG),
            "info" | "" => Ok(Level::INFO),
            "warn" | "warning" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            "dpanic" => Ok(Level::DPANIC),
            "panic" => Ok(Level::PANIC),
            "fatal" => Ok(Level::FATAL),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Thread-safe minimum severity shared by every handle of one logger.
///
/// Reads happen on every log call, writes only on reconfiguration.
#[derive(Debug, Clone)]
pub struct AtomicLevel {
    threshold: Arc<AtomicI8>,
}

impl AtomicLevel {
    pub fn new(level: Level) -> Self {
        Self {
            threshold: Arc::new(AtomicI8::new(level.code())),
        }
    }

    /// Current threshold.
    pub fn level(&self) -> Level {
        Level(self.threshold.load(Ordering::Acquire))
    }

    /// Change the threshold for all subsequent log calls.
    pub fn set_level(&self, level: Level) {
        self.threshold.store(level.code(), Ordering::Release);
    }

    /// Whether a record at `level` passes the threshold.
    pub fn enabled(&self, level: Level) -> bool {
        level.code() >= self.threshold.load(Ordering::Acquire)
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::DEBUG < Level::INFO);
        assert!(Level::INFO < Level::WARN);
        assert!(Level::ERROR < Level::FATAL);
    }

    #[test]
    fn test_display_known_and_unknown() {
        assert_eq!(Level::WARN.to_string(), "warn");
        assert_eq!(Level::DPANIC.to_string(), "dpanic");
        assert_eq!(Level(42).to_string(), "Level(42)");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::WARN);
        assert_eq!("debug".parse::<Level>().unwrap(), Level::DEBUG);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_atomic_level_shared_between_clones() {
        let level = AtomicLevel::new(Level::ERROR);
        let other = level.clone();
        assert!(!level.enabled(Level::INFO));

        other.set_level(Level::DEBUG);
        assert!(level.enabled(Level::INFO));
        assert_eq!(level.level(), Level::DEBUG);
    }

    #[test]
    fn test_out_of_range_threshold_passes_through() {
        let level = AtomicLevel::new(Level(100));
        assert!(!level.enabled(Level::FATAL));
        assert_eq!(level.level().code(), 100);
    }
}
