//! Structured JSON logging to stdout and a rotating file.
//!
//! # Data Flow
//! ```text
//! LogConfig ─▶ new_logger ─▶ Logger ──┬─▶ AtomicLevel (shared threshold)
//!                                     ├─▶ JsonEncoder (fixed key layout)
//!                                     └─▶ MultiSink ─┬─▶ Console (stdout)
//!                                                    └─▶ RotatingFile
//! SugaredLogger ─▶ Logger
//! tracing events ─▶ LoggerLayer ─▶ Logger
//! global::{debug, info, ..} ─▶ process-wide SugaredLogger
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod field;
pub mod global;
pub mod layer;
pub mod level;
pub mod logger;
pub mod sink;
pub mod sugar;

pub use config::{LogConfig, RotateConfig};
pub use error::LogError;
pub use field::{Field, Value};
pub use level::{AtomicLevel, Level};
pub use logger::{new_logger, new_sugared_logger, Logger, LoggerBuilder};
pub use sugar::SugaredLogger;
