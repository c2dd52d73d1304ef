//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → LogConfig (immutable value)
//!     → logger::new_logger builds sinks, encoder and level from it
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → reloader applies level and rotation thresholds to the live Logger
//! ```
//!
//! # Design Decisions
//! - Config is a plain value; loading it is optional, callers may build it in code
//! - Missing keys take zero values; no semantic validation is applied
//! - Rotation values are interpreted by the rotating file sink, not here

pub mod loader;
pub mod schema;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{LogConfig, RotateConfig};
pub use watcher::{spawn_reloader, ConfigWatcher};
