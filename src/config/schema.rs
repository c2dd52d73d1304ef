//! Configuration schema definitions.
//!
//! Field names mirror the external configuration surface:
//!
//! ```toml
//! sugar = true
//! level = 0          # -1 debug, 0 info, 1 warn, 2 error, 3 dpanic, 4 panic, 5 fatal
//! file = "app.log"
//! path = "/var/log/app/app.log"
//!
//! [rotate]
//! compress = false
//! maxSize = 100      # megabytes
//! maxAge = 7         # days
//! maxBackups = 3
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::level::Level;

/// Root logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Expose the sugared (loosely typed) logging surface.
    pub sugar: bool,

    /// Minimum severity code.
    pub level: Level,

    /// Logical file name; used under the temp dir when `path` is empty.
    pub file: String,

    /// Path of the active log file. The parent directory must exist.
    pub path: String,

    /// Rotation thresholds.
    pub rotate: RotateConfig,
}

impl LogConfig {
    /// Path of the active file.
    ///
    /// An empty `path` falls back to `<temp>/<file>`, or
    /// `<temp>/<executable>-logkit.log` when `file` is empty too.
    pub fn log_path(&self) -> PathBuf {
        if !self.path.is_empty() {
            return PathBuf::from(&self.path);
        }
        if !self.file.is_empty() {
            return std::env::temp_dir().join(&self.file);
        }

        let exe = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "logkit".to_string());
        std::env::temp_dir().join(format!("{}-logkit.log", exe))
    }
}

/// Rotation thresholds, passed through to the rotating file sink unchanged.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RotateConfig {
    /// Gzip rotated backups.
    pub compress: bool,

    /// Megabytes before the active file rotates.
    pub max_size: i64,

    /// Days a backup is retained.
    pub max_age: i64,

    /// Number of backups retained.
    pub max_backups: i64,
}
