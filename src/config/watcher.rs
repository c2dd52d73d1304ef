//! Configuration file watcher for hot reload.
//!
//! # Data Flow
//! ```text
//! notify (parent dir) ─▶ events for the config file name ─▶ debounce task
//!     ─▶ load_config ─▶ mpsc<LogConfig> ─▶ spawn_reloader ─▶ Logger::reconfigure
//! ```
//!
//! # Design Decisions
//! - The parent directory is watched so editors that save by rename still
//!   trigger a reload
//! - One save usually emits several events; they collapse into one reload once
//!   the file has been quiet for the debounce window
//! - A file that fails to parse keeps the current configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::loader::load_config;
use crate::config::schema::LogConfig;
use crate::logger::Logger;

/// Quiet period after the last change event before the file is read.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches one configuration file and publishes each successfully parsed version.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
    update_tx: mpsc::UnboundedSender<LogConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<LogConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                debounce: DEFAULT_DEBOUNCE,
                update_tx,
            },
            update_rx,
        )
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start watching. Must be called inside a tokio runtime.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let target = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if concerns(&event, &target) => {
                    let _ = event_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Log config watch error"),
            },
            Config::default(),
        )?;

        watcher.watch(watch_dir(&self.path), RecursiveMode::NonRecursive)?;
        tokio::spawn(reload_on_change(
            self.path.clone(),
            self.debounce,
            event_rx,
            self.update_tx,
        ));

        tracing::info!(path = %self.path.display(), "Log config watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Whether `event` is a write or (re)creation of the file named like `target`.
fn concerns(event: &Event, target: &Path) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == target.file_name())
}

async fn reload_on_change(
    path: PathBuf,
    debounce: Duration,
    mut events: mpsc::UnboundedReceiver<()>,
    updates: mpsc::UnboundedSender<LogConfig>,
) {
    while events.recv().await.is_some() {
        let mut watching = true;
        loop {
            match tokio::time::timeout(debounce, events.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => {
                    watching = false;
                    break;
                }
                Err(_) => break,
            }
        }

        tracing::info!(path = %path.display(), "Log config change detected, reloading");
        match load_config(&path) {
            Ok(config) => {
                if updates.send(config).is_err() {
                    return;
                }
            }
            Err(e) => tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to reload log config; keeping current configuration"
            ),
        }

        if !watching {
            return;
        }
    }
}

/// Apply every received configuration to `logger` until the channel closes.
pub fn spawn_reloader(
    logger: Logger,
    mut updates: mpsc::UnboundedReceiver<LogConfig>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(config) = updates.recv().await {
            let previous = logger.level().level();
            logger.reconfigure(&config);
            tracing::info!(
                from = %previous,
                to = %config.level,
                "Log configuration reloaded"
            );
        }
    })
}
