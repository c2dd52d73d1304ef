//! Process-wide logger holder.
//!
//! Code that logs through these functions takes an implicit dependency on
//! [`init`] having run. Prefer passing a [`Logger`](crate::Logger) or
//! [`SugaredLogger`] to the components that need one; this holder exists for
//! call sites where threading a handle through is impractical.
//!
//! # Lifecycle
//! - `init`/`set` succeed once per process; later calls return
//!   `LogError::AlreadyInitialized`
//! - Before initialization the convenience functions discard their input
//! - There is no teardown; the file handle lives until the process exits

use std::fmt::Display;
use std::panic::Location;
use std::sync::{Mutex, OnceLock};

use crate::config::LogConfig;
use crate::error::LogError;
use crate::level::Level;
use crate::logger::new_sugared_logger;
use crate::sugar::SugaredLogger;

static GLOBAL: OnceLock<SugaredLogger> = OnceLock::new();
static INIT: Mutex<()> = Mutex::new(());

/// Build a sugared logger from `config` and install it process-wide.
pub fn init(config: &LogConfig) -> Result<&'static SugaredLogger, LogError> {
    let _guard = INIT.lock().unwrap_or_else(|e| e.into_inner());
    if GLOBAL.get().is_some() {
        return Err(LogError::AlreadyInitialized);
    }

    let logger = new_sugared_logger(config)?;
    Ok(GLOBAL.get_or_init(|| logger))
}

/// Install an already built logger process-wide.
pub fn set(logger: SugaredLogger) -> Result<&'static SugaredLogger, LogError> {
    let _guard = INIT.lock().unwrap_or_else(|e| e.into_inner());
    if GLOBAL.get().is_some() {
        return Err(LogError::AlreadyInitialized);
    }
    Ok(GLOBAL.get_or_init(|| logger))
}

/// The installed logger, if any.
pub fn logger() -> Option<&'static SugaredLogger> {
    GLOBAL.get()
}

fn emit(level: Level, args: &[&dyn Display], location: &'static Location<'static>) {
    if let Some(logger) = GLOBAL.get() {
        logger.log_args(level, args, location);
    }
}

#[track_caller]
pub fn debug(args: &[&dyn Display]) {
    emit(Level::DEBUG, args, Location::caller());
}

#[track_caller]
pub fn info(args: &[&dyn Display]) {
    emit(Level::INFO, args, Location::caller());
}

#[track_caller]
pub fn warn(args: &[&dyn Display]) {
    emit(Level::WARN, args, Location::caller());
}

#[track_caller]
pub fn error(args: &[&dyn Display]) {
    emit(Level::ERROR, args, Location::caller());
}
