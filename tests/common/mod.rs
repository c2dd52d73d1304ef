//! Shared utilities for integration tests.

use std::fs;
use std::path::Path;

use logkit::encoder::Record;
use logkit::{Level, LogConfig, RotateConfig};
use tempfile::TempDir;

/// Config writing `app.log` inside `dir`.
pub fn config_in(dir: &TempDir, level: Level, rotate: RotateConfig) -> LogConfig {
    LogConfig {
        sugar: false,
        level,
        file: "app.log".into(),
        path: dir.path().join("app.log").to_string_lossy().into_owned(),
        rotate,
    }
}

/// Parse every line of a log file.
pub fn read_records(path: &Path) -> Vec<Record> {
    let content = fs::read_to_string(path).unwrap();
    parse_lines(content.lines())
}

#[allow(dead_code)]
pub fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Record> {
    lines
        .into_iter()
        .map(|line| Record::parse(line).unwrap_or_else(|e| panic!("bad record {:?}: {}", line, e)))
        .collect()
}
