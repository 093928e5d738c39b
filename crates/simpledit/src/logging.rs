//! Logger setup. The terminal belongs to the editor, so records go to a
//! file instead of stderr.

use directories::ProjectDirs;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// `SIMPLEDIT_LOG_FILE`, else `simpledit.log` in the local data directory.
pub fn log_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SIMPLEDIT_LOG_FILE") {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("com", "simpledit", "simpledit")
        .map(|dirs| dirs.data_local_dir().join("simpledit.log"))
}

/// Install the global logger. Returns the log file path, or `None` when
/// logging could not be set up (the editor runs without it).
pub fn init() -> Option<PathBuf> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let mut logger = Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("simpledit", LevelFilter::Debug);
        logger.filter_module("doccore", LevelFilter::Debug);
    }
    logger.target(Target::Pipe(Box::new(file)));
    logger.try_init().ok()?;

    log::info!("Logging to {}", path.display());
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path_from_env() {
        let previous = std::env::var("SIMPLEDIT_LOG_FILE").ok();
        std::env::set_var("SIMPLEDIT_LOG_FILE", "/tmp/simpledit-test.log");

        assert_eq!(
            log_file_path(),
            Some(PathBuf::from("/tmp/simpledit-test.log"))
        );

        match previous {
            Some(value) => std::env::set_var("SIMPLEDIT_LOG_FILE", value),
            None => std::env::remove_var("SIMPLEDIT_LOG_FILE"),
        }
    }
}
