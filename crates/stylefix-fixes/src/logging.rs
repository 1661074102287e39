//! Logging module for fix resolution and application
//!
//! Writes a detailed trace of registry decisions and fix application to
//! a log file, for debugging which module matched which violation group
//! and which violations were claimed.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<FixLogger>> = Mutex::new(None);

pub struct FixLogger {
    file: File,
}

impl FixLogger {
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;
        Ok(Self { file })
    }

    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger. With no explicit path, logs go to a
/// timestamped file under the system temp directory.
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        std::env::temp_dir().join(format!("stylefix-{}.log", timestamp))
    });

    let logger = FixLogger::new(&path)?;
    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }
    Ok(path)
}

pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

pub fn is_enabled() -> bool {
    match LOGGER.lock() {
        Ok(guard) => guard.is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fix.log");
        let mut logger = FixLogger::new(&path).unwrap();
        logger.section("RESOLUTION");
        logger.log("registry: built `upper_ell`");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("RESOLUTION"));
        assert!(contents.contains("registry: built `upper_ell`"));
    }
}
