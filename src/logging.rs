//! Logging setup
//!
//! The terminal is in raw mode while the demo runs, so log records go to a
//! file instead of stderr. Level comes from `RUST_LOG` (default `info`).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::error::TripfieldError;

const LOG_DIR: &str = "tripfield";
const LOG_FILE: &str = "tripfield.log";

/// Default log file under the platform data directory
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(LOG_DIR).join(LOG_FILE))
}

/// Format one record the way it lands in the log file
pub fn format_line(level: log::Level, target: &str, message: &str) -> String {
    format!(
        "{} {:<5} {}: {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        level,
        target,
        message
    )
}

/// Install the global logger writing to `path`
///
/// Fails if the file cannot be opened. Calling it twice is harmless: the
/// second install is ignored.
pub fn init_logging(path: &Path) -> Result<(), TripfieldError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let result = Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(record.level(), record.target(), &record.args().to_string())
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialised");
    }
    Ok(())
}
