//! Logging setup
//!
//! Store events reach `tracing` through `TracingSink`; this module installs
//! the subscriber that prints them. The filter comes from `SHELF_LOG`, then
//! the `log_level` config key, then a default: `info` in the interactive
//! shell (where log lines are the feedback) and `warn` for one-shot
//! commands (which print their own results).

use std::fs::File;

use tracing_subscriber::EnvFilter;

use shelf_core::Config;

/// Environment variable holding a filter directive
const LOG_ENV: &str = "SHELF_LOG";

/// Pick the filter directive to use
fn directive(config: &Config, interactive: bool) -> String {
    if let Ok(val) = std::env::var(LOG_ENV) {
        if !val.is_empty() {
            return val;
        }
    }

    if let Some(level) = config.log_level.as_deref().filter(|l| !l.is_empty()) {
        return level.to_string();
    }

    let default = if interactive { "info" } else { "warn" };
    default.to_string()
}

/// Open the configured log file for appending
///
/// Returns `None` if no file is configured or it cannot be opened; the
/// latter is reported on stderr.
fn open_log_file(config: &Config) -> Option<File> {
    let log_path = config.log_file.as_ref()?;

    match File::options().create(true).append(true).open(log_path) {
        Ok(f) => Some(f),
        Err(e) => {
            eprintln!(
                "Warning: Could not open log file {:?}: {}. Logging to stderr.",
                log_path, e
            );
            None
        }
    }
}

/// Install the global subscriber (ignored if one is already set)
pub fn init(config: &Config, interactive: bool) {
    let env_filter = EnvFilter::try_new(directive(config, interactive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match open_log_file(config) {
        Some(log_file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
