//! Environment guard command.
//!
//! # Usage
//!
//! ```bash
//! mc-cli check-env
//! mc-cli --env-file .env.production check-env
//! ```
//!
//! Exits 0 when every required variable is present and valid, 1 otherwise.
//! Problems are written to stderr, one per line, regardless of `RUST_LOG`. Advisories (weak secrets,
//! plain-HTTP `APP_URL` outside development) are logged as warnings and do
//! not change the exit code.

use mitto_connect::config;

/// Validate the process environment and return the exit code.
pub fn run() -> i32 {
    match config::check_environment(|key| std::env::var(key).ok()) {
        Ok(report) => {
            for advisory in &report.advisories {
                tracing::warn!(var = advisory.var, "{}", advisory.message);
            }
            tracing::info!(
                environment = %report.config.environment,
                port = report.config.port,
                queue_driver = %report.config.queue.driver,
                advisories = report.advisories.len(),
                "Environment OK"
            );
            0
        }
        Err(errors) => {
            tracing::error!("{errors}");
            // The exit reason must reach stderr whatever RUST_LOG filters out
            #[allow(clippy::print_stderr)]
            {
                eprintln!("{errors}");
            }
            1
        }
    }
}
