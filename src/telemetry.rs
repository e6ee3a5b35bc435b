use tracing_subscriber::EnvFilter;

use crate::error::{CondoError, Result};

/// Filter used when RUST_LOG is unset: `-v` flags win over the configured level.
pub fn level_for(verbosity: u8, configured: Option<&str>) -> String {
    match verbosity {
        0 => configured.unwrap_or("warn").to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the stderr subscriber. RUST_LOG takes precedence over `level`.
pub fn init(level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| CondoError::Telemetry {
            value: level.to_string(),
            reason: e.to_string(),
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|e| CondoError::Telemetry {
            value: level.to_string(),
            reason: e.to_string(),
        })
}
