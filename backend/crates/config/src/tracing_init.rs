use roster_common::error::{RosterError, RosterResult};
use tracing_subscriber::{fmt, EnvFilter};

/// Log filter for the process. `RUST_LOG` wins when set, otherwise
/// `log_level` (the `LOG_LEVEL` setting) is parsed as filter directives.
pub fn log_filter(log_level: &str) -> RosterResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(log_level)
        .map_err(|e| RosterError::Config(format!("invalid LOG_LEVEL {log_level:?}: {e}")))
}

/// Install the stderr subscriber. Reports go to stdout, so logs stay out of
/// them.
pub fn init_tracing(log_level: &str) -> RosterResult<()> {
    fmt()
        .with_env_filter(log_filter(log_level)?)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| RosterError::Internal(format!("tracing already initialized: {e}")))
}
