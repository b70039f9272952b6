use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "drawcheck=info,drawcheck_core=info";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Logs go to stderr so a report written to
/// stdout stays machine-readable.
pub fn init_logging(json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter());

    let installed = if json {
        builder
            .json()
            .with_ansi(false)
            .with_current_span(false)
            .try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
