use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber. Diagnostics go to stderr so they
/// never interleave with the utilization log.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| eyre!("invalid log level `{}`: {e}", config.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.json {
        builder.with_ansi(false).json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_filter() {
        let config = LoggingConfig {
            level: "perfrig=notalevel".to_string(),
            json: false,
        };
        assert!(init_tracing(&config).is_err());
    }
}
