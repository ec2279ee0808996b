use crate::cli::args::Command;
use crate::cli::params::RunParams;
use crate::config::load_config;
use crate::error::RssGetError;
use crate::runner::RunOptions;
use crate::session::HttpOptions;
use std::time::Duration;

/// Validates arguments and loads the configuration. Nothing touches the
/// network before this succeeds.
pub fn resolve_command(command: Command) -> Result<RunParams, RssGetError> {
    let Command {
        config_path,
        parallelism,
        timeout_secs,
    } = command;

    if parallelism == 0 {
        return Err(RssGetError::CliArgumentValidation {
            details: "parallelism must be greater than 0.".to_string(),
        });
    }
    if timeout_secs == 0 {
        return Err(RssGetError::CliArgumentValidation {
            details: "timeout must be greater than 0.".to_string(),
        });
    }

    tracing::info!("Loading configuration from {}", config_path);
    let app_config = load_config(&config_path)?;
    tracing::info!("Loaded config: {}", config_path);

    Ok(RunParams {
        app_config,
        options: RunOptions {
            http: HttpOptions {
                read_timeout: Duration::from_secs(timeout_secs),
                ..HttpOptions::default()
            },
            parallelism,
        },
    })
}
