use crate::cli::RunParams;
use crate::runner::{RunSummary, run_tasks};

/// Runs all configured tasks. Task failures are logged, never returned.
pub async fn run(params: RunParams) -> RunSummary {
    let RunParams {
        app_config,
        options,
    } = params;

    if let Some(db) = &app_config.db {
        tracing::debug!("Ignoring DB setting {}", db);
    }

    run_tasks(&app_config, &options).await
}
