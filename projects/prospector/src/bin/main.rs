use projects_prospector::{config::Config, pipeline, report};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("Config: {source}")]
    Config {
        #[source]
        source: projects_prospector::config::ConfigError,
    },
    #[error("Run: {source}")]
    Run {
        #[source]
        source: pipeline::RunError,
    },
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    utils_trace::init("info").map_err(|source| MainError::TracingInit { source })?;

    let config = Config::from_env().map_err(|source| MainError::Config { source })?;
    print!("{}", report::Banner(&config));

    let summary = pipeline::run(&config)
        .await
        .map_err(|source| MainError::Run { source })?;

    info!(leads = summary.leads.len(), "run complete");
    print!("{}", report::Summary(&summary));

    Ok(())
}
