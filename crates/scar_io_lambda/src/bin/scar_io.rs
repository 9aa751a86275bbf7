use anyhow::Context;
use scar_io_core::config::{env_var, StepConfig, LOG_LEVEL};
use scar_io_lambda::adapters::s3::S3ObjectStore;
use scar_io_lambda::handlers::step::run_step;
use scar_io_lambda::telemetry::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(env_var(LOG_LEVEL).as_deref());

    let config = StepConfig::from_env().context("failed to read step configuration")?;
    let store = S3ObjectStore::new();

    match run_step(&config, &store) {
        Ok(outcome) => {
            info!(step = config.step.as_str(), outcome = ?outcome, "step completed");
            Ok(())
        }
        Err(step_error) => {
            error!(step = config.step.as_str(), error = %step_error, "step failed");
            Err(step_error).with_context(|| format!("{} step failed", config.step.as_str()))
        }
    }
}
