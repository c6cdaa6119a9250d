//! One-shot run over the configured registry: validate, then solve the batch
//! if every problem passes.

use dotenv::dotenv;
use log::{error, info, warn};

use lp_batch::build_coordinator;
use lp_batch::config::Config;
use lp_batch::domain::coordinator::ExecutionOutcome;
use lp_batch::models::{ExecuteRequest, ValidateRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let coordinator = build_coordinator(&config)?;

    let validation = coordinator.validate(ValidateRequest::default())?;
    for line in validation.to_string().lines() {
        info!("{}", line);
    }

    if !validation.overall {
        error!("Constraints validation failed. Execution aborted.");
        return Ok(());
    }

    match coordinator.execute(ExecuteRequest::default()).await? {
        ExecutionOutcome::Completed(report) => {
            for line in report.to_string().lines() {
                info!("{}", line);
            }
            info!("LP execution finished.");
        }
        ExecutionOutcome::Aborted { message, .. } => warn!("{}", message),
    }

    Ok(())
}
