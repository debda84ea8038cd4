use super::{build_advisor, render};
use crate::config::AppConfig;
use crate::pipeline::Pipeline;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Re-analyse the state file whenever it or the rules change, until Ctrl-C
pub async fn run(config: &AppConfig, state_path: PathBuf) -> Result<()> {
    let advisor = Arc::new(build_advisor(config)?);
    info!(
        "Watching {} every {:?}",
        state_path.display(),
        config.poll_interval()
    );

    let pipeline = Pipeline::start(
        advisor,
        state_path,
        config.rules_path.clone(),
        config.poll_interval(),
    );
    let mut reports = pipeline.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                pipeline.stop();
                break;
            }
            changed = reports.changed() => {
                if changed.is_err() {
                    break;
                }
                let analysis = reports.borrow_and_update().clone();
                match analysis {
                    Some(Ok(report)) => println!("{}", render(&report, config.format)?),
                    Some(Err(e)) => warn!("{}", e),
                    None => {}
                }
            }
        }
    }

    info!("Watch stopped");
    Ok(())
}
