//! Flush command implementation - truncates the active log file

use anyhow::Result;
use oxidelog_core::LoggerConfig;
use oxidelog_logs::Logger;

use crate::output::print_success_json;

pub async fn execute(config: LoggerConfig) -> Result<()> {
    let logger = Logger::new(config);
    logger.settle().await;

    print_success_json(&format!("Flushed {}", logger.path().display()), None::<()>);
    Ok(())
}
