//! Cleanup command implementation - applies retention once

use anyhow::{Context, Result};
use oxidelog_core::LoggerConfig;
use oxidelog_logs::retention;

use crate::output::print_cleanup_report;

pub fn execute(config: LoggerConfig) -> Result<()> {
    let dir = config.log_dir();
    let report = retention::cleanup_old_files(&dir, &config.file_prefix(), config.max_files)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    print_cleanup_report(&report, config.max_files);
    Ok(())
}
