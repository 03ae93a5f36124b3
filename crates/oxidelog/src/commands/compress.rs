//! Compress command implementation - runs one compression cycle

use anyhow::Result;
use oxidelog_core::LoggerConfig;
use oxidelog_logs::Logger;
use std::fs;

use crate::output::{format_bytes, print_info_json, print_success_json};

pub async fn execute(config: LoggerConfig) -> Result<()> {
    let logger = Logger::open(config);
    // Let the construction cleanup finish before touching the active file
    logger.settle().await;

    let active_size = logger.reader().size()?;

    match logger.compress()? {
        Some(archive) => {
            let archive_size = fs::metadata(&archive).map(|m| m.len()).unwrap_or(0);
            print_success_json(
                &format!(
                    "Compressed {} into {} ({})",
                    format_bytes(active_size),
                    archive.display(),
                    format_bytes(archive_size)
                ),
                Some(archive.display().to_string()),
            );
        }
        None => print_info_json(&format!(
            "Nothing to compress at {}",
            logger.path().display()
        )),
    }

    logger.settle().await;
    Ok(())
}
