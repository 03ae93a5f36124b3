//! Write command implementation - appends one record

use anyhow::{bail, Result};
use oxidelog_core::{LogLevel, LoggerConfig, Metadata};
use oxidelog_logs::Logger;

use crate::cli::WriteArgs;
use crate::output::print_success_json;

pub async fn execute(config: LoggerConfig, args: WriteArgs) -> Result<()> {
    let level = LogLevel::from(args.level);
    if args.error.is_some() && level != LogLevel::Error {
        bail!("--error can only be used with the error level");
    }

    let metadata = (!args.meta.is_empty()).then(|| args.meta.into_iter().collect::<Metadata>());

    let logger = Logger::open(config);
    match level {
        LogLevel::Info => logger.info(&args.message, metadata),
        LogLevel::Warn => logger.warn(&args.message, metadata),
        LogLevel::Error => {
            let error = args.error.map(anyhow::Error::msg);
            let source = error.as_deref().map(|e| e as &dyn std::error::Error);
            logger.error(&args.message, source, metadata);
        }
    }

    // Cleanup and compression run in the background; let them finish
    logger.settle().await;

    if !logger.config().enable_console_logging {
        print_success_json(
            &format!("Wrote {} record to {}", level, logger.path().display()),
            None::<()>,
        );
    }

    Ok(())
}
