//! Logs command implementation

use anyhow::Result;
use oxidelog_core::{LogQuery, LoggerConfig};
use oxidelog_logs::LogReader;

use crate::cli::LogsArgs;
use crate::output::{print_info_json, print_record_line, print_records};

pub async fn execute(config: LoggerConfig, args: LogsArgs) -> Result<()> {
    let query = args
        .level
        .map(|level| LogQuery::level(level.into()))
        .unwrap_or_default();
    let reader = LogReader::new(config.log_file);

    if args.archive {
        let records = reader.read_archive(&query)?;
        print_records(&last_n(records, args.lines));
        return Ok(());
    }

    if reader.exists() {
        let records = if args.lines > 0 {
            reader.tail(args.lines, &query)?
        } else {
            reader.get_logs(&query)?
        };
        print_records(&records);
    } else if !args.follow {
        print_info_json(&format!("No log file at {}", reader.path().display()));
        return Ok(());
    }

    if args.follow {
        let mut rx = reader.follow(query)?;
        loop {
            tokio::select! {
                record = rx.recv() => match record {
                    Some(record) => print_record_line(&record),
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }

    Ok(())
}

/// Keep the last `n` records; 0 keeps all
fn last_n<T>(mut records: Vec<T>, n: usize) -> Vec<T> {
    if n > 0 && records.len() > n {
        records.drain(..records.len() - n);
    }
    records
}
