//! Table and JSON output formatting

use chrono::Local;
use colored::Colorize;
use oxidelog_core::{LogLevel, LogRecord, LoggerConfig};
use oxidelog_logs::CleanupReport;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tabled::{settings::Style, Table, Tabled};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

#[derive(Tabled)]
pub struct RecordRow {
    #[tabled(rename = "time")]
    pub time: String,
    #[tabled(rename = "level")]
    pub level: String,
    #[tabled(rename = "message")]
    pub message: String,
    #[tabled(rename = "metadata")]
    pub metadata: String,
}

impl From<&LogRecord> for RecordRow {
    fn from(record: &LogRecord) -> Self {
        RecordRow {
            time: record
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            level: format_level(record.level),
            message: record.message.clone(),
            metadata: record
                .metadata
                .as_ref()
                .and_then(|m| serde_json::to_string(m).ok())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

fn format_level(level: LogLevel) -> String {
    match level {
        LogLevel::Info => "info".green().to_string(),
        LogLevel::Warn => "warn".yellow().to_string(),
        LogLevel::Error => "error".red().bold().to_string(),
    }
}

pub fn print_records(records: &[LogRecord]) {
    if is_json_mode() {
        match serde_json::to_string_pretty(records) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    if records.is_empty() {
        println!("No log records");
        return;
    }

    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();

    println!("{}", table);
}

/// Print a single followed record as it arrives
pub fn print_record_line(record: &LogRecord) {
    if is_json_mode() {
        match record.to_json_line() {
            Ok(line) => print!("{}", line),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    let row = RecordRow::from(record);
    println!("{} {} {} {}", row.time.dimmed(), row.level, row.message, row.metadata.dimmed());
}

#[derive(Tabled, Serialize)]
pub struct CleanupRow {
    #[tabled(rename = "file")]
    pub file: String,
    #[tabled(rename = "result")]
    pub result: String,
}

impl CleanupRow {
    fn rows(report: &CleanupReport) -> Vec<Self> {
        let deleted = report.deleted.iter().map(|path| CleanupRow {
            file: path.display().to_string(),
            result: "deleted".to_string(),
        });
        let failed = report.failed.iter().map(|(path, e)| CleanupRow {
            file: path.display().to_string(),
            result: format!("failed: {}", e),
        });
        deleted.chain(failed).collect()
    }
}

pub fn print_cleanup_report(report: &CleanupReport, keep: usize) {
    let rows = CleanupRow::rows(report);

    if is_json_mode() {
        let response = ResponseJson {
            success: report.failed.is_empty(),
            message: None,
            data: Some(rows),
        };
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    if rows.is_empty() {
        print_info(&format!("Nothing to clean up (keeping {} files)", keep));
        return;
    }

    let table = Table::new(rows).with(Style::rounded()).to_string();

    println!("{}", table);
    if report.failed.is_empty() {
        print_success(&format!("Deleted {} file(s)", report.deleted.len()));
    } else {
        print_error(&format!(
            "Deleted {} file(s), {} failed",
            report.deleted.len(),
            report.failed.len()
        ));
    }
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "setting")]
    setting: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

pub fn print_config(config: &LoggerConfig) {
    if is_json_mode() {
        match serde_json::to_string_pretty(config) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    let rows = vec![
        SettingRow {
            setting: "log_level",
            value: config.log_level.to_string(),
        },
        SettingRow {
            setting: "log_file",
            value: config.log_file.display().to_string(),
        },
        SettingRow {
            setting: "max_size",
            value: format_bytes(config.max_size),
        },
        SettingRow {
            setting: "max_files",
            value: config.max_files.to_string(),
        },
        SettingRow {
            setting: "enable_console_logging",
            value: config.enable_console_logging.to_string(),
        },
        SettingRow {
            setting: "compress_logs",
            value: config.compress_logs.to_string(),
        },
        SettingRow {
            setting: "persist_logs",
            value: config.persist_logs.to_string(),
        },
        SettingRow {
            setting: "compression_level",
            value: config.compression_level.to_string(),
        },
    ];

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1}G", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1}M", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.0}K", bytes as f64 / 1024.0)
    } else {
        format!("{}B", bytes)
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// JSON wrapper for generic responses
#[derive(Serialize)]
pub struct ResponseJson<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Print a success message, as a JSON response in JSON mode
pub fn print_success_json<T: Serialize>(message: &str, data: Option<T>) {
    if is_json_mode() {
        let response = ResponseJson {
            success: true,
            message: Some(message.to_string()),
            data,
        };
        if let Ok(json) = serde_json::to_string_pretty(&response) {
            println!("{}", json);
        }
    } else {
        print_success(message);
    }
}

/// Print an informational message, as a JSON response in JSON mode
pub fn print_info_json(message: &str) {
    if is_json_mode() {
        let response: ResponseJson<()> = ResponseJson {
            success: true,
            message: Some(message.to_string()),
            data: None,
        };
        if let Ok(json) = serde_json::to_string_pretty(&response) {
            println!("{}", json);
        }
    } else {
        print_info(message);
    }
}
