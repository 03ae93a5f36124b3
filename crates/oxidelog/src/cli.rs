//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use oxidelog_core::LogLevel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxidelog")]
#[command(version, about = "Rotating, compressing JSON application logger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (.toml, .yaml, .yml or .json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Active log file (overrides config)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Output in JSON format instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append a record to the log
    Write(WriteArgs),

    /// Show persisted log records
    Logs(LogsArgs),

    /// Delete the oldest log files beyond the retention count
    Cleanup,

    /// Gzip the active log file into its archive
    Compress,

    /// Truncate the active log file
    Flush,

    /// Show the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Info,
    Warn,
    Error,
}

impl From<LevelArg> for LogLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Info => LogLevel::Info,
            LevelArg::Warn => LogLevel::Warn,
            LevelArg::Error => LogLevel::Error,
        }
    }
}

#[derive(Args)]
pub struct WriteArgs {
    /// Record level
    #[arg(value_enum)]
    pub level: LevelArg,

    /// Record message
    pub message: String,

    /// Metadata entry (KEY=VALUE, repeatable; VALUE is parsed as JSON when possible)
    #[arg(long = "meta", value_parser = parse_meta)]
    pub meta: Vec<(String, serde_json::Value)>,

    /// Error text stored under the `error` metadata key (error level only)
    #[arg(long)]
    pub error: Option<String>,
}

#[derive(Args)]
pub struct LogsArgs {
    /// Only show records of this level
    #[arg(long, value_enum)]
    pub level: Option<LevelArg>,

    /// Number of records to show (0 shows all)
    #[arg(long, default_value = "0")]
    pub lines: usize,

    /// Read the compressed archive instead of the active file
    #[arg(long)]
    pub archive: bool,

    /// Follow log output
    #[arg(short = 'F', long)]
    pub follow: bool,
}

fn parse_meta(s: &str) -> Result<(String, serde_json::Value), String> {
    let pos = s.find('=').ok_or("Expected KEY=VALUE format")?;
    let key = s[..pos].trim();
    if key.is_empty() {
        return Err("Metadata key must not be empty".to_string());
    }
    let raw = &s[pos + 1..];
    let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_meta() {
        assert_eq!(parse_meta("foo=1").unwrap(), ("foo".to_string(), json!(1)));
        assert_eq!(parse_meta("ok=true").unwrap(), ("ok".to_string(), json!(true)));
        assert_eq!(
            parse_meta("user=alice").unwrap(),
            ("user".to_string(), json!("alice"))
        );
        assert_eq!(
            parse_meta("expr=a=b").unwrap(),
            ("expr".to_string(), json!("a=b"))
        );
        assert!(parse_meta("novalue").is_err());
        assert!(parse_meta("=1").is_err());
    }

    #[test]
    fn test_cli_parses_write() {
        let cli = Cli::try_parse_from([
            "oxidelog", "--file", "/tmp/app.log", "write", "warn", "disk low", "--meta", "pct=93",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("/tmp/app.log")));
        match cli.command {
            Commands::Write(args) => {
                assert_eq!(LogLevel::from(args.level), LogLevel::Warn);
                assert_eq!(args.message, "disk low");
                assert_eq!(args.meta, vec![("pct".to_string(), json!(93))]);
            }
            _ => panic!("expected write command"),
        }
    }

    #[test]
    fn test_cli_parses_logs() {
        let cli = Cli::try_parse_from(["oxidelog", "logs", "--level", "error", "--lines", "5"]).unwrap();
        match cli.command {
            Commands::Logs(args) => {
                assert!(matches!(args.level, Some(LevelArg::Error)));
                assert_eq!(args.lines, 5);
                assert!(!args.archive);
            }
            _ => panic!("expected logs command"),
        }
    }
}
