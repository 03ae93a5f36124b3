//! Configuration file parsing for OxideLog
//!
//! Supports multiple configuration file formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::types::LogLevel;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Logger configuration, captured once at construction.
///
/// Values are not validated; anything missing falls back to the defaults.
/// The camelCase option names (`logLevel`, `maxFiles`, ...) are accepted as
/// aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level forwarded to the console sink
    #[serde(alias = "logLevel")]
    pub log_level: LogLevel,
    /// Active log file
    #[serde(alias = "logFile")]
    pub log_file: PathBuf,
    /// Size in bytes at which the active file is rotated
    #[serde(alias = "maxSize")]
    pub max_size: u64,
    /// Number of same-prefix files kept by retention and rotation
    #[serde(alias = "maxFiles")]
    pub max_files: usize,
    #[serde(alias = "enableConsoleLogging")]
    pub enable_console_logging: bool,
    /// Gzip the active file after every append
    #[serde(alias = "compressLogs")]
    pub compress_logs: bool,
    /// Append records to the active file
    #[serde(alias = "persistLogs")]
    pub persist_logs: bool,
    /// Gzip level (0-9)
    #[serde(alias = "compressionLevel")]
    pub compression_level: u32,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_file: default_log_file(),
            max_size: DEFAULT_LOG_MAX_SIZE,
            max_files: DEFAULT_LOG_MAX_FILES,
            enable_console_logging: true,
            compress_logs: false,
            persist_logs: true,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl LoggerConfig {
    /// Config with defaults writing to `log_file`
    pub fn new(log_file: impl Into<PathBuf>) -> Self {
        Self {
            log_file: log_file.into(),
            ..Default::default()
        }
    }

    /// Load config from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::config(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => Ok(toml::from_str(content)?),
            ConfigFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            ConfigFormat::Json => Ok(serde_json::from_str(content)?),
        }
    }

    /// Find and load the first of [`CONFIG_FILES`] present in `dir`.
    ///
    /// Returns [`Error::ConfigNotFound`] with `dir` when none exists.
    pub fn find_and_load(dir: &Path) -> Result<(Self, PathBuf)> {
        for name in CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok((config, path));
            }
        }
        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Apply `OXIDELOG_*` environment overrides.
    ///
    /// Unparseable values are ignored and the current value kept.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LEVEL).and_then(|v| v.parse().ok()) {
            self.log_level = level;
        }
        if let Some(file) = lookup(ENV_FILE).filter(|v| !v.is_empty()) {
            self.log_file = PathBuf::from(file);
        }
        if let Some(size) = lookup(ENV_MAX_SIZE).and_then(|v| v.parse().ok()) {
            self.max_size = size;
        }
        if let Some(files) = lookup(ENV_MAX_FILES).and_then(|v| v.parse().ok()) {
            self.max_files = files;
        }
        if let Some(flag) = lookup(ENV_CONSOLE).and_then(|v| parse_flag(&v)) {
            self.enable_console_logging = flag;
        }
        if let Some(flag) = lookup(ENV_COMPRESS).and_then(|v| parse_flag(&v)) {
            self.compress_logs = flag;
        }
        if let Some(flag) = lookup(ENV_PERSIST).and_then(|v| parse_flag(&v)) {
            self.persist_logs = flag;
        }
    }

    /// Directory holding the active file
    pub fn log_dir(&self) -> PathBuf {
        match self.log_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Base name of the active file, used as the retention prefix
    pub fn file_prefix(&self) -> String {
        self.log_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| LOG_FILE.to_string())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_config_format_detection() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("yaml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_file, Path::new("logs").join("app.log"));
        assert_eq!(config.max_size, 5_242_880);
        assert_eq!(config.max_files, 5);
        assert!(config.enable_console_logging);
        assert!(!config.compress_logs);
        assert!(config.persist_logs);
    }

    #[test]
    fn test_config_parse_toml() {
        let config_content = r#"
log_level = "warn"
log_file = "/var/log/myapp/app.log"
max_files = 3
compress_logs = true
"#;
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = LoggerConfig::load(file.path()).unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_file, PathBuf::from("/var/log/myapp/app.log"));
        assert_eq!(config.max_files, 3);
        assert!(config.compress_logs);
        // Untouched fields keep their defaults
        assert_eq!(config.max_size, DEFAULT_LOG_MAX_SIZE);
        assert!(config.persist_logs);
    }

    #[test]
    fn test_config_parse_yaml() {
        let config_content = r#"
log_level: error
max_size: 1024
enable_console_logging: false
"#;
        let mut file = NamedTempFile::with_suffix(".yml").unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = LoggerConfig::load(file.path()).unwrap();
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.max_size, 1024);
        assert!(!config.enable_console_logging);
    }

    #[test]
    fn test_config_parse_json_camel_case() {
        let config_content = r#"{
            "logLevel": "warn",
            "logFile": "out/service.log",
            "maxSize": 2048,
            "maxFiles": 2,
            "enableConsoleLogging": false,
            "compressLogs": true,
            "persistLogs": false
        }"#;

        let config = LoggerConfig::parse(config_content, ConfigFormat::Json).unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_file, PathBuf::from("out/service.log"));
        assert_eq!(config.max_size, 2048);
        assert_eq!(config.max_files, 2);
        assert!(!config.enable_console_logging);
        assert!(config.compress_logs);
        assert!(!config.persist_logs);
    }

    #[test]
    fn test_config_not_found() {
        let result = LoggerConfig::load(Path::new("/nonexistent/oxidelog.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_config_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".ini").unwrap();
        let result = LoggerConfig::load(file.path());
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_find_and_load() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("oxidelog.yaml"), "max_files: 9\n").unwrap();

        let (config, path) = LoggerConfig::find_and_load(dir.path()).unwrap();
        assert_eq!(config.max_files, 9);
        assert!(path.ends_with("oxidelog.yaml"));

        let empty = TempDir::new().unwrap();
        assert!(matches!(
            LoggerConfig::find_and_load(empty.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_LEVEL, "error"),
            (ENV_FILE, "/tmp/other.log"),
            (ENV_MAX_FILES, "not-a-number"),
            (ENV_COMPRESS, "yes"),
            (ENV_CONSOLE, "0"),
        ]);

        let mut config = LoggerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.log_file, PathBuf::from("/tmp/other.log"));
        assert_eq!(config.max_files, DEFAULT_LOG_MAX_FILES);
        assert!(config.compress_logs);
        assert!(!config.enable_console_logging);
    }

    #[test]
    fn test_log_dir_and_prefix() {
        let config = LoggerConfig::new("/var/log/myapp/app.log");
        assert_eq!(config.log_dir(), PathBuf::from("/var/log/myapp"));
        assert_eq!(config.file_prefix(), "app.log");

        let bare = LoggerConfig::new("app.log");
        assert_eq!(bare.log_dir(), PathBuf::from("."));
    }
}
