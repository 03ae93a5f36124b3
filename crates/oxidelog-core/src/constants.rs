//! Constants and default values for OxideLog

use std::path::{Path, PathBuf};

/// Default log directory name
pub const LOGS_DIR: &str = "logs";

/// Default active log file name
pub const LOG_FILE: &str = "app.log";

/// Extension appended to the active file by the compression cycle
pub const ARCHIVE_EXTENSION: &str = "gz";

/// Default config file names to search for (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    "oxidelog.toml",
    "oxidelog.yaml",
    "oxidelog.yml",
    "oxidelog.json",
];

/// Default log max size in bytes (5MB)
pub const DEFAULT_LOG_MAX_SIZE: u64 = 5 * 1024 * 1024;

/// Default max log files to keep
pub const DEFAULT_LOG_MAX_FILES: usize = 5;

/// Default gzip compression level
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Environment variable names for config overrides
pub const ENV_LEVEL: &str = "OXIDELOG_LEVEL";
pub const ENV_FILE: &str = "OXIDELOG_FILE";
pub const ENV_MAX_SIZE: &str = "OXIDELOG_MAX_SIZE";
pub const ENV_MAX_FILES: &str = "OXIDELOG_MAX_FILES";
pub const ENV_CONSOLE: &str = "OXIDELOG_CONSOLE";
pub const ENV_COMPRESS: &str = "OXIDELOG_COMPRESS";
pub const ENV_PERSIST: &str = "OXIDELOG_PERSIST";

/// Get the default log file path (relative to the working directory)
pub fn default_log_file() -> PathBuf {
    Path::new(LOGS_DIR).join(LOG_FILE)
}

/// Get the archive path for an active log file (`app.log` -> `app.log.gz`)
pub fn archive_path(log_file: &Path) -> PathBuf {
    let mut name = log_file.as_os_str().to_owned();
    name.push(".");
    name.push(ARCHIVE_EXTENSION);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_file() {
        let path = default_log_file();
        assert_eq!(path, Path::new("logs").join("app.log"));
    }

    #[test]
    fn test_archive_path() {
        let path = archive_path(Path::new("/var/log/app.log"));
        assert_eq!(path, PathBuf::from("/var/log/app.log.gz"));
    }
}
