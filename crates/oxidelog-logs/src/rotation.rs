//! Log rotation configuration

use oxidelog_core::{constants, LoggerConfig};

/// Log rotation configuration
#[derive(Debug, Clone)]
pub struct RotationConfig {
    /// Maximum log file size in bytes (0 disables size rotation)
    pub max_size_bytes: u64,
    /// Maximum number of files (active + rotated) to keep
    pub max_files: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: constants::DEFAULT_LOG_MAX_SIZE,
            max_files: constants::DEFAULT_LOG_MAX_FILES,
        }
    }
}

impl RotationConfig {
    pub fn new(max_size_bytes: u64, max_files: usize) -> Self {
        Self {
            max_size_bytes,
            max_files,
        }
    }

    /// Whether a file of `size` bytes has reached the rotation threshold
    pub fn should_rotate(&self, size: u64) -> bool {
        self.max_size_bytes > 0 && size >= self.max_size_bytes
    }
}

impl From<&LoggerConfig> for RotationConfig {
    fn from(config: &LoggerConfig) -> Self {
        Self::new(config.max_size, config.max_files)
    }
}
