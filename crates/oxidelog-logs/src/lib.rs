//! OxideLog Logs - The logger, rotation, retention, compression and reading

pub mod compress;
mod console;
mod logger;
mod reader;
pub mod retention;
mod rotation;
mod writer;

pub use console::{format_line, ConsoleSink};
pub use logger::Logger;
pub use reader::{parse_records, LogReader};
pub use retention::CleanupReport;
pub use rotation::RotationConfig;
pub use writer::{rotated_path, LogWriter};

