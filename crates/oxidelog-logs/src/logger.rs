//! The application logger
//!
//! Every call echoes to the console sink and, independently, appends a JSON
//! record to the active file. Maintenance (retention cleanup, compression)
//! runs in the background and reports its outcome through the same logger.

use oxidelog_core::{
    constants, error_metadata, LogLevel, LogQuery, LogRecord, LoggerConfig, Metadata, Result,
};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::compress;
use crate::console::ConsoleSink;
use crate::reader::LogReader;
use crate::retention::{self, CleanupReport};
use crate::rotation::RotationConfig;
use crate::writer::LogWriter;

/// Who produced a record.
///
/// Maintenance records are persisted but never schedule a compression
/// cycle; otherwise every cycle's own report would trigger the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Caller,
    Maintenance,
}

struct Inner {
    config: LoggerConfig,
    console: ConsoleSink,
    /// Guards the active file: appends, compression and reads all take it
    writer: Mutex<LogWriter>,
    /// Set while a compression cycle is scheduled but has not started yet
    compress_pending: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Logger bound to one active log file.
///
/// Cheap to clone; clones share the same file and background tasks.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Create a logger, truncating the active file.
    ///
    /// Creates the log directory when missing and schedules a retention
    /// cleanup. Initialization failures are reported through `tracing`;
    /// the file is then opened lazily on the first append.
    pub fn new(config: LoggerConfig) -> Self {
        let console = ConsoleSink::stdio(config.enable_console_logging, config.log_level);
        Self::build(config, console, true)
    }

    /// Like [`Logger::new`] but keeps the existing content of the active file.
    ///
    /// A missing active file is not created until the first append.
    pub fn open(config: LoggerConfig) -> Self {
        let console = ConsoleSink::stdio(config.enable_console_logging, config.log_level);
        Self::build(config, console, false)
    }

    /// Create a logger with a custom console sink, truncating the active file
    pub fn with_console(config: LoggerConfig, console: ConsoleSink) -> Self {
        Self::build(config, console, true)
    }

    fn build(config: LoggerConfig, console: ConsoleSink, truncate: bool) -> Self {
        let path = config.log_file.clone();
        let rotation = RotationConfig::from(&config);

        let created = if truncate {
            LogWriter::create(path.clone(), rotation.clone())
        } else {
            LogWriter::open(path.clone(), rotation.clone())
        };
        let writer = created.unwrap_or_else(|e| {
            warn!("Failed to initialize log file {}: {}", path.display(), e);
            LogWriter::detached(path, rotation)
        });

        let logger = Self {
            inner: Arc::new(Inner {
                config,
                console,
                writer: Mutex::new(writer),
                compress_pending: AtomicBool::new(false),
                tasks: Mutex::new(Vec::new()),
            }),
        };

        logger.spawn_maintenance(|logger| {
            let _ = logger.cleanup();
        });

        logger
    }

    /// Log at info level
    pub fn log(&self, message: impl AsRef<str>, metadata: Option<Metadata>) {
        self.emit(LogLevel::Info, message.as_ref(), metadata, Origin::Caller);
    }

    /// Alias for [`Logger::log`]
    pub fn info(&self, message: impl AsRef<str>, metadata: Option<Metadata>) {
        self.log(message, metadata);
    }

    /// Log at warn level
    pub fn warn(&self, message: impl AsRef<str>, metadata: Option<Metadata>) {
        self.emit(LogLevel::Warn, message.as_ref(), metadata, Origin::Caller);
    }

    /// Log at error level.
    ///
    /// The error's display text is stored under the `error` metadata key;
    /// an `error` key in `metadata` takes precedence.
    pub fn error(
        &self,
        message: impl AsRef<str>,
        error: Option<&dyn std::error::Error>,
        metadata: Option<Metadata>,
    ) {
        let metadata = error_metadata(error.map(|e| e.to_string()), metadata);
        self.emit(LogLevel::Error, message.as_ref(), Some(metadata), Origin::Caller);
    }

    /// Read records back from the active file.
    ///
    /// This is the one operation that fails visibly: an unreadable file or
    /// any malformed line fails the whole call.
    pub fn get_logs(&self, query: &LogQuery) -> Result<Vec<LogRecord>> {
        let _guard = self.inner.writer.lock();
        self.reader().get_logs(query)
    }

    /// Reader over the active file and its archive
    pub fn reader(&self) -> LogReader {
        LogReader::new(self.inner.config.log_file.clone())
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    /// Path of the active log file
    pub fn path(&self) -> &Path {
        &self.inner.config.log_file
    }

    /// Path of the compressed archive
    pub fn archive_path(&self) -> PathBuf {
        constants::archive_path(&self.inner.config.log_file)
    }

    /// Delete the oldest same-prefix files beyond `max_files`.
    ///
    /// Each deletion and each failure is logged through this logger.
    pub fn cleanup(&self) -> Result<CleanupReport> {
        let config = &self.inner.config;
        let dir = config.log_dir();

        let report = match retention::cleanup_old_files(&dir, &config.file_prefix(), config.max_files) {
            Ok(report) => report,
            Err(e) => {
                self.maintenance_error("Error cleaning up log files", &e);
                return Err(e);
            }
        };

        for path in &report.deleted {
            self.emit(
                LogLevel::Info,
                &format!("Deleted log file '{}'", path.display()),
                None,
                Origin::Maintenance,
            );
        }
        for (path, e) in &report.failed {
            self.maintenance_error(&format!("Error deleting log file '{}'", path.display()), e);
        }

        Ok(report)
    }

    /// Gzip the active file into the archive, then delete it.
    ///
    /// The active file is removed only after the archive is finished and
    /// synced. Appends wait for the cycle to complete and then recreate the
    /// active file. Returns `None` when there is no active file to compress
    /// (an earlier cycle already took it). Failures are logged as error
    /// records.
    pub fn compress(&self) -> Result<Option<PathBuf>> {
        let path = self.inner.config.log_file.clone();
        let archive = self.archive_path();

        let outcome = {
            let mut writer = self.inner.writer.lock();
            if !path.exists() {
                debug!("Nothing to compress at {}", path.display());
                return Ok(None);
            }
            writer
                .close()
                .and_then(|_| {
                    compress::compress_file(&path, &archive, self.inner.config.compression_level)
                })
                .map_err(|e| ("Error compressing log file", e))
                .and_then(|bytes| {
                    fs::remove_file(&path)
                        .map(|_| bytes)
                        .map_err(|e| ("Error deleting log file", e.into()))
                })
        };

        match outcome {
            Ok(bytes) => {
                debug!("Compressed {} bytes into {}", bytes, archive.display());
                // Console only: persisting this notice would recreate the file
                self.inner.console.emit(&LogRecord::new(
                    LogLevel::Info,
                    format!("Deleted log file '{}'", path.display()),
                    None,
                ));
                Ok(Some(archive))
            }
            Err((context, e)) => {
                self.maintenance_error(&format!("{} '{}'", context, path.display()), &e);
                Err(e)
            }
        }
    }

    /// Wait for all scheduled background maintenance to finish, including
    /// maintenance scheduled while waiting.
    pub async fn settle(&self) {
        loop {
            let pending = std::mem::take(&mut *self.inner.tasks.lock());
            if pending.is_empty() {
                break;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    warn!("Log maintenance task failed: {}", e);
                }
            }
        }
    }

    fn emit(&self, level: LogLevel, message: &str, metadata: Option<Metadata>, origin: Origin) {
        let record = LogRecord::new(level, message, metadata);
        let config = &self.inner.config;

        self.inner.console.emit(&record);

        if !config.persist_logs {
            return;
        }

        let appended = self.inner.writer.lock().write_record(&record);
        if let Err(e) = appended {
            // Not routed through the record path: the file is what failed
            warn!("Failed to append to {}: {}", config.log_file.display(), e);
            return;
        }

        // A cycle that has not started yet will pick up this append too
        if config.compress_logs
            && origin == Origin::Caller
            && !self.inner.compress_pending.swap(true, Ordering::AcqRel)
        {
            self.spawn_maintenance(|logger| {
                logger.inner.compress_pending.store(false, Ordering::Release);
                let _ = logger.compress();
            });
        }
    }

    fn maintenance_error(&self, message: &str, error: &dyn std::error::Error) {
        let metadata = error_metadata(Some(error.to_string()), None);
        self.emit(
            LogLevel::Error,
            &format!("{}: {}", message, error),
            Some(metadata),
            Origin::Maintenance,
        );
    }

    /// Run `task` on the blocking pool, or inline when no runtime is active
    fn spawn_maintenance<F>(&self, task: F)
    where
        F: FnOnce(Logger) + Send + 'static,
    {
        let logger = self.clone();
        match Handle::try_current() {
            Ok(handle) => {
                let join = handle.spawn_blocking(move || task(logger));
                let mut tasks = self.inner.tasks.lock();
                tasks.retain(|t| !t.is_finished());
                tasks.push(join);
            }
            Err(_) => task(logger),
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.inner.config)
            .finish()
    }
}
