//! Log reader for retrieval, tail and follow operations

use oxidelog_core::{constants, Error, LogQuery, LogRecord, Result};
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::debug;

use crate::compress;

/// Parse NDJSON content into records.
///
/// Empty lines are skipped. Any malformed line fails the whole parse.
pub fn parse_records(content: &str, query: &LogQuery) -> Result<Vec<LogRecord>> {
    let mut records = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let record: LogRecord = serde_json::from_str(line).map_err(|source| {
            Error::MalformedRecord {
                line: index + 1,
                source,
            }
        })?;
        if query.matches(&record) {
            records.push(record);
        }
    }

    Ok(records)
}

/// Reads records back from the active log file and its archive
pub struct LogReader {
    path: PathBuf,
}

impl LogReader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read every record in the active file, optionally filtered by level.
    ///
    /// Fails if the file cannot be read or any line is not a valid record.
    pub fn get_logs(&self, query: &LogQuery) -> Result<Vec<LogRecord>> {
        let content = fs::read_to_string(&self.path)?;
        parse_records(&content, query)
    }

    /// Read the last N matching records from the log file
    pub fn tail(&self, n: usize, query: &LogQuery) -> Result<Vec<LogRecord>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut records: VecDeque<LogRecord> = VecDeque::with_capacity(n + 1);

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.is_empty() {
                continue;
            }
            let record: LogRecord = serde_json::from_str(&line).map_err(|source| {
                Error::MalformedRecord {
                    line: index + 1,
                    source,
                }
            })?;
            if !query.matches(&record) {
                continue;
            }
            records.push_back(record);
            if records.len() > n {
                records.pop_front();
            }
        }

        Ok(records.into_iter().collect())
    }

    /// Read every record stored in the `.gz` archive next to the active file
    pub fn read_archive(&self, query: &LogQuery) -> Result<Vec<LogRecord>> {
        let archive = self.archive_path();
        if !archive.exists() {
            return Err(Error::FileNotFound(archive));
        }
        let content = compress::decompress_to_string(&archive)?;
        parse_records(&content, query)
    }

    /// Follow the log file (like tail -f).
    /// Returns a receiver that yields records as they're appended.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn follow(&self, query: LogQuery) -> Result<mpsc::Receiver<LogRecord>> {
        let path = self.path.clone();
        let (tx, rx) = mpsc::channel(100);

        tokio::task::spawn_blocking(move || {
            if let Err(e) = follow_file(&path, &query, tx) {
                debug!("Follow ended: {}", e);
            }
        });

        Ok(rx)
    }

    /// Check if the log file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the compressed archive
    pub fn archive_path(&self) -> PathBuf {
        constants::archive_path(&self.path)
    }

    /// Get file size
    pub fn size(&self) -> Result<u64> {
        if !self.path.exists() {
            return Ok(0);
        }
        Ok(fs::metadata(&self.path)?.len())
    }
}

/// Follow a file for new records.
///
/// Tolerates the file being truncated, removed or recreated (rotation and
/// compression both do this); reading restarts from the top of the new file.
fn follow_file(path: &Path, query: &LogQuery, tx: mpsc::Sender<LogRecord>) -> Result<()> {
    use notify::{RecommendedWatcher, RecursiveMode, Watcher};
    use std::sync::mpsc as std_mpsc;

    let mut position = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    // Watch the directory so removal and recreation of the file are seen
    let watch_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (watch_tx, watch_rx) = std_mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = watch_tx.send(res);
        },
        notify::Config::default(),
    )
    .map_err(|e| Error::watch(format!("Failed to create watcher: {}", e)))?;

    watcher
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| Error::watch(format!("Failed to watch directory: {}", e)))?;

    loop {
        match watch_rx.recv_timeout(std::time::Duration::from_millis(500)) {
            Ok(Ok(_event)) => {}
            Ok(Err(e)) => {
                debug!("Watch error: {}", e);
                continue;
            }
            Err(std_mpsc::RecvTimeoutError::Timeout) => {
                if tx.is_closed() {
                    break;
                }
                continue;
            }
            Err(std_mpsc::RecvTimeoutError::Disconnected) => break,
        }

        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(_) => {
                // Removed by compression or rotation; wait for it to return
                position = 0;
                continue;
            }
        };

        let len = file.metadata()?.len();
        if len < position {
            position = 0;
        }

        file.seek(SeekFrom::Start(position))?;
        let mut reader = BufReader::new(file);
        let mut line = String::new();

        loop {
            line.clear();
            let read = reader.read_line(&mut line)?;
            if read == 0 || !line.ends_with('\n') {
                // Partial line: pick it up once the writer finishes it
                break;
            }
            position += read as u64;

            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            match LogRecord::from_json_line(trimmed) {
                Ok(record) if query.matches(&record) => {
                    if tx.blocking_send(record).is_err() {
                        return Ok(()); // Channel closed
                    }
                }
                Ok(_) => {}
                Err(e) => debug!("Skipping malformed line while following: {}", e),
            }
        }
    }

    Ok(())
}
