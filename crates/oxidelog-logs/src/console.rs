//! Console sink: formats records as text and echoes them to stdout/stderr

use chrono::Local;
use oxidelog_core::{LogLevel, LogRecord};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Format a record the way it appears on the console:
/// `[2024-01-01 12:00:00] [WARN]: message {"key":"value"}`
pub fn format_line(record: &LogRecord) -> String {
    let timestamp = record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    let level = record.level.as_str().to_uppercase();

    match record.metadata.as_ref().and_then(|m| serde_json::to_string(m).ok()) {
        Some(metadata) => format!("[{}] [{}]: {} {}", timestamp, level, record.message, metadata),
        None => format!("[{}] [{}]: {}", timestamp, level, record.message),
    }
}

type Output = Mutex<Box<dyn Write + Send>>;

/// Text sink for human-readable output.
///
/// Info records go to the `out` stream, warn and error to `err`. Records
/// below the minimum level are dropped; a disabled sink is silent.
pub struct ConsoleSink {
    enabled: bool,
    min_level: LogLevel,
    out: Output,
    err: Output,
}

impl ConsoleSink {
    /// Sink writing to the process stdout/stderr
    pub fn stdio(enabled: bool, min_level: LogLevel) -> Self {
        Self::with_writers(enabled, min_level, io::stdout(), io::stderr())
    }

    /// Sink writing to arbitrary streams
    pub fn with_writers<O, E>(enabled: bool, min_level: LogLevel, out: O, err: E) -> Self
    where
        O: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        Self {
            enabled,
            min_level,
            out: Mutex::new(Box::new(out)),
            err: Mutex::new(Box::new(err)),
        }
    }

    /// Whether a record at `level` would be written
    pub fn accepts(&self, level: LogLevel) -> bool {
        self.enabled && level.is_enabled(self.min_level)
    }

    /// Write a record if it passes the level filter
    pub fn emit(&self, record: &LogRecord) {
        if !self.accepts(record.level) {
            return;
        }

        let line = format_line(record);
        let stream = match record.level {
            LogLevel::Info => &self.out,
            LogLevel::Warn | LogLevel::Error => &self.err,
        };

        let mut stream = stream.lock();
        // Console output is best effort; a closed pipe must not break logging
        let _ = writeln!(stream, "{}", line);
        let _ = stream.flush();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use std::sync::Arc;

    /// In-memory writer shared between the sink and the test
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(level: LogLevel, message: &str) -> LogRecord {
        LogRecord {
            level,
            message: message.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap(),
            metadata: None,
        }
    }

    fn local_stamp(ts: DateTime<Utc>) -> String {
        ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    #[test]
    fn test_format_line_without_metadata() {
        let record = record(LogLevel::Info, "server started");
        assert_eq!(
            format_line(&record),
            format!("[{}] [INFO]: server started", local_stamp(record.timestamp))
        );
    }

    #[test]
    fn test_format_line_with_metadata() {
        let mut record = record(LogLevel::Error, "request failed");
        record.metadata = Some(json!({"status": 502}).as_object().unwrap().clone());

        assert_eq!(
            format_line(&record),
            format!(
                "[{}] [ERROR]: request failed {{\"status\":502}}",
                local_stamp(record.timestamp)
            )
        );
    }

    #[test]
    fn test_emit_routes_by_level() {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let sink = ConsoleSink::with_writers(true, LogLevel::Info, out.clone(), err.clone());

        sink.emit(&record(LogLevel::Info, "to stdout"));
        sink.emit(&record(LogLevel::Warn, "to stderr"));
        sink.emit(&record(LogLevel::Error, "also stderr"));

        assert!(out.contents().contains("[INFO]: to stdout"));
        assert!(!out.contents().contains("stderr"));
        assert!(err.contents().contains("[WARN]: to stderr"));
        assert!(err.contents().contains("[ERROR]: also stderr"));
    }

    #[test]
    fn test_emit_respects_min_level() {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let sink = ConsoleSink::with_writers(true, LogLevel::Warn, out.clone(), err.clone());

        sink.emit(&record(LogLevel::Info, "dropped"));
        sink.emit(&record(LogLevel::Warn, "kept"));

        assert!(out.contents().is_empty());
        assert!(err.contents().contains("kept"));
    }

    #[test]
    fn test_disabled_sink_is_silent() {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let sink = ConsoleSink::with_writers(false, LogLevel::Info, out.clone(), err.clone());

        sink.emit(&record(LogLevel::Error, "nothing"));

        assert!(!sink.accepts(LogLevel::Error));
        assert!(out.contents().is_empty());
        assert!(err.contents().is_empty());
    }
}
