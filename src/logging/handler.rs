use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use super::{LogLevel, LogRecord};
use crate::error::LoggerError;

/// Target stream for a [`ConsoleHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    /// Standard output
    #[default]
    Stdout,
    /// Standard error
    Stderr,
}

/// Writes formatted lines to stdout or stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsoleHandler {
    /// Stream written to
    pub stream: ConsoleStream,
}

impl ConsoleHandler {
    /// Creates a handler writing to stdout.
    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    /// Creates a handler writing to stderr.
    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }
}

/// Appends formatted lines to a single file, creating parent directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandler {
    /// File appended to
    pub path: PathBuf,
}

impl FileHandler {
    /// Creates a handler appending to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Writes to `<directory>/<prefix>.<YYYY-MM-DD>.log`, starting a new file
/// every day and keeping at most `max_files` of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRotatingFileHandler {
    /// Directory holding the log files
    pub directory: PathBuf,
    /// File name prefix
    pub file_prefix: String,
    /// Number of files kept, current one included
    pub max_files: usize,
}

impl DailyRotatingFileHandler {
    /// Creates a daily rotating handler.
    pub fn new(directory: impl Into<PathBuf>, file_prefix: impl Into<String>, max_files: usize) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: file_prefix.into(),
            max_files,
        }
    }
}

/// Collects formatted lines in memory.
///
/// Clones share the same buffer, so a test can keep one clone and hand the
/// other to a logger configuration.
///
/// # Examples
///
/// ```
/// use backend_kit::logging::MemoryHandler;
///
/// let memory = MemoryHandler::new();
/// let shared = memory.clone();
/// assert!(shared.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryHandler {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryHandler {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Returns the number of captured lines.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Discards captured lines.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    fn push(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

impl PartialEq for MemoryHandler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.lines, &other.lines)
    }
}

/// The closed set of output handlers a logger can be configured with.
#[derive(Debug, Clone, PartialEq)]
pub enum LogHandler {
    /// stdout / stderr
    Console(ConsoleHandler),
    /// Single append-only file
    File(FileHandler),
    /// Daily rotated files with retention
    DailyRotating(DailyRotatingFileHandler),
    /// In-memory capture
    Memory(MemoryHandler),
    /// Forward records to the `tracing` dispatcher
    Tracing,
}

impl LogHandler {
    /// Opens the sink this handler describes.
    pub(crate) fn open(&self) -> Result<Sink, LoggerError> {
        match self {
            Self::Console(handler) => Ok(Sink::Console(handler.stream)),
            Self::File(handler) => open_file(&handler.path).map(|f| Sink::File(Mutex::new(f))),
            Self::DailyRotating(handler) => {
                create_dir(&handler.directory)?;
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(handler.file_prefix.as_str())
                    .filename_suffix("log")
                    .max_log_files(handler.max_files.max(1))
                    .build(&handler.directory)?;
                Ok(Sink::Rolling(Mutex::new(appender)))
            }
            Self::Memory(handler) => Ok(Sink::Memory(handler.clone())),
            Self::Tracing => Ok(Sink::Tracing),
        }
    }
}

fn create_dir(dir: &Path) -> Result<(), LoggerError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggerError::OpenFile {
        path: dir.display().to_string(),
        source,
    })
}

fn open_file(path: &Path) -> Result<File, LoggerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggerError::OpenFile {
            path: path.display().to_string(),
            source,
        })
}

/// An opened output destination.
pub(crate) enum Sink {
    Console(ConsoleStream),
    File(Mutex<File>),
    Rolling(Mutex<RollingFileAppender>),
    Memory(MemoryHandler),
    Tracing,
}

impl Sink {
    /// Writes one record. Write failures are reported through `tracing` and
    /// otherwise ignored; the caller never sees them.
    pub(crate) fn emit(&self, record: &LogRecord, line: &str) {
        let result = match self {
            Self::Console(ConsoleStream::Stdout) => writeln!(io::stdout().lock(), "{line}"),
            Self::Console(ConsoleStream::Stderr) => writeln!(io::stderr().lock(), "{line}"),
            Self::File(file) => writeln!(file.lock(), "{line}"),
            Self::Rolling(appender) => writeln!(appender.lock(), "{line}"),
            Self::Memory(memory) => {
                memory.push(line);
                Ok(())
            }
            Self::Tracing => {
                forward_to_tracing(record);
                Ok(())
            }
        };

        if let Err(error) = result {
            tracing::warn!(logger = %record.logger, %error, "failed to write log record");
        }
    }
}

fn forward_to_tracing(record: &LogRecord) {
    let fields = serde_json::Value::Object(
        record
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    );
    let exception = record.exception.as_deref();

    match record.level {
        LogLevel::Debug => tracing::debug!(
            target: "backend_kit::app",
            logger = %record.logger,
            fields = %fields,
            exception,
            "{}",
            record.message
        ),
        LogLevel::Info => tracing::info!(
            target: "backend_kit::app",
            logger = %record.logger,
            fields = %fields,
            exception,
            "{}",
            record.message
        ),
        LogLevel::Warning => tracing::warn!(
            target: "backend_kit::app",
            logger = %record.logger,
            fields = %fields,
            exception,
            "{}",
            record.message
        ),
        LogLevel::Error => tracing::error!(
            target: "backend_kit::app",
            logger = %record.logger,
            fields = %fields,
            exception,
            "{}",
            record.message
        ),
        LogLevel::Critical => tracing::error!(
            target: "backend_kit::app",
            logger = %record.logger,
            fields = %fields,
            exception,
            critical = true,
            "{}",
            record.message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use chrono::Utc;

    fn record(message: &str) -> LogRecord {
        LogRecord {
            level: LogLevel::Info,
            logger: "test".to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            fields: fields! {},
            exception: None,
        }
    }

    #[test]
    fn memory_handler_clones_share_buffer() {
        let memory = MemoryHandler::new();
        let sink = LogHandler::Memory(memory.clone()).open().unwrap();

        sink.emit(&record("one"), "one");
        sink.emit(&record("two"), "two");

        assert_eq!(memory.lines(), vec!["one", "two"]);
        memory.clear();
        assert!(memory.is_empty());
    }

    #[test]
    fn file_handler_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app.log");

        let sink = LogHandler::File(FileHandler::new(&path)).open().unwrap();
        sink.emit(&record("first"), "first");
        sink.emit(&record("second"), "second");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn daily_rotating_handler_writes_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let handler = DailyRotatingFileHandler::new(dir.path(), "orders", 7);

        let sink = LogHandler::DailyRotating(handler).open().unwrap();
        sink.emit(&record("rotated"), "rotated");
        drop(sink);

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("orders."));
        assert!(names[0].ends_with(".log"));
    }

    #[test]
    fn file_handler_reports_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let result = LogHandler::File(FileHandler::new(dir.path())).open();
        assert!(matches!(result, Err(LoggerError::OpenFile { .. })));
    }
}
