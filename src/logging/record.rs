use chrono::{DateTime, Utc};

use super::{Fields, LogLevel};

/// Field names a caller may not set.
///
/// These collide with attributes every record already carries. Colliding
/// fields are dropped silently rather than failing the log call, so a record
/// never loses its level or message to a stray keyword.
pub const RESERVED_KEYS: &[&str] = &[
    "name",
    "msg",
    "args",
    "created",
    "filename",
    "funcName",
    "levelname",
    "levelno",
    "lineno",
    "module",
    "msecs",
    "message",
    "pathname",
    "process",
    "processName",
    "relativeCreated",
    "thread",
    "threadName",
    "exc_info",
    "exc_text",
    "stack_info",
    "taskName",
    "timestamp",
    "level",
    "logger",
    "exception",
];

/// One log record as handed to formatters and sinks.
///
/// Records are produced by [`Logger`](super::Logger); by the time a sink sees
/// one, its fields have been merged with the active context, sanitized and
/// stripped of reserved keys.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Severity
    pub level: LogLevel,
    /// Name of the emitting logger
    pub logger: String,
    /// Human-readable message
    pub message: String,
    /// Creation time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Structured fields, context included
    pub fields: Fields,
    /// Rendered error chain, when the call carried an error
    pub exception: Option<String>,
}

/// Removes every reserved key from `fields`.
pub(crate) fn strip_reserved(fields: &mut Fields) {
    fields.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
}

/// Renders an error and its `source()` chain, one cause per line.
pub(crate) fn render_error(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str("\nCaused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
