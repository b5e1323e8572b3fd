use std::fmt::{self, Write as _};

use chrono::SecondsFormat;
use serde_json::{Map, Value};

use super::LogRecord;
use crate::config::Environment;

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

/// Writes a string with control characters escaped, so `\n` or `\r` in a
/// message cannot start a forged line.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            if c.is_control() {
                write!(f, "{}", c.escape_default())?;
            } else {
                f.write_char(c)?;
            }
        }
        Ok(())
    }
}

/// Human-readable single-line formatter for terminals.
///
/// Control characters in the logger name, message, field keys and string
/// values are escaped. Only the exception text spans extra lines.
///
/// Output shape:
///
/// ```text
/// 2025-12-07 12:00:00.123 | INFO     | orders | order placed | order_id=ord-9 request_id=req-1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleFormatter {
    use_colors: bool,
}

impl ConsoleFormatter {
    /// Creates a console formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Returns whether ANSI colors are emitted.
    pub fn use_colors(&self) -> bool {
        self.use_colors
    }

    /// Renders one record.
    pub fn format(&self, record: &LogRecord) -> String {
        let timestamp = record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level = format!("{:<8}", record.level.as_str());

        let mut line = String::new();
        if self.use_colors {
            let _ = write!(
                line,
                "{DIM}{timestamp}{RESET} | {}{level}{RESET} | {} | {}",
                record.level.ansi_color(),
                Escaped(&record.logger),
                Escaped(&record.message)
            );
        } else {
            let _ = write!(
                line,
                "{timestamp} | {level} | {} | {}",
                Escaped(&record.logger),
                Escaped(&record.message)
            );
        }

        if !record.fields.is_empty() {
            line.push_str(" |");
            for (key, value) in &record.fields {
                let key = Escaped(key);
                match value {
                    Value::String(s) => {
                        let _ = write!(line, " {key}={}", Escaped(s));
                    }
                    other => {
                        let _ = write!(line, " {key}={other}");
                    }
                }
            }
        }

        if let Some(exception) = &record.exception {
            line.push('\n');
            line.push_str(exception);
        }

        line
    }
}

/// Machine-parsable formatter emitting one JSON object per record.
///
/// The object always carries `timestamp` (RFC 3339, UTC), `level`, `logger`
/// and `message`; structured fields are added as top-level keys when
/// `include_extra` is set, and `exception` when the record has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFormatter {
    include_extra: bool,
}

impl JsonFormatter {
    /// Creates a JSON formatter.
    pub fn new(include_extra: bool) -> Self {
        Self { include_extra }
    }

    /// Returns whether structured fields are included.
    pub fn include_extra(&self) -> bool {
        self.include_extra
    }

    /// Renders one record as a single-line JSON object.
    pub fn format(&self, record: &LogRecord) -> String {
        let mut object = Map::new();
        object.insert(
            "timestamp".to_string(),
            record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .into(),
        );
        object.insert("level".to_string(), record.level.as_str().into());
        object.insert("logger".to_string(), record.logger.clone().into());
        object.insert("message".to_string(), record.message.clone().into());

        if self.include_extra {
            for (key, value) in &record.fields {
                object.insert(key.clone(), value.clone());
            }
        }

        if let Some(exception) = &record.exception {
            object.insert("exception".to_string(), exception.clone().into());
        }

        Value::Object(object).to_string()
    }
}

/// The closed set of record formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// Colorized human-readable lines
    Console(ConsoleFormatter),
    /// One JSON object per line
    Json(JsonFormatter),
}

impl Formatter {
    /// Selects the formatter for a deployment environment.
    ///
    /// Development gets colored console output; every other environment
    /// gets JSON with structured fields.
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self::Console(ConsoleFormatter::new(true)),
            Environment::Staging | Environment::Production | Environment::Testing => {
                Self::Json(JsonFormatter::new(true))
            }
        }
    }

    /// Renders one record.
    pub fn format(&self, record: &LogRecord) -> String {
        match self {
            Self::Console(formatter) => formatter.format(record),
            Self::Json(formatter) => formatter.format(record),
        }
    }
}
