use std::error::Error as StdError;
use std::fmt;

use chrono::Utc;

use super::context::LogContext;
use super::handler::Sink;
use super::record::{render_error, strip_reserved};
use super::{
    Fields, Formatter, LogFilter, LogLevel, LogRecord, LoggerConfig, SensitiveDataFilter,
    TimedOperation,
};
use crate::error::LoggerError;

/// A named structured logger.
///
/// Every call produces at most one record: the active [`LogContext`] is
/// merged under the call-site fields (call-site values win on key clashes),
/// the result is sanitized, reserved keys are dropped, filters run, and the
/// formatted line goes to every configured sink. Sanitization cannot be
/// skipped per call.
///
/// Loggers are usually obtained from [`get_logger`](super::get_logger) so
/// that all modules share one instance per name.
///
/// # Examples
///
/// ```
/// use backend_kit::{fields, Environment};
/// use backend_kit::logging::{LogHandler, Logger, LoggerConfig, MemoryHandler};
///
/// let memory = MemoryHandler::new();
/// let logger = Logger::new(
///     LoggerConfig::new("payments", Environment::Production)
///         .with_handlers(vec![LogHandler::Memory(memory.clone())]),
/// )
/// .unwrap();
///
/// logger.info("charge created", fields! { amount = 1200, token = "tok_123" });
/// logger.debug("below threshold", fields! {});
///
/// assert_eq!(memory.len(), 1);
/// assert!(memory.lines()[0].contains("\"token\":\"[REDACTED]\""));
/// ```
pub struct Logger {
    config: LoggerConfig,
    formatter: Formatter,
    sanitizer: SensitiveDataFilter,
    sinks: Vec<Sink>,
}

impl Logger {
    /// Builds a logger and opens its sinks.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError`] if a file sink cannot be opened.
    pub fn new(config: LoggerConfig) -> Result<Self, LoggerError> {
        let sinks = config
            .handlers
            .iter()
            .map(|handler| handler.open())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            formatter: config.formatter(),
            sanitizer: config.sanitizer(),
            config,
            sinks,
        })
    }

    /// Returns the logger name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the minimum level emitted.
    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    /// Returns the configuration this logger was built from.
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Returns the formatter in use.
    pub fn formatter(&self) -> Formatter {
        self.formatter
    }

    /// Returns `true` if records at `level` pass the logger's threshold.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.config.level
    }

    /// Logs at DEBUG.
    pub fn debug(&self, message: &str, fields: Fields) {
        self.log(LogLevel::Debug, message, None, fields);
    }

    /// Logs at INFO.
    pub fn info(&self, message: &str, fields: Fields) {
        self.log(LogLevel::Info, message, None, fields);
    }

    /// Logs at WARNING.
    pub fn warning(&self, message: &str, fields: Fields) {
        self.log(LogLevel::Warning, message, None, fields);
    }

    /// Logs at ERROR without error details.
    pub fn error(&self, message: &str, fields: Fields) {
        self.log(LogLevel::Error, message, None, fields);
    }

    /// Logs at CRITICAL without error details.
    pub fn critical(&self, message: &str, fields: Fields) {
        self.log(LogLevel::Critical, message, None, fields);
    }

    /// Logs at CRITICAL, attaching `error` and its source chain.
    pub fn critical_error(&self, message: &str, error: &(dyn StdError + 'static), fields: Fields) {
        self.log(LogLevel::Critical, message, Some(error), fields);
    }

    /// Logs at ERROR, attaching `error` and its source chain.
    pub fn exception(&self, message: &str, error: &(dyn StdError + 'static), fields: Fields) {
        self.log(LogLevel::Error, message, Some(error), fields);
    }

    /// Logs at any level, optionally attaching an error.
    pub fn log(
        &self,
        level: LogLevel,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
        fields: Fields,
    ) {
        self.emit(level, message, error.map(render_error), fields);
    }

    /// Starts a timed operation.
    ///
    /// See [`TimedOperation`] for the records it produces.
    pub fn measure_time(&self, operation: &str, fields: Fields) -> TimedOperation<'_> {
        TimedOperation::start(self, operation, fields)
    }

    /// Runs `f` inside a timed operation.
    ///
    /// An `Err` is logged once at ERROR with `duration_ms` and handed back
    /// unchanged; a panic is logged the same way and keeps unwinding.
    ///
    /// ```
    /// use backend_kit::{fields, Environment};
    /// use backend_kit::logging::{LogHandler, Logger, LoggerConfig, MemoryHandler};
    ///
    /// let memory = MemoryHandler::new();
    /// let logger = Logger::new(
    ///     LoggerConfig::new("db", Environment::Production)
    ///         .with_handlers(vec![LogHandler::Memory(memory.clone())]),
    /// )
    /// .unwrap();
    ///
    /// let result: Result<(), std::io::Error> = logger.measure("load_users", fields! {}, || {
    ///     Err(std::io::Error::other("connection reset"))
    /// });
    ///
    /// assert_eq!(result.unwrap_err().to_string(), "connection reset");
    /// assert!(memory.lines()[0].contains("Failed load_users"));
    /// ```
    pub fn measure<T, E, F>(&self, operation: &str, fields: Fields, f: F) -> Result<T, E>
    where
        E: StdError + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let timer = self.measure_time(operation, fields);
        match f() {
            Ok(value) => {
                timer.complete();
                Ok(value)
            }
            Err(error) => {
                timer.fail(&error);
                Err(error)
            }
        }
    }

    pub(crate) fn emit(
        &self,
        level: LogLevel,
        message: &str,
        exception: Option<String>,
        fields: Fields,
    ) {
        if !self.enabled(level) {
            return;
        }

        let mut merged = LogContext::current();
        merged.extend(fields);
        let mut fields = self.sanitizer.sanitize(&merged);
        strip_reserved(&mut fields);

        let record = LogRecord {
            level,
            logger: self.config.name.clone(),
            message: message.to_string(),
            timestamp: Utc::now(),
            fields,
            exception,
        };

        if !self.config.filters.iter().all(|filter| filter.allows(&record)) {
            return;
        }

        let line = self.formatter.format(&record);
        for sink in &self.sinks {
            sink.emit(&record, &line);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.config.name)
            .field("level", &self.config.level)
            .field("environment", &self.config.environment)
            .field("formatter", &self.formatter)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
