use std::error::Error as StdError;
use std::time::Instant;

use super::record::render_error;
use super::{Fields, LogLevel, Logger};

/// Scope guard timing one operation.
///
/// Starting the guard logs DEBUG `Starting {operation}`. The guard then
/// produces exactly one terminal record:
///
/// - [`complete`](Self::complete): INFO `Completed {operation}` with
///   `duration_ms`
/// - [`fail`](Self::fail): ERROR `Failed {operation}` with `duration_ms` and
///   the error chain
/// - dropping it without either call, whether through `?`, an early return
///   or panic unwinding: ERROR `Failed {operation}` with `duration_ms`
///
/// Success has to be stated with `complete`. The guard never swallows a
/// failure; it only records it.
///
/// # Examples
///
/// ```
/// use backend_kit::{fields, Environment};
/// use backend_kit::logging::{LogHandler, LogLevel, Logger, LoggerConfig, MemoryHandler};
///
/// let memory = MemoryHandler::new();
/// let logger = Logger::new(
///     LoggerConfig::new("db", Environment::Development)
///         .with_level(LogLevel::Debug)
///         .with_handlers(vec![LogHandler::Memory(memory.clone())]),
/// )
/// .unwrap();
///
/// let timer = logger.measure_time("database_query", fields! { table = "users" });
/// timer.complete();
///
/// let lines = memory.lines();
/// assert!(lines[0].contains("Starting database_query"));
/// assert!(lines[1].contains("Completed database_query"));
/// assert!(lines[1].contains("duration_ms="));
/// ```
#[must_use = "dropping the guard without `complete()` logs the operation as failed"]
pub struct TimedOperation<'a> {
    logger: &'a Logger,
    operation: String,
    fields: Fields,
    started: Instant,
    finished: bool,
}

impl<'a> TimedOperation<'a> {
    pub(crate) fn start(logger: &'a Logger, operation: &str, fields: Fields) -> Self {
        logger.debug(&format!("Starting {operation}"), fields.clone());
        Self {
            logger,
            operation: operation.to_string(),
            fields,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the wall-clock time since the operation started, in
    /// milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Ends the operation successfully.
    pub fn complete(mut self) {
        self.finish(None);
    }

    /// Ends the operation with a failure.
    pub fn fail(mut self, error: &(dyn StdError + 'static)) {
        self.finish(Some(render_error(error)));
    }

    fn finish(&mut self, failure: Option<String>) {
        if self.finished {
            return;
        }
        self.finished = true;

        let mut fields = std::mem::take(&mut self.fields);
        fields.insert("duration_ms".to_string(), self.elapsed_ms().into());

        match failure {
            None => self.logger.emit(
                LogLevel::Info,
                &format!("Completed {}", self.operation),
                None,
                fields,
            ),
            Some(exception) => self.logger.emit(
                LogLevel::Error,
                &format!("Failed {}", self.operation),
                Some(exception),
                fields,
            ),
        }
    }
}

impl Drop for TimedOperation<'_> {
    fn drop(&mut self) {
        let reason = if std::thread::panicking() {
            "panicked"
        } else {
            "ended without completing"
        };
        self.finish(Some(format!("{} {reason}", self.operation)));
    }
}
