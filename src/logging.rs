//! Structured application logging.
//!
//! This module provides:
//! - `Logger`: named logger emitting one sanitized record per call
//! - `LogContext`: scoped correlation fields merged into every record
//! - `TimedOperation`: scope guard that logs start, completion or failure
//! - `LoggerRegistry`: process-wide, first-writer-wins cache of loggers
//!
//! Records flow through a fixed pipeline:
//!
//! ```text
//! call-site fields ──┐
//!                    ├─ merge ─ sanitize ─ drop reserved keys ─ filters ─ formatter ─ sinks
//! LogContext layers ─┘
//! ```
//!
//! # Examples
//!
//! ```
//! use backend_kit::fields;
//! use backend_kit::logging::{LogContext, Logger, LoggerConfig, MemoryHandler, LogHandler};
//! use backend_kit::Environment;
//!
//! let memory = MemoryHandler::new();
//! let config = LoggerConfig::new("orders", Environment::Testing)
//!     .with_level(backend_kit::logging::LogLevel::Debug)
//!     .with_handlers(vec![LogHandler::Memory(memory.clone())]);
//! let logger = Logger::new(config).unwrap();
//!
//! let _ctx = LogContext::new(fields! { request_id = "req-1" });
//! logger.info("order placed", fields! { order_id = "ord-9", password = "hunter2" });
//!
//! let line = &memory.lines()[0];
//! assert!(line.contains("\"request_id\":\"req-1\""));
//! assert!(!line.contains("hunter2"));
//! ```

mod config;
mod context;
mod filter;
mod format;
mod handler;
mod level;
mod logger;
mod record;
mod registry;
mod timer;

use std::collections::BTreeMap;

pub use config::{LoggerConfig, LoggerSettings};
pub use context::{setup_request_logging, ContextSnapshot, LogContext};
pub use filter::{LevelFilter, LogFilter, SensitiveDataFilter, DEFAULT_SENSITIVE_KEYS};
pub use format::{ConsoleFormatter, Formatter, JsonFormatter};
pub use handler::{
    ConsoleHandler, ConsoleStream, DailyRotatingFileHandler, FileHandler, LogHandler,
    MemoryHandler,
};
pub use level::{LogLevel, ParseLevelError};
pub use logger::Logger;
pub use record::{LogRecord, RESERVED_KEYS};
pub use registry::{clear_loggers, get_logger, get_logger_with_config, LoggerRegistry};
pub use timer::TimedOperation;

/// Marker written in place of redacted values.
pub const REDACTED: &str = "[REDACTED]";

/// Structured fields attached to a record, ordered by key.
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Builds a [`Fields`] map from `key = value` pairs.
///
/// Values can be anything that implements `Serialize`.
///
/// # Panics
///
/// Panics if a value's `Serialize` impl fails, for example a map with
/// non-string keys. Build the [`Fields`] map by hand with
/// `serde_json::to_value` to handle that case.
///
/// ```
/// use backend_kit::fields;
///
/// let f = fields! { order_id = "ord-9", attempts = 3 };
/// assert_eq!(f["attempts"], 3);
/// assert!(fields! {}.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::logging::Fields::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {{
        let mut map = $crate::logging::Fields::new();
        $(
            map.insert(
                stringify!($key).to_string(),
                $crate::__private::serde_json::json!($value),
            );
        )+
        map
    }};
}
