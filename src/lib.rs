//! Backend scaffolding: structured logging with scoped context, and
//! standardized API response envelopes.
//!
//! # Modules
//!
//! - [`logging`]: named loggers that merge [`LogContext`](logging::LogContext)
//!   fields into every record, redact sensitive values, time operations and
//!   write to console, file or rotating sinks
//! - [`responses`]: success, error and paginated envelopes plus factory
//!   functions that normalize inputs into them
//!
//! The two halves are independent; the only link is that converting an
//! application error into an [`ErrorResponse`](responses::ErrorResponse)
//! emits a `tracing` debug event.
//!
//! # Examples
//!
//! ```
//! use backend_kit::{fields, AppError, Environment};
//! use backend_kit::logging::{setup_request_logging, LogHandler, Logger, LoggerConfig, MemoryHandler};
//! use backend_kit::responses::error_from_exception;
//!
//! let memory = MemoryHandler::new();
//! let logger = Logger::new(
//!     LoggerConfig::new("users", Environment::Production)
//!         .with_handlers(vec![LogHandler::Memory(memory.clone())]),
//! )
//! .unwrap();
//!
//! let _request = setup_request_logging("req-123", Some("user-456"));
//! let err = AppError::not_found("User not found").with_context("entity_id", "789");
//! logger.warning("lookup failed", fields! { entity_id = "789" });
//!
//! let response = error_from_exception(&err, Some("req-123"));
//! assert_eq!(response.status_code(), 404);
//! assert!(memory.lines()[0].contains("\"user_id\":\"user-456\""));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod logging;
pub mod responses;
mod secret;

pub use config::{Environment, ENVIRONMENT_VAR};
pub use error::{AppError, ApplicationError, ErrorCategory, LoggerError, ValidationError};
pub use secret::Secret;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
