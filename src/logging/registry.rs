//! Named logger cache.
//!
//! The first request for a name builds and stores the logger; every later
//! request for that name returns the same `Arc`, ignoring whatever
//! configuration it passes. Reconfiguring a name requires clearing the
//! registry first.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use super::{Logger, LoggerConfig};
use crate::config::Environment;
use crate::error::LoggerError;

/// A cache of loggers keyed by name.
///
/// Creation happens under the registry lock, so concurrent first requests
/// for one name build at most one logger.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use backend_kit::Environment;
/// use backend_kit::logging::{LoggerConfig, LoggerRegistry, LogLevel};
///
/// let registry = LoggerRegistry::new();
/// let first = registry
///     .get_logger_with_config("api", LoggerConfig::new("api", Environment::Testing))
///     .unwrap();
/// let second = registry
///     .get_logger_with_config(
///         "api",
///         LoggerConfig::new("api", Environment::Testing).with_level(LogLevel::Debug),
///     )
///     .unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(second.level(), LogLevel::Warning);
/// ```
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry, creating it on first use.
    pub fn global() -> &'static LoggerRegistry {
        static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();
        GLOBAL.get_or_init(LoggerRegistry::new)
    }

    /// Returns the logger for `name`, configuring a new one from the
    /// `ENVIRONMENT` variable if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError`] if a new logger's file sink cannot be opened.
    pub fn get_logger(&self, name: &str) -> Result<Arc<Logger>, LoggerError> {
        self.get_or_create(name, || {
            LoggerConfig::from_environment(name, Environment::from_env(), None)
        })
    }

    /// Returns the logger for `name`, configuring a new one for an explicit
    /// environment and log directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError`] if a new logger's file sink cannot be opened.
    pub fn get_logger_for_environment(
        &self,
        name: &str,
        environment: Environment,
        log_dir: Option<&Path>,
    ) -> Result<Arc<Logger>, LoggerError> {
        self.get_or_create(name, || {
            LoggerConfig::from_environment(name, environment, log_dir)
        })
    }

    /// Returns the logger for `name`, building it from `config` if needed.
    ///
    /// `config` is ignored when the name is already cached.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError`] if a new logger's file sink cannot be opened.
    pub fn get_logger_with_config(
        &self,
        name: &str,
        config: LoggerConfig,
    ) -> Result<Arc<Logger>, LoggerError> {
        self.get_or_create(name, || config)
    }

    /// Returns `true` if a logger is cached under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.loggers.lock().contains_key(name)
    }

    /// Returns the number of cached loggers.
    pub fn len(&self) -> usize {
        self.loggers.lock().len()
    }

    /// Returns `true` if no logger is cached.
    pub fn is_empty(&self) -> bool {
        self.loggers.lock().is_empty()
    }

    /// Drops every cached logger.
    ///
    /// Loggers already handed out keep working; the next request for a name
    /// builds a fresh one.
    pub fn clear(&self) {
        self.loggers.lock().clear();
    }

    fn get_or_create(
        &self,
        name: &str,
        config: impl FnOnce() -> LoggerConfig,
    ) -> Result<Arc<Logger>, LoggerError> {
        let mut loggers = self.loggers.lock();
        if let Some(existing) = loggers.get(name) {
            return Ok(Arc::clone(existing));
        }

        let config = config();
        tracing::debug!(
            logger = %name,
            environment = %config.environment,
            level = %config.level,
            handlers = config.handlers.len(),
            "creating logger"
        );
        let logger = Arc::new(Logger::new(config)?);
        loggers.insert(name.to_string(), Arc::clone(&logger));
        Ok(logger)
    }
}

/// Returns the globally cached logger for `name`.
///
/// See [`LoggerRegistry::get_logger`].
///
/// # Errors
///
/// Returns [`LoggerError`] if a new logger's file sink cannot be opened.
pub fn get_logger(name: &str) -> Result<Arc<Logger>, LoggerError> {
    LoggerRegistry::global().get_logger(name)
}

/// Returns the globally cached logger for `name`, building it from `config`
/// on first use.
///
/// # Errors
///
/// Returns [`LoggerError`] if a new logger's file sink cannot be opened.
pub fn get_logger_with_config(
    name: &str,
    config: LoggerConfig,
) -> Result<Arc<Logger>, LoggerError> {
    LoggerRegistry::global().get_logger_with_config(name, config)
}

/// Clears the global registry. Intended for test isolation.
pub fn clear_loggers() {
    LoggerRegistry::global().clear();
}
