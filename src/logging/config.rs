use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{
    ConsoleFormatter, ConsoleHandler, DailyRotatingFileHandler, Formatter, LogFilter, LogHandler,
    LogLevel, SensitiveDataFilter,
};
use crate::config::Environment;
use crate::error::LoggerError;

/// Directory used for file sinks when none is configured.
const DEFAULT_LOG_DIR: &str = "logs";

/// Full configuration of one logger.
///
/// # Examples
///
/// ```
/// use backend_kit::Environment;
/// use backend_kit::logging::{LogHandler, LogLevel, LoggerConfig};
///
/// let config = LoggerConfig::from_environment("api", Environment::Production, None);
/// assert_eq!(config.level, LogLevel::Info);
/// assert!(matches!(config.handlers[1], LogHandler::DailyRotating(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    /// Logger name shown in every record
    pub name: String,
    /// Minimum level emitted
    pub level: LogLevel,
    /// Environment the presets were derived from
    pub environment: Environment,
    /// Output handlers, written in order
    pub handlers: Vec<LogHandler>,
    /// Record filters, applied in order
    pub filters: Vec<LogFilter>,
    /// Formatter override; `None` selects by environment
    pub formatter: Option<Formatter>,
}

impl LoggerConfig {
    /// Creates a console-only configuration using the environment's level.
    pub fn new(name: impl Into<String>, environment: Environment) -> Self {
        Self {
            name: name.into(),
            level: default_level(environment),
            environment,
            handlers: vec![LogHandler::Console(ConsoleHandler::stdout())],
            filters: vec![LogFilter::Sensitive(SensitiveDataFilter::new())],
            formatter: None,
        }
    }

    /// Builds the preset configuration for an environment.
    ///
    /// | environment | level   | handlers                          |
    /// |-------------|---------|-----------------------------------|
    /// | development | DEBUG   | console                           |
    /// | testing     | WARNING | console                           |
    /// | staging     | INFO    | console + daily file, 14 retained |
    /// | production  | INFO    | console + daily file, 30 retained |
    pub fn from_environment(
        name: impl Into<String>,
        environment: Environment,
        log_dir: Option<&Path>,
    ) -> Self {
        let mut config = Self::new(name, environment);
        if let Some(max_files) = default_retention(environment) {
            let dir = log_dir.map_or_else(|| PathBuf::from(DEFAULT_LOG_DIR), Path::to_path_buf);
            config.handlers.push(LogHandler::DailyRotating(DailyRotatingFileHandler::new(
                dir,
                file_prefix(&config.name),
                max_files,
            )));
        }
        config
    }

    /// Builds a configuration from a settings block.
    ///
    /// Unset settings fall back to the environment presets; an unset
    /// environment is read from the `ENVIRONMENT` variable.
    pub fn from_settings(name: impl Into<String>, settings: &LoggerSettings) -> Self {
        let environment = settings.environment.unwrap_or_else(Environment::from_env);
        let mut config =
            Self::from_environment(name, environment, settings.log_dir.as_deref());

        if let Some(level) = settings.level {
            config.level = level;
        }
        if let Some(retention) = settings.retention {
            for handler in &mut config.handlers {
                if let LogHandler::DailyRotating(rotating) = handler {
                    rotating.max_files = retention;
                }
            }
        }
        if let Some(colors) = settings.colors {
            if let Formatter::Console(_) = config.formatter() {
                config.formatter = Some(Formatter::Console(ConsoleFormatter::new(colors)));
            }
        }
        config
    }

    /// Sets the minimum level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Appends a handler.
    pub fn with_handler(mut self, handler: LogHandler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Replaces all handlers.
    pub fn with_handlers(mut self, handlers: Vec<LogHandler>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Appends a filter.
    pub fn with_filter(mut self, filter: LogFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Overrides the environment-selected formatter.
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Returns the formatter in effect.
    pub fn formatter(&self) -> Formatter {
        self.formatter
            .unwrap_or_else(|| Formatter::for_environment(self.environment))
    }

    /// Returns the sanitizer used for every record: the first configured
    /// [`SensitiveDataFilter`], or the default one.
    pub fn sanitizer(&self) -> SensitiveDataFilter {
        self.filters
            .iter()
            .find_map(|filter| match filter {
                LogFilter::Sensitive(sensitive) => Some(sensitive.clone()),
                LogFilter::Level(_) => None,
            })
            .unwrap_or_default()
    }
}

/// Logging settings as kept in a host's configuration file.
///
/// Every key is optional:
///
/// ```toml
/// environment = "production"
/// level = "WARNING"
/// log_dir = "/var/log/orders"
/// retention = 60
/// colors = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerSettings {
    /// Deployment environment
    pub environment: Option<Environment>,
    /// Minimum level
    pub level: Option<LogLevel>,
    /// Directory for file sinks
    pub log_dir: Option<PathBuf>,
    /// Number of daily files kept
    pub retention: Option<usize>,
    /// Console colors (development only)
    pub colors: Option<bool>,
}

impl LoggerSettings {
    /// Parses settings from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Settings`] on malformed TOML, unknown keys or
    /// unknown level/environment names.
    pub fn from_toml_str(source: &str) -> Result<Self, LoggerError> {
        Ok(toml::from_str(source)?)
    }
}

fn default_level(environment: Environment) -> LogLevel {
    match environment {
        Environment::Development => LogLevel::Debug,
        Environment::Testing => LogLevel::Warning,
        Environment::Staging | Environment::Production => LogLevel::Info,
    }
}

fn default_retention(environment: Environment) -> Option<usize> {
    match environment {
        Environment::Staging => Some(14),
        Environment::Production => Some(30),
        Environment::Development | Environment::Testing => None,
    }
}

fn file_prefix(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LevelFilter;

    #[test]
    fn development_preset_is_console_debug() {
        let config = LoggerConfig::from_environment("api", Environment::Development, None);

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.handlers, vec![LogHandler::Console(ConsoleHandler::stdout())]);
        assert_eq!(config.formatter(), Formatter::Console(ConsoleFormatter::new(true)));
    }

    #[test]
    fn testing_preset_is_console_warning() {
        let config = LoggerConfig::from_environment("api", Environment::Testing, None);

        assert_eq!(config.level, LogLevel::Warning);
        assert_eq!(config.handlers.len(), 1);
        assert!(matches!(config.formatter(), Formatter::Json(_)));
    }

    #[test]
    fn production_preset_adds_rotating_file() {
        let dir = Path::new("/var/log/app");
        let config = LoggerConfig::from_environment("app::orders", Environment::Production, Some(dir));

        assert_eq!(
            config.handlers[1],
            LogHandler::DailyRotating(DailyRotatingFileHandler::new(dir, "app__orders", 30))
        );
    }

    #[test]
    fn staging_keeps_fewer_files() {
        let config = LoggerConfig::from_environment("api", Environment::Staging, None);

        match &config.handlers[1] {
            LogHandler::DailyRotating(rotating) => {
                assert_eq!(rotating.max_files, 14);
                assert_eq!(rotating.directory, PathBuf::from("logs"));
            }
            other => panic!("unexpected handler {other:?}"),
        }
    }

    #[test]
    fn sanitizer_prefers_configured_filter() {
        let custom = SensitiveDataFilter::with_keys(["pin"]);
        let config = LoggerConfig::new("api", Environment::Testing)
            .with_filter(LogFilter::Level(LevelFilter::new(LogLevel::Error)));
        assert_eq!(config.sanitizer(), SensitiveDataFilter::new());

        let mut config = config;
        config.filters = vec![LogFilter::Sensitive(custom.clone())];
        assert_eq!(config.sanitizer(), custom);

        config.filters.clear();
        assert_eq!(config.sanitizer(), SensitiveDataFilter::new());
    }

    #[test]
    fn settings_override_presets() {
        let settings = LoggerSettings::from_toml_str(
            r#"
            environment = "production"
            level = "WARNING"
            log_dir = "/srv/logs"
            retention = 60
            "#,
        )
        .unwrap();

        let config = LoggerConfig::from_settings("api", &settings);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.level, LogLevel::Warning);
        assert_eq!(
            config.handlers[1],
            LogHandler::DailyRotating(DailyRotatingFileHandler::new("/srv/logs", "api", 60))
        );
    }

    #[test]
    fn settings_can_disable_console_colors() {
        let settings = LoggerSettings::from_toml_str(
            r#"
            environment = "development"
            colors = false
            "#,
        )
        .unwrap();

        let config = LoggerConfig::from_settings("api", &settings);
        assert_eq!(config.formatter(), Formatter::Console(ConsoleFormatter::new(false)));
    }

    #[test]
    fn settings_reject_unknown_keys() {
        let result = LoggerSettings::from_toml_str("verbosity = 3");
        assert!(matches!(result, Err(LoggerError::Settings(_))));
    }
}
