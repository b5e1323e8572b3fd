use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error raised when an envelope is constructed or deserialized with inputs
/// that break its schema.
///
/// Construction-time failures are always surfaced to the caller; nothing in
/// this crate swallows them.
///
/// # Examples
///
/// ```
/// use backend_kit::responses::ErrorResponse;
///
/// let err = ErrorResponse::new("Oops", 200, "OOPS", "internal").unwrap_err();
/// assert_eq!(err.field(), "status_code");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for `{field}`: {message}")]
pub struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    /// Creates a new validation error for the given field.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Returns the name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the human-readable reason.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised while configuring loggers and opening their sinks.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A file sink could not be opened or its directory created.
    #[error("failed to open log file `{path}`: {source}")]
    OpenFile {
        /// Path of the file or directory that could not be opened
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
    /// The rolling file appender could not be initialized.
    #[error("failed to initialize rolling log appender: {0}")]
    RollingAppender(#[from] tracing_appender::rolling::InitError),
    /// Logger settings could not be parsed.
    #[error("invalid logger settings: {0}")]
    Settings(#[from] toml::de::Error),
}

/// Category of an application error.
///
/// The category decides which HTTP status code an error envelope carries.
/// Categories the table does not know about are kept verbatim in
/// [`ErrorCategory::Other`] and map to `500`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A requested entity does not exist
    NotFound,
    /// Input failed validation
    Validation,
    /// Caller could not be authenticated
    Authentication,
    /// Caller is not allowed to perform the action
    Authorization,
    /// A domain rule was violated
    BusinessRule,
    /// Storage layer failure
    Database,
    /// An upstream dependency failed
    ExternalService,
    /// Anything else that went wrong inside the service
    Internal,
    /// A category outside the fixed table
    #[serde(untagged)]
    Other(String),
}

impl ErrorCategory {
    /// Returns the wire name of this category.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::BusinessRule => "business_rule",
            Self::Database => "database",
            Self::ExternalService => "external_service",
            Self::Internal => "internal",
            Self::Other(name) => name,
        }
    }

    /// Returns the HTTP status code for this category.
    ///
    /// ```
    /// use backend_kit::ErrorCategory;
    ///
    /// assert_eq!(ErrorCategory::NotFound.status_code(), 404);
    /// assert_eq!(ErrorCategory::Other("quota".into()).status_code(), 500);
    /// ```
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Validation => 422,
            Self::Authentication => 401,
            Self::Authorization => 403,
            Self::BusinessRule => 400,
            Self::Database => 500,
            Self::ExternalService => 502,
            Self::Internal => 500,
            Self::Other(_) => 500,
        }
    }

    /// Returns the error code used when an [`AppError`] of this category is
    /// built without an explicit one.
    pub fn default_error_code(&self) -> &'static str {
        match self {
            Self::NotFound => "resource_not_found",
            Self::Validation => "validation_error",
            Self::Authentication => "authentication_failed",
            Self::Authorization => "access_denied",
            Self::BusinessRule => "business_rule_violation",
            Self::Database => "database_error",
            Self::ExternalService => "external_service_error",
            Self::Internal | Self::Other(_) => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ErrorCategory {
    fn from(name: &str) -> Self {
        match name {
            "not_found" => Self::NotFound,
            "validation" => Self::Validation,
            "authentication" => Self::Authentication,
            "authorization" => Self::Authorization,
            "business_rule" => Self::BusinessRule,
            "database" => Self::Database,
            "external_service" => Self::ExternalService,
            "internal" => Self::Internal,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Structured attributes an application error exposes to the response layer.
///
/// [`error_from_exception`](crate::responses::error_from_exception) copies
/// these verbatim into an [`ErrorResponse`](crate::responses::ErrorResponse).
pub trait ApplicationError: std::error::Error {
    /// Human-readable message
    fn message(&self) -> &str;
    /// Machine-readable error code
    fn error_code(&self) -> &str;
    /// Category driving the HTTP status code
    fn category(&self) -> &ErrorCategory;
    /// Additional structured context, if any
    fn context(&self) -> Option<&Map<String, Value>>;
}

/// The application-level error carried from domain code to the response
/// layer.
///
/// # Examples
///
/// ```
/// use backend_kit::{AppError, ApplicationError, ErrorCategory};
///
/// let err = AppError::not_found("User not found").with_context("entity_id", "123");
/// assert_eq!(err.category(), &ErrorCategory::NotFound);
/// assert_eq!(err.error_code(), "resource_not_found");
/// assert_eq!(err.to_string(), "not_found: User not found");
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{category}: {message}")]
pub struct AppError {
    message: String,
    error_code: String,
    category: ErrorCategory,
    context: Option<Map<String, Value>>,
}

impl AppError {
    /// Creates an error in the given category with the category's default
    /// error code.
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_code: category.default_error_code().to_string(),
            category,
            context: None,
        }
    }

    /// Creates a `not_found` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::NotFound, message)
    }

    /// Creates a `validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, message)
    }

    /// Creates an `authentication` error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Authentication, message)
    }

    /// Creates an `authorization` error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Authorization, message)
    }

    /// Creates a `business_rule` error.
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::BusinessRule, message)
    }

    /// Creates a `database` error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Database, message)
    }

    /// Creates an `external_service` error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::ExternalService, message)
    }

    /// Creates an `internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, message)
    }

    /// Overrides the error code.
    pub fn with_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = error_code.into();
        self
    }

    /// Adds one context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

impl ApplicationError for AppError {
    fn message(&self) -> &str {
        &self.message
    }

    fn error_code(&self) -> &str {
        &self.error_code
    }

    fn category(&self) -> &ErrorCategory {
        &self.category
    }

    fn context(&self) -> Option<&Map<String, Value>> {
        self.context.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_table_is_fixed() {
        let table = [
            ("not_found", 404),
            ("validation", 422),
            ("authentication", 401),
            ("authorization", 403),
            ("business_rule", 400),
            ("database", 500),
            ("external_service", 502),
            ("internal", 500),
            ("rate_limited", 500),
        ];

        for (name, status) in table {
            assert_eq!(ErrorCategory::from(name).status_code(), status, "{name}");
        }
    }

    #[test]
    fn category_round_trips_its_name() {
        assert_eq!(ErrorCategory::from("business_rule").as_str(), "business_rule");
        assert_eq!(ErrorCategory::from("quota").as_str(), "quota");
    }

    #[test]
    fn category_serializes_as_snake_case() {
        let json = serde_json::to_string(&ErrorCategory::ExternalService).unwrap();
        assert_eq!(json, "\"external_service\"");

        let other: ErrorCategory = serde_json::from_str("\"quota\"").unwrap();
        assert_eq!(other, ErrorCategory::Other("quota".to_string()));
    }

    #[test]
    fn app_error_uses_category_default_code() {
        let err = AppError::database("Connection failed");
        assert_eq!(err.error_code(), "database_error");
        assert!(err.context().is_none());
    }

    #[test]
    fn app_error_collects_context() {
        let err = AppError::database("Connection failed")
            .with_code("db_timeout")
            .with_context("operation", "SELECT")
            .with_context("table", "users");

        assert_eq!(err.error_code(), "db_timeout");
        let ctx = err.context().unwrap();
        assert_eq!(ctx["operation"], "SELECT");
        assert_eq!(ctx["table"], "users");
    }

    #[test]
    fn validation_error_display_names_field() {
        let err = ValidationError::new("page", "must be at least 1");
        assert_eq!(err.to_string(), "validation failed for `page`: must be at least 1");
        assert_eq!(err.field(), "page");
        assert_eq!(err.message(), "must be at least 1");
    }
}
