use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the variable selecting the deployment environment.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Deployment environment.
///
/// Read once when a logger is configured; it decides the log level, the
/// output handlers and the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Pre-production
    Staging,
    /// Production
    Production,
    /// Automated test runs
    Testing,
}

impl Environment {
    /// Reads [`ENVIRONMENT_VAR`], falling back to `Development` when the
    /// variable is absent or unrecognized.
    pub fn from_env() -> Self {
        std::env::var(ENVIRONMENT_VAR)
            .ok()
            .map(|value| Self::parse_lenient(&value))
            .unwrap_or_default()
    }

    /// Parses an environment name case-insensitively, falling back to
    /// `Development`.
    ///
    /// ```
    /// use backend_kit::Environment;
    ///
    /// assert_eq!(Environment::parse_lenient("PRODUCTION"), Environment::Production);
    /// assert_eq!(Environment::parse_lenient("qa"), Environment::Development);
    /// ```
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "staging" => Self::Staging,
            "production" => Self::Production,
            "testing" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Returns the lower-case environment name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Testing => "testing",
        }
    }

    /// Returns `true` for local development.
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
