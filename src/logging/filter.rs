use serde_json::Value;

use super::{Fields, LogLevel, LogRecord, REDACTED};

/// Key fragments treated as sensitive by [`SensitiveDataFilter::new`].
///
/// A field is redacted when its lower-cased name contains any of these.
pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "api_key",
    "apikey",
    "authorization",
    "credential",
    "private_key",
    "access_key",
    "cookie",
    "credit_card",
    "card_number",
    "cvv",
    "ssn",
];

/// Redacts values stored under sensitive keys.
///
/// Matching is case-insensitive and applies at every nesting depth, so
/// `{"user": {"Password": "x"}}` is redacted as well.
///
/// # Examples
///
/// ```
/// use backend_kit::fields;
/// use backend_kit::logging::SensitiveDataFilter;
///
/// let filter = SensitiveDataFilter::new();
/// let clean = filter.sanitize(&fields! { Authorization = "Bearer abc", user = "ada" });
///
/// assert_eq!(clean["Authorization"], "[REDACTED]");
/// assert_eq!(clean["user"], "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitiveDataFilter {
    keys: Vec<String>,
}

impl SensitiveDataFilter {
    /// Creates a filter matching [`DEFAULT_SENSITIVE_KEYS`].
    pub fn new() -> Self {
        Self::with_keys(DEFAULT_SENSITIVE_KEYS.iter().copied())
    }

    /// Creates a filter matching the given key fragments.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns `true` if values under `key` must be redacted.
    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.keys.iter().any(|fragment| key.contains(fragment.as_str()))
    }

    /// Returns a copy of `fields` with every sensitive value redacted.
    pub fn sanitize(&self, fields: &Fields) -> Fields {
        fields
            .iter()
            .map(|(key, value)| (key.clone(), self.sanitize_entry(key, value)))
            .collect()
    }

    /// Sanitization never drops a record.
    pub fn filter(&self, _record: &LogRecord) -> bool {
        true
    }

    fn sanitize_entry(&self, key: &str, value: &Value) -> Value {
        if self.is_sensitive(key) {
            Value::String(REDACTED.to_string())
        } else {
            self.sanitize_value(value)
        }
    }

    fn sanitize_value(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.sanitize_entry(k, v)))
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.sanitize_value(v)).collect())
            }
            other => other.clone(),
        }
    }
}

impl Default for SensitiveDataFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops records below a minimum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter {
    min_level: LogLevel,
}

impl LevelFilter {
    /// Creates a filter passing `min_level` and above.
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    /// Returns the minimum level that passes.
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Returns `true` if the record is at or above the minimum level.
    pub fn filter(&self, record: &LogRecord) -> bool {
        record.level >= self.min_level
    }
}

/// The closed set of record filters a logger can be configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFilter {
    /// Redacts sensitive fields; never drops a record
    Sensitive(SensitiveDataFilter),
    /// Drops records below a level
    Level(LevelFilter),
}

impl LogFilter {
    /// Returns `true` if the record should be emitted.
    pub fn allows(&self, record: &LogRecord) -> bool {
        match self {
            Self::Sensitive(filter) => filter.filter(record),
            Self::Level(filter) => filter.filter(record),
        }
    }
}
