use std::fmt;

use serde::{Serialize, Serializer};

use crate::logging::REDACTED;

/// A wrapper that keeps a sensitive value out of log records.
///
/// Key-based sanitization only catches fields with recognizable names such as
/// `password` or `api_key`. `Secret<T>` covers the rest: its `Debug`,
/// `Display` and `Serialize` output is always the redaction marker, so a
/// secret passed to a logger under any field name never reaches a sink.
///
/// # Examples
///
/// ```
/// use backend_kit::{fields, Secret};
///
/// let api_key = Secret::new("sk-1234567890".to_string());
/// assert_eq!(format!("{:?}", api_key), "[REDACTED]");
///
/// let record_fields = fields! { upstream_key = api_key };
/// assert_eq!(record_fields["upstream_key"], "[REDACTED]");
/// ```
// Do NOT add Clone, Copy, Default or Deserialize derives.
pub struct Secret<T> {
    // Must remain private; `expose_secret` is the only way in.
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Returns the wrapped value.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

// Do NOT implement Deref, AsRef or Borrow.

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> Serialize for Secret<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_redacts_debug() {
        let password = Secret::new("hunter2".to_string());
        let debug_output = format!("{:?}", password);

        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("String"));
    }

    #[test]
    fn secret_redacts_display() {
        let api_key = Secret::new("sk-1234567890");
        assert_eq!(format!("{}", api_key), "[REDACTED]");
    }

    #[test]
    fn secret_redacts_serialization() {
        let token = Secret::new(vec![1, 2, 3]);
        let json = serde_json::to_value(&token).unwrap();

        assert_eq!(json, serde_json::json!("[REDACTED]"));
    }

    #[test]
    fn secret_exposes_when_explicit() {
        let secret = Secret::new(42);
        assert_eq!(*secret.expose_secret(), 42);
    }
}
