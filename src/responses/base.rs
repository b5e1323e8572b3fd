use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open key/value metadata carried by any envelope.
pub type Metadata = Map<String, Value>;

/// Fields shared by every envelope, flattened into its JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ResponseMeta {
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default = "Utc::now")]
    pub(crate) timestamp: DateTime<Utc>,
    #[serde(default)]
    pub(crate) request_id: Option<String>,
    #[serde(default)]
    pub(crate) metadata: Option<Metadata>,
}

impl ResponseMeta {
    pub(crate) fn now() -> Self {
        Self {
            message: None,
            timestamp: Utc::now(),
            request_id: None,
            metadata: None,
        }
    }

    pub(crate) fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::now()
        }
    }
}

/// Generates the accessors and builders every envelope shares.
macro_rules! envelope_meta {
    ($name:ident $(<$param:ident>)?) => {
        impl$(<$param>)? $name$(<$param>)? {
            /// Returns the human-readable message, if any.
            pub fn message(&self) -> Option<&str> {
                self.meta.message.as_deref()
            }

            /// Returns the UTC instant the envelope was created.
            pub fn timestamp(&self) -> chrono::DateTime<chrono::Utc> {
                self.meta.timestamp
            }

            /// Returns the request id, if any.
            pub fn request_id(&self) -> Option<&str> {
                self.meta.request_id.as_deref()
            }

            /// Returns the attached metadata, if any.
            pub fn metadata(&self) -> Option<&$crate::responses::Metadata> {
                self.meta.metadata.as_ref()
            }

            /// Sets the human-readable message.
            pub fn with_message(mut self, message: impl Into<String>) -> Self {
                self.meta.message = Some(message.into());
                self
            }

            /// Sets the request id.
            pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
                self.meta.request_id = Some(request_id.into());
                self
            }

            /// Sets the metadata.
            pub fn with_metadata(mut self, metadata: $crate::responses::Metadata) -> Self {
                self.meta.metadata = Some(metadata);
                self
            }

            /// Overrides the creation instant.
            pub fn with_timestamp(mut self, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
                self.meta.timestamp = timestamp;
                self
            }
        }
    };
}

pub(crate) use envelope_meta;

/// The base envelope shape, with a nullable `success` flag.
///
/// # Examples
///
/// ```
/// use backend_kit::responses::BaseResponse;
///
/// let response = BaseResponse::new().with_request_id("req_abc123");
/// let json = serde_json::to_value(&response).unwrap();
///
/// assert!(json["success"].is_null());
/// assert_eq!(json["request_id"], "req_abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(flatten)]
    meta: ResponseMeta,
}

impl BaseResponse {
    /// Creates an envelope with no outcome set.
    pub fn new() -> Self {
        Self {
            success: None,
            meta: ResponseMeta::now(),
        }
    }

    /// Sets the outcome flag.
    pub fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    /// Returns the outcome flag, if set.
    pub fn success(&self) -> Option<bool> {
        self.success
    }
}

impl Default for BaseResponse {
    fn default() -> Self {
        Self::new()
    }
}

envelope_meta!(BaseResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fields_are_flattened_and_nullable() {
        let at = Utc.with_ymd_and_hms(2025, 12, 7, 12, 0, 0).unwrap();
        let mut metadata = Metadata::new();
        metadata.insert("version".into(), "1.0.0".into());

        let response = BaseResponse::new()
            .with_success(true)
            .with_message("Operation completed successfully")
            .with_metadata(metadata)
            .with_timestamp(at);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Operation completed successfully");
        assert_eq!(json["timestamp"], "2025-12-07T12:00:00Z");
        assert!(json["request_id"].is_null());
        assert_eq!(json["metadata"]["version"], "1.0.0");
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let before = Utc::now();
        let response: BaseResponse = serde_json::from_str("{}").unwrap();

        assert!(response.timestamp() >= before);
        assert_eq!(response.success(), None);
        assert_eq!(response.message(), None);
    }
}
