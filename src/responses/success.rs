use serde::{Deserialize, Serialize};

use super::base::{envelope_meta, ResponseMeta};
use crate::error::ValidationError;

fn yes() -> bool {
    true
}

/// Success envelope with optional data.
///
/// # Examples
///
/// ```
/// use backend_kit::responses::SuccessResponse;
///
/// let response = SuccessResponse::new(Some(vec![1, 2])).with_message("User created");
/// let json = serde_json::to_value(&response).unwrap();
///
/// assert_eq!(json["success"], true);
/// assert_eq!(json["data"], serde_json::json!([1, 2]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    #[serde(default = "yes")]
    success: bool,
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(flatten)]
    meta: ResponseMeta,
}

impl<T> SuccessResponse<T> {
    /// Creates a success envelope.
    pub fn new(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            meta: ResponseMeta::now(),
        }
    }

    /// Returns the outcome flag.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the payload, if any.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consumes the envelope and returns its payload.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

envelope_meta!(SuccessResponse<T>);

/// Success envelope whose data is required.
///
/// Deserializing a document without `data` fails.
///
/// ```
/// use backend_kit::responses::DataResponse;
///
/// let missing = serde_json::from_str::<DataResponse<u32>>(r#"{"success": true}"#);
/// assert!(missing.is_err());
///
/// let err = DataResponse::<u32>::try_from_option(None).unwrap_err();
/// assert_eq!(err.field(), "data");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default = "yes")]
    success: bool,
    data: T,
    #[serde(flatten)]
    meta: ResponseMeta,
}

impl<T> DataResponse<T> {
    /// Creates an envelope around `data`.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: ResponseMeta::now(),
        }
    }

    /// Creates an envelope from data that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on `data` when it is `None`.
    pub fn try_from_option(data: Option<T>) -> Result<Self, ValidationError> {
        data.map(Self::new)
            .ok_or_else(|| ValidationError::new("data", "field required"))
    }

    /// Returns the outcome flag.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the payload.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the envelope and returns its payload.
    pub fn into_data(self) -> T {
        self.data
    }
}

envelope_meta!(DataResponse<T>);

/// Success envelope carrying only a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default = "yes")]
    success: bool,
    #[serde(flatten)]
    meta: ResponseMeta,
}

impl MessageResponse {
    /// Creates a message envelope.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            meta: ResponseMeta::with_message(message),
        }
    }

    /// Returns the outcome flag.
    pub fn success(&self) -> bool {
        self.success
    }
}

envelope_meta!(MessageResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_without_data_serializes_null() {
        let response = SuccessResponse::<()>::new(None).with_message("Operation completed");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "Operation completed");
    }

    #[test]
    fn success_reads_missing_flag_as_true() {
        let response: SuccessResponse<u8> = serde_json::from_str(r#"{"data": 3}"#).unwrap();
        assert!(response.success());
        assert_eq!(response.data(), Some(&3));
    }

    #[test]
    fn data_response_requires_data() {
        let result = serde_json::from_value::<DataResponse<String>>(json!({
            "success": true,
            "message": "User found"
        }));
        assert!(result.unwrap_err().to_string().contains("data"));
    }

    #[test]
    fn data_response_round_trips_payload() {
        let response = DataResponse::new(json!({"id": 1})).with_request_id("req-1");
        let text = serde_json::to_string(&response).unwrap();
        let back: DataResponse<serde_json::Value> = serde_json::from_str(&text).unwrap();

        assert_eq!(back, response);
        assert_eq!(back.into_data()["id"], 1);
    }

    #[test]
    fn try_from_option_accepts_present_data() {
        let response = DataResponse::try_from_option(Some("user")).unwrap();
        assert_eq!(*response.data(), "user");
    }

    #[test]
    fn message_response_defaults_success() {
        let parsed: MessageResponse =
            serde_json::from_str(r#"{"message": "Item deleted successfully"}"#).unwrap();
        assert!(parsed.success());
        assert_eq!(parsed.message(), Some("Item deleted successfully"));

        let built = MessageResponse::new("Email sent");
        assert!(built.success());
    }
}
