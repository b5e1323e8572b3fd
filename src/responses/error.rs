use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

use super::base::{envelope_meta, ResponseMeta};
use super::Metadata;
use crate::error::{ApplicationError, ErrorCategory, ValidationError};

/// HTTP status code of an error envelope, always within `400..=599`.
///
/// ```
/// use backend_kit::responses::ErrorStatus;
///
/// assert_eq!(ErrorStatus::new(404).unwrap().as_u16(), 404);
/// assert!(ErrorStatus::new(200).is_err());
/// assert!(ErrorStatus::new(600).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ErrorStatus(u16);

impl ErrorStatus {
    /// 400 Bad Request
    pub const BAD_REQUEST: Self = Self(400);
    /// 404 Not Found
    pub const NOT_FOUND: Self = Self(404);
    /// 409 Conflict
    pub const CONFLICT: Self = Self(409);
    /// 422 Unprocessable Entity
    pub const UNPROCESSABLE_ENTITY: Self = Self(422);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);

    /// Validates a status code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on `status_code` outside `400..=599`.
    pub fn new(code: u16) -> Result<Self, ValidationError> {
        if (400..=599).contains(&code) {
            Ok(Self(code))
        } else {
            Err(ValidationError::new(
                "status_code",
                format!("must be between 400 and 599, got {code}"),
            ))
        }
    }

    /// Returns the numeric code.
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns the status code for an error category.
    pub fn for_category(category: &ErrorCategory) -> Self {
        // every category maps into 4xx/5xx
        Self(category.status_code())
    }
}

impl TryFrom<u16> for ErrorStatus {
    type Error = ValidationError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<ErrorStatus> for u16 {
    fn from(status: ErrorStatus) -> Self {
        status.0
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejects `"success": true` on error envelopes.
fn false_only<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    if bool::deserialize(deserializer)? {
        return Err(de::Error::custom(ValidationError::new(
            "success",
            "must be false for error responses",
        )));
    }
    Ok(false)
}

/// Error envelope. `success` is always `false`.
///
/// # Examples
///
/// ```
/// use backend_kit::responses::ErrorResponse;
///
/// let response = ErrorResponse::new("User not found", 404, "USER_NOT_FOUND", "not_found").unwrap();
/// let json = serde_json::to_value(&response).unwrap();
///
/// assert_eq!(json["success"], false);
/// assert_eq!(json["status_code"], 404);
/// assert_eq!(json["error_category"], "not_found");
///
/// assert!(ErrorResponse::new("Oops", 200, "OOPS", "internal").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, deserialize_with = "false_only")]
    success: bool,
    status_code: ErrorStatus,
    error_code: String,
    error_category: ErrorCategory,
    #[serde(default)]
    details: Option<Metadata>,
    #[serde(flatten)]
    meta: ResponseMeta,
}

impl ErrorResponse {
    /// Creates an error envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] on `status_code` outside `400..=599`.
    pub fn new(
        message: impl Into<String>,
        status_code: u16,
        error_code: impl Into<String>,
        error_category: impl Into<ErrorCategory>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::with_status(
            message,
            ErrorStatus::new(status_code)?,
            error_code,
            error_category,
        ))
    }

    /// Creates an error envelope from an already validated status.
    pub fn with_status(
        message: impl Into<String>,
        status: ErrorStatus,
        error_code: impl Into<String>,
        error_category: impl Into<ErrorCategory>,
    ) -> Self {
        Self {
            success: false,
            status_code: status,
            error_code: error_code.into(),
            error_category: error_category.into(),
            details: None,
            meta: ResponseMeta::with_message(message),
        }
    }

    /// Converts an application error. The status code follows the error's
    /// category; message, code and context are copied verbatim.
    ///
    /// ```
    /// use backend_kit::AppError;
    /// use backend_kit::responses::ErrorResponse;
    ///
    /// let err = AppError::not_found("User not found").with_context("entity_id", "123");
    /// let response = ErrorResponse::from_exception(&err);
    ///
    /// assert_eq!(response.status_code(), 404);
    /// assert_eq!(response.error_code(), "resource_not_found");
    /// assert_eq!(response.details().unwrap()["entity_id"], "123");
    /// ```
    pub fn from_exception<E>(exception: &E) -> Self
    where
        E: ApplicationError + ?Sized,
    {
        let category = exception.category().clone();
        let mut response = Self::with_status(
            exception.message(),
            ErrorStatus::for_category(&category),
            exception.error_code(),
            category,
        );
        response.details = exception.context().cloned();
        response
    }

    /// Attaches error details.
    pub fn with_details(mut self, details: Metadata) -> Self {
        self.details = Some(details);
        self
    }

    /// Returns the outcome flag.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code.as_u16()
    }

    /// Returns the machine-readable error code.
    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    /// Returns the error category.
    pub fn error_category(&self) -> &ErrorCategory {
        &self.error_category
    }

    /// Returns the error details, if any.
    pub fn details(&self) -> Option<&Metadata> {
        self.details.as_ref()
    }
}

envelope_meta!(ErrorResponse);

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field
    pub field: String,
    /// Why the value was rejected
    pub message: String,
    /// Error kind tag such as `value_error`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl FieldError {
    /// Creates a field error without a kind tag.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: None,
        }
    }

    /// Sets the kind tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Error code used by validation envelopes unless overridden.
pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";
/// Error category used by validation envelopes unless overridden.
pub const VALIDATION_ERROR_CATEGORY: &str = "VALIDATION";

fn validation_status() -> ErrorStatus {
    ErrorStatus::UNPROCESSABLE_ENTITY
}

fn validation_code() -> String {
    VALIDATION_ERROR_CODE.to_string()
}

fn validation_category() -> ErrorCategory {
    ErrorCategory::from(VALIDATION_ERROR_CATEGORY)
}

/// Error envelope with field-level details.
///
/// Carries every [`ErrorResponse`] field; `status_code`, `error_code` and
/// `error_category` default to `422`, `VALIDATION_ERROR` and `VALIDATION`.
///
/// # Examples
///
/// ```
/// use backend_kit::responses::{FieldError, ValidationErrorResponse};
///
/// let response = ValidationErrorResponse::new("Validation failed").with_errors(vec![
///     FieldError::new("email", "Invalid email format").with_kind("value_error"),
/// ]);
/// let json = serde_json::to_value(&response).unwrap();
///
/// assert_eq!(json["status_code"], 422);
/// assert_eq!(json["error_code"], "VALIDATION_ERROR");
/// assert_eq!(json["validation_errors"][0]["type"], "value_error");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    #[serde(default, deserialize_with = "false_only")]
    success: bool,
    #[serde(default = "validation_status")]
    status_code: ErrorStatus,
    #[serde(default = "validation_code")]
    error_code: String,
    #[serde(default = "validation_category")]
    error_category: ErrorCategory,
    #[serde(default)]
    details: Option<Metadata>,
    #[serde(default)]
    validation_errors: Option<Vec<FieldError>>,
    #[serde(flatten)]
    meta: ResponseMeta,
}

impl ValidationErrorResponse {
    /// Creates a validation envelope with the default status, code and
    /// category and no field errors.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: validation_status(),
            error_code: validation_code(),
            error_category: validation_category(),
            details: None,
            validation_errors: None,
            meta: ResponseMeta::with_message(message),
        }
    }

    /// Sets the field errors, keeping their order.
    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.validation_errors = Some(errors);
        self
    }

    /// Attaches error details.
    pub fn with_details(mut self, details: Metadata) -> Self {
        self.details = Some(details);
        self
    }

    /// Overrides the error code.
    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = error_code.into();
        self
    }

    /// Returns the outcome flag.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code.as_u16()
    }

    /// Returns the machine-readable error code.
    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    /// Returns the error category.
    pub fn error_category(&self) -> &ErrorCategory {
        &self.error_category
    }

    /// Returns the error details, if any.
    pub fn details(&self) -> Option<&Metadata> {
        self.details.as_ref()
    }

    /// Returns the field errors, if any.
    pub fn validation_errors(&self) -> Option<&[FieldError]> {
        self.validation_errors.as_deref()
    }
}

envelope_meta!(ValidationErrorResponse);

impl From<ValidationErrorResponse> for ErrorResponse {
    /// Drops the field errors, keeping everything else.
    fn from(response: ValidationErrorResponse) -> Self {
        Self {
            success: response.success,
            status_code: response.status_code,
            error_code: response.error_code,
            error_category: response.error_category,
            details: response.details,
            meta: response.meta,
        }
    }
}
