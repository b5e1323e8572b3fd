//! Shorthand constructors for every envelope.
//!
//! Optional fields (`message`, `request_id`, `metadata`) are set with the
//! `with_*` builders on the returned envelope.

use super::{
    CursorPaginatedResponse, DataResponse, ErrorResponse, ErrorStatus, FieldError,
    MessageResponse, PageInfo, PaginatedResponse, SuccessResponse, ValidationErrorResponse,
};
use crate::error::{ApplicationError, ErrorCategory, ValidationError};

/// Creates a success envelope with optional data.
///
/// ```
/// use backend_kit::responses::success;
///
/// let response = success(Some(42)).with_message("Answer computed");
/// assert!(response.success());
/// assert_eq!(response.data(), Some(&42));
/// ```
pub fn success<T>(data: Option<T>) -> SuccessResponse<T> {
    SuccessResponse::new(data)
}

/// Creates a success envelope whose data is required.
pub fn data_response<T>(data: T) -> DataResponse<T> {
    DataResponse::new(data)
}

/// Creates a message-only success envelope.
pub fn message_response(message: impl Into<String>) -> MessageResponse {
    MessageResponse::new(message)
}

/// Creates an error envelope.
///
/// # Errors
///
/// Returns [`ValidationError`] on `status_code` outside `400..=599`.
pub fn error(
    message: impl Into<String>,
    status_code: u16,
    error_code: impl Into<String>,
    error_category: impl Into<ErrorCategory>,
) -> Result<ErrorResponse, ValidationError> {
    ErrorResponse::new(message, status_code, error_code, error_category)
}

/// Converts an application error into an error envelope.
///
/// Never fails: the status code comes from the error's category (unknown
/// categories map to `500`) and message, code and context are copied as is.
///
/// ```
/// use backend_kit::AppError;
/// use backend_kit::responses::error_from_exception;
///
/// let response = error_from_exception(&AppError::database("Connection failed"), Some("req-123"));
///
/// assert_eq!(response.status_code(), 500);
/// assert_eq!(response.error_code(), "database_error");
/// assert_eq!(response.request_id(), Some("req-123"));
/// ```
pub fn error_from_exception<E>(exception: &E, request_id: Option<&str>) -> ErrorResponse
where
    E: ApplicationError + ?Sized,
{
    let response = ErrorResponse::from_exception(exception);
    tracing::debug!(
        error_code = %response.error_code(),
        error_category = %response.error_category(),
        status_code = response.status_code(),
        request_id,
        "converting application error to error response"
    );

    match request_id {
        Some(id) => response.with_request_id(id),
        None => response,
    }
}

/// Creates a validation envelope (`422`, `VALIDATION_ERROR`, `VALIDATION`)
/// holding `errors` in order.
pub fn validation_error(
    message: impl Into<String>,
    errors: Vec<FieldError>,
) -> ValidationErrorResponse {
    ValidationErrorResponse::new(message).with_errors(errors)
}

/// Creates an offset-paginated envelope, computing the page count as
/// `ceil(total / size)`.
///
/// # Errors
///
/// Returns [`ValidationError`] on `page` or `size` below `1`.
///
/// ```
/// use backend_kit::responses::paginated;
///
/// let response = paginated(vec!["p1", "p2"], 1, 10, 47).unwrap();
/// assert_eq!(response.page_info().pages(), 5);
///
/// assert!(paginated(Vec::<u8>::new(), 1, 0, 10).is_err());
/// ```
pub fn paginated<T>(
    items: Vec<T>,
    page: u64,
    size: u64,
    total: u64,
) -> Result<PaginatedResponse<T>, ValidationError> {
    Ok(PaginatedResponse::new(items, PageInfo::new(page, size, total)?))
}

/// Creates a cursor-paginated envelope; `count` is the number of items.
pub fn cursor_paginated<T>(
    items: Vec<T>,
    cursor: impl Into<String>,
    has_next: bool,
    has_previous: bool,
) -> CursorPaginatedResponse<T> {
    CursorPaginatedResponse::new(items, cursor, has_next, has_previous)
}

/// Same as [`success`]; for `200 OK` routes.
pub fn ok<T>(data: Option<T>) -> SuccessResponse<T> {
    success(data)
}

/// Same as [`success`]; for `201 Created` routes.
pub fn created<T>(data: Option<T>) -> SuccessResponse<T> {
    success(data)
}

/// Same as [`success`]; for `202 Accepted` routes.
pub fn accepted<T>(data: Option<T>) -> SuccessResponse<T> {
    success(data)
}

/// Same as [`message_response`]; for `204 No Content` routes.
pub fn no_content(message: impl Into<String>) -> MessageResponse {
    message_response(message)
}

/// Error envelope with status `400`.
pub fn bad_request(
    message: impl Into<String>,
    error_code: impl Into<String>,
    error_category: impl Into<ErrorCategory>,
) -> ErrorResponse {
    ErrorResponse::with_status(message, ErrorStatus::BAD_REQUEST, error_code, error_category)
}

/// Error envelope with status `404`.
pub fn not_found(
    message: impl Into<String>,
    error_code: impl Into<String>,
    error_category: impl Into<ErrorCategory>,
) -> ErrorResponse {
    ErrorResponse::with_status(message, ErrorStatus::NOT_FOUND, error_code, error_category)
}

/// Error envelope with status `409`.
pub fn conflict(
    message: impl Into<String>,
    error_code: impl Into<String>,
    error_category: impl Into<ErrorCategory>,
) -> ErrorResponse {
    ErrorResponse::with_status(message, ErrorStatus::CONFLICT, error_code, error_category)
}

/// Error envelope with status `500`.
pub fn internal_error(
    message: impl Into<String>,
    error_code: impl Into<String>,
    error_category: impl Into<ErrorCategory>,
) -> ErrorResponse {
    ErrorResponse::with_status(
        message,
        ErrorStatus::INTERNAL_SERVER_ERROR,
        error_code,
        error_category,
    )
}
