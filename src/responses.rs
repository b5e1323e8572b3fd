//! Standardized API response envelopes.
//!
//! Every envelope carries `message`, `timestamp` (UTC, defaulted at
//! creation), `request_id` and `metadata`, flattened next to its own fields
//! when serialized. Envelopes are values: they are built in one shot by a
//! constructor or a [`factory`] function, optionally decorated with the
//! `with_*` builders, and never mutated afterwards.
//!
//! | Envelope | Extra fields |
//! |---|---|
//! | [`BaseResponse`] | nullable `success` |
//! | [`SuccessResponse`] | optional `data` |
//! | [`DataResponse`] | required `data` |
//! | [`MessageResponse`] | none |
//! | [`ErrorResponse`] | `status_code`, `error_code`, `error_category`, `details` |
//! | [`ValidationErrorResponse`] | error fields plus `validation_errors` |
//! | [`PaginatedResponse`] | `items`, `page_info` |
//! | [`CursorPaginatedResponse`] | `items`, `cursor_info` |
//!
//! Invariants are checked both at construction and on deserialization.
//!
//! # Examples
//!
//! ```
//! use backend_kit::responses::{cursor_paginated, paginated};
//!
//! let page = paginated(vec!["p1", "p2"], 1, 20, 100).unwrap().with_request_id("req-1");
//! assert_eq!(page.page_info().pages(), 5);
//!
//! let feed = cursor_paginated(vec!["post1", "post2"], "abc123", true, false);
//! assert_eq!(feed.cursor_info().count(), 2);
//! ```

mod base;
mod error;
pub mod factory;
mod pagination;
mod success;

pub use base::{BaseResponse, Metadata};
pub use error::{
    ErrorResponse, ErrorStatus, FieldError, ValidationErrorResponse, VALIDATION_ERROR_CATEGORY,
    VALIDATION_ERROR_CODE,
};
pub use factory::{
    accepted, bad_request, conflict, created, cursor_paginated, data_response, error,
    error_from_exception, internal_error, message_response, no_content, not_found, ok, paginated,
    success, validation_error,
};
pub use pagination::{page_count, CursorInfo, CursorPaginatedResponse, PageInfo, PaginatedResponse};
pub use success::{DataResponse, MessageResponse, SuccessResponse};
