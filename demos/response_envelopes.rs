//! Builds each response envelope and prints its JSON.
//!
//! Run with: `cargo run --example response_envelopes`

use backend_kit::responses::{self, FieldError, Metadata};
use backend_kit::{AppError, ValidationError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct User {
    id: u64,
    email: String,
}

fn print<T: Serialize>(title: &str, envelope: &T) {
    match serde_json::to_string_pretty(envelope) {
        Ok(json) => println!("--- {title} ---\n{json}\n"),
        Err(err) => eprintln!("--- {title} --- failed to serialize: {err}"),
    }
}

fn main() -> Result<(), ValidationError> {
    let user = User {
        id: 1,
        email: "ada@example.com".to_string(),
    };

    let mut metadata = Metadata::new();
    metadata.insert("version".into(), "1.0.0".into());

    print(
        "created",
        &responses::created(Some(&user))
            .with_message("User created")
            .with_request_id("req_abc123")
            .with_metadata(metadata),
    );
    print("data", &responses::data_response(&user));
    print("message", &responses::no_content("Item deleted successfully"));

    print(
        "error",
        &responses::error("Slow down", 429, "RATE_LIMITED", "rate_limit")?,
    );
    let missing = AppError::not_found("User not found").with_context("entity_id", "123");
    print(
        "error from application error",
        &responses::error_from_exception(&missing, Some("req-abc-123")),
    );
    print(
        "validation",
        &responses::validation_error(
            "Validation failed",
            vec![
                FieldError::new("email", "Invalid email format").with_kind("value_error"),
                FieldError::new("password", "Password must be at least 8 characters")
                    .with_kind("value_error"),
            ],
        ),
    );

    print("paginated", &responses::paginated(vec!["product1", "product2"], 1, 20, 100)?);
    print(
        "cursor paginated",
        &responses::cursor_paginated(vec!["post1", "post2"], "abc123", true, false),
    );

    match responses::error("Oops", 200, "OOPS", "internal") {
        Ok(_) => println!("unexpectedly accepted a 200 error"),
        Err(err) => println!("rejected: {err}"),
    }

    Ok(())
}
