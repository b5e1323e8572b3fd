//! Logger walkthrough: plain records, request context, error chains and
//! timed operations.
//!
//! Run with: `cargo run --example logger_usage`
//! Set `ENVIRONMENT=production` to switch to JSON lines (and a `logs/` file).

use std::time::Duration;

use backend_kit::fields;
use backend_kit::logging::{get_logger, LogContext, Logger};
use backend_kit::{AppError, LoggerError};

fn basic_usage(logger: &Logger) {
    logger.info("Application started", fields! {});
    logger.debug("Debug information", fields! { component = "example" });
    logger.warning("Warning message", fields! { threshold = 80 });
}

fn with_context(logger: &Logger) {
    let _ctx = LogContext::new(fields! { request_id = "req-12345", user_id = "user-67890" });
    logger.info("Received user request", fields! {});
    logger.info("Processing order", fields! { order_id = "ord-999", card_number = "4111111111111111" });
}

fn risky_operation() -> Result<(), AppError> {
    Err(AppError::internal("Something went wrong!"))
}

fn exception_handling(logger: &Logger) {
    if let Err(err) = risky_operation() {
        logger.exception("Failed to process", &err, fields! { operation = "risky" });
    }
}

fn performance_tracking(logger: &Logger) {
    let timer = logger.measure_time("database_query", fields! { table = "users" });
    std::thread::sleep(Duration::from_millis(50));
    timer.complete();
}

fn main() -> Result<(), LoggerError> {
    let logger = get_logger("logger_usage")?;

    println!("Running logger examples...\n");
    basic_usage(&logger);
    println!();
    with_context(&logger);
    println!();
    exception_handling(&logger);
    println!();
    performance_tracking(&logger);
    println!();
    println!("Examples completed!");

    Ok(())
}
