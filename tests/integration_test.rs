use std::io::Write;
use std::sync::{Arc, Mutex};

use backend_kit::logging::{
    clear_loggers, get_logger_with_config, setup_request_logging, LogContext, LogHandler,
    LogLevel, Logger, LoggerConfig, LoggerRegistry, MemoryHandler,
};
use backend_kit::responses::{self, FieldError};
use backend_kit::{fields, AppError, Environment, Secret};
use serde_json::Value;

fn memory_logger(name: &str, environment: Environment) -> (Logger, MemoryHandler) {
    let memory = MemoryHandler::new();
    let config = LoggerConfig::new(name, environment)
        .with_level(LogLevel::Debug)
        .with_handlers(vec![LogHandler::Memory(memory.clone())]);
    (Logger::new(config).unwrap(), memory)
}

fn json_lines(memory: &MemoryHandler) -> Vec<Value> {
    memory
        .lines()
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn request_flow_logs_with_correlation_and_builds_envelope() {
    let (logger, memory) = memory_logger("users", Environment::Production);

    let _request = setup_request_logging("req-123", Some("user-456"));
    let result: Result<(), AppError> = logger.measure("load_user", fields! { entity_id = "789" }, || {
        Err(AppError::not_found("User not found").with_context("entity_id", "789"))
    });

    let err = result.unwrap_err();
    let response = responses::error_from_exception(&err, Some("req-123"));
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.details().unwrap()["entity_id"], "789");

    let records = json_lines(&memory);
    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record["request_id"], "req-123");
        assert_eq!(record["user_id"], "user-456");
        assert_eq!(record["logger"], "users");
    }
    assert_eq!(records[1]["level"], "ERROR");
    assert_eq!(records[1]["exception"], "not_found: User not found");
}

#[test]
fn password_is_redacted_everywhere() {
    let (logger, memory) = memory_logger("auth", Environment::Production);

    let _ctx = LogContext::new(fields! { password = "secret" });
    logger.debug("debug", fields! { password = "secret" });
    logger.info("info", fields! {});
    logger.critical("critical", fields! { nested = serde_json::json!({ "password": "secret" }) });

    for line in memory.lines() {
        assert!(!line.contains("\"secret\""), "leaked: {line}");
    }
}

#[test]
fn secret_values_are_redacted_under_any_key() {
    let (logger, memory) = memory_logger("billing", Environment::Production);

    logger.info("charging", fields! { upstream = Secret::new("sk-live-999") });

    assert!(!memory.lines()[0].contains("sk-live-999"));
    assert_eq!(json_lines(&memory)[0]["upstream"], "[REDACTED]");
}

#[test]
fn development_logger_writes_human_readable_lines() {
    let memory = MemoryHandler::new();
    let config = LoggerConfig::from_environment("web", Environment::Development, None)
        .with_handlers(vec![LogHandler::Memory(memory.clone())]);
    let logger = Logger::new(config).unwrap();

    logger.info("started", fields! { port = 8080 });

    let line = &memory.lines()[0];
    assert!(line.contains("web"));
    assert!(line.contains("started"));
    assert!(line.contains("port=8080"));
    assert!(serde_json::from_str::<Value>(line).is_err());
}

#[test]
fn production_preset_writes_rotating_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config =
        LoggerConfig::from_environment("orders", Environment::Production, Some(dir.path()));
    // keep stdout quiet
    config
        .handlers
        .retain(|handler| matches!(handler, LogHandler::DailyRotating(_)));
    let logger = Logger::new(config).unwrap();

    logger.info("order placed", fields! { order_id = "ord-1" });
    drop(logger);

    let entry = std::fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
    let contents = std::fs::read_to_string(entry.path()).unwrap();
    let record: Value = serde_json::from_str(contents.trim()).unwrap();
    assert_eq!(record["message"], "order placed");
    assert_eq!(record["order_id"], "ord-1");
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn tracing_handler_forwards_records() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let config = LoggerConfig::new("bridge", Environment::Production)
        .with_handlers(vec![LogHandler::Tracing]);
    let logger = Logger::new(config).unwrap();

    tracing::subscriber::with_default(subscriber, || {
        logger.warning("disk almost full", fields! { free_mb = 12, token = "abc" });
    });

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("WARN"));
    assert!(output.contains("backend_kit::app"));
    assert!(output.contains("disk almost full"));
    assert!(output.contains("logger=bridge"));
    assert!(output.contains("[REDACTED]"));
    assert!(!output.contains("abc"));
}

#[test]
fn snapshot_carries_context_to_worker_threads() {
    let (logger, memory) = memory_logger("jobs", Environment::Production);
    let logger = Arc::new(logger);

    let _request = setup_request_logging("req-77", None);
    let snapshot = LogContext::snapshot();

    let worker_logger = Arc::clone(&logger);
    std::thread::spawn(move || {
        let _ctx = snapshot.attach();
        worker_logger.info("background job", fields! {});
    })
    .join()
    .unwrap();

    assert_eq!(json_lines(&memory)[0]["request_id"], "req-77");
}

#[test]
fn global_registry_is_first_writer_wins() {
    let first_memory = MemoryHandler::new();
    let first = get_logger_with_config(
        "integration-global",
        LoggerConfig::new("integration-global", Environment::Testing)
            .with_handlers(vec![LogHandler::Memory(first_memory.clone())]),
    )
    .unwrap();
    let second = get_logger_with_config(
        "integration-global",
        LoggerConfig::new("integration-global", Environment::Development),
    )
    .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    second.error("shared", fields! {});
    assert_eq!(first_memory.len(), 1);

    clear_loggers();
    let rebuilt = get_logger_with_config(
        "integration-global",
        LoggerConfig::new("integration-global", Environment::Development)
            .with_handlers(Vec::new()),
    )
    .unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
}

#[test]
fn registry_loggers_are_shared_across_threads() {
    let registry = Arc::new(LoggerRegistry::new());
    let memory = MemoryHandler::new();
    registry
        .get_logger_with_config(
            "threads",
            LoggerConfig::new("threads", Environment::Testing)
                .with_handlers(vec![LogHandler::Memory(memory.clone())]),
        )
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let logger = registry.get_logger("threads").unwrap();
                logger.error("worker failed", fields! { worker = i });
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(memory.len(), 4);
}

#[test]
fn envelopes_serialize_to_documented_shapes() {
    let page = responses::paginated(vec!["p1", "p2"], 1, 20, 100)
        .unwrap()
        .with_request_id("req-1");
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["page_info"]["pages"], 5);
    assert_eq!(json["request_id"], "req-1");
    assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));

    let invalid = responses::validation_error(
        "Validation failed",
        vec![FieldError::new("email", "Invalid email format").with_kind("value_error")],
    );
    let json = serde_json::to_value(&invalid).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["status_code"], 422);
    assert_eq!(json["error_category"], "VALIDATION");
    assert_eq!(json["validation_errors"][0]["field"], "email");
}

#[test]
fn envelope_construction_failures_surface() {
    assert!(responses::error("Oops", 200, "OOPS", "internal").is_err());
    assert!(responses::error("Missing", 404, "MISSING", "not_found").is_ok());
    assert!(responses::paginated(vec![1], 1, 0, 10).is_err());
    assert!(responses::DataResponse::<u8>::try_from_option(None).is_err());
}
