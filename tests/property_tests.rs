//! Property tests for pagination arithmetic, redaction and context stack
//! discipline.

use backend_kit::logging::{
    Fields, LogContext, LogHandler, LogLevel, Logger, LoggerConfig, MemoryHandler,
    SensitiveDataFilter, DEFAULT_SENSITIVE_KEYS,
};
use backend_kit::responses::{cursor_paginated, page_count, paginated};
use backend_kit::Environment;
use proptest::prelude::*;

// Strategy: field names that contain a sensitive fragment, in mixed case
fn arb_sensitive_key() -> impl Strategy<Value = String> {
    (
        prop::sample::select(DEFAULT_SENSITIVE_KEYS),
        "[a-z]{0,4}",
        "[a-z]{0,4}",
        any::<bool>(),
    )
        .prop_map(|(fragment, prefix, suffix, upper)| {
            let key = format!("{prefix}{fragment}{suffix}");
            if upper {
                key.to_ascii_uppercase()
            } else {
                key
            }
        })
}

proptest! {
    /// Property: pages is the ceiling of total / size
    #[test]
    fn proptest_pages_is_ceiling(total in 0u64..1_000_000, size in 1u64..10_000) {
        let pages = page_count(total, size);

        prop_assert!(pages * size >= total);
        if pages > 0 {
            prop_assert!((pages - 1) * size < total);
        } else {
            prop_assert_eq!(total, 0);
        }
    }

    /// Property: paginated() accepts every page/size >= 1 and derives pages
    #[test]
    fn proptest_paginated_derives_pages(
        page in 1u64..1_000,
        size in 1u64..1_000,
        total in 0u64..100_000,
    ) {
        let response = paginated(Vec::<u8>::new(), page, size, total).unwrap();
        prop_assert_eq!(response.page_info().pages(), page_count(total, size));
        prop_assert_eq!(response.page_info().total(), total);
    }

    /// Property: cursor count always equals the number of items
    #[test]
    fn proptest_cursor_count_matches_items(
        items in prop::collection::vec(any::<i32>(), 0..64),
        cursor in "[a-zA-Z0-9]{1,16}",
        has_next in any::<bool>(),
        has_previous in any::<bool>(),
    ) {
        let len = items.len();
        let response = cursor_paginated(items, cursor, has_next, has_previous);
        prop_assert_eq!(response.cursor_info().count(), len);
    }

    /// Property: any key containing a sensitive fragment is redacted
    #[test]
    fn proptest_sensitive_keys_are_redacted(
        key in arb_sensitive_key(),
        value in "[a-zA-Z0-9]{8,24}",
    ) {
        let mut input = Fields::new();
        input.insert(key.clone(), value.clone().into());

        let clean = SensitiveDataFilter::new().sanitize(&input);
        prop_assert_eq!(clean[&key].as_str(), Some("[REDACTED]"));
    }

    /// Property: a logged sensitive value never reaches a sink
    #[test]
    fn proptest_logged_secrets_never_reach_sinks(
        key in arb_sensitive_key(),
        value in "[a-zA-Z0-9]{12,24}",
    ) {
        let memory = MemoryHandler::new();
        let logger = Logger::new(
            LoggerConfig::new("prop", Environment::Production)
                .with_level(LogLevel::Debug)
                .with_handlers(vec![LogHandler::Memory(memory.clone())]),
        )
        .unwrap();

        let mut call_fields = Fields::new();
        call_fields.insert(key, value.clone().into());
        logger.info("event", call_fields);

        prop_assert!(!memory.lines()[0].contains(&value));
    }

    /// Property: nested scopes unwind to exactly the parent view
    #[test]
    fn proptest_context_stack_unwinds_exactly(
        layers in prop::collection::vec(
            prop::collection::btree_map("[a-z]{1,3}", any::<u16>(), 0..4),
            1..6,
        ),
    ) {
        prop_assert!(LogContext::current().is_empty());

        let mut guards = Vec::new();
        let mut views = Vec::new();
        for layer in &layers {
            views.push(LogContext::current());
            let fields: Fields = layer.iter().map(|(k, v)| (k.clone(), (*v).into())).collect();
            guards.push(LogContext::new(fields));

            let active = LogContext::current();
            for (k, v) in layer {
                prop_assert_eq!(&active[k], &serde_json::json!(v));
            }
        }

        while let Some(guard) = guards.pop() {
            drop(guard);
            let parent = views.pop().unwrap();
            prop_assert_eq!(LogContext::current(), parent);
        }
        prop_assert_eq!(LogContext::depth(), 0);
    }
}

#[test]
fn pagination_reference_values() {
    assert_eq!(page_count(0, 10), 0);
    assert_eq!(page_count(50, 10), 5);
    assert_eq!(page_count(47, 10), 5);
}
