#![allow(clippy::unwrap_used, clippy::expect_used)]

use famlib_core::errors::FamlibError;
use famlib_core::logging_facility::test_capture::init_test_capture;
use famlib_core::{log_op_end, log_op_error, log_op_start};
use famlib_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, family_id = "fam-log-1");

    let found = capture.find(op_name, "family_id", "fam-log-1");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].event.as_deref(), Some(EVENT_START));
    assert!(found[0].component.is_some());
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(
        end_events[0].fields.get(FIELD_DURATION_MS),
        Some(&"42".to_string())
    );
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = FamlibError::DuplicateContent {
        family_id: "fam-1".to_string(),
        existing_version: 1,
        hash: "ab".repeat(32),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events();
    let error_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(
        error_events[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_DUPLICATE_CONTENT".to_string())
    );
    assert_eq!(
        error_events[0].fields.get(FIELD_ERR_KIND),
        Some(&"DuplicateContent".to_string())
    );
}

#[test]
fn test_boundary_single_start_single_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_4";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 1, version = 3u32);

    let count = |event: &str| {
        capture.count_events(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(event))
    };
    assert_eq!(count(EVENT_START), 1);
    assert_eq!(count(EVENT_END), 1);
    assert_eq!(count(EVENT_END_ERROR), 0);
}
