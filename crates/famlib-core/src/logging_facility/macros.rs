//! Canonical logging macros
//!
//! Every engine operation brackets its work with one start event and exactly
//! one end or end_error event. Extra `key = value` fields pass straight
//! through to `tracing`.

/// Log the start of an operation
///
/// ```
/// # use famlib_core::log_op_start;
/// log_op_start!("publish");
/// log_op_start!("publish", family_id = "fam-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::famlib_core_types::schema::EVENT_START,
            $($($field)+)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use famlib_core::log_op_end;
/// log_op_end!("publish", duration_ms = 42);
/// log_op_end!("publish", duration_ms = 42, version = 3u32);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::famlib_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        )
    };
}

/// Log an operation error with its kind and stable code
///
/// Accepts anything convertible into `ExError`.
///
/// ```
/// # use famlib_core::log_op_error;
/// # use famlib_core::errors::FamlibError;
/// let err = FamlibError::FamilyNotFound { family_id: "fam-1".to_string() };
/// log_op_error!("publish", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::famlib_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)+)?
        );
    }};
}
