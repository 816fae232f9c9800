//! Operation implementations behind the [`crate::Library`] facade
//!
//! Every operation brackets its work with one start event and exactly one
//! end or end_error event, and tags failures with the caller's request id.

#![allow(clippy::result_large_err)]

pub mod artifact;
pub mod diff;
pub mod engine_command;
pub mod family;
pub mod publish;
pub mod reconcile;
pub mod verify;

use std::time::Instant;

use famlib_core::errors::ExError;
use famlib_core::{log_op_end, log_op_error};
use famlib_core_types::RequestContext;

/// Close an operation boundary: log end or end_error and tag the error
pub(crate) fn finish<T>(
    op: &str,
    ctx: &RequestContext,
    start: Instant,
    result: Result<T, ExError>,
) -> Result<T, ExError> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(value) => {
            log_op_end!(
                op,
                duration_ms = duration_ms,
                request_id = ctx.request_id.as_str()
            );
            Ok(value)
        }
        Err(err) => {
            let mut err = err.with_request_id(ctx.request_id.clone());
            if err.op().is_none() {
                err = err.with_op(op);
            }
            if let Some(trace_id) = &ctx.trace_id {
                err = err.with_trace_id(trace_id.clone());
            }
            log_op_error!(
                op,
                err.clone(),
                duration_ms = duration_ms,
                request_id = ctx.request_id.as_str()
            );
            Err(err)
        }
    }
}
