//! Batch reconciliation over a bounded worker pool

#![allow(clippy::result_large_err)]

use std::time::Instant;

use famlib_core::errors::{cancelled, ExError, ExErrorKind};
use famlib_core::log_op_start;
use famlib_core::reconcile::{classify_item, ReconcileItem, ReconciliationResult};
use famlib_core_types::RequestContext;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::finish;
use crate::Library;

/// Classify every item; results keep input order
///
/// # Errors
///
/// `Cancelled` if `cancel` fires before the batch completes. Individual
/// items never fail the batch.
pub fn reconcile(
    lib: &Library,
    ctx: &RequestContext,
    items: &[ReconcileItem],
    cancel: &CancellationToken,
) -> Result<Vec<ReconciliationResult>, ExError> {
    let start = Instant::now();
    log_op_start!(
        "reconcile",
        request_id = ctx.request_id.as_str(),
        items = items.len()
    );

    let result = (|| -> Result<Vec<ReconciliationResult>, ExError> {
        if cancel.is_cancelled() {
            return Err(cancelled("reconcile"));
        }

        let workers = lib.config.reconcile.parallelism;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("famlib-reconcile-{}", idx))
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_message(format!("cannot start reconcile workers: {}", e))
            })?;

        let repo = lib.repo.as_ref();
        let legacy = &lib.legacy;
        let classified: Vec<Option<ReconciliationResult>> = pool.install(|| {
            items
                .par_iter()
                .map(|item| {
                    if cancel.is_cancelled() {
                        None
                    } else {
                        Some(classify_item(item, repo, legacy))
                    }
                })
                .collect()
        });

        let results: Option<Vec<ReconciliationResult>> = classified.into_iter().collect();
        let results = match results {
            Some(results) if !cancel.is_cancelled() => results,
            _ => return Err(cancelled("reconcile")),
        };

        info!(
            total = results.len(),
            workers,
            "reconcile batch classified"
        );
        Ok(results)
    })();

    finish("reconcile", ctx, start, result)
}
