//! Fan-out of many targets over their providers.

use super::{Deadline, FetchResult, Registry, Target};
use crate::Result;
use ohno::app_err;

const LOG_TARGET: &str = " collector";

/// Fetch every target concurrently and return the results in input order.
///
/// All schemes are resolved before anything is spawned, so an unknown scheme aborts the
/// run without a single upstream call. Each target then runs in its own task, bounded by
/// `deadline`. A target that misses the deadline, or whose task dies, still gets a
/// failure result, so the output always has exactly one entry per target.
pub async fn run_all(targets: &[Target], registry: &Registry, deadline: Deadline) -> Result<Vec<FetchResult>> {
    let providers = targets
        .iter()
        .map(|target| {
            registry.lookup(target.scheme()).ok_or_else(|| {
                app_err!(
                    "unknown scheme \"{}\" in target \"{target}\" (known schemes: {})",
                    target.scheme(),
                    registry.schemes().join(", ")
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!(target: LOG_TARGET, "Fetching {} target(s)", targets.len());

    let handles: Vec<_> = targets
        .iter()
        .zip(providers)
        .map(|(target, provider)| {
            let target = target.clone();
            tokio::spawn(async move {
                match tokio::time::timeout_at(deadline.instant(), provider.fetch(target.identifier(), deadline)).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(e)) => {
                        log::warn!(target: LOG_TARGET, "Provider for '{target}' failed: {e:#}");
                        FetchResult::failure(target.to_string(), e.message())
                    }
                    Err(_) => {
                        log::debug!(target: LOG_TARGET, "'{target}' did not finish before the deadline");
                        FetchResult::failure(target.to_string(), "deadline exceeded")
                    }
                }
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (target, handle) in targets.iter().zip(handles) {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Task for '{target}' failed: {e}");
                FetchResult::failure(target.to_string(), format!("task failed: {e}"))
            }
        });
    }

    Ok(results)
}

/// Whether any result carries an error, partial failures included.
#[must_use]
pub fn any_failed(results: &[FetchResult]) -> bool {
    results.iter().any(FetchResult::has_error)
}
