//! Concurrent detail requests that each fill in part of a metrics record.
//!
//! Providers first fetch an anchor document and build a metrics record from it, then
//! register any number of detail requests here. All requests run concurrently; each one
//! produces a value plus a closure that applies the value to the record. Once every
//! request has finished, the closures are applied in registration order by the caller's
//! task, so no lock is ever held across I/O.

use super::{FetchResult, Metrics};
use crate::Result;
use core::pin::Pin;
use futures_util::future::join_all;

const LOG_TARGET: &str = "subqueries";

type Apply<'a, M> = Box<dyn FnOnce(&mut M) + Send + 'a>;
type Pending<'a, M> = Pin<Box<dyn Future<Output = Result<Apply<'a, M>>> + Send + 'a>>;

/// A set of named detail requests against a metrics record of type `M`.
pub struct Subqueries<'a, M> {
    pending: Vec<(&'static str, Pending<'a, M>)>,
}

impl<'a, M: Send + 'a> Subqueries<'a, M> {
    #[must_use]
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Register a request named `name`. On success, `apply` stores its value in the record.
    pub fn add<T, F, A>(&mut self, name: &'static str, query: F, apply: A)
    where
        T: Send + 'a,
        F: Future<Output = Result<T>> + Send + 'a,
        A: FnOnce(&mut M, T) + Send + 'a,
    {
        self.pending.push((
            name,
            Box::pin(async move {
                let value = query.await?;
                Ok(Box::new(move |metrics: &mut M| apply(metrics, value)) as Apply<'a, M>)
            }),
        ));
    }

    /// Run every request and fold the outcomes into a [`FetchResult`].
    ///
    /// Metrics are always returned. Each failed request contributes `"{name}: {error}"`
    /// to the result's error, in registration order.
    pub async fn merge(self, target: impl Into<String>, mut metrics: M) -> FetchResult
    where
        M: Into<Metrics>,
    {
        let target = target.into();
        let (names, queries): (Vec<_>, Vec<_>) = self.pending.into_iter().unzip();
        let outcomes = join_all(queries).await;

        let mut errors = Vec::new();
        for (name, outcome) in names.into_iter().zip(outcomes) {
            match outcome {
                Ok(apply) => apply(&mut metrics),
                Err(e) => {
                    log::debug!(target: LOG_TARGET, "Request '{name}' for '{target}' failed: {e:#}");
                    errors.push(format!("{name}: {}", e.message()));
                }
            }
        }

        FetchResult::partial(target, metrics, &errors)
    }
}

impl<'a, M: Send + 'a> Default for Subqueries<'a, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> core::fmt::Debug for Subqueries<'_, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self.pending.iter().map(|(name, _)| *name).collect();
        f.debug_struct("Subqueries").field("pending", &names).finish()
    }
}
