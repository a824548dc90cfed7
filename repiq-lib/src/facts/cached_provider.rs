use super::{Deadline, FetchResult, Provider, Store};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

const LOG_TARGET: &str = "     cache";

/// Wraps a provider with a [`Store`], so cached results are served without touching
/// the network.
///
/// Only complete results are stored. With `bypass` set, lookups are skipped but fresh
/// results are still written, which refreshes the cache.
pub struct CachedProvider {
    inner: Arc<dyn Provider>,
    store: Arc<Store>,
    bypass: bool,
}

impl CachedProvider {
    #[must_use]
    pub fn new(inner: Arc<dyn Provider>, store: Arc<Store>, bypass: bool) -> Self {
        Self { inner, store, bypass }
    }
}

impl core::fmt::Debug for CachedProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachedProvider")
            .field("scheme", &self.inner.scheme())
            .field("store", &self.store)
            .field("bypass", &self.bypass)
            .finish()
    }
}

#[async_trait]
impl Provider for CachedProvider {
    fn scheme(&self) -> &str {
        self.inner.scheme()
    }

    async fn fetch(&self, identifier: &str, deadline: Deadline) -> Result<FetchResult> {
        let key = format!("{}:{identifier}", self.inner.scheme());

        if !self.bypass
            && let Some(result) = self.store.get(&key)
        {
            return Ok(result);
        }

        let result = self.inner.fetch(identifier, deadline).await?;

        if result.has_error() {
            log::debug!(target: LOG_TARGET, "Not caching '{key}' because it carries an error");
        } else if let Err(e) = self.store.set(&key, &result) {
            log::warn!(target: LOG_TARGET, "Could not cache '{key}': {e:#}");
        }

        Ok(result)
    }
}
