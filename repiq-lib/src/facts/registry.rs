use super::Provider;
use core::fmt::{Debug, Formatter, Result as FmtResult};
use std::collections::HashMap;
use std::sync::Arc;

const LOG_TARGET: &str = "  registry";

/// Maps a target scheme to the provider that serves it.
///
/// Built once at startup and only read afterwards.
#[derive(Default)]
pub struct Registry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own scheme, replacing any earlier one.
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        let scheme = provider.scheme().to_string();
        if self.providers.insert(scheme.clone(), provider).is_some() {
            log::debug!(target: LOG_TARGET, "Replaced provider for scheme '{scheme}'");
        }
    }

    #[must_use]
    pub fn lookup(&self, scheme: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(scheme).map(Arc::clone)
    }

    /// The registered schemes in sorted order.
    #[must_use]
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Registry").field("schemes", &self.schemes()).finish()
    }
}
