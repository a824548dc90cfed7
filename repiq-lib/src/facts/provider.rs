use super::{Deadline, FetchResult};
use crate::Result;
use async_trait::async_trait;

/// A source of metrics for one target scheme.
///
/// Upstream failures (bad status codes, unreachable hosts, invalid identifiers) are
/// reported inside the returned [`FetchResult`]. An `Err` is reserved for conditions
/// that are not about the target itself.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The scheme this provider answers for, e.g. `github`.
    fn scheme(&self) -> &str;

    async fn fetch(&self, identifier: &str, deadline: Deadline) -> Result<FetchResult>;
}
