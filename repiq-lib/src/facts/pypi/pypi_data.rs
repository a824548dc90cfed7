use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyPiMetrics {
    pub weekly_downloads: u64,
    pub monthly_downloads: u64,
    pub latest_version: String,
    pub last_publish_days: u64,

    /// `requires_dist` entries that aren't tied to an extra.
    pub dependencies_count: u64,
    pub license: String,
    pub requires_python: String,
}
