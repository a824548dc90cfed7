use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmMetrics {
    pub weekly_downloads: u64,
    pub monthly_downloads: u64,
    pub latest_version: String,
    pub last_publish_days: u64,
    pub dependencies_count: u64,
    pub license: String,
}
