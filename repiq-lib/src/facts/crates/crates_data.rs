use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CratesMetrics {
    pub downloads: u64,
    pub recent_downloads: u64,

    /// Highest stable version, or the newest version when no stable one exists.
    pub latest_version: String,
    pub last_publish_days: u64,

    /// Normal dependencies of `latest_version`; dev and build dependencies are excluded.
    pub dependencies_count: u64,
    pub reverse_dependencies: u64,
    pub license: String,
}
