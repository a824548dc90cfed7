use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoMetrics {
    pub latest_version: String,
    pub last_publish_days: u64,

    /// Direct dependencies of `latest_version` as resolved by deps.dev.
    pub dependencies_count: u64,

    /// deps.dev licenses joined with ` OR `.
    pub license: String,
}
