//! GitHub repositories (`github:owner/repo`).

mod client;
mod github_data;
mod provider;

pub use github_data::{GitHubMetrics, PagedCount};
pub use provider::{GITHUB_API_URL, GitHubProvider};
