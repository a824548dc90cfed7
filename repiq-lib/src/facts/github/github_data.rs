use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

/// A count derived from GitHub's pagination.
///
/// When the API doesn't paginate, the count comes from a single page of at most 100
/// items; `capped` is set when that page was full and the true count may be larger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedCount {
    pub count: u64,
    pub capped: bool,
}

impl Display for PagedCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.capped {
            write!(f, "{}+", self.count)
        } else {
            write!(f, "{}", self.count)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubMetrics {
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub contributors: PagedCount,
    pub release_count: PagedCount,
    pub last_commit_days: u64,
    pub commits_30d: u64,
    pub issues_closed_30d: u64,

    /// SPDX identifier, empty when GitHub couldn't detect one.
    pub license: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capped_count_displays_with_plus() {
        assert_eq!(PagedCount { count: 100, capped: true }.to_string(), "100+");
        assert_eq!(PagedCount { count: 57, capped: false }.to_string(), "57");
    }
}
