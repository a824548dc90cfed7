//! Go modules (`go:golang.org/x/text`).

mod go_data;
mod provider;

pub use go_data::GoMetrics;
pub use provider::{DEPS_DEV_URL, GO_PROXY_URL, GoProvider};
