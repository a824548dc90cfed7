//! npm packages (`npm:lodash`, `npm:@types/node`).

mod npm_data;
mod provider;

pub use npm_data::NpmMetrics;
pub use provider::{NPM_DOWNLOADS_URL, NPM_REGISTRY_URL, NpmProvider};
