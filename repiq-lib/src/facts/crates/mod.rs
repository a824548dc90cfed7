//! Rust crates on crates.io (`crates:serde`).

mod crates_data;
mod provider;

pub use crates_data::CratesMetrics;
pub use provider::{CRATES_IO_URL, CratesProvider};
