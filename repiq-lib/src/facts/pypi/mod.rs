//! Python packages (`pypi:requests`).

mod provider;
mod pypi_data;

pub use provider::{PYPI_URL, PYPISTATS_URL, PyPiProvider};
pub use pypi_data::PyPiMetrics;
