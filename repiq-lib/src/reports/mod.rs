//! Report generation for fetch results
//!
//! Three formats are provided, each through a `generate` function that writes into
//! any [`core::fmt::Write`]:
//! - **JSON**: a pretty-printed array, for humans and `jq` alike
//! - **NDJSON**: one compact object per line, for streaming consumers
//! - **Markdown**: one table per registry, followed by a table of targets that failed outright
//!
//! Results are rendered in the order they were given; no generator reorders or drops them.

mod json;
mod markdown;
mod ndjson;

use crate::Result;
use crate::facts::FetchResult;
use core::fmt::Write;

pub use json::generate as generate_json;
pub use markdown::generate as generate_markdown;
pub use ndjson::generate as generate_ndjson;

/// Output format for a batch of results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Ndjson,
    #[default]
    Markdown,
}

/// Render `results` in the given format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails
pub fn generate<W: Write>(format: OutputFormat, results: &[FetchResult], writer: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => generate_json(results, writer),
        OutputFormat::Ndjson => generate_ndjson(results, writer),
        OutputFormat::Markdown => generate_markdown(results, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::npm::NpmMetrics;

    fn results() -> Vec<FetchResult> {
        vec![
            FetchResult::success("npm:react", NpmMetrics { latest_version: "19.0.0".into(), ..NpmMetrics::default() }),
            FetchResult::failure("npm:nope", "npm registry: 404 Not Found"),
        ]
    }

    #[test]
    fn dispatches_by_format() {
        let results = results();

        let mut json = String::new();
        generate(OutputFormat::Json, &results, &mut json).unwrap();
        assert!(json.starts_with('['));

        let mut ndjson = String::new();
        generate(OutputFormat::Ndjson, &results, &mut ndjson).unwrap();
        assert_eq!(ndjson.lines().count(), 2);

        let mut markdown = String::new();
        generate(OutputFormat::Markdown, &results, &mut markdown).unwrap();
        assert!(markdown.starts_with("| target |"));
    }

    #[test]
    fn markdown_is_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Markdown);
    }
}
