use crate::Result;
use crate::facts::{FetchResult, Metrics};
use core::fmt::Write;

const GITHUB_COLUMNS: &[&str] = &[
    "stars",
    "forks",
    "open_issues",
    "contributors",
    "release_count",
    "last_commit_days",
    "commits_30d",
    "issues_closed_30d",
    "license",
];

const NPM_COLUMNS: &[&str] = &[
    "weekly_downloads",
    "monthly_downloads",
    "latest_version",
    "last_publish_days",
    "dependencies_count",
    "license",
];

const PYPI_COLUMNS: &[&str] = &[
    "weekly_downloads",
    "monthly_downloads",
    "latest_version",
    "last_publish_days",
    "dependencies_count",
    "license",
    "requires_python",
];

const CRATES_COLUMNS: &[&str] = &[
    "downloads",
    "recent_downloads",
    "latest_version",
    "last_publish_days",
    "dependencies_count",
    "license",
    "reverse_dependencies",
];

const GO_COLUMNS: &[&str] = &["latest_version", "last_publish_days", "dependencies_count", "license"];

/// Rows of one table, each row being the cells between `target` and `error`.
#[derive(Default)]
struct Table<'a> {
    rows: Vec<(&'a FetchResult, Vec<String>)>,
}

impl<'a> Table<'a> {
    fn push(&mut self, result: &'a FetchResult, cells: Vec<String>) {
        self.rows.push((result, cells));
    }

    fn write<W: Write>(&self, columns: &[&str], writer: &mut W, need_separator: &mut bool) -> Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }

        if *need_separator {
            writeln!(writer)?;
        }
        *need_separator = true;

        write!(writer, "| target |")?;
        for column in columns {
            write!(writer, " {column} |")?;
        }
        writeln!(writer, " error |")?;
        writeln!(writer, "|{}", "---|".repeat(columns.len() + 2))?;

        for (result, cells) in &self.rows {
            write!(writer, "| {} |", escape(result.target()))?;
            for cell in cells {
                write!(writer, " {} |", escape(cell))?;
            }
            writeln!(writer, " {} |", escape(result.error().unwrap_or_default()))?;
        }

        Ok(())
    }
}

/// Write one table per registry in a fixed order, then a table of total failures.
///
/// Empty tables are omitted. Partial failures stay in their registry's table with the
/// error in the last column.
pub fn generate<W: Write>(results: &[FetchResult], writer: &mut W) -> Result<()> {
    let mut github = Table::default();
    let mut npm = Table::default();
    let mut pypi = Table::default();
    let mut crates = Table::default();
    let mut go = Table::default();
    let mut failures = Table::default();

    for result in results {
        match result.metrics() {
            Some(Metrics::GitHub(m)) => github.push(
                result,
                vec![
                    m.stars.to_string(),
                    m.forks.to_string(),
                    m.open_issues.to_string(),
                    m.contributors.to_string(),
                    m.release_count.to_string(),
                    m.last_commit_days.to_string(),
                    m.commits_30d.to_string(),
                    m.issues_closed_30d.to_string(),
                    m.license.clone(),
                ],
            ),
            Some(Metrics::Npm(m)) => npm.push(
                result,
                vec![
                    m.weekly_downloads.to_string(),
                    m.monthly_downloads.to_string(),
                    m.latest_version.clone(),
                    m.last_publish_days.to_string(),
                    m.dependencies_count.to_string(),
                    m.license.clone(),
                ],
            ),
            Some(Metrics::PyPi(m)) => pypi.push(
                result,
                vec![
                    m.weekly_downloads.to_string(),
                    m.monthly_downloads.to_string(),
                    m.latest_version.clone(),
                    m.last_publish_days.to_string(),
                    m.dependencies_count.to_string(),
                    m.license.clone(),
                    m.requires_python.clone(),
                ],
            ),
            Some(Metrics::Crates(m)) => crates.push(
                result,
                vec![
                    m.downloads.to_string(),
                    m.recent_downloads.to_string(),
                    m.latest_version.clone(),
                    m.last_publish_days.to_string(),
                    m.dependencies_count.to_string(),
                    m.license.clone(),
                    m.reverse_dependencies.to_string(),
                ],
            ),
            Some(Metrics::Go(m)) => go.push(
                result,
                vec![
                    m.latest_version.clone(),
                    m.last_publish_days.to_string(),
                    m.dependencies_count.to_string(),
                    m.license.clone(),
                ],
            ),
            None => failures.push(result, Vec::new()),
        }
    }

    let mut need_separator = false;
    github.write(GITHUB_COLUMNS, writer, &mut need_separator)?;
    npm.write(NPM_COLUMNS, writer, &mut need_separator)?;
    pypi.write(PYPI_COLUMNS, writer, &mut need_separator)?;
    crates.write(CRATES_COLUMNS, writer, &mut need_separator)?;
    go.write(GO_COLUMNS, writer, &mut need_separator)?;
    failures.write(&[], writer, &mut need_separator)?;

    Ok(())
}

/// Keep a value inside one table cell: pipes are escaped and line breaks become `<br>`.
fn escape(s: &str) -> String {
    s.replace('|', "\\|").replace("\r\n", "<br>").replace(['\n', '\r'], "<br>")
}
