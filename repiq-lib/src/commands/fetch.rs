use super::Host;
use super::common::{LogLevel, build_registry, init_logging, open_store};
use super::config::Config;
use super::token::{SystemCommandRunner, resolve_github_token};
use crate::Result;
use crate::facts::{Deadline, Target, any_failed, run_all};
use crate::reports::{OutputFormat, generate};
use camino::Utf8PathBuf;
use clap::Args;
use ohno::{IntoAppError, app_err};
use std::io::Write;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Targets to fetch, as `scheme:identifier` (e.g. `github:rust-lang/rust`, `npm:react`, `crates:serde`)
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<Target>,

    /// Write results as a JSON array
    #[arg(long, overrides_with_all = ["ndjson", "markdown"], help_heading = "Output")]
    pub json: bool,

    /// Write results as newline-delimited JSON
    #[arg(long, overrides_with_all = ["json", "markdown"], help_heading = "Output")]
    pub ndjson: bool,

    /// Write results as Markdown tables (the default)
    #[arg(long, overrides_with_all = ["json", "ndjson"], help_heading = "Output")]
    pub markdown: bool,

    /// Ignore cached results and fetch everything fresh
    #[arg(long)]
    pub no_cache: bool,

    /// Directory where results are cached
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// GitHub personal access token (otherwise `gh auth token`, then `GITHUB_TOKEN`)
    #[arg(long, value_name = "TOKEN")]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `repiq.toml` in the user configuration directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

impl FetchArgs {
    /// The format selected by whichever output flag came last.
    const fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.ndjson {
            OutputFormat::Ndjson
        } else {
            OutputFormat::Markdown
        }
    }
}

/// Fetch metrics for every target and write the report to the host's output
///
/// # Errors
///
/// Returns an error if setup fails, a target names an unknown scheme, or any target
/// ends up with an error. In the last case the full report is written first.
pub async fn process_targets<H: Host>(host: &mut H, args: &FetchArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = Config::load(args.config.as_deref())?;
    let deadline = Deadline::after(config.timeout);

    let store = open_store(args.cache_dir.as_deref(), config.cache_ttl)?;

    let github_token = if args.targets.iter().any(|t| t.scheme() == "github") {
        resolve_github_token(args.github_token.as_deref(), &SystemCommandRunner, |name| std::env::var(name).ok())
    } else {
        None
    };

    let registry = build_registry(&config, github_token.as_deref(), store.as_ref(), args.no_cache)?;

    let results = run_all(&args.targets, &registry, deadline).await?;

    let mut report = String::new();
    generate(args.output_format(), &results, &mut report)?;
    host.output().write_all(report.as_bytes()).into_app_err("writing report")?;

    if any_failed(&results) {
        return Err(app_err!("one or more targets failed"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: FetchArgs,
    }

    fn parse(args: &[&str]) -> FetchArgs {
        TestCli::try_parse_from(std::iter::once("repiq").chain(args.iter().copied())).unwrap().args
    }

    #[test]
    fn markdown_by_default() {
        assert_eq!(parse(&["npm:react"]).output_format(), OutputFormat::Markdown);
    }

    #[test]
    fn last_format_flag_wins() {
        assert_eq!(parse(&["--json", "--ndjson", "npm:react"]).output_format(), OutputFormat::Ndjson);
        assert_eq!(parse(&["--ndjson", "--json", "npm:react"]).output_format(), OutputFormat::Json);
        assert_eq!(parse(&["--json", "--markdown", "npm:react"]).output_format(), OutputFormat::Markdown);
    }

    #[test]
    fn targets_are_parsed() {
        let args = parse(&["github:rust-lang/rust", "npm:@types/node"]);
        assert_eq!(args.targets.len(), 2);
        assert_eq!(args.targets[1].scheme(), "npm");
        assert_eq!(args.targets[1].identifier(), "@types/node");
    }

    #[test]
    fn targets_are_required() {
        assert!(TestCli::try_parse_from(["repiq"]).is_err());
    }

    #[test]
    fn malformed_target_is_rejected() {
        assert!(TestCli::try_parse_from(["repiq", "react"]).is_err());
        assert!(TestCli::try_parse_from(["repiq", "npm:"]).is_err());
    }
}
