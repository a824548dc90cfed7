//! GitHub token discovery.

use std::process::Command;

const LOG_TARGET: &str = "     token";

/// Runs external commands, abstracted so discovery can be tested without a `gh` install.
pub trait CommandRunner {
    /// Run `program` and return its standard output, or `None` if it couldn't be run or failed.
    fn run(&self, program: &str, args: &[&str]) -> Option<String>;
}

/// Runs real OS commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        match Command::new(program).args(args).output() {
            Ok(output) if output.status.success() => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            Ok(output) => {
                log::debug!(target: LOG_TARGET, "'{program}' exited with {}", output.status);
                None
            }
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Could not run '{program}': {e}");
                None
            }
        }
    }
}

/// Pick a GitHub token.
///
/// In order of preference: the explicit token, the output of `gh auth token`, then the
/// `GITHUB_TOKEN` environment variable. Blank values are skipped.
pub fn resolve_github_token(
    explicit: Option<&str>,
    runner: &impl CommandRunner,
    getenv: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    if let Some(token) = non_blank(explicit) {
        log::debug!(target: LOG_TARGET, "Using GitHub token from the command line");
        return Some(token);
    }

    if let Some(token) = non_blank(runner.run("gh", &["auth", "token"]).as_deref()) {
        log::debug!(target: LOG_TARGET, "Using GitHub token from 'gh auth token'");
        return Some(token);
    }

    if let Some(token) = non_blank(getenv("GITHUB_TOKEN").as_deref()) {
        log::debug!(target: LOG_TARGET, "Using GitHub token from GITHUB_TOKEN");
        return Some(token);
    }

    log::debug!(target: LOG_TARGET, "No GitHub token found, using anonymous requests");
    None
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
