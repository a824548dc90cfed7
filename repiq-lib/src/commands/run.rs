//! Command-line entry point for repiq

use super::{FetchArgs, process_targets};
use crate::{Host, Result};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::error::ErrorKind;
use ohno::app_err;
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "repiq", version, long_about = None)]
#[command(about = "Fetch popularity and health metrics for open-source packages")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    fetch: FetchArgs,
}

/// Parse command-line arguments and fetch the requested targets
///
/// Help and version requests are written to the host's output. Usage errors are
/// written to the host's error stream, and the host is asked to exit with clap's usage
/// status.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the arguments are invalid or if fetching fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = write!(host.output(), "{e}");
            return Ok(());
        }
        Err(e) => {
            let _ = write!(host.error(), "{e}");
            host.exit(e.exit_code());
            return Err(app_err!("invalid command line"));
        }
    };

    process_targets(host, &cli.fetch).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::TestHost;

    #[tokio::test]
    async fn version_goes_to_output() {
        let mut host = TestHost::new();
        run(&mut host, ["repiq", "--version"]).await.unwrap();

        let output = String::from_utf8(host.output_buf).unwrap();
        assert!(output.contains(env!("CARGO_PKG_VERSION")), "{output}");
    }

    #[tokio::test]
    async fn help_goes_to_output() {
        let mut host = TestHost::new();
        run(&mut host, ["repiq", "--help"]).await.unwrap();

        let output = String::from_utf8(host.output_buf).unwrap();
        assert!(output.contains("--ndjson"), "{output}");
        assert!(host.error_buf.is_empty());
        assert!(host.exit_code.is_none());
    }

    #[tokio::test]
    async fn missing_targets_is_usage_error() {
        let mut host = TestHost::new();
        let err = run(&mut host, ["repiq"]).await.unwrap_err();

        assert!(err.to_string().contains("invalid command line"), "{err}");
        assert_eq!(host.exit_code, Some(2));
        let error = String::from_utf8(host.error_buf).unwrap();
        assert!(error.contains("Usage"), "{error}");
    }

    #[tokio::test]
    async fn malformed_target_is_usage_error() {
        let mut host = TestHost::new();
        assert!(run(&mut host, ["repiq", "not-a-target"]).await.is_err());

        let error = String::from_utf8(host.error_buf).unwrap();
        assert!(error.contains("scheme:identifier"), "{error}");
    }
}
