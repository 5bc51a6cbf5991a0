//! a11y-probe - check that a login page's label is wired to its input
//!
//! Usage:
//!   a11y-probe                        Check http://localhost:3000/login
//!   a11y-probe --url <URL>            Check another page
//!   a11y-probe --init-config <FILE>   Write the default config and exit
//!
//! Stdout carries exactly three lines: the label's `for`, the input's `id`, and
//! the verdict. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use probe_browser::{AccessibilityProbe, BrowserSource};
use probe_core::{ProbeConfig, ProbeReport, Verdict};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "a11y-probe")]
#[command(author, version, about = "Verify label/input accessibility wiring on a login page")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// TOML config file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page to inspect
    #[arg(long)]
    url: Option<String>,

    /// Where to write the full-page PNG
    #[arg(long, value_name = "FILE")]
    screenshot: Option<PathBuf>,

    /// Seconds to wait for the input element
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Attach to a running Chrome on this remote-debugging port
    #[arg(long)]
    port: Option<u16>,

    /// Also write the report as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Exit with status 1 when the verdict is FAILURE
    #[arg(long)]
    strict: bool,

    /// Write the default config to FILE and exit
    #[arg(long, value_name = "FILE")]
    init_config: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective config: file (or defaults), then flags
    fn probe_config(&self) -> Result<ProbeConfig> {
        let mut config = ProbeConfig::load_or_default(self.config.as_deref())
            .context("Failed to load probe config")?;

        if let Some(ref url) = self.url {
            config.url = url.clone();
        }
        if let Some(ref screenshot) = self.screenshot {
            config.screenshot_path = screenshot.clone();
        }
        if let Some(timeout) = self.timeout {
            config.browser.timeout_seconds = timeout;
        }
        if self.headed {
            config.browser.headless = false;
        }

        config.validate().context("Invalid probe config")?;
        Ok(config)
    }

    fn browser_source(&self) -> BrowserSource {
        match self.port {
            Some(port) => BrowserSource::Connect(port),
            None => BrowserSource::Launch,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(ref path) = cli.init_config {
        ProbeConfig::write_default(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        info!("Wrote default config to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let config = cli.probe_config()?;
    info!("Probing {}", config.url);

    let probe = AccessibilityProbe::new(config).with_source(cli.browser_source());
    let report = probe
        .run(&mut std::io::stdout())
        .await
        .context("Accessibility probe failed")?;

    if let Some(ref path) = cli.json {
        write_json_report(&report, path).await?;
        info!("Report written to {}", path.display());
    }

    Ok(ExitCode::from(exit_status(report.verdict, cli.strict)))
}

/// A logical FAILURE only changes the exit status under `--strict`
fn exit_status(verdict: Verdict, strict: bool) -> u8 {
    if strict && !verdict.is_success() {
        1
    } else {
        0
    }
}

async fn write_json_report(report: &ProbeReport, path: &Path) -> Result<()> {
    let json = report.to_json()?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_core::{InputAttributes, LabelAttributes};

    #[test]
    fn test_no_arguments_uses_fixed_defaults() {
        let cli = Cli::try_parse_from(["a11y-probe"]).unwrap();
        let config = cli.probe_config().unwrap();

        assert_eq!(config, ProbeConfig::default());
        assert_eq!(cli.browser_source(), BrowserSource::Launch);
        assert!(!cli.strict);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "a11y-probe",
            "--url",
            "http://localhost:4000/signin",
            "--screenshot",
            "out/shot.png",
            "--timeout",
            "5",
            "--headed",
        ])
        .unwrap();
        let config = cli.probe_config().unwrap();

        assert_eq!(config.url, "http://localhost:4000/signin");
        assert_eq!(config.screenshot_path, PathBuf::from("out/shot.png"));
        assert_eq!(config.browser.timeout_seconds, 5);
        assert!(!config.browser.headless);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::try_parse_from(["a11y-probe", "--timeout", "0"]).unwrap();
        assert!(cli.probe_config().is_err());
    }

    #[test]
    fn test_port_selects_connect() {
        let cli = Cli::try_parse_from(["a11y-probe", "--port", "9222"]).unwrap();
        assert_eq!(cli.browser_source(), BrowserSource::Connect(9222));
    }

    #[test]
    fn test_failure_exits_zero_without_strict() {
        assert_eq!(exit_status(Verdict::Failure, false), 0);
        assert_eq!(exit_status(Verdict::Success, false), 0);
    }

    #[test]
    fn test_strict_maps_failure_to_one() {
        assert_eq!(exit_status(Verdict::Failure, true), 1);
        assert_eq!(exit_status(Verdict::Success, true), 0);
    }

    #[tokio::test]
    async fn test_json_report_written() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("report.json");
        let report = ProbeReport::new(
            "http://localhost:3000/login",
            LabelAttributes { for_value: None },
            InputAttributes {
                id_value: Some("email".to_string()),
            },
            "verification/login_page_inputs.png",
        );

        write_json_report(&report, &path).await.unwrap();

        let written: ProbeReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.verdict, Verdict::Failure);
        assert_eq!(written.label.for_value, None);
        assert_eq!(written.input.id_value.as_deref(), Some("email"));
        assert_eq!(written.url, "http://localhost:3000/login");
    }

    #[tokio::test]
    async fn test_json_report_unwritable_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing-dir/report.json");
        let report = ProbeReport::new(
            "about:blank",
            LabelAttributes::default(),
            InputAttributes::default(),
            "x.png",
        );

        assert!(write_json_report(&report, &path).await.is_err());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli =
            Cli::try_parse_from(["a11y-probe", "--config", "/nonexistent/probe.toml"]).unwrap();
        assert!(cli.probe_config().is_err());
    }
}
