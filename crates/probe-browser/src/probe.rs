//! The accessibility probe: one linear pass over the login page

use crate::browser::{BrowserSession, PageAccess};
use crate::error::Result;
use crate::verification::verify_association;
use probe_core::{ProbeConfig, ProbeReport};
use std::io::Write;
use tracing::info;

/// Where the browser comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserSource {
    /// Launch a fresh browser process owned by the probe
    #[default]
    Launch,
    /// Attach to a browser already listening for CDP on this port
    Connect(u16),
}

/// Checks that the first label on a page is wired to the first input
#[derive(Debug, Clone, Default)]
pub struct AccessibilityProbe {
    config: ProbeConfig,
    source: BrowserSource,
}

impl AccessibilityProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            source: BrowserSource::Launch,
        }
    }

    pub fn with_source(mut self, source: BrowserSource) -> Self {
        self.source = source;
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run the probe, writing the three console lines to `out`
    ///
    /// Any failure while launching, navigating or waiting propagates before
    /// anything is printed. The browser session is dropped on every return
    /// path.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<ProbeReport> {
        self.config.validate()?;

        let session = match self.source {
            BrowserSource::Launch => {
                BrowserSession::launch_with_config(self.config.browser.clone()).await?
            }
            BrowserSource::Connect(port) => {
                BrowserSession::connect(port, self.config.browser.clone()).await?
            }
        };

        session.navigate(&self.config.url).await?;
        session
            .wait_for_element(&self.config.input_selector, None)
            .await?;

        let report = self.inspect(&session, out).await?;

        info!("Probe finished with verdict: {}", report.verdict);
        session.close().await?;

        Ok(report)
    }

    /// Read the pair, print the verdict, then capture the page
    ///
    /// The screenshot is taken for either verdict, but only after all three
    /// lines are written. A read error returns before anything is printed or
    /// captured.
    pub async fn inspect<P, W>(&self, page: &P, out: &mut W) -> Result<ProbeReport>
    where
        P: PageAccess + ?Sized,
        W: Write,
    {
        let check = verify_association(
            page,
            &self.config.label_selector,
            &self.config.input_selector,
        )
        .await?;

        let report = ProbeReport::new(
            self.config.url.clone(),
            check.label,
            check.input,
            self.config.screenshot_path.clone(),
        );
        report.write_console(out)?;

        page.capture_full_page(&self.config.screenshot_path).await?;

        Ok(report)
    }
}
