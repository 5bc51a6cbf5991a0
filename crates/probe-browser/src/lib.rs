//! Headless browser probe for label/input accessibility wiring
//!
//! This crate drives Chrome/Chromium over the Chrome DevTools Protocol (CDP)
//! to check that a login page's first `label` points at its first `input`.
//!
//! # Example
//!
//! ```no_run
//! use probe_browser::{AccessibilityProbe, ProbeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let probe = AccessibilityProbe::new(ProbeConfig::default());
//!     let report = probe.run(&mut std::io::stdout()).await?;
//!
//!     println!("screenshot at {}", report.screenshot_path.display());
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! - Chrome or Chromium browser installed
//! - For connecting to existing browser: `chrome --remote-debugging-port=9222`
//!
//! # Architecture
//!
//! - [`browser`]: Browser lifecycle and session management
//! - [`screenshot`]: Full-page PNG capture to a file
//! - [`verification`]: Attribute reads and the association check
//! - [`probe`]: The end-to-end run
//! - [`error`]: Error types for browser operations

pub mod browser;
pub mod error;
pub mod probe;
pub mod screenshot;
pub mod verification;

// Re-export commonly used types
pub use browser::{devtools_websocket_url, BrowserSession, PageAccess};
pub use error::{ProbeError, Result};
pub use probe::{AccessibilityProbe, BrowserSource};
pub use probe_core::{BrowserConfig, ProbeConfig, ProbeReport, Verdict};
pub use screenshot::capture_full_page;
pub use verification::{
    read_input_attributes, read_label_attributes, verify_association, AssociationCheck,
};
