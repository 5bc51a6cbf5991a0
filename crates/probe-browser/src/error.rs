//! Browser error types - re-exports the unified ProbeError from probe-core
//!
//! Browser-side failures map onto its variants:
//! - BrowserLaunch / Browser - process launch, connection and CDP errors
//! - NavigationFailure, SelectorTimeout, MissingElement, Attribute - page access
//! - ScreenshotFailed, Io - capture and file output

pub use probe_core::{ProbeError, Result};
