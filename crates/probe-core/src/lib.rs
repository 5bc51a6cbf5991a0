//! # probe-core
//!
//! Core types for the login-page accessibility probe.
//!
//! The probe reads the `for` attribute of the first `label` and the `id` of the
//! first `input` on a page and decides whether the two are wired together.
//!
//! ## Contents
//!
//! - [`ProbeError`]: fatal conditions (navigation, selector timeout, missing element)
//! - [`Verdict`]: the logical outcome, never an error
//! - [`ProbeConfig`]: defaults plus optional TOML overrides

pub mod config;
mod error;
mod types;

pub use config::{BrowserConfig, ProbeConfig};
pub use error::{ProbeError, Result};
pub use types::*;
