//! Configuration for probe runs
//!
//! Every field has a default, so running without a config file reproduces the
//! fixed login-page check. A TOML file may override any subset of fields.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{ProbeError, Result};

/// Top-level probe configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Page to inspect
    #[serde(default = "default_url")]
    pub url: String,

    /// Selector for the label element (first match is used)
    #[serde(default = "default_label_selector")]
    pub label_selector: String,

    /// Selector for the input element (first match is used)
    #[serde(default = "default_input_selector")]
    pub input_selector: String,

    /// Where the full-page PNG is written
    #[serde(default = "default_screenshot_path")]
    pub screenshot_path: PathBuf,

    /// Browser launch settings
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Configuration for browser launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Browser window width
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Browser window height
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// User agent string
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Readiness wait timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_url() -> String {
    "http://localhost:3000/login".to_string()
}

fn default_label_selector() -> String {
    "label".to_string()
}

fn default_input_selector() -> String {
    "input".to_string()
}

fn default_screenshot_path() -> PathBuf {
    PathBuf::from("verification/login_page_inputs.png")
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_timeout_seconds() -> u64 {
    30
}

impl ProbeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ProbeError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if one is given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Write the default configuration as TOML
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| ProbeError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ProbeError::Config("url must not be empty".to_string()));
        }
        if self.label_selector.trim().is_empty() || self.input_selector.trim().is_empty() {
            return Err(ProbeError::Config("selectors must not be empty".to_string()));
        }
        if self.screenshot_path.as_os_str().is_empty() {
            return Err(ProbeError::Config(
                "screenshot_path must not be empty".to_string(),
            ));
        }
        self.browser.validate()
    }
}

impl BrowserConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(ProbeError::Config(
                "browser.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ProbeError::Config(
                "browser window dimensions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            label_selector: default_label_selector(),
            input_selector: default_input_selector(),
            screenshot_path: default_screenshot_path(),
            browser: BrowserConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            user_agent: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
