//! Browser lifecycle management using Chrome DevTools Protocol

use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use probe_core::BrowserConfig;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Scheme Chrome uses for its own network error pages
const CHROME_ERROR_SCHEME: &str = "chrome-error://";

/// Page operations the probe needs once the document is ready
///
/// Implemented by [`BrowserSession`]; tests substitute an in-memory page.
#[async_trait]
pub trait PageAccess: Send + Sync {
    /// Read an attribute of the first element matching `selector`
    ///
    /// Returns `Ok(None)` when the element exists but lacks the attribute, and
    /// [`ProbeError::MissingElement`] when nothing matches.
    async fn first_attribute(&self, selector: &str, attribute: &str) -> Result<Option<String>>;

    /// Write a full-page PNG to `path`
    async fn capture_full_page(&self, path: &Path) -> Result<PathBuf>;
}

/// Subset of the `/json/version` response served on the debugging port
#[derive(Debug, Deserialize)]
struct DevToolsVersion {
    #[serde(rename = "webSocketDebuggerUrl")]
    web_socket_debugger_url: String,
}

/// Active browser session with Chrome DevTools Protocol
///
/// The session owns the browser process. Dropping it, on any path, tears the
/// process down.
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    /// Configuration
    config: BrowserConfig,
}

impl BrowserSession {
    /// Launch a new headless browser instance with default settings
    ///
    /// # Example
    /// ```no_run
    /// use probe_browser::browser::BrowserSession;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let session = BrowserSession::launch().await.unwrap();
    ///     session.navigate("http://localhost:3000/login").await.unwrap();
    /// }
    /// ```
    pub async fn launch() -> Result<Self> {
        Self::launch_with_config(BrowserConfig::default()).await
    }

    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .map_err(|e| ProbeError::BrowserLaunch(e.to_string()))?;

        let user_agent_arg: Option<String> = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));
        if let Some(ref ua_arg) = user_agent_arg {
            launch_options.args.push(OsStr::new(ua_arg));
        }

        let browser =
            Browser::new(launch_options).map_err(|e| ProbeError::BrowserLaunch(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| ProbeError::Browser(format!("Failed to create tab: {}", e)))?;

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Connect to an existing browser instance
    ///
    /// The websocket endpoint is discovered through the port's `/json/version`.
    ///
    /// # Arguments
    /// * `port` - Chrome DevTools Protocol port (typically 9222)
    /// * `config` - Settings used for waits; launch settings are ignored
    pub async fn connect(port: u16, config: BrowserConfig) -> Result<Self> {
        info!("Connecting to existing browser on port {}", port);

        let ws_url = devtools_websocket_url(&format!("http://127.0.0.1:{}", port)).await?;
        debug!("DevTools websocket: {}", ws_url);

        let browser = Browser::connect(ws_url).map_err(|e| {
            ProbeError::BrowserLaunch(format!("Failed to connect on port {}: {}", port, e))
        })?;

        let tab = browser
            .new_tab()
            .map_err(|e| ProbeError::Browser(format!("Failed to create tab: {}", e)))?;

        info!("Connected to browser successfully");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Navigate to a URL and wait for the document to load
    ///
    /// Fails with [`ProbeError::NavigationFailure`] when the target is
    /// unreachable, including when Chrome lands on one of its error pages.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| navigation_failure(url, e))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| navigation_failure(url, e))?;

        let landed = self.tab.get_url();
        if landed.starts_with(CHROME_ERROR_SCHEME) {
            return Err(ProbeError::NavigationFailure {
                url: url.to_string(),
                reason: format!("browser showed an error page ({})", landed),
            });
        }

        info!("Successfully navigated to {}", url);
        Ok(())
    }

    /// Wait for an element to appear
    ///
    /// # Arguments
    /// * `selector` - CSS selector for the element
    /// * `timeout` - Optional timeout duration (uses config default if None)
    pub async fn wait_for_element(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.config.timeout());

        debug!("Waiting for element: {} (timeout: {:?})", selector, timeout);

        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|_e| ProbeError::SelectorTimeout {
                selector: selector.to_string(),
                timeout,
            })?;

        debug!("Element found: {}", selector);
        Ok(())
    }

    /// Execute JavaScript in the page context
    ///
    /// # Returns
    /// JSON result from JavaScript execution
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        debug!("Evaluating JavaScript: {}", script);

        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| ProbeError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Get reference to the active tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Close the tab, then drop the browser (killing a launched process)
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        self.tab
            .close(true)
            .map_err(|e| ProbeError::Browser(format!("Failed to close tab: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl PageAccess for BrowserSession {
    async fn first_attribute(&self, selector: &str, attribute: &str) -> Result<Option<String>> {
        debug!("Reading '{}' of first '{}'", attribute, selector);

        let element = self
            .tab
            .find_element(selector)
            .map_err(|_e| ProbeError::MissingElement {
                selector: selector.to_string(),
            })?;

        element
            .get_attribute_value(attribute)
            .map_err(|e| ProbeError::Attribute {
                selector: selector.to_string(),
                attribute: attribute.to_string(),
                reason: e.to_string(),
            })
    }

    async fn capture_full_page(&self, path: &Path) -> Result<PathBuf> {
        crate::screenshot::capture_full_page(self, path).await
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, browser will be cleaned up");
    }
}

/// Ask a DevTools HTTP endpoint for its browser websocket URL
///
/// # Arguments
/// * `base_url` - e.g. `http://127.0.0.1:9222`
pub async fn devtools_websocket_url(base_url: &str) -> Result<String> {
    let endpoint = format!("{}/json/version", base_url.trim_end_matches('/'));
    debug!("Querying {}", endpoint);

    let response = reqwest::get(&endpoint)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ProbeError::BrowserLaunch(format!("Failed to query {}: {}", endpoint, e)))?;

    let version: DevToolsVersion = response.json().await.map_err(|e| {
        ProbeError::BrowserLaunch(format!("Unexpected response from {}: {}", endpoint, e))
    })?;

    Ok(version.web_socket_debugger_url)
}

fn navigation_failure(url: &str, err: impl std::fmt::Display) -> ProbeError {
    ProbeError::NavigationFailure {
        url: url.to_string(),
        reason: err.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one HTTP response and hand back the request line
    async fn serve_once(body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            request.lines().next().unwrap_or_default().to_string()
        });

        (base, handle)
    }

    #[tokio::test]
    async fn test_devtools_websocket_url_from_json_version() {
        let (base, handle) = serve_once(
            r#"{"Browser":"HeadlessChrome/120.0.0.0","Protocol-Version":"1.3","webSocketDebuggerUrl":"ws://127.0.0.1:9222/devtools/browser/abc-123"}"#,
        )
        .await;

        let ws_url = devtools_websocket_url(&base).await.unwrap();
        assert_eq!(ws_url, "ws://127.0.0.1:9222/devtools/browser/abc-123");

        let request_line = handle.await.unwrap();
        assert!(request_line.starts_with("GET /json/version "));
    }

    #[tokio::test]
    async fn test_devtools_websocket_url_missing_field() {
        let (base, _handle) = serve_once(r#"{"Browser":"HeadlessChrome/120.0.0.0"}"#).await;

        let err = devtools_websocket_url(&base).await.unwrap_err();
        assert!(matches!(err, ProbeError::BrowserLaunch(_)));
    }

    #[tokio::test]
    async fn test_devtools_websocket_url_nothing_listening() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = devtools_websocket_url(&base).await.unwrap_err();
        assert!(matches!(err, ProbeError::BrowserLaunch(_)));
    }

    #[test]
    fn test_navigation_failure_carries_url() {
        let err = navigation_failure("http://localhost:3000/login", "net::ERR_CONNECTION_REFUSED");
        match err {
            ProbeError::NavigationFailure { url, reason } => {
                assert_eq!(url, "http://localhost:3000/login");
                assert_eq!(reason, "net::ERR_CONNECTION_REFUSED");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_chrome_error_scheme() {
        assert!("chrome-error://chromewebdata/".starts_with(CHROME_ERROR_SCHEME));
        assert!(!"http://localhost:3000/login".starts_with(CHROME_ERROR_SCHEME));
    }
}
