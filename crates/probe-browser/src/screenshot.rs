//! Screenshot capture using Chrome DevTools Protocol

use crate::browser::BrowserSession;
use crate::error::{ProbeError, Result};
use base64::Engine;
use headless_chrome::protocol::cdp::Page::{
    CaptureScreenshot, CaptureScreenshotFormatOption, Viewport,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const PAGE_WIDTH_SCRIPT: &str = "Math.max(document.documentElement.scrollWidth, \
     document.body ? document.body.scrollWidth : 0)";
const PAGE_HEIGHT_SCRIPT: &str = "Math.max(document.documentElement.scrollHeight, \
     document.body ? document.body.scrollHeight : 0)";

/// Capture the whole document as PNG and write it to `path`
///
/// Missing parent directories are created and an existing file is overwritten.
///
/// # Returns
/// The path that was written
pub async fn capture_full_page(session: &BrowserSession, path: &Path) -> Result<PathBuf> {
    let clip = document_viewport(session).await?;
    debug!("Capturing full page ({}x{})", clip.width, clip.height);

    // Tab::capture_screenshot leaves captureBeyondViewport unset, which blanks
    // everything below the fold, so the command is issued directly.
    let response = session
        .tab()
        .call_method(CaptureScreenshot {
            format: Some(CaptureScreenshotFormatOption::Png),
            quality: None,
            clip: Some(clip),
            from_surface: Some(true),
            capture_beyond_viewport: Some(true),
            optimize_for_speed: None,
        })
        .map_err(|e| ProbeError::ScreenshotFailed(format!("CDP capture failed: {}", e)))?;

    let png = decode_png(&response.data)?;
    write_png(path, &png).await?;

    info!("Screenshot stored: {} ({} bytes)", path.display(), png.len());

    Ok(path.to_path_buf())
}

fn decode_png(data: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| ProbeError::ScreenshotFailed(format!("Invalid screenshot payload: {}", e)))
}

async fn write_png(path: &Path, png: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, png).await?;
    Ok(())
}

/// Clip covering the whole scrollable document
async fn document_viewport(session: &BrowserSession) -> Result<Viewport> {
    let width = session.evaluate_script(PAGE_WIDTH_SCRIPT).await?.as_f64();
    let height = session.evaluate_script(PAGE_HEIGHT_SCRIPT).await?.as_f64();

    let config = session.config();
    Ok(full_page_clip(
        width,
        height,
        config.window_width,
        config.window_height,
    ))
}

/// Falls back to the window size when the document reports no dimensions
fn full_page_clip(
    width: Option<f64>,
    height: Option<f64>,
    window_width: u32,
    window_height: u32,
) -> Viewport {
    let pick = |measured: Option<f64>, fallback: u32| match measured {
        Some(v) if v >= 1.0 => v,
        _ => f64::from(fallback),
    };

    Viewport {
        x: 0.0,
        y: 0.0,
        width: pick(width, window_width),
        height: pick(height, window_height),
        scale: 1.0,
    }
}
