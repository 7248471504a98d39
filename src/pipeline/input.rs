//! Input resolution: load a user-supplied path or URL into memory.
//!
//! The pipeline works on PDF bytes, so both local files and downloads end up
//! as a [`PdfInput`] carrying the bytes and the document's base name (used
//! for the output filenames). Validation of the bytes themselves is left to
//! the renderer.

use crate::error::Pdf2PngError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Base name used when none can be derived from the input.
pub const DEFAULT_BASE_NAME: &str = "document";

/// A PDF loaded into memory.
#[derive(Debug, Clone)]
pub struct PdfInput {
    pub bytes: Vec<u8>,
    /// File stem of the source, e.g. `report` for `/tmp/report.pdf`.
    pub base_name: String,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Derive the output base name from a file name or path: its stem, or
/// [`DEFAULT_BASE_NAME`] if it has none.
pub fn base_name_of(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BASE_NAME)
        .to_string()
}

/// Resolve the input string to PDF bytes.
///
/// If the input is a URL, download it; otherwise read the local file.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<PdfInput, Pdf2PngError> {
    if input.trim().is_empty() {
        return Err(Pdf2PngError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(input).await
    }
}

async fn read_local(path_str: &str) -> Result<PdfInput, Pdf2PngError> {
    let path = PathBuf::from(path_str);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2PngError::PermissionDenied { path });
        }
        Err(_) => return Err(Pdf2PngError::FileNotFound { path }),
    };

    debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(PdfInput {
        bytes,
        base_name: base_name_of(&path),
    })
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<PdfInput, Pdf2PngError> {
    info!("Downloading PDF from: {}", url);

    let parsed = reqwest::Url::parse(url).map_err(|_| Pdf2PngError::InvalidInput {
        input: url.to_string(),
    })?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Pdf2PngError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(parsed.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            Pdf2PngError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Pdf2PngError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Pdf2PngError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Pdf2PngError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());

    Ok(PdfInput {
        bytes: bytes.to_vec(),
        base_name: base_name_from_url(&parsed),
    })
}

/// Base name from the last URL path segment, e.g. `1706.03762` for
/// `https://arxiv.org/pdf/1706.03762`.
fn base_name_from_url(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|last| !last.is_empty())
        .map(base_name_of)
        .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string())
}
