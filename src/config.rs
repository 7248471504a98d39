//! Configuration types for PDF-to-PNG conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The renderer only sees the subset it
//! needs, [`RenderConfig`], which is handed to it at construction so that the
//! pdfium library location is never ambient process state.

use crate::error::Pdf2PngError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Lowest accepted rendering DPI.
pub const MIN_DPI: u32 = 72;
/// Highest accepted rendering DPI.
pub const MAX_DPI: u32 = 600;

/// Configuration for a PDF-to-PNG conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2png::{ConversionConfig, ConversionMode};
///
/// let config = ConversionConfig::builder()
///     .mode(ConversionMode::Individual)
///     .dpi(150)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Output shape: one stacked PNG or a ZIP of page PNGs. Default: Combined.
    pub mode: ConversionMode,

    /// Rendering DPI used when rasterising each PDF page. Range: 72–600. Default: 200.
    pub dpi: u32,

    /// Optional cap on the longest rendered page edge, in pixels.
    ///
    /// An A0 poster at 200 DPI is roughly 6 600 × 9 400 px; stacking a few of
    /// those can exhaust memory. When set, pdfium scales each page down so
    /// neither edge exceeds this value.
    pub max_rendered_pixels: Option<u32>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Path to the pdfium shared library, or the directory containing it.
    /// If None, the system library search path is used.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Canvas fill colour behind narrower pages in combined mode. Default: white.
    pub background: [u8; 3],

    /// ZIP entry compression in individual mode. Default: Deflated.
    pub compression: ArchiveCompression,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional progress callback. Events fire after rendering: once at the
    /// start of assembly, once per stacked or packed page, and on completion.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            mode: ConversionMode::default(),
            dpi: 200,
            max_rendered_pixels: None,
            password: None,
            pdfium_lib_path: None,
            background: [255, 255, 255],
            compression: ArchiveCompression::default(),
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("mode", &self.mode)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("background", &self.background)
            .field("compression", &self.compression)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The renderer-facing part of this configuration.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            dpi: self.dpi,
            max_rendered_pixels: self.max_rendered_pixels,
            password: self.password.clone(),
            pdfium_lib_path: self.pdfium_lib_path.clone(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn mode(mut self, mode: ConversionMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = Some(px.max(100));
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn background(mut self, rgb: [u8; 3]) -> Self {
        self.config.background = rgb;
        self
    }

    pub fn compression(mut self, compression: ArchiveCompression) -> Self {
        self.config.compression = compression;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PngError> {
        let c = &self.config;
        if !(MIN_DPI..=MAX_DPI).contains(&c.dpi) {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.download_timeout_secs == 0 {
            return Err(Pdf2PngError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Settings consumed by the page renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub dpi: u32,
    pub max_rendered_pixels: Option<u32>,
    pub password: Option<String>,
    pub pdfium_lib_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        ConversionConfig::default().render_config()
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// What the conversion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// One tall PNG with every page stacked top to bottom. (default)
    #[default]
    Combined,
    /// A ZIP archive with `page_1.png`, `page_2.png`, …
    Individual,
}

/// Compression applied to ZIP entries.
///
/// PNG data is already deflate-compressed, so `Stored` produces archives only
/// marginally larger while skipping a second compression pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArchiveCompression {
    #[default]
    Deflated,
    Stored,
}

impl From<ArchiveCompression> for zip::CompressionMethod {
    fn from(c: ArchiveCompression) -> Self {
        match c {
            ArchiveCompression::Deflated => zip::CompressionMethod::Deflated,
            ArchiveCompression::Stored => zip::CompressionMethod::Stored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.mode, ConversionMode::Combined);
        assert_eq!(c.dpi, 200);
        assert_eq!(c.background, [255, 255, 255]);
        assert_eq!(c.compression, ArchiveCompression::Deflated);
    }

    #[test]
    fn build_rejects_out_of_range_dpi() {
        assert!(ConversionConfig::builder().dpi(30).build().is_err());
        assert!(ConversionConfig::builder().dpi(1200).build().is_err());
        assert!(ConversionConfig::builder().dpi(300).build().is_ok());
    }

    #[test]
    fn max_pixels_has_floor() {
        let c = ConversionConfig::builder()
            .max_rendered_pixels(10)
            .build()
            .unwrap();
        assert_eq!(c.max_rendered_pixels, Some(100));
    }

    #[test]
    fn render_config_carries_backend_path() {
        let c = ConversionConfig::builder()
            .dpi(150)
            .password("secret")
            .pdfium_lib_path("/opt/pdfium/lib")
            .build()
            .unwrap();
        let rc = c.render_config();
        assert_eq!(rc.dpi, 150);
        assert_eq!(rc.password.as_deref(), Some("secret"));
        assert_eq!(rc.pdfium_lib_path, Some(PathBuf::from("/opt/pdfium/lib")));
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn mode_serialises_lowercase() {
        let json = serde_json::to_string(&ConversionMode::Individual).unwrap();
        assert_eq!(json, "\"individual\"");
    }
}
