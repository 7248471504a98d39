//! Conversion entry points.
//!
//! [`Converter`] is the orchestrator: it renders the PDF once, then hands the
//! page sequence to the compositor or the packager depending on the mode and
//! wraps the bytes in a [`ConversionResult`]. A request either completes or
//! fails as a whole; nothing is retried and nothing is kept between calls.
//!
//! The free functions ([`convert`], [`convert_bytes`], [`convert_to_file`],
//! [`convert_sync`]) add input resolution and file output around it and run
//! the blocking pipeline on tokio's blocking pool.

use crate::config::{ConversionConfig, ConversionMode};
use crate::error::Pdf2PngError;
use crate::output::{ConversionResult, ConversionSummary};
use crate::pipeline::encode::PNG_MIME;
use crate::pipeline::package::ZIP_MIME;
use crate::pipeline::render::{PageRenderer, PdfiumRenderer};
use crate::pipeline::{compose, input, package};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Output filename for `base_name` in `mode`.
pub fn output_filename(base_name: &str, mode: ConversionMode) -> String {
    match mode {
        ConversionMode::Combined => format!("{base_name}_combined.png"),
        ConversionMode::Individual => format!("{base_name}_images.zip"),
    }
}

/// Drives one renderer through the render → compose/package pipeline.
#[derive(Clone)]
pub struct Converter {
    renderer: Arc<dyn PageRenderer>,
    config: ConversionConfig,
}

impl Converter {
    /// Use a custom renderer, e.g. a different backend or a test stub.
    pub fn new(renderer: Arc<dyn PageRenderer>, config: ConversionConfig) -> Self {
        Self { renderer, config }
    }

    /// Use the pdfium renderer configured from `config`.
    pub fn from_config(config: ConversionConfig) -> Self {
        let renderer = Arc::new(PdfiumRenderer::new(config.render_config()));
        Self::new(renderer, config)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert `pdf` into a PNG or ZIP named after `base_name`.
    pub fn convert(
        &self,
        pdf: &[u8],
        mode: ConversionMode,
        base_name: &str,
    ) -> Result<ConversionResult, Pdf2PngError> {
        let total_start = Instant::now();
        debug!("Received {} bytes for '{}' ({:?})", pdf.len(), base_name, mode);

        // ── Render ───────────────────────────────────────────────────────
        let render_start = Instant::now();
        let pages = self.renderer.render(pdf)?;
        let render_duration_ms = render_start.elapsed().as_millis() as u64;
        info!(
            "Rendered {} pages in {}ms",
            pages.len(),
            render_duration_ms
        );

        if pages.is_empty() {
            return Err(Pdf2PngError::EmptyDocument);
        }

        let total_pages = pages.len();
        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_conversion_start(total_pages);
        }
        let on_page = |page_num: usize| {
            if let Some(cb) = cb {
                cb.on_page_assembled(page_num, total_pages);
            }
        };

        // ── Assemble ─────────────────────────────────────────────────────
        let (bytes, mime_type, dims) = match mode {
            ConversionMode::Combined => {
                let combined = compose::compose_with(&pages, self.config.background, on_page)?;
                drop(pages);
                let dims = (combined.width(), combined.height());
                (combined.encode_png()?, PNG_MIME, Some(dims))
            }
            ConversionMode::Individual => {
                let archive = package::pack_with(&pages, self.config.compression, on_page)?;
                (archive, ZIP_MIME, None)
            }
        };

        let summary = ConversionSummary {
            mode,
            page_count: total_pages,
            width: dims.map(|d| d.0),
            height: dims.map(|d| d.1),
            output_bytes: bytes.len(),
            render_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        };
        info!("{} in {}ms", summary.describe(), summary.total_duration_ms);

        if let Some(cb) = cb {
            cb.on_conversion_complete(total_pages, bytes.len());
        }

        Ok(ConversionResult {
            bytes,
            filename: output_filename(base_name, mode),
            mime_type,
            summary,
        })
    }
}

/// Convert a PDF file or URL using `config.mode`.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Conversion configuration
pub async fn convert(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionResult, Pdf2PngError> {
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    convert_bytes(resolved.bytes, &resolved.base_name, config).await
}

/// Convert PDF bytes already in memory using `config.mode`.
///
/// pdfium is not async-safe, so the pipeline runs in `spawn_blocking`.
pub async fn convert_bytes(
    bytes: Vec<u8>,
    base_name: &str,
    config: &ConversionConfig,
) -> Result<ConversionResult, Pdf2PngError> {
    let converter = Converter::from_config(config.clone());
    let mode = config.mode;
    let base_name = base_name.to_string();

    tokio::task::spawn_blocking(move || converter.convert(&bytes, mode, &base_name))
        .await
        .map_err(|e| Pdf2PngError::Internal(format!("Conversion task panicked: {e}")))?
}

/// Convert a PDF and write the result to disk.
///
/// If `output` is a directory (existing, or spelled with a trailing
/// separator) the result's own filename is used inside it and the directory
/// is created if needed. Uses atomic write (temp file + rename) to prevent partial
/// files. Returns the written path and the summary.
pub async fn convert_to_file(
    input_str: impl AsRef<str>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<(PathBuf, ConversionSummary), Pdf2PngError> {
    let result = convert(input_str, config).await?;

    let path = output_path(output.as_ref(), &result.filename);
    write_atomic(&path, &result.bytes).await?;
    info!("Wrote {} bytes to {}", result.bytes.len(), path.display());

    Ok((path, result.summary))
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionResult, Pdf2PngError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2PngError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input_str, config))
}

/// Where to write `filename` given the user's `output` argument.
fn output_path(output: &Path, filename: &str) -> PathBuf {
    let names_dir = output
        .to_string_lossy()
        .chars()
        .last()
        .is_some_and(std::path::is_separator);
    if names_dir || output.is_dir() {
        output.join(filename)
    } else {
        output.to_path_buf()
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Pdf2PngError> {
    let write_err = |source| Pdf2PngError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}
