//! PDF rasterisation: turn PDF bytes into a [`PageSequence`].
//!
//! The rest of the pipeline only sees the [`PageRenderer`] trait, so the
//! compositor and packager can be driven by any backend (or by a stub in
//! tests). [`PdfiumRenderer`] is the production backend.
//!
//! ## Why stage to a temp file?
//!
//! The uploaded PDF is held in a scoped temporary file for the duration of
//! one render call. The bytes are written into a [`TempDir`] owned by that
//! call and pdfium loads them from its path; the directory is removed when
//! it is dropped, on success and on every error path alike.
//!
//! ## Binding
//!
//! The pdfium library location comes from [`RenderConfig::pdfium_lib_path`].
//! A directory is searched for the platform library name; a file is bound
//! directly; `None` tries the working directory, then the system library
//! path. Calls are blocking and CPU-bound; async callers should run them
//! inside `spawn_blocking`.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::page::PageSequence;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Capability that rasterises a PDF into page images.
pub trait PageRenderer: Send + Sync {
    /// Render every page of `pdf`, in document order.
    fn render(&self, pdf: &[u8]) -> Result<PageSequence, RenderError>;
}

/// Reject input that does not start with the `%PDF` magic.
pub fn check_pdf_magic(bytes: &[u8]) -> Result<(), RenderError> {
    if bytes.starts_with(b"%PDF") {
        Ok(())
    } else {
        Err(RenderError::NotAPdf {
            magic: bytes.iter().take(4).copied().collect(),
        })
    }
}

/// [`PageRenderer`] backed by pdfium.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRenderer {
    config: RenderConfig,
}

impl PdfiumRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn bind(&self) -> Result<Pdfium, RenderError> {
        let bindings = match self.config.pdfium_lib_path.as_deref() {
            Some(path) => Pdfium::bind_to_library(library_path(path)),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| RenderError::BackendUnavailable(format!("{e:?}")))?;

        Ok(Pdfium::new(bindings))
    }

    fn pdf_render_config(&self) -> PdfRenderConfig {
        let scale = self.config.dpi as f32 / 72.0;
        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        match self.config.max_rendered_pixels {
            Some(max) => render_config
                .set_maximum_width(max as i32)
                .set_maximum_height(max as i32),
            None => render_config,
        }
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render(&self, pdf: &[u8]) -> Result<PageSequence, RenderError> {
        check_pdf_magic(pdf)?;

        let staged = StagedPdf::write(pdf)?;
        let pdfium = self.bind()?;
        let password = self.config.password.as_deref();

        let document = pdfium
            .load_pdf_from_file(staged.path(), password)
            .map_err(|e| classify_load_error(&e, password.is_some()))?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let render_config = self.pdf_render_config();
        let mut sequence = PageSequence::with_capacity(total_pages);

        for (idx, page) in pages.iter().enumerate() {
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                RenderError::RasterisationFailed {
                    page: idx + 1,
                    detail: format!("{e:?}"),
                }
            })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );
            sequence.push(image);
        }

        Ok(sequence)
    }
}

fn library_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

fn classify_load_error(e: &PdfiumError, had_password: bool) -> RenderError {
    let detail = format!("{e:?}");
    if detail.contains("Password") || detail.contains("password") {
        if had_password {
            RenderError::WrongPassword
        } else {
            RenderError::PasswordRequired
        }
    } else {
        RenderError::CorruptPdf { detail }
    }
}

/// PDF bytes written into a private temp directory for the duration of one
/// render call.
struct StagedPdf {
    path: PathBuf,
    _dir: TempDir,
}

impl StagedPdf {
    fn write(bytes: &[u8]) -> Result<Self, RenderError> {
        let dir = tempfile::Builder::new()
            .prefix("pdf2png-")
            .tempdir()
            .map_err(RenderError::Staging)?;
        let path = dir.path().join("input.pdf");
        std::fs::write(&path, bytes).map_err(RenderError::Staging)?;
        debug!("Staged {} bytes at {}", bytes.len(), path.display());
        Ok(Self { path, _dir: dir })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
