//! Error types for the edgequake-pdf2png library.
//!
//! Each pipeline stage owns one error type, so a failure always says which
//! stage produced it:
//!
//! * [`RenderError`] — the PDF could not be turned into page images
//!   (not a PDF, corrupt, wrong password, pdfium missing).
//! * [`CompositionError`] — the page images could not be stacked into one
//!   canvas (malformed page dimensions, empty sequence, canvas overflow).
//! * [`PackagingError`] — a page could not be PNG-encoded or written into the
//!   ZIP archive.
//!
//! [`Pdf2PngError`] is what the top-level `convert*` functions return. It
//! wraps the stage errors unchanged (see [`Pdf2PngError::kind`]) and adds the
//! input/output failures of the surrounding shell. There is no partial
//! success: a request either yields a full result or one of these errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of the page renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The bytes do not start with the `%PDF` magic.
    #[error("Input is not a PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF")]
    WrongPassword,

    /// pdfium returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install pdfium and either:\n\
  • place libpdfium next to the executable or on the system library path, or\n\
  • set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib).\n"
    )]
    BackendUnavailable(String),

    /// The PDF could not be staged on disk for the renderer.
    #[error("Failed to stage PDF for rendering: {0}")]
    Staging(#[source] std::io::Error),
}

/// Failure of the vertical compositor.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// The document has no pages to stack.
    #[error("Cannot compose an empty page sequence")]
    EmptySequence,

    /// The renderer produced a page with a zero dimension.
    #[error("Page {page} has invalid dimensions {width}x{height}")]
    InvalidPageDimensions { page: usize, width: u32, height: u32 },

    /// The stacked pages do not fit in a single image buffer.
    #[error("Combined image would be too large: {width}x{height} px")]
    CanvasTooLarge { width: u64, height: u64 },

    /// PNG encoding of the finished canvas failed.
    #[error("Failed to encode combined image as PNG: {0}")]
    Encode(#[source] image::ImageError),
}

/// Failure of the archive packager.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// The document has no pages to package.
    #[error("Cannot package an empty page sequence")]
    EmptySequence,

    /// A page could not be PNG-encoded.
    #[error("Failed to encode page {page} as PNG: {source}")]
    Encode {
        page: usize,
        #[source]
        source: image::ImageError,
    },

    /// The ZIP writer rejected an entry or could not be finalised.
    #[error("Failed to write '{entry}' into the archive: {source}")]
    Archive {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// Writing encoded bytes into the archive stream failed.
    #[error("Failed to write '{entry}' into the archive: {source}")]
    Write {
        entry: String,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of a [`Pdf2PngError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Render,
    EmptyDocument,
    Composition,
    Packaging,
    Output,
    Config,
    Internal,
}

/// All errors returned by the edgequake-pdf2png library.
#[derive(Debug, Error)]
pub enum Pdf2PngError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Pipeline errors ───────────────────────────────────────────────────
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The renderer succeeded but reported zero pages.
    #[error("PDF has no pages; nothing to convert")]
    EmptyDocument,

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Packaging(#[from] PackagingError),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2PngError {
    /// Which stage of the request failed.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::InvalidInput { .. }
            | Self::DownloadFailed { .. }
            | Self::DownloadTimeout { .. } => ErrorKind::Input,
            Self::Render(_) => ErrorKind::Render,
            Self::EmptyDocument => ErrorKind::EmptyDocument,
            Self::Composition(_) => ErrorKind::Composition,
            Self::Packaging(_) => ErrorKind::Packaging,
            Self::OutputWriteFailed { .. } => ErrorKind::Output,
            Self::InvalidConfig(_) => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
