//! # edgequake-pdf2png
//!
//! Turn a PDF into PNG images: either one tall image with every page stacked
//! top to bottom, or a ZIP archive holding one PNG per page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    read local file or download from URL
//!  ├─ 2. Render   rasterise every page via pdfium (spawn_blocking)
//!  └─ 3. Assemble
//!        ├─ combined:   width-normalised vertical stack → PNG
//!        └─ individual: page_1.png … page_N.png → ZIP
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2png::{convert, ConversionConfig, ConversionMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .mode(ConversionMode::Combined)
//!         .build()?;
//!     let result = convert("document.pdf", &config).await?;
//!     std::fs::write(&result.filename, &result.bytes)?;
//!     eprintln!("{}", result.summary.describe());
//!     Ok(())
//! }
//! ```
//!
//! ## Bring your own renderer
//!
//! The compositor and packager only need a [`PageSequence`]. Implement
//! [`PageRenderer`] to plug in another rasteriser and drive it through a
//! [`Converter`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2png` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Limits
//!
//! Everything is built in memory: the page images, the combined canvas and
//! the archive. Very long documents at high DPI can need gigabytes; lower
//! the DPI or set `max_rendered_pixels` for those.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ArchiveCompression, ConversionConfig, ConversionConfigBuilder, ConversionMode, RenderConfig};
pub use convert::{convert, convert_bytes, convert_sync, convert_to_file, output_filename, Converter};
pub use error::{CompositionError, ErrorKind, PackagingError, Pdf2PngError, RenderError};
pub use output::{ConversionResult, ConversionSummary};
pub use page::{PageImage, PageSequence};
pub use pipeline::compose::{compose, CombinedImage, Placement};
pub use pipeline::package::pack;
pub use pipeline::render::{PageRenderer, PdfiumRenderer};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
