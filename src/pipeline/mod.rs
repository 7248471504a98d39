//! Pipeline stages for PDF-to-PNG conversion.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable and the rendering backend can be swapped without
//! touching the assembly stages.
//!
//! ## Data Flow
//!
//! ```text
//!                        ┌──▶ compose ──▶ one tall PNG
//! input ──▶ render ──────┤
//! (path/URL) (pdfium)    └──▶ package ──▶ ZIP of page PNGs
//! ```
//!
//! 1. [`input`]   — read the user-supplied path or download the URL
//! 2. [`render`]  — rasterise every page into a [`crate::PageSequence`]
//! 3. [`compose`] — stack pages onto one width-normalised canvas
//! 4. [`package`] — PNG-encode each page into a ZIP archive
//! 5. [`encode`]  — shared PNG encoder

pub mod compose;
pub mod encode;
pub mod input;
pub mod package;
pub mod render;
