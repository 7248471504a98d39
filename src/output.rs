//! Result types returned by the `convert*` functions.

use crate::config::ConversionMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A finished conversion: the downloadable blob plus what it contains.
#[derive(Clone)]
pub struct ConversionResult {
    /// PNG bytes (combined mode) or ZIP bytes (individual mode).
    pub bytes: Vec<u8>,
    /// `{base}_combined.png` or `{base}_images.zip`.
    pub filename: String,
    /// `image/png` or `application/zip`.
    pub mime_type: &'static str,
    pub summary: ConversionSummary,
}

impl fmt::Debug for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionResult")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("summary", &self.summary)
            .finish()
    }
}

/// What the user is told about a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub mode: ConversionMode,
    pub page_count: usize,
    /// Combined image width in pixels; `None` in individual mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Combined image height in pixels; `None` in individual mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub output_bytes: usize,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl ConversionSummary {
    /// One-line human description, e.g. `Combined image (3 pages, 150×590px)`.
    pub fn describe(&self) -> String {
        match (self.mode, self.width, self.height) {
            (ConversionMode::Combined, Some(w), Some(h)) => format!(
                "Combined image ({} {}, {}×{}px)",
                self.page_count,
                pages_word(self.page_count),
                w,
                h
            ),
            _ => format!(
                "All {} {} as ZIP",
                self.page_count,
                pages_word(self.page_count)
            ),
        }
    }
}

fn pages_word(n: usize) -> &'static str {
    if n == 1 {
        "page"
    } else {
        "pages"
    }
}
