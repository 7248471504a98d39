//! Archive packaging: one PNG per page inside an in-memory ZIP.
//!
//! Entries are written in page order as `page_1.png`, `page_2.png`, … and
//! the central directory keeps that order. Every entry carries the same fixed
//! timestamp so packaging the same pages twice gives byte-identical archives.
//!
//! The archive buffer is only handed out after `finish()` succeeds; on any
//! failure the half-written buffer is dropped with the writer.

use crate::config::ArchiveCompression;
use crate::error::PackagingError;
use crate::page::PageSequence;
use crate::pipeline::encode::encode_png;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// MIME type of the archives produced here.
pub const ZIP_MIME: &str = "application/zip";

/// Archive entry name for a 1-based page number.
pub fn entry_name(page_num: usize) -> String {
    format!("page_{page_num}.png")
}

/// Package every page of `pages` into a ZIP archive.
pub fn pack(pages: &PageSequence, compression: ArchiveCompression) -> Result<Vec<u8>, PackagingError> {
    pack_with(pages, compression, |_| {})
}

/// Like [`pack`], calling `on_page` with the 1-based page number after each
/// entry is written.
pub fn pack_with(
    pages: &PageSequence,
    compression: ArchiveCompression,
    mut on_page: impl FnMut(usize),
) -> Result<Vec<u8>, PackagingError> {
    if pages.is_empty() {
        return Err(PackagingError::EmptySequence);
    }

    let options = SimpleFileOptions::default()
        .compression_method(compression.into())
        .last_modified_time(zip::DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for page in pages {
        let page_num = page.page_num();
        let name = entry_name(page_num);

        let png = encode_png(page.image()).map_err(|source| PackagingError::Encode {
            page: page_num,
            source,
        })?;

        writer
            .start_file(name.as_str(), options)
            .map_err(|source| PackagingError::Archive {
                entry: name.clone(),
                source,
            })?;
        writer
            .write_all(&png)
            .map_err(|source| PackagingError::Write {
                entry: name.clone(),
                source,
            })?;

        debug!("Packed {} ({} bytes)", name, png.len());
        on_page(page_num);
    }

    let bytes = writer
        .finish()
        .map_err(|source| PackagingError::Archive {
            entry: "central directory".to_string(),
            source,
        })?
        .into_inner();

    debug!("Archive finalised: {} entries, {} bytes", pages.len(), bytes.len());
    Ok(bytes)
}
