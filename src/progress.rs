//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline renders and assembles each page.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2png::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     assembled: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_assembled(&self, page_num: usize, total_pages: usize) {
//!         let done = self.assembled.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("Page {page_num}/{total_pages} done ({done} so far)");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { assembled: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in page order from the thread running
/// the pipeline.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the renderer has produced every page.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages that will be assembled
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page has been blitted onto the canvas (combined mode)
    /// or written into the archive (individual mode).
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_assembled(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once after the output blob has been produced.
    ///
    /// # Arguments
    /// * `total_pages` — total pages in the document
    /// * `output_len`  — byte length of the PNG or ZIP produced
    fn on_conversion_complete(&self, total_pages: usize, output_len: usize) {
        let _ = (total_pages, output_len);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        assembled: AtomicUsize,
        output_len: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_assembled(&self, _page_num: usize, _total_pages: usize) {
            self.assembled.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _total_pages: usize, output_len: usize) {
            self.output_len.store(output_len, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_assembled(1, 5);
        cb.on_conversion_complete(5, 1024);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(3);
        for page in 1..=3 {
            tracker.on_page_assembled(page, 3);
        }
        tracker.on_conversion_complete(3, 4096);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.assembled.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.output_len.load(Ordering::SeqCst), 4096);
    }
}
