//! End-to-end tests for edgequake-pdf2png.
//!
//! The first group drives the public API with a stub renderer, so it runs
//! everywhere. The second group renders real PDFs in `./test_cases/` through
//! pdfium and is gated behind the `E2E_ENABLED` environment variable.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=. cargo test --test e2e -- --nocapture

use edgequake_pdf2png::{
    compose, convert_to_file, pack, ArchiveCompression, CompositionError, ConversionConfig,
    ConversionMode, ConversionProgressCallback, Converter, ErrorKind, PageRenderer, PageSequence,
    Pdf2PngError, RenderError,
};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

/// Renderer returning solid-colour pages of fixed sizes.
struct StubRenderer {
    pages: Vec<(u32, u32, [u8; 3])>,
    calls: AtomicUsize,
}

impl StubRenderer {
    fn new(pages: &[(u32, u32, [u8; 3])]) -> Arc<Self> {
        Arc::new(Self {
            pages: pages.to_vec(),
            calls: AtomicUsize::new(0),
        })
    }
}

impl PageRenderer for StubRenderer {
    fn render(&self, pdf: &[u8]) -> Result<PageSequence, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !pdf.starts_with(b"%PDF") {
            return Err(RenderError::CorruptPdf {
                detail: "stub: missing header".into(),
            });
        }
        Ok(self
            .pages
            .iter()
            .map(|&(w, h, rgb)| DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(rgb))))
            .collect())
    }
}

const PDF: &[u8] = b"%PDF-1.7\n%stub\n";
const RED: [u8; 3] = [200, 0, 0];
const GREEN: [u8; 3] = [0, 200, 0];
const BLUE: [u8; 3] = [0, 0, 200];

fn three_page_stub() -> Arc<StubRenderer> {
    StubRenderer::new(&[(100, 200, RED), (150, 180, GREEN), (120, 210, BLUE)])
}

fn zip_entries(bytes: &[u8]) -> Vec<(String, DynamicImage)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let name = entry.name().to_string();
            let mut png = Vec::new();
            entry.read_to_end(&mut png).unwrap();
            (name, image::load_from_memory(&png).expect("entry is a PNG"))
        })
        .collect()
}

// ── Stub-backed pipeline tests ───────────────────────────────────────────────

#[test]
fn test_combined_three_pages_layout() {
    let converter = Converter::new(three_page_stub(), ConversionConfig::default());
    let result = converter
        .convert(PDF, ConversionMode::Combined, "scenario")
        .expect("conversion should succeed");

    assert_eq!(result.filename, "scenario_combined.png");
    assert_eq!(result.summary.describe(), "Combined image (3 pages, 150×590px)");

    let img = image::load_from_memory(&result.bytes).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (150, 590));
    // Page 1 at x=25, page 2 at x=0/y=200, page 3 at x=15/y=380.
    assert_eq!(img.get_pixel(25, 0).0, RED);
    assert_eq!(img.get_pixel(24, 0).0, [255, 255, 255]);
    assert_eq!(img.get_pixel(0, 200).0, GREEN);
    assert_eq!(img.get_pixel(15, 380).0, BLUE);
    assert_eq!(img.get_pixel(14, 380).0, [255, 255, 255]);
}

#[test]
fn test_individual_two_pages_zip() {
    let stub = StubRenderer::new(&[(100, 200, RED), (150, 180, GREEN)]);
    let converter = Converter::new(stub, ConversionConfig::default());
    let result = converter
        .convert(PDF, ConversionMode::Individual, "scenario")
        .expect("conversion should succeed");

    assert_eq!(result.filename, "scenario_images.zip");
    assert_eq!(result.mime_type, "application/zip");

    let entries = zip_entries(&result.bytes);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["page_1.png", "page_2.png"]);
    assert_eq!(entries[0].1.dimensions(), (100, 200));
    assert_eq!(entries[1].1.dimensions(), (150, 180));
}

#[test]
fn test_zero_width_page_yields_composition_error() {
    let stub = StubRenderer::new(&[(100, 200, RED), (0, 180, GREEN), (120, 210, BLUE)]);
    let converter = Converter::new(stub, ConversionConfig::default());
    let err = converter
        .convert(PDF, ConversionMode::Combined, "bad")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Composition);
    assert!(err.to_string().contains("Page 2"), "got: {err}");
}

#[test]
fn test_malformed_pdf_yields_render_error() {
    let stub = three_page_stub();
    let converter = Converter::new(stub.clone(), ConversionConfig::default());

    for mode in [ConversionMode::Combined, ConversionMode::Individual] {
        let err = converter.convert(b"not a pdf", mode, "bad").unwrap_err();
        assert!(matches!(err, Pdf2PngError::Render(_)), "got: {err:?}");
    }
    assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_empty_document_is_consistent_across_modes() {
    let converter = Converter::new(StubRenderer::new(&[]), ConversionConfig::default());
    for mode in [ConversionMode::Combined, ConversionMode::Individual] {
        let err = converter.convert(PDF, mode, "empty").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyDocument);
    }

    // The stages reject empty sequences on their own too.
    assert!(matches!(
        compose(&PageSequence::new(), [255, 255, 255]),
        Err(CompositionError::EmptySequence)
    ));
    assert!(pack(&PageSequence::new(), ArchiveCompression::Deflated).is_err());
}

#[test]
fn test_outputs_are_deterministic() {
    let converter = Converter::new(three_page_stub(), ConversionConfig::default());
    for mode in [ConversionMode::Combined, ConversionMode::Individual] {
        let a = converter.convert(PDF, mode, "d").unwrap();
        let b = converter.convert(PDF, mode, "d").unwrap();
        assert_eq!(a.bytes, b.bytes, "{mode:?} output differs between runs");
    }
}

#[test]
fn test_progress_events_in_page_order() {
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ConversionProgressCallback for Recorder {
        fn on_conversion_start(&self, total_pages: usize) {
            self.events.lock().unwrap().push(format!("start {total_pages}"));
        }
        fn on_page_assembled(&self, page_num: usize, total_pages: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("page {page_num}/{total_pages}"));
        }
        fn on_conversion_complete(&self, total_pages: usize, _output_len: usize) {
            self.events.lock().unwrap().push(format!("done {total_pages}"));
        }
    }

    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    let converter = Converter::new(three_page_stub(), config);
    converter
        .convert(PDF, ConversionMode::Individual, "p")
        .unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec!["start 3", "page 1/3", "page 2/3", "page 3/3", "done 3"]
    );
}

#[tokio::test]
async fn test_convert_to_file_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = convert_to_file(
        "/definitely/not/here.pdf",
        dir.path(),
        &ConversionConfig::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_convert_to_file_rejects_non_pdf_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.pdf");
    std::fs::write(&input, b"plain text, not a pdf").unwrap();

    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let err = convert_to_file(input.to_str().unwrap(), &out_dir, &ConversionConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2PngError::Render(RenderError::NotAPdf { .. })));
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
}

// ── pdfium-backed tests (need E2E_ENABLED and a pdfium library) ──────────────

fn pdfium_config(mode: ConversionMode) -> ConversionConfig {
    let mut builder = ConversionConfig::builder().mode(mode).dpi(72);
    if let Ok(lib) = std::env::var("PDFIUM_LIB_PATH") {
        builder = builder.pdfium_lib_path(lib);
    }
    builder.build().expect("valid config")
}

#[tokio::test]
async fn test_pdfium_combined_matches_page_sum() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("irs_form_1040.pdf"));
    let out = tempfile::tempdir().unwrap();

    let (written, summary) = convert_to_file(
        path.to_str().unwrap(),
        out.path(),
        &pdfium_config(ConversionMode::Combined),
    )
    .await
    .expect("conversion should succeed");

    assert_eq!(
        written.file_name().unwrap().to_str().unwrap(),
        "irs_form_1040_combined.png"
    );
    let img = image::open(&written).unwrap();
    assert_eq!(Some(img.width()), summary.width);
    assert_eq!(Some(img.height()), summary.height);
    println!("[combined] {}", summary.describe());
}

#[tokio::test]
async fn test_pdfium_individual_has_one_entry_per_page() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("irs_form_1040.pdf"));
    let out = tempfile::tempdir().unwrap();

    let (written, summary) = convert_to_file(
        path.to_str().unwrap(),
        out.path(),
        &pdfium_config(ConversionMode::Individual),
    )
    .await
    .expect("conversion should succeed");

    let bytes = std::fs::read(&written).unwrap();
    let entries = zip_entries(&bytes);
    assert_eq!(entries.len(), summary.page_count);
    for (i, (name, _)) in entries.iter().enumerate() {
        assert_eq!(name, &format!("page_{}.png", i + 1));
    }
}
