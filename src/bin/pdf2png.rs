//! CLI binary for edgequake-pdf2png.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and writes the result to disk.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2png::{
    convert_to_file, ArchiveCompression, ConversionConfig, ConversionMode,
    ConversionProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar: a spinner while pdfium renders, then a page
/// counter while pages are stacked or packed.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Rendering");
        bar.set_message("Processing pages…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Assembling");
        self.bar.println(format!(
            "{} Converted {} pages",
            green("✔"),
            bold(&total_pages.to_string())
        ));
    }

    fn on_page_assembled(&self, _page_num: usize, _total_pages: usize) {
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, _total_pages: usize, _output_len: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One tall image, written next to the current directory
  pdf2png document.pdf

  # One PNG per page in a ZIP
  pdf2png --mode individual document.pdf -o out/

  # Lower resolution for a long document
  pdf2png --dpi 100 --max-pixels 2000 book.pdf

  # From a URL, summary as JSON
  pdf2png --json https://arxiv.org/pdf/1706.03762

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or containing directory)
  RUST_LOG          Override log filter (e.g. debug)
"#;

#[derive(Parser, Debug)]
#[command(
    name = "pdf2png",
    version,
    about = "Convert PDF files and URLs to one tall PNG or a ZIP of page PNGs",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Output file or directory. Default: `<name>_combined.png` or
    /// `<name>_images.zip` in the current directory.
    #[arg(short, long, env = "PDF2PNG_OUTPUT")]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, env = "PDF2PNG_MODE", value_enum, default_value = "combined")]
    mode: ModeArg,

    /// Rendering DPI (72–600).
    #[arg(long, env = "PDF2PNG_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Cap on the longest rendered page edge in pixels.
    #[arg(long, env = "PDF2PNG_MAX_PIXELS")]
    max_pixels: Option<u32>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PNG_PASSWORD")]
    password: Option<String>,

    /// Path to libpdfium, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Store ZIP entries uncompressed (individual mode).
    #[arg(long, env = "PDF2PNG_STORED")]
    stored: bool,

    /// Print the conversion summary as JSON on stdout.
    #[arg(long, env = "PDF2PNG_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PNG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PNG_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2PNG_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    /// One tall image with all pages stacked.
    Combined,
    /// A ZIP archive with one PNG per page.
    Individual,
}

impl From<ModeArg> for ConversionMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Combined => ConversionMode::Combined,
            ModeArg::Individual => ConversionMode::Individual,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs unless verbose output is requested.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = cli.output.clone().unwrap_or_else(|| PathBuf::from("."));
    let (path, summary) = convert_to_file(&cli.input, &output, &config)
        .await
        .context("An error occurred while converting the PDF")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "{}  {}  →  {}",
            green("✔"),
            summary.describe(),
            bold(&path.display().to_string()),
        );
        eprintln!(
            "   {}",
            dim(&format!(
                "{} bytes, {}ms total ({}ms rendering)",
                summary.output_bytes, summary.total_duration_ms, summary.render_duration_ms
            )),
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let compression = if cli.stored {
        ArchiveCompression::Stored
    } else {
        ArchiveCompression::Deflated
    };

    let mut builder = ConversionConfig::builder()
        .mode(cli.mode.into())
        .dpi(cli.dpi)
        .compression(compression)
        .download_timeout_secs(cli.download_timeout);

    if let Some(px) = cli.max_pixels {
        builder = builder.max_rendered_pixels(px);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;
    tracing::debug!("Config: {:?}", config);
    Ok(config)
}
