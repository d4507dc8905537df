//! ocr2txt - Extract text, symbols and boundaries from OCR annotations
//!
//! Reads a recognizer JSON payload and writes reconstructed text, the
//! filtered symbol records, or the boundary polygons for one granularity.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use ocrlens_core::api::load_file;
use ocrlens_core::filter::FilterRange;
use ocrlens_core::text::{TextMode, TextOptions};
use ocrlens_core::transform::ContainerSize;
use ocrlens_core::{Granularity, MatchStrategy, Overlay, OverlayParams};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// What to write.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputType {
    /// Reconstructed text at the chosen level (default)
    #[default]
    Text,
    /// Accepted symbols laid out per --mode and --language
    Filtered,
    /// Symbol records as JSON
    Symbols,
    /// All boundaries as JSON
    Boundaries,
    /// Boundaries overlapping the viewport as JSON
    Visible,
}

/// Tie-break between several candidate records.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Strategy {
    /// First record in traversal order (default)
    #[default]
    First,
    /// Closest record
    Nearest,
}

/// Reading layout for filtered output.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Mode {
    /// Left to right rows following break hints (default)
    #[default]
    HorizontalParallel,
    /// One chunk per paragraph, top to bottom
    HorizontalParagraph,
    /// Right to left columns, one line each
    VerticalParallel,
    /// One chunk per paragraph, right to left
    VerticalParagraph,
}

/// Extract text, symbol records and boundary polygons from OCR annotation
/// JSON.
#[derive(Parser, Debug)]
#[command(name = "ocr2txt")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more recognizer JSON payloads
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Granularity: blocks, paragraphs, words or symbols
    #[arg(short = 'l', long, default_value = "blocks")]
    level: String,

    /// Zoom factor, clamped to [min-zoom, max-zoom]
    #[arg(short = 'z', long, default_value = "1.0")]
    zoom: f64,

    // === Filter options ===
    /// Minimum symbol width
    #[arg(long = "min-width")]
    min_width: Option<f64>,

    /// Maximum symbol width
    #[arg(long = "max-width")]
    max_width: Option<f64>,

    /// Left bound of the accepted region
    #[arg(long = "min-x")]
    min_x: Option<f64>,

    /// Right bound of the accepted region
    #[arg(long = "max-x")]
    max_x: Option<f64>,

    /// Top bound of the accepted region
    #[arg(long = "min-y")]
    min_y: Option<f64>,

    /// Bottom bound of the accepted region
    #[arg(long = "max-y")]
    max_y: Option<f64>,

    // === Matching and coordinate options ===
    /// Symbol match radius at zoom 1
    #[arg(short = 'r', long = "match-radius", default_value = "15")]
    match_radius: f64,

    /// Tie-break when several records match
    #[arg(long, value_enum, default_value = "first")]
    strategy: Strategy,

    /// Minimum usable vertices for a polygon to count
    #[arg(long = "min-vertices", default_value = "3")]
    min_vertices: usize,

    /// Smallest allowed zoom
    #[arg(long = "min-zoom", default_value = "0.2")]
    min_zoom: f64,

    /// Largest allowed zoom
    #[arg(long = "max-zoom", default_value = "2.0")]
    max_zoom: f64,

    /// Source image size as WIDTHxHEIGHT
    #[arg(long = "image-size")]
    image_size: Option<String>,

    // === Viewport options (visible output) ===
    /// Vertical scroll offset in display pixels
    #[arg(long = "scroll-top", default_value = "0")]
    scroll_top: f64,

    /// Horizontal scroll offset in display pixels
    #[arg(long = "scroll-left", default_value = "0")]
    scroll_left: f64,

    /// Viewport size as WIDTHxHEIGHT in display pixels
    #[arg(long = "viewport", default_value = "1280x800")]
    viewport: String,

    /// Padding around the viewport in image units
    #[arg(long, default_value = "1000")]
    padding: f64,

    // === Text export options ===
    /// Layout for filtered output
    #[arg(short = 'm', long, value_enum, default_value = "horizontal-parallel")]
    mode: Mode,

    /// Language code of the text (e.g. en, zh, ja), selects spacing and
    /// punctuation rules
    #[arg(long)]
    language: Option<String>,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Type of output to generate
    #[arg(short = 't', long = "output_type", value_enum, default_value = "text")]
    output_type: OutputType,
}

/// Parse a `WIDTHxHEIGHT` pair.
fn parse_size(s: &str) -> Result<(f64, f64)> {
    let (w, h) = s
        .trim()
        .split_once(['x', 'X'])
        .with_context(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: f64 = w.trim().parse().with_context(|| format!("invalid width in {s:?}"))?;
    let h: f64 = h.trim().parse().with_context(|| format!("invalid height in {s:?}"))?;
    if !(w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0) {
        bail!("size must be non-negative, got {s:?}");
    }
    Ok((w, h))
}

/// Build OverlayParams from command line arguments.
fn build_params(args: &Args) -> Result<OverlayParams> {
    let mut params = OverlayParams::new(args.min_zoom, args.max_zoom, 0.1)?;
    params.match_radius_base = args.match_radius;
    params.min_vertices = args.min_vertices;
    params.viewport_padding = args.padding;
    params.match_strategy = match args.strategy {
        Strategy::First => MatchStrategy::FirstInOrder,
        Strategy::Nearest => MatchStrategy::Nearest,
    };
    Ok(params)
}

fn build_text_options(args: &Args) -> TextOptions {
    let mode = match args.mode {
        Mode::HorizontalParallel => TextMode::HorizontalParallel,
        Mode::HorizontalParagraph => TextMode::HorizontalParagraph,
        Mode::VerticalParallel => TextMode::VerticalParallel,
        Mode::VerticalParagraph => TextMode::VerticalParagraph,
    };
    TextOptions {
        mode,
        language: args.language.as_deref().map(Into::into),
    }
}

/// Overlay the explicit filter flags onto the document's full range.
fn build_range(args: &Args, full: FilterRange) -> FilterRange {
    FilterRange {
        min_width: args.min_width.unwrap_or(full.min_width),
        max_width: args.max_width.unwrap_or(full.max_width),
        min_x: args.min_x.unwrap_or(full.min_x),
        max_x: args.max_x.unwrap_or(full.max_x),
        min_y: args.min_y.unwrap_or(full.min_y),
        max_y: args.max_y.unwrap_or(full.max_y),
    }
}

fn has_filter_flags(args: &Args) -> bool {
    [
        args.min_width,
        args.max_width,
        args.min_x,
        args.max_x,
        args.min_y,
        args.max_y,
    ]
    .iter()
    .any(Option::is_some)
}

/// Process a single payload file.
fn process_file<W: Write>(
    path: &PathBuf,
    writer: &mut W,
    args: &Args,
    params: &OverlayParams,
    level: Granularity,
) -> Result<()> {
    let payload = load_file(path)?;
    let mut overlay = Overlay::from_payload(payload, params.clone())?;

    if let Some(ref size) = args.image_size {
        let (w, h) = parse_size(size)?;
        overlay.set_image_size(w, h);
    }
    if has_filter_flags(args) {
        let range = build_range(args, overlay.filter_bounds().full_range());
        let summary = overlay.set_filter_range(range);
        tracing::info!(total = summary.total, accepted = summary.accepted, "filter applied");
    }
    overlay.set_granularity(level);
    overlay.set_zoom(args.zoom);

    match args.output_type {
        OutputType::Text => writeln!(writer, "{}", overlay.text())?,
        OutputType::Filtered => {
            writeln!(writer, "{}", overlay.export_text(&build_text_options(args)))?
        }
        OutputType::Symbols => {
            serde_json::to_writer_pretty(&mut *writer, overlay.filtered_symbols())?;
            writeln!(writer)?;
        }
        OutputType::Boundaries => {
            serde_json::to_writer_pretty(&mut *writer, overlay.boundaries())?;
            writeln!(writer)?;
        }
        OutputType::Visible => {
            let (width, height) = parse_size(&args.viewport)?;
            overlay.update_viewport(
                args.scroll_top,
                args.scroll_left,
                ContainerSize { width, height },
            );
            serde_json::to_writer_pretty(&mut *writer, &overlay.visible_boundaries())?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let params = build_params(&args)?;
    let level: Granularity = args.level.parse()?;

    // Open output file or use stdout
    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    for path in &args.files {
        process_file(path, &mut output, &args, &params, level)
            .with_context(|| format!("error processing {}", path.display()))?;
    }

    output.flush()?;
    Ok(())
}
