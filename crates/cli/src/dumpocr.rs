//! dumpocr - Dump OCR annotation structure in XML format
//!
//! A command line tool for inspecting the annotation tree of a recognizer
//! payload: one element per node with its box and child counts.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use ocrlens_core::Granularity;
use ocrlens_core::api::load_file;
use ocrlens_core::geometry::bounding_box;
use ocrlens_core::model::{BreakHint, Document, Polygon, Symbol};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Escape special characters for XML output.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c if c.is_control() => result.push_str(&format!("&#{};", c as u32)),
            c => result.push(c),
        }
    }
    result
}

/// Render a polygon's box as an XML attribute, or nothing when it has none.
fn bbox_attr(polygon: Option<&Polygon>, min_vertices: usize) -> String {
    polygon
        .and_then(|p| bounding_box(p, min_vertices))
        .map(|b| {
            format!(
                r#" bbox="{:.1},{:.1},{:.1},{:.1}""#,
                b.x, b.y, b.width, b.height
            )
        })
        .unwrap_or_default()
}

fn break_name(hint: Option<BreakHint>) -> &'static str {
    match hint {
        Some(BreakHint::Space) => "SPACE",
        Some(BreakHint::EolSureSpace) => "EOL_SURE_SPACE",
        Some(BreakHint::LineBreak) => "LINE_BREAK",
        Some(BreakHint::Hyphen) => "HYPHEN",
        Some(BreakHint::Other) => "OTHER",
        None => "",
    }
}

fn dump_symbol<W: Write>(out: &mut W, symbol: &Symbol, min_vertices: usize) -> Result<()> {
    write!(
        out,
        r#"        <symbol text="{}"{}"#,
        escape(&symbol.text),
        bbox_attr(symbol.bounding_box.as_ref(), min_vertices)
    )?;
    let hint = break_name(symbol.break_hint());
    if !hint.is_empty() {
        write!(out, r#" break="{hint}""#)?;
    }
    if let Some(confidence) = symbol.confidence {
        write!(out, r#" confidence="{confidence:.3}""#)?;
    }
    writeln!(out, " />")?;
    Ok(())
}

/// Dump the tree down to `depth` as XML.
fn dumpxml<W: Write>(
    out: &mut W,
    doc: &Document,
    depth: Granularity,
    min_vertices: usize,
) -> Result<()> {
    let deeper = |level: Granularity| depth as u8 >= level as u8;

    writeln!(
        out,
        r#"<document pages="{}" symbols="{}">"#,
        doc.pages.len(),
        doc.symbol_count()
    )?;
    for (page_no, page) in doc.pages.iter().enumerate() {
        write!(out, r#"<page index="{page_no}" blocks="{}""#, page.blocks.len())?;
        if let (Some(w), Some(h)) = (page.width, page.height) {
            write!(out, r#" width="{w}" height="{h}""#)?;
        }
        writeln!(out, ">")?;

        for block in &page.blocks {
            write!(
                out,
                r#"  <block paragraphs="{}"{}"#,
                block.paragraphs.len(),
                bbox_attr(block.bounding_box.as_ref(), min_vertices)
            )?;
            if let Some(ref kind) = block.block_type {
                write!(out, r#" type="{}""#, escape(kind))?;
            }
            if !deeper(Granularity::Paragraphs) {
                writeln!(out, " />")?;
                continue;
            }
            writeln!(out, ">")?;

            for paragraph in &block.paragraphs {
                write!(
                    out,
                    r#"    <paragraph words="{}"{}"#,
                    paragraph.words.len(),
                    bbox_attr(paragraph.bounding_box.as_ref(), min_vertices)
                )?;
                if !deeper(Granularity::Words) {
                    writeln!(out, " />")?;
                    continue;
                }
                writeln!(out, ">")?;

                for word in &paragraph.words {
                    write!(
                        out,
                        r#"      <word symbols="{}"{}"#,
                        word.symbols.len(),
                        bbox_attr(word.bounding_box.as_ref(), min_vertices)
                    )?;
                    if !deeper(Granularity::Symbols) {
                        writeln!(out, " />")?;
                        continue;
                    }
                    writeln!(out, ">")?;
                    for symbol in &word.symbols {
                        dump_symbol(out, symbol, min_vertices)?;
                    }
                    writeln!(out, "      </word>")?;
                }
                writeln!(out, "    </paragraph>")?;
            }
            writeln!(out, "  </block>")?;
        }
        writeln!(out, "</page>")?;
    }
    writeln!(out, "</document>")?;
    Ok(())
}

/// A command line tool for dumping OCR annotation structure as XML.
#[derive(Parser, Debug)]
#[command(name = "dumpocr")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more recognizer JSON payloads
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Deepest level to dump: blocks, paragraphs, words or symbols
    #[arg(short = 'l', long, default_value = "symbols")]
    level: String,

    /// Minimum usable vertices for a box to be printed
    #[arg(long = "min-vertices", default_value = "3")]
    min_vertices: usize,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();

    let depth: Granularity = args.level.parse()?;

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    for path in &args.files {
        let payload =
            load_file(path).with_context(|| format!("error reading {}", path.display()))?;
        dumpxml(&mut output, &payload.document, depth, args.min_vertices)?;
    }

    output.flush()?;
    Ok(())
}
