//! Plain-text export of the accepted symbol records.
//!
//! Four layouts are supported. Horizontal text reads left to right in rows,
//! vertical text reads top to bottom in columns ordered right to left. The
//! parallel variants work on the flat records alone; the paragraph variants
//! walk the tree and emit one chunk per paragraph.

use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::language::LanguageRules;
use crate::filter::SymbolRecord;
use crate::geometry::bounding_box;
use crate::model::{BreakHint, Document, Paragraph};

/// Mid-point tolerance when pairing a tree symbol with its record in
/// horizontal paragraph export.
const MID_TOLERANCE: f64 = 5.0;

/// Corner tolerance for the same pairing in vertical paragraph export.
const CORNER_TOLERANCE: f64 = 2.0;

/// Character width assumed when no symbol has a usable one.
const DEFAULT_CHAR_WIDTH: f64 = 15.0;

/// Fraction of the average character width within which two symbols share a
/// column.
const COLUMN_FACTOR: f64 = 0.75;

/// Reading layout for exported text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Rows in record order, break hints become spaces and newlines.
    #[default]
    HorizontalParallel,
    /// One chunk per paragraph, ordered top to bottom.
    HorizontalParagraph,
    /// Columns right to left, one line per column.
    VerticalParallel,
    /// One chunk per paragraph, ordered right to left.
    VerticalParagraph,
}

impl TextMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            TextMode::HorizontalParallel => "horizontal-parallel",
            TextMode::HorizontalParagraph => "horizontal-paragraph",
            TextMode::VerticalParallel => "vertical-parallel",
            TextMode::VerticalParagraph => "vertical-paragraph",
        }
    }
}

impl fmt::Display for TextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout and language for [`export_text`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextOptions {
    pub mode: TextMode,
    /// Language code of the recognized text, e.g. `en` or `zh-Hans`.
    pub language: Option<SmolStr>,
}

/// Exports the accepted records of `doc` in the requested layout.
pub fn export_text(
    doc: &Document,
    records: &[SymbolRecord],
    options: &TextOptions,
    min_vertices: usize,
) -> String {
    let rules = LanguageRules::for_code(options.language.as_deref());
    match options.mode {
        TextMode::HorizontalParallel => horizontal_parallel(records, rules),
        TextMode::HorizontalParagraph => horizontal_paragraphs(doc, records, rules, min_vertices),
        TextMode::VerticalParallel => vertical_parallel(records, rules),
        TextMode::VerticalParagraph => vertical_paragraphs(doc, records, rules),
    }
}

/// Concatenates the accepted records in flattening order.
///
/// Break hints become spaces or newlines; runs of spaces and runs of newlines
/// are collapsed and the result is trimmed.
pub fn filtered_text(records: &[SymbolRecord]) -> String {
    horizontal_parallel(records, LanguageRules::default())
}

/// Collapses repeated spaces and repeated newlines, then trims.
pub fn clean_spaces(text: &str) -> String {
    let collapsed: String = text
        .chars()
        .dedup_by(|a, b| a == b && (*a == ' ' || *a == '\n'))
        .collect();
    collapsed.trim().to_string()
}

fn horizontal_parallel(records: &[SymbolRecord], rules: LanguageRules) -> String {
    let mut raw = String::new();
    for record in records.iter().filter(|r| r.is_filtered) {
        let (text, space) = rules.symbol_text(&record.text, record.break_hint);
        raw.push_str(&text);
        if space {
            raw.push(' ');
        }
        if matches!(record.break_hint, Some(BreakHint::LineBreak | BreakHint::Hyphen)) {
            raw.push('\n');
        }
    }
    clean_spaces(&raw)
}

/// Records grouped by text, each group in flattening order.
fn records_by_text(records: &[SymbolRecord]) -> FxHashMap<&str, Vec<&SymbolRecord>> {
    let mut index: FxHashMap<&str, Vec<&SymbolRecord>> = FxHashMap::default();
    for record in records {
        index.entry(record.text.as_str()).or_default().push(record);
    }
    index
}

/// Smallest coordinate over a paragraph's vertices, infinite without any.
fn paragraph_min(paragraph: &Paragraph, coord: impl Fn(f64, f64) -> f64) -> f64 {
    paragraph
        .bounding_box
        .iter()
        .flat_map(|p| p.vertices.iter())
        .filter_map(|v| v.point())
        .map(|(x, y)| coord(x, y))
        .fold(f64::INFINITY, f64::min)
}

/// One text chunk and the coordinate it sorts by.
struct Chunk {
    text: String,
    key: f64,
}

fn horizontal_paragraphs(
    doc: &Document,
    records: &[SymbolRecord],
    rules: LanguageRules,
    min_vertices: usize,
) -> String {
    let index = records_by_text(records);
    let mut chunks = Vec::new();

    for paragraph in doc.paragraphs() {
        let mut raw = String::new();
        for symbol in paragraph.words.iter().flat_map(|w| w.symbols.iter()) {
            let Some(mid) = symbol
                .bounding_box
                .as_ref()
                .and_then(|p| bounding_box(p, min_vertices))
            else {
                continue;
            };
            let record = index.get(symbol.text.as_str()).and_then(|candidates| {
                candidates.iter().copied().find(|r| {
                    (r.mid_x - mid.mid_x).abs() < MID_TOLERANCE
                        && (r.mid_y - mid.mid_y).abs() < MID_TOLERANCE
                })
            });
            let Some(record) = record.filter(|r| r.is_filtered) else {
                continue;
            };
            if rules.skips(&symbol.text, record.break_hint) {
                continue;
            }
            let (text, space) = rules.symbol_text(&symbol.text, record.break_hint);
            raw.push_str(&text);
            if space {
                raw.push(' ');
            }
        }

        let text = clean_spaces(&raw);
        if !text.is_empty() {
            chunks.push(Chunk {
                text,
                key: paragraph_min(paragraph, |_, y| y),
            });
        }
    }

    chunks.sort_by(|a, b| a.key.total_cmp(&b.key));
    chunks.into_iter().map(|c| c.text).join("\n\n")
}

/// A symbol placed for column layout.
struct Glyph {
    text: String,
    mid_x: f64,
    mid_y: f64,
    width: f64,
}

fn average_char_width(glyphs: &[Glyph]) -> f64 {
    let usable = || glyphs.iter().filter(|g| g.width > 0.0 && g.width.is_finite());
    let per_char: Vec<f64> = usable()
        .filter(|g| !g.text.is_empty())
        .map(|g| g.width / g.text.chars().count() as f64)
        .collect();
    if !per_char.is_empty() {
        return per_char.iter().sum::<f64>() / per_char.len() as f64;
    }
    let count = usable().count();
    if count > 0 {
        usable().map(|g| g.width).sum::<f64>() / count as f64
    } else {
        DEFAULT_CHAR_WIDTH
    }
}

fn mean_mid_x(column: &[Glyph]) -> f64 {
    column.iter().map(|g| g.mid_x).sum::<f64>() / column.len() as f64
}

/// Splits glyphs into columns ordered right to left, each read top to bottom.
///
/// A glyph joins the current column while its mid-x stays within
/// `0.75 * average char width` of the column's running mean.
fn into_columns(mut glyphs: Vec<Glyph>) -> Vec<Vec<Glyph>> {
    let threshold = average_char_width(&glyphs) * COLUMN_FACTOR;
    glyphs.sort_by(|a, b| b.mid_x.total_cmp(&a.mid_x).then(a.mid_y.total_cmp(&b.mid_y)));

    let mut columns: Vec<Vec<Glyph>> = Vec::new();
    let mut current: Vec<Glyph> = Vec::new();
    for glyph in glyphs {
        if !current.is_empty() && (glyph.mid_x - mean_mid_x(&current)).abs() >= threshold {
            columns.push(std::mem::take(&mut current));
        }
        current.push(glyph);
    }
    if !current.is_empty() {
        columns.push(current);
    }

    for column in &mut columns {
        column.sort_by(|a, b| a.mid_y.total_cmp(&b.mid_y));
    }
    columns.sort_by(|a, b| mean_mid_x(b).total_cmp(&mean_mid_x(a)));
    columns
}

fn column_text(column: &[Glyph]) -> String {
    column.iter().map(|g| g.text.as_str()).collect()
}

fn glyph(record: &SymbolRecord, text: &str, rules: LanguageRules) -> Glyph {
    Glyph {
        text: rules.symbol_text(text, record.break_hint).0.into_owned(),
        mid_x: record.mid_x,
        mid_y: record.mid_y,
        width: record.width,
    }
}

fn vertical_parallel(records: &[SymbolRecord], rules: LanguageRules) -> String {
    let glyphs = records
        .iter()
        .filter(|r| r.is_filtered)
        .map(|r| glyph(r, &r.text, rules))
        .collect();
    into_columns(glyphs)
        .iter()
        .map(|column| column_text(column))
        .join("\n")
}

fn vertical_paragraphs(doc: &Document, records: &[SymbolRecord], rules: LanguageRules) -> String {
    let index = records_by_text(records);
    let mut chunks = Vec::new();

    for paragraph in doc.paragraphs() {
        let mut glyphs = Vec::new();
        for symbol in paragraph.words.iter().flat_map(|w| w.symbols.iter()) {
            let first = symbol.bounding_box.as_ref().and_then(|p| p.vertices.first());
            let corner_x = first.and_then(|v| v.x).unwrap_or(-1.0);
            let corner_y = first.and_then(|v| v.y).unwrap_or(-1.0);
            let record = index.get(symbol.text.as_str()).and_then(|candidates| {
                candidates.iter().copied().find(|r| {
                    (r.x - corner_x).abs() < CORNER_TOLERANCE
                        && (r.y - corner_y).abs() < CORNER_TOLERANCE
                })
            });
            if let Some(record) = record.filter(|r| r.is_filtered) {
                let text: String = record
                    .text
                    .chars()
                    .filter(|c| !matches!(c, '\r' | '\n'))
                    .collect();
                glyphs.push(glyph(record, &text, rules));
            }
        }

        if !glyphs.is_empty() {
            chunks.push(Chunk {
                text: into_columns(glyphs).iter().map(|column| column_text(column)).collect(),
                key: paragraph_min(paragraph, |x, _| x),
            });
        }
    }

    chunks.sort_by(|a, b| b.key.total_cmp(&a.key));
    chunks.into_iter().map(|c| c.text).join("\n\n")
}
