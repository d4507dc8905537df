//! Flat symbol records and the filter pass that maintains them.
//!
//! Records are an independent, flattened view of the tree's symbols. They are
//! rebuilt whenever the filter range changes or a new tree arrives; the tree
//! itself is never touched.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::{debug, warn};

use super::range::FilterRange;
use crate::geometry::{BoundingBox, HasBox, bounding_box};
use crate::model::{BreakHint, Document};

/// One symbol's geometry and filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRecord {
    pub text: SmolStr,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub mid_x: f64,
    pub mid_y: f64,
    pub is_filtered: bool,
    pub original_index: usize,
    #[serde(rename = "detectedBreak")]
    pub break_hint: Option<BreakHint>,
    pub confidence: Option<f64>,
    /// False when the source symbol had no usable box; such records never
    /// pass the filter.
    #[serde(skip)]
    pub has_box: bool,
}

impl SymbolRecord {
    fn new(text: SmolStr, bbox: Option<BoundingBox>, original_index: usize) -> Self {
        let b = bbox.unwrap_or(BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            mid_x: 0.0,
            mid_y: 0.0,
        });
        Self {
            text,
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
            mid_x: b.mid_x,
            mid_y: b.mid_y,
            is_filtered: false,
            original_index,
            break_hint: None,
            confidence: None,
            has_box: bbox.is_some(),
        }
    }
}

impl HasBox for SymbolRecord {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn width(&self) -> f64 {
        self.width
    }
    fn height(&self) -> f64 {
        self.height
    }
}

/// Precomputed record as delivered by a recognizer backend (`symbolsData`).
///
/// Backends serialize a box they could not compute as `null` fields; such a
/// record is kept but never accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSymbolRecord {
    pub text: SmolStr,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub mid_x: Option<f64>,
    pub mid_y: Option<f64>,
    pub original_index: Option<usize>,
    pub detected_break: Option<BreakHint>,
    pub confidence: Option<f64>,
}

/// Counts reported after a filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FilterSummary {
    pub total: usize,
    pub accepted: usize,
}

/// Flattens the tree into records and applies `range`.
///
/// `original_index` is the symbol's character offset into `doc.text` when
/// the recognizer supplied full text, otherwise the running sum of symbol
/// text lengths.
pub fn build_records(doc: &Document, range: &FilterRange, min_vertices: usize) -> Vec<SymbolRecord> {
    let full_text: Vec<char> = doc.text.chars().collect();
    let mut char_index = 0usize;
    let mut records = Vec::with_capacity(doc.symbol_count());

    for symbol in doc.symbols() {
        let bbox = symbol
            .bounding_box
            .as_ref()
            .and_then(|p| bounding_box(p, min_vertices));
        let mut record = SymbolRecord::new(symbol.text.clone(), bbox, char_index);
        record.break_hint = symbol.break_hint();
        record.confidence = symbol.confidence;
        records.push(record);

        let text_len = symbol.text.chars().count();
        if !full_text.is_empty() && char_index < full_text.len() {
            char_index += text_len;
            char_index += separator_width(&full_text, char_index, symbol.break_hint());
        } else {
            char_index += text_len;
        }
    }

    apply_filter(&mut records, range);
    records
}

/// Number of separator characters to skip at `at` in the full text.
fn separator_width(full_text: &[char], at: usize, hint: Option<BreakHint>) -> usize {
    match hint {
        Some(BreakHint::Space | BreakHint::EolSureSpace) => {
            usize::from(full_text.get(at) == Some(&' '))
        }
        Some(BreakHint::LineBreak) => match (full_text.get(at), full_text.get(at + 1)) {
            (Some('\n'), _) => 1,
            (Some('\r'), Some('\n')) => 2,
            _ => 0,
        },
        _ => 0,
    }
}

/// Builds records from backend-supplied data and applies `range`.
pub fn records_from_raw(raw: Vec<RawSymbolRecord>, range: &FilterRange) -> Vec<SymbolRecord> {
    let mut records: Vec<SymbolRecord> = raw
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let has_box = [r.x, r.y, r.width, r.height]
                .iter()
                .all(|v| v.is_some_and(f64::is_finite));
            let (x, y) = (r.x.unwrap_or(0.0), r.y.unwrap_or(0.0));
            let (width, height) = (r.width.unwrap_or(0.0), r.height.unwrap_or(0.0));
            SymbolRecord {
                text: r.text,
                x,
                y,
                width,
                height,
                mid_x: r.mid_x.unwrap_or(x + width / 2.0),
                mid_y: r.mid_y.unwrap_or(y + height / 2.0),
                is_filtered: false,
                original_index: r.original_index.unwrap_or(i),
                break_hint: r.detected_break,
                confidence: r.confidence,
                has_box,
            }
        })
        .collect();
    apply_filter(&mut records, range);
    records
}

/// Re-evaluates `is_filtered` on every record.
pub fn apply_filter(records: &mut [SymbolRecord], range: &FilterRange) -> FilterSummary {
    let mut accepted = 0;
    for record in records.iter_mut() {
        record.is_filtered = record.has_box && range.accepts(record);
        accepted += usize::from(record.is_filtered);
    }

    let summary = FilterSummary {
        total: records.len(),
        accepted,
    };
    if summary.accepted == 0 && summary.total > 0 {
        warn!(total = summary.total, "no symbol passed the current filter range");
    } else {
        debug!(total = summary.total, accepted = summary.accepted, "filter applied");
    }
    summary
}
