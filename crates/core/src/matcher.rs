//! Symbol matching between the annotation tree and the flat record list.
//!
//! A tree symbol and a record are "the same" character when the record passed
//! the filter, carries exactly the same text, and its corner lies within a
//! zoom-dependent radius of the symbol's first vertex on both axes.

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::filter::SymbolRecord;
use crate::model::Symbol;
use crate::params::{MatchStrategy, OverlayParams};

/// Smallest zoom used when deriving the matching radius.
pub const ZOOM_EPSILON: f64 = 1e-6;

/// Matching radius for `zoom`: shrinks as the user zooms in.
#[inline]
pub fn match_radius(base: f64, zoom: f64) -> f64 {
    base / zoom.max(ZOOM_EPSILON)
}

#[inline]
fn within(record: &SymbolRecord, corner: (f64, f64), radius: f64) -> bool {
    (record.x - corner.0).abs() < radius && (record.y - corner.1).abs() < radius
}

#[inline]
fn chebyshev(record: &SymbolRecord, corner: (f64, f64)) -> f64 {
    (record.x - corner.0).abs().max((record.y - corner.1).abs())
}

/// Linear scan over `records`. Reference semantics for [`SymbolMatcher`].
pub fn match_symbol<'a>(
    symbol: &Symbol,
    records: &'a [SymbolRecord],
    radius: f64,
    strategy: MatchStrategy,
) -> Option<&'a SymbolRecord> {
    let corner = symbol.bounding_box.as_ref()?.corner()?;
    let mut candidates = records
        .iter()
        .filter(|r| r.is_filtered && r.text == symbol.text && within(r, corner, radius));

    match strategy {
        MatchStrategy::FirstInOrder => candidates.next(),
        MatchStrategy::Nearest => candidates.min_by(|a, b| {
            chebyshev(a, corner).total_cmp(&chebyshev(b, corner))
        }),
    }
}

type IndexedCorner = GeomWithData<[f64; 2], usize>;

/// Spatial index over the accepted records, grouped by text.
///
/// Built once per boundary computation; lookups cost a tree query instead of
/// a scan over every record.
pub struct SymbolMatcher<'a> {
    records: &'a [SymbolRecord],
    by_text: FxHashMap<SmolStr, RTree<IndexedCorner>>,
    radius: f64,
    strategy: MatchStrategy,
}

impl<'a> SymbolMatcher<'a> {
    pub fn new(records: &'a [SymbolRecord], zoom: f64, params: &OverlayParams) -> Self {
        let mut grouped: FxHashMap<SmolStr, Vec<IndexedCorner>> = FxHashMap::default();
        for (pos, record) in records.iter().enumerate() {
            if record.is_filtered {
                grouped
                    .entry(record.text.clone())
                    .or_default()
                    .push(IndexedCorner::new([record.x, record.y], pos));
            }
        }

        let by_text = grouped
            .into_iter()
            .map(|(text, corners)| (text, RTree::bulk_load(corners)))
            .collect();

        Self {
            records,
            by_text,
            radius: match_radius(params.match_radius_base, zoom),
            strategy: params.match_strategy,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Finds the record representing `symbol`, if any.
    pub fn find(&self, symbol: &Symbol) -> Option<&'a SymbolRecord> {
        let corner = symbol.bounding_box.as_ref()?.corner()?;
        let tree = self.by_text.get(&symbol.text)?;
        let r = self.radius;
        let envelope = AABB::from_corners(
            [corner.0 - r, corner.1 - r],
            [corner.0 + r, corner.1 + r],
        );

        let candidates = tree
            .locate_in_envelope(&envelope)
            .map(|c| c.data)
            .filter(|&pos| within(&self.records[pos], corner, r));

        let pos = match self.strategy {
            MatchStrategy::FirstInOrder => candidates.min(),
            MatchStrategy::Nearest => candidates.min_by(|&a, &b| {
                chebyshev(&self.records[a], corner)
                    .total_cmp(&chebyshev(&self.records[b], corner))
                    .then(a.cmp(&b))
            }),
        }?;
        Some(&self.records[pos])
    }
}
