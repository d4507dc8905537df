//! Boundary construction for one granularity level.

use rayon::prelude::*;
use serde::Serialize;

use crate::filter::SymbolRecord;
use crate::geometry::{HasBox, Point, PolygonBox, extract};
use crate::model::{Document, Granularity, NodeRef};
use crate::params::OverlayParams;
use crate::text::TextReconstructor;

/// A drawable outline for one tree node.
///
/// `points` are in display space (shifted by the axis offsets); the box
/// fields stay in image space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Boundary {
    pub points: Vec<Point>,
    pub tooltip: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl HasBox for Boundary {
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

/// Hover text: label, rounded image-space vertices, then the box size.
pub fn tooltip(label: &str, vertices: &[Point], width: f64, height: f64) -> String {
    let vertices = vertices
        .iter()
        .map(|&(x, y)| format!("({},{})", x.round() as i64, y.round() as i64))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{label}\nVertices: {vertices}\nW:{}, H:{}",
        fixed_1(width),
        fixed_1(height)
    )
}

/// One-decimal rendering where exact ties round away from zero.
fn fixed_1(v: f64) -> String {
    let scaled = v * 10.0;
    let exact = v.mul_add(10.0, -scaled) == 0.0;
    if exact && scaled.fract().abs() == 0.5 {
        return format!("{:.1}", scaled.round() / 10.0);
    }
    format!("{v:.1}")
}

fn node_label(node: NodeRef<'_>, ordinal: usize) -> String {
    match node {
        NodeRef::Symbol(symbol) => format!("{}: {}", Granularity::Symbols.label(), symbol.text),
        _ => format!("{} {}", node.level().label(), ordinal),
    }
}

fn build_one(
    node: NodeRef<'_>,
    ordinal: usize,
    reconstructor: &TextReconstructor<'_>,
    params: &OverlayParams,
) -> Option<Boundary> {
    let collected = reconstructor.collect(node);
    if !collected.has_text {
        return None;
    }
    let PolygonBox {
        bbox,
        points,
        vertices,
    } = extract(node.polygon()?, params.axis_offsets(), params.min_vertices)?;

    let text = match node {
        NodeRef::Symbol(symbol) => symbol.text.to_string(),
        _ => collected.text,
    };

    Some(Boundary {
        tooltip: tooltip(&node_label(node, ordinal), &vertices, bbox.width, bbox.height),
        points,
        text,
        x: bbox.x,
        y: bbox.y,
        width: bbox.width,
        height: bbox.height,
    })
}

/// Builds the boundary list for every node at `level`, in traversal order.
///
/// Nodes are numbered from 1 across all pages whether or not they produce a
/// boundary. `records` must already carry the current filter flags.
pub fn compute_boundaries(
    doc: &Document,
    level: Granularity,
    records: &[SymbolRecord],
    zoom: f64,
    params: &OverlayParams,
) -> Vec<Boundary> {
    let nodes = doc.nodes_at(level);
    let reconstructor = TextReconstructor::new(records, zoom, params);

    if nodes.len() > params.parallel_threshold {
        let built: Vec<Option<Boundary>> = nodes
            .into_par_iter()
            .enumerate()
            .map(|(i, node)| build_one(node, i + 1, &reconstructor, params))
            .collect();
        built.into_iter().flatten().collect()
    } else {
        nodes
            .into_iter()
            .enumerate()
            .filter_map(|(i, node)| build_one(node, i + 1, &reconstructor, params))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterRange, build_records};
    use crate::model::{Block, BreakHint, Page, Paragraph, Polygon, Symbol, Word};

    fn sample() -> Document {
        let empty_block = Block::new(
            Polygon::rect(0.0, 200.0, 50.0, 50.0),
            vec![Paragraph::new(
                Polygon::rect(0.0, 200.0, 50.0, 50.0),
                vec![Word::new(Polygon::rect(0.0, 200.0, 10.0, 10.0), vec![])],
            )],
        );
        let block = Block::new(
            Polygon::rect(10.0, 20.0, 30.0, 12.0),
            vec![Paragraph::new(
                Polygon::rect(10.0, 20.0, 30.0, 12.0),
                vec![Word::new(
                    Polygon::rect(10.0, 20.0, 20.0, 12.0),
                    vec![
                        Symbol::new("o", Polygon::rect(10.0, 20.0, 10.0, 12.0)),
                        Symbol::new("k", Polygon::rect(20.0, 20.0, 10.0, 12.0))
                            .with_break(BreakHint::Space),
                    ],
                )],
            )],
        );
        Document::new(vec![Page::new(vec![empty_block, block])])
    }

    #[test]
    fn test_tooltip_format() {
        let text = tooltip("Word 3", &[(1.4, 2.6), (10.0, 2.0)], 8.6, 0.24);
        assert_eq!(text, "Word 3\nVertices: (1,3) (10,2)\nW:8.6, H:0.2");
    }

    #[test]
    fn test_tooltip_ties_round_up() {
        let text = tooltip("Word 1", &[(0.0, 0.0)], 0.25, 2.45);
        assert_eq!(text, "Word 1\nVertices: (0,0)\nW:0.3, H:2.5");
        assert_eq!(fixed_1(0.35), "0.3");
        assert_eq!(fixed_1(1.75), "1.8");
        assert_eq!(fixed_1(12.0), "12.0");
    }

    #[test]
    fn test_numbering_counts_skipped_nodes() {
        let doc = sample();
        let params = OverlayParams::default();
        let records = build_records(&doc, &FilterRange::unbounded(), params.min_vertices);
        let boundaries = compute_boundaries(&doc, Granularity::Blocks, &records, 1.0, &params);

        assert_eq!(boundaries.len(), 1);
        let b = &boundaries[0];
        assert!(b.tooltip.starts_with("Block 2\n"));
        assert_eq!(b.text, "ok ");
        assert_eq!((b.x, b.y, b.width, b.height), (10.0, 20.0, 30.0, 12.0));
        assert_eq!(b.points[0], (40.0, 20.0));
    }

    #[test]
    fn test_symbol_labels_carry_text() {
        let doc = sample();
        let params = OverlayParams::default();
        let records = build_records(&doc, &FilterRange::unbounded(), params.min_vertices);
        let boundaries = compute_boundaries(&doc, Granularity::Symbols, &records, 1.0, &params);

        let labels: Vec<_> = boundaries
            .iter()
            .map(|b| b.tooltip.lines().next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(labels, vec!["Symbol: o", "Symbol: k"]);
        assert_eq!(boundaries[1].text, "k");
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let doc = sample();
        let sequential = OverlayParams::default();
        let parallel = OverlayParams {
            parallel_threshold: 0,
            ..OverlayParams::default()
        };
        let records = build_records(&doc, &FilterRange::unbounded(), 3);
        for level in Granularity::ALL {
            assert_eq!(
                compute_boundaries(&doc, level, &records, 1.0, &sequential),
                compute_boundaries(&doc, level, &records, 1.0, &parallel),
            );
        }
    }
}
