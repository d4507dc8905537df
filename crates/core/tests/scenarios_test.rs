//! End-to-end scenarios and properties of the overlay engine.
//!
//! Word reconstruction with break hints, the unmatched-symbol fallback,
//! degenerate block polygons, viewport culling, filter monotonicity, cache
//! idempotence and zoom-dependent matching.

use std::path::Path;

use ocrlens_core::api::{Payload, load_file};
use ocrlens_core::boundary::{Boundary, compute_boundaries, is_in_viewport, visible_boundaries};
use ocrlens_core::filter::{FilterRange, RawSymbolRecord, build_records, records_from_raw};
use ocrlens_core::geometry::bounding_box;
use ocrlens_core::matcher::{SymbolMatcher, match_radius};
use ocrlens_core::model::{NodeRef, Polygon, Vertex};
use ocrlens_core::text::TextReconstructor;
use ocrlens_core::transform::ViewportRect;
use ocrlens_core::{Granularity, Overlay, OverlayParams};

fn fixture(name: &str) -> Payload {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    load_file(&path).unwrap()
}

fn boundary_at(x: f64, y: f64, width: f64, height: f64) -> Boundary {
    Boundary {
        points: Vec::new(),
        tooltip: String::new(),
        text: String::new(),
        x,
        y,
        width,
        height,
    }
}

/// Tiny deterministic generator so property loops need no extra crates.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self, scale: f64) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 11) as f64 / (1u64 << 53) as f64) * scale
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_word_text_follows_break_hints() {
    let doc = fixture("hi_word.json").document;
    let params = OverlayParams::default();
    let records = build_records(&doc, &FilterRange::unbounded(), params.min_vertices);
    let reconstructor = TextReconstructor::new(&records, 1.0, &params);

    let word = doc.words().next().unwrap();
    let collected = reconstructor.collect(NodeRef::Word(word));
    assert_eq!(collected.text, "Hi ");
    assert!(collected.has_text);
}

#[test]
fn test_filtered_out_symbol_falls_back_to_space() {
    let mut overlay = Overlay::from_payload(fixture("hi_word.json"), OverlayParams::default())
        .unwrap();
    let mut range = overlay.filter_bounds().full_range();
    range.min_x = 19.0;
    let summary = overlay.set_filter_range(range);
    assert_eq!((summary.total, summary.accepted), (2, 1));

    let records = overlay.filtered_symbols();
    assert!(!records[0].is_filtered);
    assert!(records[1].is_filtered);

    let h = overlay.document().symbols().next().unwrap();
    let matcher = SymbolMatcher::new(records, 1.0, &OverlayParams::default());
    assert!(matcher.find(h).is_none());

    let boundaries = overlay.boundaries();
    assert_eq!(boundaries.len(), 1);
    assert_eq!(boundaries[0].text, "H i ");
}

#[test]
fn test_two_vertex_block_has_no_boundary() {
    let payload = fixture("two_vertex_block.json");
    let block = &payload.document.pages[0].blocks[0];
    assert!(bounding_box(block.bounding_box.as_ref().unwrap(), 3).is_none());

    let mut overlay = Overlay::from_payload(payload, OverlayParams::default()).unwrap();
    let boundaries = overlay.boundaries();
    assert_eq!(boundaries.len(), 1);
    assert!(boundaries[0].tooltip.starts_with("Block 2\n"));
    assert_eq!(boundaries[0].text, "bc ");

    // the children of the degenerate block still get their own outlines
    overlay.set_granularity(Granularity::Paragraphs);
    let paragraphs = overlay.boundaries();
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(
        paragraphs[0].tooltip,
        "Paragraph 1\nVertices: (0,0) (100,0) (100,40)\nW:100.0, H:40.0"
    );
    assert_eq!(paragraphs[0].text, "a\n");
    assert_eq!(paragraphs[0].points[0], (30.0, 0.0));
}

#[test]
fn test_box_beyond_padded_viewport_is_culled() {
    let viewport = ViewportRect {
        top: 0.0,
        left: 0.0,
        bottom: 100.0,
        right: 100.0,
    };
    let far = boundary_at(150.0, 150.0, 5.0, 5.0);
    assert!(!is_in_viewport(&far, &viewport, 10.0, 0.0));

    let list = vec![far, boundary_at(105.0, 105.0, 5.0, 5.0)];
    let visible = visible_boundaries(&list, &viewport, 10.0, 0.0);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].original_index, 1);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_bounding_box_validity() {
    let mut rng = Lcg(7);
    for n in 0..8 {
        for _ in 0..50 {
            let points: Vec<(f64, f64)> = (0..n)
                .map(|_| (rng.next_f64(1000.0) - 500.0, rng.next_f64(1000.0) - 500.0))
                .collect();
            let polygon = Polygon::from_points(&points);
            match bounding_box(&polygon, 3) {
                Some(b) => {
                    assert!(n >= 3);
                    assert!(b.width >= 0.0 && b.height >= 0.0);
                }
                None => assert!(n < 3),
            }
        }
    }

    let mut sparse = Polygon::from_points(&[(0.0, 0.0), (1.0, 1.0)]);
    sparse.vertices.push(Vertex {
        x: Some(2.0),
        y: None,
    });
    assert!(bounding_box(&sparse, 3).is_none());
}

#[test]
fn test_widening_range_never_drops_symbols() {
    let doc = fixture("two_vertex_block.json").document;
    let mut range = FilterRange {
        min_width: 20.0,
        max_width: 20.0,
        min_x: 10.0,
        max_x: 30.0,
        min_y: 0.0,
        max_y: 10.0,
    };
    let mut last = 0;
    for step in 0..40 {
        let accepted = build_records(&doc, &range, 3)
            .iter()
            .filter(|r| r.is_filtered)
            .count();
        assert!(accepted >= last, "step {step}: {accepted} < {last}");
        last = accepted;

        match step % 3 {
            0 => range.min_x -= 5.0,
            1 => range.max_y += 20.0,
            _ => range.max_x += 5.0,
        }
    }
    assert_eq!(last, 3);
}

#[test]
fn test_recomputation_is_identical() {
    let doc = fixture("two_vertex_block.json").document;
    let params = OverlayParams::default();
    let records = build_records(&doc, &FilterRange::unbounded(), 3);
    for level in Granularity::ALL {
        let first = compute_boundaries(&doc, level, &records, 1.3, &params);
        let second = compute_boundaries(&doc, level, &records, 1.3, &params);
        assert_eq!(first, second);
    }

    let mut overlay = Overlay::from_payload(fixture("hi_word.json"), params).unwrap();
    let first = overlay.boundaries().to_vec();
    overlay.invalidate_cache();
    assert_eq!(overlay.boundaries(), first.as_slice());
}

#[test]
fn test_culling_matches_padded_overlap() {
    let mut rng = Lcg(42);
    let boundaries: Vec<Boundary> = (0..300)
        .map(|_| {
            boundary_at(
                rng.next_f64(4000.0) - 1000.0,
                rng.next_f64(4000.0) - 1000.0,
                rng.next_f64(200.0),
                rng.next_f64(200.0),
            )
        })
        .collect();

    for _ in 0..20 {
        let top = rng.next_f64(2000.0);
        let left = rng.next_f64(2000.0);
        let viewport = ViewportRect {
            top,
            left,
            bottom: top + rng.next_f64(800.0),
            right: left + rng.next_f64(800.0),
        };
        let padding = rng.next_f64(300.0);
        let offset = 30.0;

        let visible: Vec<usize> = visible_boundaries(&boundaries, &viewport, padding, offset)
            .iter()
            .map(|v| v.original_index)
            .collect();
        let expected: Vec<usize> = boundaries
            .iter()
            .enumerate()
            .filter(|(_, b)| {
                let (x0, x1) = (b.x + offset, b.x + b.width + offset);
                let (y0, y1) = (b.y, b.y + b.height);
                x1 >= viewport.left - padding
                    && x0 <= viewport.right + padding
                    && y1 >= viewport.top - padding
                    && y0 <= viewport.bottom + padding
            })
            .map(|(i, _)| i)
            .collect();
        assert_eq!(visible, expected);
    }
}

#[test]
fn test_radius_halves_at_double_zoom() {
    let params = OverlayParams::default();
    assert_eq!(match_radius(params.match_radius_base, 1.0), 15.0);
    assert_eq!(
        match_radius(params.match_radius_base, 2.0),
        match_radius(params.match_radius_base, 1.0) / 2.0
    );

    // a record 10 units off matches at zoom 1 but not at zoom 2
    let doc = fixture("hi_word.json").document;
    let records = records_from_raw(
        vec![RawSymbolRecord {
            text: "H".into(),
            x: Some(20.0),
            y: Some(10.0),
            width: Some(8.0),
            height: Some(12.0),
            ..RawSymbolRecord::default()
        }],
        &FilterRange::unbounded(),
    );
    let h = doc.symbols().next().unwrap();
    assert!(SymbolMatcher::new(&records, 1.0, &params).find(h).is_some());
    assert!(SymbolMatcher::new(&records, 2.0, &params).find(h).is_none());
}
