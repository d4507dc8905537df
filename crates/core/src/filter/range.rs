//! Filter ranges and the acceptance predicate.

use serde::{Deserialize, Serialize};

use crate::geometry::{HasBox, bounding_box};
use crate::model::Document;

/// Rectangular acceptance range, all bounds inclusive, image-space units.
///
/// `max >= min` on each axis is the caller's responsibility; an inverted
/// range is evaluated literally and simply accepts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRange {
    pub min_width: f64,
    pub max_width: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl FilterRange {
    /// A range that accepts every finite box.
    pub const fn unbounded() -> Self {
        Self {
            min_width: f64::MIN,
            max_width: f64::MAX,
            min_x: f64::MIN,
            max_x: f64::MAX,
            min_y: f64::MIN,
            max_y: f64::MAX,
        }
    }

    /// Whether a box passes the filter.
    ///
    /// Only the width is range-checked for size; the whole box, not just its
    /// corner, must lie inside the x and y bounds.
    pub fn accepts<B: HasBox + ?Sized>(&self, b: &B) -> bool {
        let width = b.width();
        width >= self.min_width
            && width <= self.max_width
            && b.x() >= self.min_x
            && b.right() <= self.max_x
            && b.y() >= self.min_y
            && b.bottom() <= self.max_y
    }
}

/// Slider limits for each filter axis, derived from the symbols of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterBounds {
    pub width: (f64, f64),
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl FilterBounds {
    /// Derives bounds from every symbol box in `doc`.
    ///
    /// Extents are floored/ceiled to whole units. When no symbol has a usable
    /// box, or the given image dimensions are unusable, falls back to the
    /// image dimensions (at least 1000 on each axis).
    pub fn from_document(doc: &Document, image: Option<(f64, f64)>, min_vertices: usize) -> Self {
        let mut width = (f64::INFINITY, 0.0_f64);
        let mut x = (f64::INFINITY, 0.0_f64);
        let mut y = (f64::INFINITY, 0.0_f64);
        let mut found = false;

        for bbox in doc
            .symbols()
            .filter_map(|s| s.bounding_box.as_ref())
            .filter_map(|p| bounding_box(p, min_vertices))
        {
            width = (width.0.min(bbox.width), width.1.max(bbox.width));
            x = (x.0.min(bbox.x), x.1.max(bbox.right()));
            y = (y.0.min(bbox.y), y.1.max(bbox.bottom()));
            found = true;
        }

        let image_usable =
            image.is_none_or(|(w, h)| w.is_finite() && w > 0.0 && h.is_finite() && h > 0.0);

        let mut bounds = if found && image_usable {
            Self {
                width: (width.0.floor(), width.1.ceil()),
                x: (x.0.floor(), x.1.ceil()),
                y: (y.0.floor(), y.1.ceil()),
            }
        } else {
            let (w, h) = image
                .filter(|&(w, h)| w.is_finite() && h.is_finite())
                .unwrap_or((1000.0, 1000.0));
            let w = w.max(1000.0);
            let h = h.max(1000.0);
            Self {
                width: (0.0, (w / 10.0).round().max(50.0)),
                x: (0.0, w),
                y: (0.0, h),
            }
        };

        for axis in [&mut bounds.width, &mut bounds.x, &mut bounds.y] {
            if axis.1 <= axis.0 {
                axis.1 = axis.0 + 1.0;
            }
        }
        bounds
    }

    /// The widest filter range allowed by these bounds.
    pub const fn full_range(&self) -> FilterRange {
        FilterRange {
            min_width: self.width.0,
            max_width: self.width.1,
            min_x: self.x.0,
            max_x: self.x.1,
            min_y: self.y.0,
            max_y: self.y.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use crate::model::{Block, Page, Paragraph, Polygon, Symbol, Word};

    fn bbox(x: f64, y: f64, w: f64, h: f64) -> BoundingBox {
        BoundingBox::from_extremes(x, y, x + w, y + h).unwrap()
    }

    #[test]
    fn test_whole_box_must_fit() {
        let range = FilterRange {
            min_width: 0.0,
            max_width: 50.0,
            min_x: 0.0,
            max_x: 100.0,
            min_y: 0.0,
            max_y: 100.0,
        };
        assert!(range.accepts(&bbox(90.0, 10.0, 10.0, 10.0)));
        // corner inside, right edge outside
        assert!(!range.accepts(&bbox(95.0, 10.0, 10.0, 10.0)));
        assert!(!range.accepts(&bbox(10.0, 95.0, 10.0, 10.0)));
    }

    #[test]
    fn test_height_is_not_size_checked() {
        let range = FilterRange {
            min_width: 5.0,
            max_width: 6.0,
            min_x: 0.0,
            max_x: 1000.0,
            min_y: 0.0,
            max_y: 1000.0,
        };
        assert!(range.accepts(&bbox(0.0, 0.0, 5.5, 400.0)));
        assert!(!range.accepts(&bbox(0.0, 0.0, 7.0, 1.0)));
    }

    #[test]
    fn test_inverted_range_accepts_nothing() {
        let range = FilterRange {
            min_width: 10.0,
            max_width: 1.0,
            ..FilterRange::unbounded()
        };
        assert!(!range.accepts(&bbox(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_bounds_from_symbols() {
        let word = Word::new(
            Polygon::rect(10.2, 20.0, 30.0, 10.0),
            vec![
                Symbol::new("a", Polygon::rect(10.2, 20.0, 8.5, 10.0)),
                Symbol::new("b", Polygon::rect(20.0, 21.0, 12.0, 9.4)),
            ],
        );
        let doc = Document::new(vec![Page::new(vec![Block::new(
            Polygon::rect(0.0, 0.0, 100.0, 100.0),
            vec![Paragraph::new(Polygon::rect(0.0, 0.0, 100.0, 100.0), vec![word])],
        )])]);

        let bounds = FilterBounds::from_document(&doc, Some((640.0, 480.0)), 3);
        assert_eq!(bounds.width, (8.0, 12.0));
        assert_eq!(bounds.x, (10.0, 32.0));
        assert_eq!(bounds.y, (20.0, 31.0));
    }

    #[test]
    fn test_bounds_fall_back_to_image() {
        let bounds = FilterBounds::from_document(&Document::default(), Some((2400.0, 800.0)), 3);
        assert_eq!(bounds.width, (0.0, 240.0));
        assert_eq!(bounds.x, (0.0, 2400.0));
        assert_eq!(bounds.y, (0.0, 1000.0));
    }

    #[test]
    fn test_degenerate_bounds_are_widened() {
        let word = Word::new(
            Polygon::rect(5.0, 5.0, 0.0, 0.0),
            vec![Symbol::new("a", Polygon::rect(5.0, 5.0, 0.0, 0.0))],
        );
        let doc = Document::new(vec![Page::new(vec![Block::new(
            Polygon::rect(0.0, 0.0, 1.0, 1.0),
            vec![Paragraph::new(Polygon::rect(0.0, 0.0, 1.0, 1.0), vec![word])],
        )])]);
        let bounds = FilterBounds::from_document(&doc, Some((10.0, 10.0)), 3);
        assert_eq!(bounds.width, (0.0, 1.0));
        assert_eq!(bounds.x, (5.0, 6.0));
    }
}
