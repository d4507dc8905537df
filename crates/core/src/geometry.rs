//! Bounding-box extraction for annotation polygons.
//!
//! Turns an arbitrary vertex list into an axis-aligned box plus its center.
//! Missing coordinates never win an extreme; a polygon with fewer than the
//! configured number of usable vertices yields no box at all.

use serde::Serialize;

use crate::model::Polygon;

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// Trait for anything that carries an axis-aligned box in image space.
pub trait HasBox {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn right(&self) -> f64 {
        self.x() + self.width()
    }

    fn bottom(&self) -> f64 {
        self.y() + self.height()
    }
}

/// Axis-aligned box derived from polygon extremes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub mid_x: f64,
    pub mid_y: f64,
}

impl BoundingBox {
    /// Builds a box from its extremes. Returns `None` if any is non-finite.
    pub fn from_extremes(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<Self> {
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return None;
        }
        let width = max_x - min_x;
        let height = max_y - min_y;
        Some(Self {
            x: min_x,
            y: min_y,
            width,
            height,
            mid_x: min_x + width / 2.0,
            mid_y: min_y + height / 2.0,
        })
    }
}

impl HasBox for BoundingBox {
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

/// A polygon's box together with its vertices shifted into display space.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonBox {
    pub bbox: BoundingBox,
    /// Usable vertices plus the axis offsets, in polygon order.
    pub points: Vec<Point>,
    /// Usable vertices in image space, in polygon order.
    pub vertices: Vec<Point>,
}

/// Computes the image-space box of a polygon.
///
/// Returns `None` when fewer than `min_vertices` vertices carry two finite
/// coordinates.
pub fn bounding_box(polygon: &Polygon, min_vertices: usize) -> Option<BoundingBox> {
    if polygon.usable_vertex_count() < min_vertices {
        return None;
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for v in &polygon.vertices {
        if let Some(x) = v.x.filter(|x| x.is_finite()) {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
        if let Some(y) = v.y.filter(|y| y.is_finite()) {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    BoundingBox::from_extremes(min_x, min_y, max_x, max_y)
}

/// Computes the box of a polygon and its display-space outline.
///
/// `offsets` is `(dx, dy)` added to every vertex, leaving room for the axis
/// labels.
pub fn extract(polygon: &Polygon, offsets: Point, min_vertices: usize) -> Option<PolygonBox> {
    let bbox = bounding_box(polygon, min_vertices)?;
    let (dx, dy) = offsets;
    let vertices: Vec<Point> = polygon.vertices.iter().filter_map(|v| v.point()).collect();
    let points = vertices.iter().map(|&(x, y)| (x + dx, y + dy)).collect();
    Some(PolygonBox {
        bbox,
        points,
        vertices,
    })
}
