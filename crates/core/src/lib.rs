//! ocrlens - geometry and text reconstruction for OCR annotation overlays.
//!
//! Takes a recognizer's hierarchical annotation tree (page, block,
//! paragraph, word, symbol) and derives filtered symbol records,
//! reconstructed text, and cached, viewport-culled boundary polygons for an
//! interactive overlay drawn on top of the source image.

pub mod api;
pub mod boundary;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod matcher;
pub mod model;
pub mod overlay;
pub mod params;
pub mod text;
pub mod transform;

pub use error::{OverlayError, Result};
pub use model::{Document, Granularity};
pub use overlay::Overlay;
pub use params::{MatchStrategy, OverlayParams};
