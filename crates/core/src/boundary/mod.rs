//! Drawable boundaries.
//!
//! This module contains:
//! - Boundary building per granularity level (text-gated, numbered, tooltipped)
//! - A single-entry cache keyed by level, zoom and content revision
//! - Viewport culling over the cached list

pub mod build;
pub mod cache;
pub mod cull;

pub use build::{Boundary, compute_boundaries, tooltip};
pub use cache::{BoundaryCache, CacheKey};
pub use cull::{VisibleBoundary, is_in_viewport, visible_boundaries};
