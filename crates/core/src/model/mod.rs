//! Annotation tree model.
//!
//! This module contains:
//! - The recognizer's hierarchical annotation types (Document down to Symbol)
//! - `NodeRef`, a borrowed view over any geometry-bearing node
//! - `Granularity`, the level selector for text and boundaries

pub mod annotation;
pub mod level;

pub use annotation::*;
pub use level::Granularity;
