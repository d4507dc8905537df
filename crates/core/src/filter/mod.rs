//! Symbol filtering.
//!
//! This module contains:
//! - `FilterRange`, the width/x/y acceptance predicate
//! - `FilterBounds`, slider limits derived from a tree
//! - `SymbolRecord` construction and the filter pass

pub mod range;
pub mod records;

pub use range::{FilterBounds, FilterRange};
pub use records::{
    FilterSummary, RawSymbolRecord, SymbolRecord, apply_filter, build_records, records_from_raw,
};
