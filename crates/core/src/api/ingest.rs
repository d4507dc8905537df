//! Recognizer payload ingestion.
//!
//! Accepts the three shapes a recognizer backend hands out:
//! - a batch response: `{"responses": [{"fullTextAnnotation": {...}}]}`
//! - a single response: `{"fullTextAnnotation": {...}}`
//! - a bare annotation: `{"pages": [...]}`
//!
//! Any of them may carry a flat `symbolsData` array next to the annotation.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{OverlayError, Result};
use crate::filter::RawSymbolRecord;
use crate::model::Document;

/// An annotation tree plus optional backend-computed symbol records.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    pub document: Document,
    pub raw_symbols: Option<Vec<RawSymbolRecord>>,
}

fn take_symbols(obj: &mut Map<String, Value>) -> Result<Option<Vec<RawSymbolRecord>>> {
    match obj.remove("symbolsData") {
        Some(Value::Null) | None => Ok(None),
        Some(v) => Ok(Some(serde_json::from_value(v)?)),
    }
}

/// Parses a recognizer payload from JSON bytes.
pub fn load_annotation(bytes: &[u8]) -> Result<Payload> {
    let Value::Object(mut root) = serde_json::from_slice::<Value>(bytes)? else {
        return Err(OverlayError::MissingAnnotation);
    };

    let root_symbols = take_symbols(&mut root)?;

    let mut response = match root.remove("responses") {
        Some(Value::Array(responses)) => responses
            .into_iter()
            .filter_map(|r| match r {
                Value::Object(obj) if obj.contains_key("fullTextAnnotation") => Some(obj),
                _ => None,
            })
            .next()
            .ok_or(OverlayError::MissingAnnotation)?,
        Some(_) => return Err(OverlayError::MissingAnnotation),
        None => root,
    };

    let raw_symbols = take_symbols(&mut response)?.or(root_symbols);

    let document: Document = match response.remove("fullTextAnnotation") {
        Some(Value::Null) => return Err(OverlayError::MissingAnnotation),
        Some(annotation) => serde_json::from_value(annotation)?,
        None if response.contains_key("pages") => serde_json::from_value(Value::Object(response))?,
        None => return Err(OverlayError::MissingAnnotation),
    };

    debug!(
        pages = document.pages.len(),
        symbols = document.symbol_count(),
        precomputed = raw_symbols.as_ref().map(Vec::len),
        "annotation loaded"
    );

    Ok(Payload {
        document,
        raw_symbols,
    })
}

/// Reads and parses a recognizer payload from a file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Payload> {
    let bytes = std::fs::read(path)?;
    load_annotation(&bytes)
}
