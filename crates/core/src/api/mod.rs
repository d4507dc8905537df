//! Public entry points for loading recognizer output.
//!
//! # Example
//!
//! ```ignore
//! use ocrlens_core::api::load_file;
//! use ocrlens_core::overlay::Overlay;
//!
//! let payload = load_file("response.json")?;
//! let mut overlay = Overlay::from_payload(payload, Default::default())?;
//! let boundaries = overlay.boundaries();
//! ```

pub mod ingest;

pub use ingest::{Payload, load_annotation, load_file};
