//! Text reconstruction and export.

pub mod export;
pub mod language;
pub mod reconstruct;

pub use export::{TextMode, TextOptions, clean_spaces, export_text, filtered_text};
pub use language::LanguageRules;
pub use reconstruct::{CollectedText, TextReconstructor, document_text};
