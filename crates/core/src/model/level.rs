//! Granularity levels at which text and boundaries are computed.

use std::fmt;
use std::str::FromStr;

use crate::error::OverlayError;

/// Tree depth selected for text reconstruction and boundary output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Granularity {
    #[default]
    Blocks,
    Paragraphs,
    Words,
    Symbols,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Blocks,
        Granularity::Paragraphs,
        Granularity::Words,
        Granularity::Symbols,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Granularity::Blocks => "blocks",
            Granularity::Paragraphs => "paragraphs",
            Granularity::Words => "words",
            Granularity::Symbols => "symbols",
        }
    }

    /// Human-readable label used in boundary tooltips.
    pub const fn label(self) -> &'static str {
        match self {
            Granularity::Blocks => "Block",
            Granularity::Paragraphs => "Paragraph",
            Granularity::Words => "Word",
            Granularity::Symbols => "Symbol",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocks" | "block" => Ok(Granularity::Blocks),
            "paragraphs" | "paragraph" => Ok(Granularity::Paragraphs),
            "words" | "word" => Ok(Granularity::Words),
            "symbols" | "symbol" => Ok(Granularity::Symbols),
            _ => Err(OverlayError::UnsupportedLevel(s.to_string())),
        }
    }
}
