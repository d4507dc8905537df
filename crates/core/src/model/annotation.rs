//! Annotation tree types: Document, Page, Block, Paragraph, Word, Symbol.
//!
//! The tree is deserialized once from the recognizer payload and is read-only
//! afterwards. Field names follow the recognizer's camelCase JSON so that a
//! `fullTextAnnotation` object deserializes directly into [`Document`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;

use super::level::Granularity;

/// A polygon vertex. Coordinates omitted by the recognizer stay `None` and are
/// never treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Vertex {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// Returns both coordinates when present and finite.
    pub fn point(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        }
    }
}

/// Ordered vertex list, implicitly closed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(default)]
    pub vertices: SmallVec<[Vertex; 4]>,
}

impl Polygon {
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self {
            vertices: points.iter().map(|&(x, y)| Vertex::new(x, y)).collect(),
        }
    }

    /// Axis-aligned rectangle polygon in recognizer order (top-left first,
    /// clockwise).
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_points(&[
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
        ])
    }

    /// Number of vertices carrying two finite coordinates.
    pub fn usable_vertex_count(&self) -> usize {
        self.vertices.iter().filter_map(Vertex::point).count()
    }

    /// First vertex, which the recognizer emits as the top-left corner.
    pub fn corner(&self) -> Option<(f64, f64)> {
        self.vertices.first().and_then(Vertex::point)
    }
}

/// Separator the recognizer detected after a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakHint {
    Space,
    EolSureSpace,
    LineBreak,
    /// Line-ending hyphen. Adds no separator in reconstruction.
    Hyphen,
    /// Any other break kind. Adds no separator.
    #[serde(other)]
    Other,
}

impl BreakHint {
    /// Separator appended after a matched symbol.
    pub fn separator(hint: Option<Self>) -> Option<char> {
        match hint {
            Some(Self::Space | Self::EolSureSpace) => Some(' '),
            Some(Self::LineBreak) => Some('\n'),
            Some(Self::Hyphen | Self::Other) | None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedBreak {
    #[serde(rename = "type")]
    pub kind: BreakHint,
    #[serde(default)]
    pub is_prefix: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_break: Option<DetectedBreak>,
}

/// Leaf of the tree: one recognized character.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    #[serde(default)]
    pub text: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Polygon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<TextProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Symbol {
    pub fn new(text: &str, polygon: Polygon) -> Self {
        Self {
            text: SmolStr::new(text),
            bounding_box: Some(polygon),
            property: None,
            confidence: None,
        }
    }

    pub fn with_break(mut self, hint: BreakHint) -> Self {
        self.property = Some(TextProperty {
            detected_break: Some(DetectedBreak {
                kind: hint,
                is_prefix: false,
            }),
        });
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn break_hint(&self) -> Option<BreakHint> {
        self.property
            .as_ref()
            .and_then(|p| p.detected_break)
            .map(|b| b.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Polygon>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Word {
    pub fn new(polygon: Polygon, symbols: Vec<Symbol>) -> Self {
        Self {
            bounding_box: Some(polygon),
            symbols,
            confidence: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Polygon>,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Paragraph {
    pub fn new(polygon: Polygon, words: Vec<Word>) -> Self {
        Self {
            bounding_box: Some(polygon),
            words,
            confidence: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<Polygon>,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Block {
    pub fn new(polygon: Polygon, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            bounding_box: Some(polygon),
            paragraphs,
            block_type: None,
            confidence: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Page {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }
}

/// Root of the annotation tree (`fullTextAnnotation`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Full recognized text, when the recognizer supplies it.
    #[serde(default)]
    pub text: String,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            text: String::new(),
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks().flat_map(|b| b.paragraphs.iter())
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.paragraphs().flat_map(|p| p.words.iter())
    }

    /// Every symbol in flattening order (page, block, paragraph, word).
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.words().flat_map(|w| w.symbols.iter())
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols().count()
    }

    /// Every node at `level`, in traversal order.
    pub fn nodes_at(&self, level: Granularity) -> Vec<NodeRef<'_>> {
        match level {
            Granularity::Blocks => self.blocks().map(NodeRef::Block).collect(),
            Granularity::Paragraphs => self.paragraphs().map(NodeRef::Paragraph).collect(),
            Granularity::Words => self.words().map(NodeRef::Word).collect(),
            Granularity::Symbols => self.symbols().map(NodeRef::Symbol).collect(),
        }
    }

    /// Largest page dimensions declared by the recognizer, if any.
    pub fn page_dimensions(&self) -> Option<(f64, f64)> {
        self.pages
            .iter()
            .filter_map(|p| Some((p.width?, p.height?)))
            .reduce(|a, b| (a.0.max(b.0), a.1.max(b.1)))
    }
}

/// Borrowed view of any geometry-bearing node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Block(&'a Block),
    Paragraph(&'a Paragraph),
    Word(&'a Word),
    Symbol(&'a Symbol),
}

impl<'a> NodeRef<'a> {
    pub fn level(&self) -> Granularity {
        match self {
            NodeRef::Block(_) => Granularity::Blocks,
            NodeRef::Paragraph(_) => Granularity::Paragraphs,
            NodeRef::Word(_) => Granularity::Words,
            NodeRef::Symbol(_) => Granularity::Symbols,
        }
    }

    pub fn polygon(&self) -> Option<&'a Polygon> {
        match self {
            NodeRef::Block(b) => b.bounding_box.as_ref(),
            NodeRef::Paragraph(p) => p.bounding_box.as_ref(),
            NodeRef::Word(w) => w.bounding_box.as_ref(),
            NodeRef::Symbol(s) => s.bounding_box.as_ref(),
        }
    }

    /// Symbol leaves below this node, in traversal order.
    pub fn symbols(&self) -> Box<dyn Iterator<Item = &'a Symbol> + 'a> {
        match *self {
            NodeRef::Block(b) => Box::new(
                b.paragraphs
                    .iter()
                    .flat_map(|p| p.words.iter())
                    .flat_map(|w| w.symbols.iter()),
            ),
            NodeRef::Paragraph(p) => {
                Box::new(p.words.iter().flat_map(|w| w.symbols.iter()))
            }
            NodeRef::Word(w) => Box::new(w.symbols.iter()),
            NodeRef::Symbol(s) => Box::new(std::iter::once(s)),
        }
    }
}
