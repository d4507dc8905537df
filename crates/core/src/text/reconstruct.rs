//! Text reconstruction at a chosen granularity.
//!
//! Descends from a block, paragraph or word down to its symbols and
//! reassembles their text, inserting separators from the recognizer's break
//! hints on matched symbols.

use crate::filter::SymbolRecord;
use crate::matcher::SymbolMatcher;
use crate::model::{BreakHint, Document, Granularity, NodeRef, Symbol};
use crate::params::OverlayParams;

/// Reconstructed text of one node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectedText {
    pub text: String,
    /// True iff at least one descendant symbol contributed text.
    pub has_text: bool,
}

/// Reassembles node text against one snapshot of the symbol records.
pub struct TextReconstructor<'a> {
    matcher: SymbolMatcher<'a>,
    min_vertices: usize,
}

impl<'a> TextReconstructor<'a> {
    pub fn new(records: &'a [SymbolRecord], zoom: f64, params: &OverlayParams) -> Self {
        Self {
            matcher: SymbolMatcher::new(records, zoom, params),
            min_vertices: params.min_vertices,
        }
    }

    /// Reconstructs the text below `node`.
    ///
    /// A symbol node reconstructs to its own text, and has text when it is
    /// matched or when it is non-empty with a drawable polygon.
    pub fn collect(&self, node: NodeRef<'_>) -> CollectedText {
        if let NodeRef::Symbol(symbol) = node {
            return self.collect_symbol(symbol);
        }

        let mut out = CollectedText::default();
        for symbol in node.symbols() {
            self.push_symbol(symbol, &mut out);
        }
        out
    }

    fn collect_symbol(&self, symbol: &Symbol) -> CollectedText {
        let drawable = symbol
            .bounding_box
            .as_ref()
            .is_some_and(|p| p.usable_vertex_count() >= self.min_vertices);
        let has_text =
            self.matcher.find(symbol).is_some() || (!symbol.text.is_empty() && drawable);
        CollectedText {
            text: symbol.text.to_string(),
            has_text,
        }
    }

    fn push_symbol(&self, symbol: &Symbol, out: &mut CollectedText) {
        match self.matcher.find(symbol) {
            Some(record) => {
                out.has_text = true;
                out.text.push_str(&symbol.text);
                if let Some(sep) = BreakHint::separator(record.break_hint) {
                    out.text.push(sep);
                }
            }
            // Skewed geometry defeats matching; keep the text with a space.
            None if !symbol.text.is_empty() => {
                out.has_text = true;
                out.text.push_str(&symbol.text);
                out.text.push(' ');
            }
            None => {}
        }
    }
}

/// Reconstructed text of every node at `level`, one entry per node with text.
pub fn document_text(
    doc: &Document,
    level: Granularity,
    records: &[SymbolRecord],
    zoom: f64,
    params: &OverlayParams,
) -> String {
    let reconstructor = TextReconstructor::new(records, zoom, params);
    let joiner = match level {
        Granularity::Blocks | Granularity::Paragraphs => "\n\n",
        Granularity::Words => " ",
        Granularity::Symbols => "",
    };

    doc.nodes_at(level)
        .into_iter()
        .map(|node| reconstructor.collect(node))
        .filter(|c| c.has_text)
        .map(|c| c.text.trim_end().to_string())
        .collect::<Vec<_>>()
        .join(joiner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterRange, build_records};
    use crate::model::{Block, Page, Paragraph, Polygon, Word};

    fn two_words() -> Document {
        let w1 = Word::new(
            Polygon::rect(0.0, 0.0, 20.0, 10.0),
            vec![
                Symbol::new("o", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
                Symbol::new("k", Polygon::rect(10.0, 0.0, 10.0, 10.0))
                    .with_break(BreakHint::LineBreak),
            ],
        );
        let w2 = Word::new(
            Polygon::rect(0.0, 40.0, 10.0, 10.0),
            vec![Symbol::new("!", Polygon::rect(0.0, 40.0, 10.0, 10.0))],
        );
        Document::new(vec![Page::new(vec![Block::new(
            Polygon::rect(0.0, 0.0, 100.0, 100.0),
            vec![Paragraph::new(Polygon::rect(0.0, 0.0, 100.0, 100.0), vec![w1, w2])],
        )])])
    }

    #[test]
    fn test_line_break_hint_inserts_newline() {
        let doc = two_words();
        let params = OverlayParams::default();
        let records = build_records(&doc, &FilterRange::unbounded(), 3);
        let reconstructor = TextReconstructor::new(&records, 1.0, &params);

        let block = reconstructor.collect(NodeRef::Block(&doc.pages[0].blocks[0]));
        assert_eq!(block.text, "ok\n!");
        assert!(block.has_text);
    }

    #[test]
    fn test_symbol_level_is_identity() {
        let doc = two_words();
        let params = OverlayParams::default();
        let records = build_records(&doc, &FilterRange::unbounded(), 3);
        let reconstructor = TextReconstructor::new(&records, 1.0, &params);

        let symbol = doc.symbols().nth(1).unwrap();
        let collected = reconstructor.collect(NodeRef::Symbol(symbol));
        assert_eq!(collected.text, "k");
        assert!(collected.has_text);
    }

    #[test]
    fn test_empty_unmatched_symbols_contribute_nothing() {
        let word = Word::new(
            Polygon::rect(0.0, 0.0, 10.0, 10.0),
            vec![Symbol::new("", Polygon::rect(0.0, 0.0, 10.0, 10.0))],
        );
        let params = OverlayParams::default();
        let collected = TextReconstructor::new(&[], 1.0, &params).collect(NodeRef::Word(&word));
        assert_eq!(collected, CollectedText::default());
    }

    #[test]
    fn test_document_text_joins_by_level() {
        let doc = two_words();
        let params = OverlayParams::default();
        let records = build_records(&doc, &FilterRange::unbounded(), 3);

        assert_eq!(
            document_text(&doc, Granularity::Words, &records, 1.0, &params),
            "ok !"
        );
        assert_eq!(
            document_text(&doc, Granularity::Symbols, &records, 1.0, &params),
            "ok!"
        );
    }
}
