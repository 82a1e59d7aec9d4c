//! Source generator: the inverse of the parser.
//!
//! Round-tripping through [`generate`] and the parser keeps block count, item
//! order, item types and values. It does not keep exact whitespace, and code
//! fences are always written bare, so a code item's `language` does not
//! survive regeneration.

use crate::ast::{Block, ContentItem, Document};
use lesson_lexer::{FENCE, SEPARATOR, TITLE_PREFIX};

/// Serialize a document back to lesson source.
pub fn generate(doc: &Document) -> String {
    let title_line = format!("{TITLE_PREFIX}{}", doc.title);
    let mut lines: Vec<&str> = Vec::new();

    if !doc.title.is_empty() {
        lines.push(&title_line);
        lines.push("");
    }

    let mut written = 0;
    for block in doc.blocks.iter().filter(|b| has_source_form(b)) {
        if written > 0 {
            lines.push(SEPARATOR);
        }
        for item in &block.content {
            match item {
                ContentItem::Text { value } => lines.push(value),
                ContentItem::Code { value, .. } => {
                    lines.push(FENCE);
                    lines.push(value);
                    lines.push(FENCE);
                }
                ContentItem::Collapsible { title, .. } => {
                    log::debug!("collapsible section {title:?} has no source form, skipped");
                }
            }
        }
        lines.push("");
        written += 1;
    }

    lines.join("\n")
}

/// Whether any item in the block can be written as source.
fn has_source_form(block: &Block) -> bool {
    block
        .content
        .iter()
        .any(|item| !matches!(item, ContentItem::Collapsible { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use pretty_assertions::assert_eq;

    fn question(items: Vec<ContentItem>) -> Block {
        Block::question(items)
    }

    // =========================================================================
    // Output shape
    // =========================================================================

    #[test]
    fn test_empty_document() {
        assert_eq!(generate(&Document::default()), "");
    }

    #[test]
    fn test_title_only() {
        assert_eq!(generate(&Document::new("Loops", Vec::new())), "# Loops\n");
    }

    #[test]
    fn test_blocks_and_separators() {
        let doc = Document::new(
            "T",
            vec![
                question(vec![ContentItem::text("A"), ContentItem::text("A2")]),
                question(vec![ContentItem::text("B")]),
            ],
        );
        assert_eq!(generate(&doc), "# T\n\nA\nA2\n\n---\nB\n");
    }

    #[test]
    fn test_code_fence_is_bare() {
        let doc = Document::new(
            "",
            vec![question(vec![ContentItem::code("  x = 1", Some("python"))])],
        );
        assert_eq!(generate(&doc), "```\n  x = 1\n```\n");
    }

    #[test]
    fn test_empty_blocks_skipped_without_separator() {
        let doc = Document::new(
            "T",
            vec![
                question(Vec::new()),
                question(vec![ContentItem::text("A")]),
                question(Vec::new()),
                question(vec![ContentItem::text("B")]),
            ],
        );
        let source = generate(&doc);
        assert_eq!(source, "# T\n\nA\n\n---\nB\n");
        assert!(!source.contains("---\n---"));
    }

    #[test]
    fn test_collapsible_only_block_skipped() {
        let doc = Document::new(
            "T",
            vec![
                question(vec![ContentItem::collapsible("Hint", false, Vec::new())]),
                question(vec![ContentItem::text("A")]),
            ],
        );
        assert_eq!(generate(&doc), "# T\n\nA\n");
    }

    // =========================================================================
    // Round trip
    // =========================================================================

    #[test]
    fn test_round_trip_block_count() {
        let doc = Document::new(
            "Round",
            vec![
                question(vec![ContentItem::text("one")]),
                question(Vec::new()),
                question(vec![ContentItem::code("a\n\n  b", None), ContentItem::text("two")]),
                question(vec![ContentItem::text("three")]),
            ],
        );
        let reparsed = Parser::parse(&generate(&doc));
        assert_eq!(reparsed.blocks.len(), doc.non_empty_blocks());
    }

    #[test]
    fn test_round_trip_values_and_types() {
        let doc = Document::new(
            "Round",
            vec![
                question(vec![
                    ContentItem::text("What does this print?"),
                    ContentItem::code("for i in range(3):\n    print(i)", None),
                    ContentItem::text("- a list line"),
                ]),
                question(vec![ContentItem::text("**bold** question")]),
            ],
        );
        let reparsed = Parser::parse(&generate(&doc));
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_round_trip_drops_language() {
        let doc = Document::new(
            "T",
            vec![question(vec![ContentItem::code("x", Some("java"))])],
        );
        let reparsed = Parser::parse(&generate(&doc));
        assert_eq!(reparsed.blocks[0].content[0], ContentItem::code("x", None));
    }

    #[test]
    fn test_parse_generate_parse_is_stable() {
        let source = "# Loops\n\nIntro\n```js\nlet i = 0;\n```\n---\n1. first\n2. second\n";
        let once = Parser::parse(source);
        let twice = Parser::parse(&generate(&once));
        assert_eq!(twice.blocks.len(), once.blocks.len());
        assert_eq!(twice.blocks[1], once.blocks[1]);
    }
}
