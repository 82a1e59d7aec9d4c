//! Lesson Content Renderer
//!
//! Turns lesson documents into an abstract display tree, then hands that
//! tree to an output adapter. Building the tree is where all the decisions
//! live (headings, paragraphs, list nesting, code, collapsible sections);
//! the adapters only decide how each node looks.
//!
//! ```text
//! Document ──render()──▶ View ──html::HtmlWriter──▶ HTML
//!                           └───text::to_text────▶ plain text
//! ```
//!
//! Rendering never fails. A missing document renders as [`View::NotFound`].

pub mod html;
pub mod inline;
pub mod lists;
pub mod text;

mod builder;

use lesson_parser::Document;
use serde::Serialize;

pub use html::{Highlighter, HtmlOptions, HtmlWriter};
pub use inline::{escape_html, process_inline_code};

/// The result of rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "nodes", rename_all = "snake_case")]
pub enum View {
    /// No document was available.
    NotFound,
    /// A flat stream of top-level nodes.
    Content(Vec<Node>),
}

impl View {
    pub fn nodes(&self) -> &[Node] {
        match self {
            View::NotFound => &[],
            View::Content(nodes) => nodes,
        }
    }
}

/// Inline text in both its source form and its formatted HTML form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inline {
    pub text: String,
    pub html: String,
}

impl Inline {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            html: process_inline_code(text),
        }
    }

    /// True when there is nothing visible to show.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A node in the display tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// The document title.
    Title { text: String },

    /// Boundary between two question blocks or two documents.
    Separator,

    /// `#`-style heading inside block text, level 1 to 6.
    Heading { level: u8, content: Inline },

    Paragraph { content: Inline },

    List(List),

    CodeBlock {
        code: String,
        language: Option<String>,
    },

    Collapsible {
        open: bool,
        summary: Inline,
        children: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// A list. Nested lists hang off the item they were opened under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub content: Inline,
    pub children: Vec<List>,
}

/// Render a single document, or the not-found view when there is none.
pub fn render(doc: Option<&Document>) -> View {
    match doc {
        Some(doc) => {
            let mut nodes = Vec::new();
            builder::render_document(doc, &mut nodes);
            View::Content(nodes)
        }
        None => {
            log::debug!("rendering not-found view");
            View::NotFound
        }
    }
}

/// Render several documents into one stream, with a separator between
/// consecutive documents.
pub fn render_multiple(docs: &[Document]) -> View {
    let mut nodes = Vec::new();
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 {
            nodes.push(Node::Separator);
        }
        builder::render_document(doc, &mut nodes);
    }
    View::Content(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_parser::{Block, ContentItem, Parser};
    use pretty_assertions::assert_eq;

    fn paragraph(text: &str) -> Node {
        Node::Paragraph {
            content: Inline::new(text),
        }
    }

    // =========================================================================
    // Single documents
    // =========================================================================

    #[test]
    fn test_missing_document() {
        assert_eq!(render(None), View::NotFound);
        assert!(render(None).nodes().is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render(Some(&Document::default())), View::Content(Vec::new()));
    }

    #[test]
    fn test_title_and_blocks() {
        let doc = Parser::parse("# Loops\n\nA\n---\nB");
        assert_eq!(
            render(Some(&doc)),
            View::Content(vec![
                Node::Title {
                    text: "Loops".into()
                },
                paragraph("A"),
                Node::Separator,
                paragraph("B"),
            ])
        );
    }

    #[test]
    fn test_render_does_not_touch_input() {
        let doc = Parser::parse("# T\n\n- a\n  - b\n```\nx\n```");
        let before = doc.clone();
        let _ = render(Some(&doc));
        assert_eq!(doc, before);
    }

    // =========================================================================
    // Multiple documents
    // =========================================================================

    #[test]
    fn test_render_multiple_separators() {
        let first = Parser::parse("# One\n\nA\n---\nB");
        let second = Parser::parse("# Two\n\nC");
        let nodes = render_multiple(&[first, second]);
        assert_eq!(
            nodes,
            View::Content(vec![
                Node::Title { text: "One".into() },
                paragraph("A"),
                Node::Separator,
                paragraph("B"),
                Node::Separator,
                Node::Title { text: "Two".into() },
                paragraph("C"),
            ])
        );
    }

    #[test]
    fn test_render_multiple_empty() {
        assert_eq!(render_multiple(&[]), View::Content(Vec::new()));
    }

    #[test]
    fn test_render_multiple_no_leading_separator() {
        let doc = Document::new("", vec![Block::question(vec![ContentItem::text("x")])]);
        let view = render_multiple(&[doc.clone(), doc]);
        assert_eq!(view.nodes().first(), Some(&paragraph("x")));
        assert_eq!(view.nodes().len(), 3);
    }

    // =========================================================================
    // Serialized tree
    // =========================================================================

    #[test]
    fn test_view_serializes_with_tags() {
        let doc = Parser::parse("# T\n\nHi");
        let json = serde_json::to_value(render(Some(&doc))).unwrap();
        assert_eq!(json["kind"], "content");
        assert_eq!(json["nodes"][0]["type"], "title");
        assert_eq!(json["nodes"][1]["type"], "paragraph");
        assert_eq!(json["nodes"][1]["content"]["html"], "Hi");
    }
}
