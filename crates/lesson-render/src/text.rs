//! Plain-text output adapter, used for terminal previews.
//!
//! Inline text is shown in its source form; only structure is drawn.

use crate::{List, ListKind, Node, View};

const RULE: &str = "----------------------------------------";

/// Render a view as plain text.
pub fn to_text(view: &View, not_found_message: &str) -> String {
    match view {
        View::NotFound => format!("{not_found_message}\n"),
        View::Content(nodes) => {
            let mut lines = Vec::new();
            write_nodes(nodes, &mut lines, 0);
            let mut text = lines.join("\n");
            if !text.is_empty() {
                text.push('\n');
            }
            text
        }
    }
}

fn write_nodes(nodes: &[Node], lines: &mut Vec<String>, depth: usize) {
    for node in nodes {
        write_node(node, lines, depth);
    }
}

fn write_node(node: &Node, lines: &mut Vec<String>, depth: usize) {
    let indent = "  ".repeat(depth);

    match node {
        Node::Title { text } => {
            lines.push(format!("{indent}{text}"));
            lines.push(format!("{indent}{}", "=".repeat(text.chars().count())));
        }
        Node::Separator => lines.push(format!("{indent}{RULE}")),
        Node::Heading { level, content } => {
            lines.push(format!(
                "{indent}{} {}",
                "#".repeat(usize::from(*level)),
                content.text
            ));
        }
        Node::Paragraph { content } => lines.push(format!("{indent}{}", content.text)),
        Node::List(list) => write_list(list, lines, depth),
        Node::CodeBlock { code, language } => {
            lines.push(format!("{indent}```{}", language.as_deref().unwrap_or_default()));
            lines.extend(code.split('\n').map(|line| format!("{indent}{line}")));
            lines.push(format!("{indent}```"));
        }
        Node::Collapsible {
            open,
            summary,
            children,
        } => {
            let marker = if *open { "[-]" } else { "[+]" };
            lines.push(format!("{indent}{marker} {}", summary.text).trim_end().to_string());
            write_nodes(children, lines, depth + 1);
        }
    }
}

fn write_list(list: &List, lines: &mut Vec<String>, depth: usize) {
    let indent = "  ".repeat(depth);
    for (i, item) in list.items.iter().enumerate() {
        let marker = match list.kind {
            ListKind::Ordered => format!("{}.", i + 1),
            ListKind::Unordered => "-".to_string(),
        };
        lines.push(format!("{indent}{marker} {}", item.content.text));
        for child in &item.children {
            write_list(child, lines, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render, render_multiple};
    use lesson_parser::{Block, ContentItem, Document, Parser};
    use pretty_assertions::assert_eq;

    fn text_of(doc: &Document) -> String {
        to_text(&render(Some(doc)), "Content not found")
    }

    #[test]
    fn test_not_found() {
        assert_eq!(to_text(&View::NotFound, "Nothing here"), "Nothing here\n");
    }

    #[test]
    fn test_empty_view() {
        assert_eq!(to_text(&View::Content(Vec::new()), "x"), "");
    }

    #[test]
    fn test_full_document() {
        let doc = Parser::parse("# Loops\n\n## Warm up\nWhat is **i**?\n```py\nfor i in x:\n    pass\n```\n---\n1. one\n2. two");
        assert_eq!(
            text_of(&doc),
            "Loops\n=====\n## Warm up\nWhat is **i**?\n```py\nfor i in x:\n    pass\n```\n----------------------------------------\n1. one\n2. two\n"
        );
    }

    #[test]
    fn test_nested_list_and_collapsible() {
        let doc = Document::new(
            "",
            vec![Block::question(vec![
                ContentItem::text("- a\n  - b"),
                ContentItem::collapsible("Hint", false, vec![ContentItem::text("look up")]),
            ])],
        );
        assert_eq!(text_of(&doc), "- a\n  - b\n[+] Hint\n  look up\n");
    }

    #[test]
    fn test_multiple_documents() {
        let docs = [Parser::parse("# A\n\nx"), Parser::parse("# B\n\ny")];
        let text = to_text(&render_multiple(&docs), "");
        assert_eq!(text.matches(RULE).count(), 1);
        assert!(text.starts_with("A\n=\nx\n"));
    }
}
