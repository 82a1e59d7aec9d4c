//! Walks documents and builds display nodes.

use std::sync::LazyLock;

use lesson_parser::{ContentItem, Document};
use regex::Regex;

use crate::lists::{detect_indent_unit, parse_list_line, ListStack};
use crate::{Inline, Node};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading pattern"));

pub(crate) fn render_document(doc: &Document, out: &mut Vec<Node>) {
    if !doc.title.is_empty() {
        out.push(Node::Title {
            text: doc.title.clone(),
        });
    }

    for (i, block) in doc.blocks.iter().enumerate() {
        if i > 0 {
            out.push(Node::Separator);
        }
        render_items(&block.content, out);
    }
}

/// Render one run of sibling items. List state is shared by every text item
/// in the run and is closed at the end of it.
fn render_items(items: &[ContentItem], out: &mut Vec<Node>) {
    let unit = detect_indent_unit(text_lines(items));
    let mut lists = ListStack::new(unit);

    for item in items {
        match item {
            ContentItem::Text { value } => {
                for line in value.split('\n') {
                    render_line(line.trim_end_matches('\r'), &mut lists, out);
                }
            }
            ContentItem::Code { value, language } => {
                lists.close(out);
                out.push(Node::CodeBlock {
                    code: value.clone(),
                    language: language.clone(),
                });
            }
            ContentItem::Collapsible {
                title,
                expanded,
                content,
            } => {
                lists.close(out);
                let mut children = Vec::new();
                render_items(content, &mut children);
                out.push(Node::Collapsible {
                    open: *expanded,
                    summary: Inline::new(title),
                    children,
                });
            }
        }
    }

    lists.close(out);
}

fn render_line(line: &str, lists: &mut ListStack, out: &mut Vec<Node>) {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return;
    }

    if let Some(captures) = HEADING.captures(trimmed) {
        lists.close(out);
        let level = captures.get(1).map_or(1, |m| m.as_str().len()) as u8;
        let text = captures.get(2).map_or("", |m| m.as_str());
        out.push(Node::Heading {
            level,
            content: Inline::new(text),
        });
        return;
    }

    if let Some(list_line) = parse_list_line(line) {
        lists.push(&list_line, out);
        return;
    }

    lists.close(out);
    out.push(Node::Paragraph {
        content: Inline::new(trimmed),
    });
}

fn text_lines(items: &[ContentItem]) -> impl Iterator<Item = &str> {
    items
        .iter()
        .filter_map(|item| match item {
            ContentItem::Text { value } => Some(value.split('\n')),
            _ => None,
        })
        .flatten()
}
