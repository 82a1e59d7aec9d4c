//! HTML output adapter.
//!
//! Walks a [`View`] and writes HTML. Block elements go on their own lines,
//! indented two spaces per nesting level; `<pre>` content is written as-is.

use crate::inline::escape_html;
use crate::{List, ListKind, Node, View};

/// Syntax highlighting hook for code blocks.
///
/// Highlighting is optional: when no highlighter is installed, or when it
/// returns `None`, code is written HTML-escaped.
pub trait Highlighter {
    /// Highlighted HTML for `code` in `language`.
    fn highlight(&self, code: &str, language: &str) -> Option<String>;
}

/// Presentation options for [`HtmlWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Class put on the container of rendered content.
    pub container_class: String,
    /// Text shown when there is no document.
    pub not_found_message: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            container_class: "lesson-content".to_string(),
            not_found_message: "Content not found".to_string(),
        }
    }
}

/// Writes views as HTML.
#[derive(Default)]
pub struct HtmlWriter<'h> {
    options: HtmlOptions,
    highlighter: Option<&'h dyn Highlighter>,
}

impl<'h> HtmlWriter<'h> {
    pub fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            highlighter: None,
        }
    }

    pub fn with_highlighter(mut self, highlighter: &'h dyn Highlighter) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    /// The view wrapped in its container element.
    pub fn write(&self, view: &View) -> String {
        let mut html = String::new();
        match view {
            View::NotFound => {
                html.push_str("<div>");
                html.push_str(&escape_html(&self.options.not_found_message));
                html.push_str("</div>\n");
            }
            View::Content(nodes) => {
                html.push_str(&format!(
                    "<div class=\"{}\">\n",
                    escape_html(&self.options.container_class)
                ));
                self.write_nodes(nodes, &mut html, 1);
                html.push_str("</div>\n");
            }
        }
        html
    }

    /// Only what goes inside the container. For the not-found view this is
    /// the escaped message text.
    pub fn write_inner(&self, view: &View) -> String {
        let mut html = String::new();
        match view {
            View::NotFound => html.push_str(&escape_html(&self.options.not_found_message)),
            View::Content(nodes) => self.write_nodes(nodes, &mut html, 0),
        }
        html
    }

    fn write_nodes(&self, nodes: &[Node], out: &mut String, depth: usize) {
        for node in nodes {
            self.write_node(node, out, depth);
        }
    }

    fn write_node(&self, node: &Node, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);

        match node {
            Node::Title { text } => {
                out.push_str(&format!(
                    "{indent}<h1 class=\"content-title\">{}</h1>\n",
                    escape_html(text)
                ));
            }
            Node::Separator => {
                out.push_str(&format!("{indent}<hr class=\"question-separator\">\n"));
            }
            Node::Heading { level, content } => {
                let level = (*level).clamp(1, 6);
                out.push_str(&format!("{indent}<h{level}>{}</h{level}>\n", content.html));
            }
            Node::Paragraph { content } => {
                out.push_str(&format!("{indent}<p>{}</p>\n", content.html));
            }
            Node::List(list) => self.write_list(list, out, depth),
            Node::CodeBlock { code, language } => {
                self.write_code(code, language.as_deref(), out, &indent);
            }
            Node::Collapsible {
                open,
                summary,
                children,
            } => {
                let open_attr = if *open { " open" } else { "" };
                out.push_str(&format!("{indent}<details class=\"collapsible\"{open_attr}>\n"));
                if summary.is_empty() {
                    out.push_str(&format!("{indent}  <summary class=\"empty-title\"></summary>\n"));
                } else {
                    out.push_str(&format!("{indent}  <summary>{}</summary>\n", summary.html));
                }
                out.push_str(&format!("{indent}  <div class=\"collapsible-content\">\n"));
                self.write_nodes(children, out, depth + 2);
                out.push_str(&format!("{indent}  </div>\n"));
                out.push_str(&format!("{indent}</details>\n"));
            }
        }
    }

    fn write_list(&self, list: &List, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let tag = match list.kind {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        };

        out.push_str(&format!("{indent}<{tag}>\n"));
        for item in &list.items {
            if item.children.is_empty() {
                out.push_str(&format!("{indent}  <li>{}</li>\n", item.content.html));
            } else {
                out.push_str(&format!("{indent}  <li>{}\n", item.content.html));
                for child in &item.children {
                    self.write_list(child, out, depth + 2);
                }
                out.push_str(&format!("{indent}  </li>\n"));
            }
        }
        out.push_str(&format!("{indent}</{tag}>\n"));
    }

    fn write_code(&self, code: &str, language: Option<&str>, out: &mut String, indent: &str) {
        // A fence may carry more than a language, e.g. "```rust ignore".
        let language = language.and_then(|l| l.split_whitespace().next());
        let body = match (language, self.highlighter) {
            (Some(language), Some(highlighter)) => highlighter
                .highlight(code, language)
                .unwrap_or_else(|| escape_html(code)),
            _ => escape_html(code),
        };

        match language {
            Some(language) => {
                let class = format!("language-{}", escape_html(language));
                out.push_str(&format!(
                    "{indent}<pre class=\"code-block {class}\"><code class=\"{class}\">{body}</code></pre>\n"
                ));
            }
            None => {
                out.push_str(&format!(
                    "{indent}<pre class=\"code-block\"><code>{body}</code></pre>\n"
                ));
            }
        }
    }
}
