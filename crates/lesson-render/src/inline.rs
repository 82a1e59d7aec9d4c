//! Inline formatting.
//!
//! Applied to every piece of text that ends up as HTML. The order is fixed:
//! escape, links, emphasis (bold-italic, bold, italic), inline code. Escaping
//! first means source HTML can never survive as markup, and the formatting
//! markers themselves are plain characters that escaping leaves alone.
//!
//! Underscore emphasis only starts and ends at word boundaries so that
//! `snake_case_names` stay intact. Finished links are set aside while the
//! later passes run, so only the link text is formatted and the URL never is.

use std::sync::LazyLock;

use regex::Regex;

fn pattern(source: &str) -> Regex {
    Regex::new(source).unwrap_or_else(|e| panic!("invalid inline pattern {source:?}: {e}"))
}

static LINK: LazyLock<Regex> = LazyLock::new(|| pattern(r"\[([^\]]+)\]\(([^)\s]+)\)"));

static BOLD_ITALIC: LazyLock<[Regex; 2]> =
    LazyLock::new(|| [pattern(r"\*\*\*(.+?)\*\*\*"), pattern(r"\b___(.+?)___\b")]);

static BOLD: LazyLock<[Regex; 2]> =
    LazyLock::new(|| [pattern(r"\*\*(.+?)\*\*"), pattern(r"\b__(.+?)__\b")]);

static ITALIC: LazyLock<[Regex; 2]> =
    LazyLock::new(|| [pattern(r"\*(.+?)\*"), pattern(r"\b_(.+?)_\b")]);

static CODE: LazyLock<Regex> = LazyLock::new(|| pattern(r"`([^`]+)`"));

/// Stands in for a finished link. Private-use characters, so no pass matches.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| pattern("\u{E000}(\\d+)\u{E001}"));

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format raw text as inline HTML.
pub fn process_inline_code(text: &str) -> String {
    let html = escape_html(text);

    let mut links = Vec::new();
    let html = LINK.replace_all(&html, |caps: &regex::Captures| {
        links.push(format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            &caps[2],
            format_spans(&caps[1])
        ));
        format!("\u{E000}{}\u{E001}", links.len() - 1)
    });

    let html = format_spans(&html);
    if links.is_empty() {
        return html;
    }

    PLACEHOLDER
        .replace_all(&html, |caps: &regex::Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| links.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

/// Emphasis then inline code, over already-escaped text.
fn format_spans(html: &str) -> String {
    let mut html = html.to_string();
    for (patterns, replacement) in [
        (&*BOLD_ITALIC, "<strong><em>${1}</em></strong>"),
        (&*BOLD, "<strong>${1}</strong>"),
        (&*ITALIC, "<em>${1}</em>"),
    ] {
        for re in patterns {
            html = re.replace_all(&html, replacement).into_owned();
        }
    }
    CODE.replace_all(&html, "<code>${1}</code>").into_owned()
}
