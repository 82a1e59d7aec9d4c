use crate::token::{Span, Token, TokenKind, FENCE, SEPARATOR, TITLE_PREFIX};

/// Lesson source scanner.
///
/// Walks the source one line at a time and classifies each line. Classification
/// only looks at the trimmed line; the raw line is carried along so the parser
/// can keep code indentation verbatim.
///
/// Line terminators may be `\n` or `\r\n`. A trailing terminator does not
/// produce an extra blank line.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source into a vector of tokens, one per line plus `Eof`.
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source);
        scanner.scan_lines();
        scanner.tokens
    }

    fn scan_lines(&mut self) {
        while !self.is_at_end() {
            self.scan_line();
        }

        let end = self.source.len();
        self.tokens
            .push(Token::new(TokenKind::Eof, "", Span::new(end, end, self.line)));
        log::trace!("scanned {} lines", self.line - 1);
    }

    fn scan_line(&mut self) {
        let rest = &self.source[self.pos..];
        let (segment, consumed) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], idx + 1),
            None => (rest, rest.len()),
        };
        let raw = segment.strip_suffix('\r').unwrap_or(segment);

        let start = self.pos;
        let span = Span::new(start, start + raw.len(), self.line);
        self.tokens.push(Token::new(classify(raw), raw, span));

        self.pos += consumed;
        self.line += 1;
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Classify a single raw line.
pub fn classify(raw: &str) -> TokenKind {
    let line = raw.trim();

    if line.is_empty() {
        TokenKind::Blank
    } else if let Some(title) = line.strip_prefix(TITLE_PREFIX) {
        TokenKind::Title(title.trim().to_string())
    } else if line == SEPARATOR {
        TokenKind::Separator
    } else if let Some(info) = line.strip_prefix(FENCE) {
        let language = info.trim_start_matches('`').trim();
        TokenKind::Fence {
            language: (!language.is_empty()).then(|| language.to_string()),
        }
    } else {
        TokenKind::Text(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::tokenize(source)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn fence(language: Option<&str>) -> TokenKind {
        TokenKind::Fence {
            language: language.map(str::to_string),
        }
    }

    // =========================================================================
    // Empty / simple
    // =========================================================================

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_single_text_line() {
        assert_eq!(
            kinds("Hello"),
            vec![TokenKind::Text("Hello".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        assert_eq!(
            kinds("Hello\n"),
            vec![TokenKind::Text("Hello".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(
            kinds("\n   \n\t"),
            vec![
                TokenKind::Blank,
                TokenKind::Blank,
                TokenKind::Blank,
                TokenKind::Eof
            ]
        );
    }

    // =========================================================================
    // Structural lines
    // =========================================================================

    #[test]
    fn test_title() {
        assert_eq!(
            kinds("#   My Lesson  "),
            vec![TokenKind::Title("My Lesson".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_heading_levels_are_text() {
        assert_eq!(
            kinds("## Part A"),
            vec![TokenKind::Text("## Part A".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_hash_without_space_is_text() {
        assert_eq!(
            kinds("#hashtag"),
            vec![TokenKind::Text("#hashtag".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_separator() {
        assert_eq!(kinds("  ---  "), vec![TokenKind::Separator, TokenKind::Eof]);
    }

    #[test]
    fn test_longer_rule_is_text() {
        assert_eq!(
            kinds("----"),
            vec![TokenKind::Text("----".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_bare_fence() {
        assert_eq!(kinds("```"), vec![fence(None), TokenKind::Eof]);
    }

    #[test]
    fn test_fence_with_language() {
        assert_eq!(kinds("```python"), vec![fence(Some("python")), TokenKind::Eof]);
    }

    #[test]
    fn test_fence_with_spaced_language() {
        assert_eq!(kinds("``` java "), vec![fence(Some("java")), TokenKind::Eof]);
    }

    // =========================================================================
    // Raw text and spans
    // =========================================================================

    #[test]
    fn test_raw_keeps_indentation() {
        let tokens = Scanner::tokenize("    return 1;");
        assert_eq!(tokens[0].raw, "    return 1;");
        assert_eq!(tokens[0].kind, TokenKind::Text("return 1;".into()));
    }

    #[test]
    fn test_crlf_is_stripped() {
        let tokens = Scanner::tokenize("A\r\nB\r\n");
        assert_eq!(tokens[0].raw, "A");
        assert_eq!(tokens[1].raw, "B");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Scanner::tokenize("# T\n\nBody");
        assert_eq!(tokens[0].span, Span::new(0, 3, 1));
        assert_eq!(tokens[1].span, Span::new(4, 4, 2));
        assert_eq!(tokens[2].span, Span::new(5, 9, 3));
        assert_eq!(tokens[3].span.line, 4);
    }

    #[test]
    fn test_full_lesson() {
        let source = "# Loops\n\nWhat prints?\n```js\nfor (;;) {}\n```\n---\nNext";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Title("Loops".into()),
                TokenKind::Blank,
                TokenKind::Text("What prints?".into()),
                fence(Some("js")),
                TokenKind::Text("for (;;) {}".into()),
                fence(None),
                TokenKind::Separator,
                TokenKind::Text("Next".into()),
                TokenKind::Eof,
            ]
        );
    }
}
