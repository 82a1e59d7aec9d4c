/// A position in source text. `line` is 1-based; `start`/`end` are byte offsets
/// of the raw line (excluding the line terminator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }
}

/// Marker that opens a title line.
pub const TITLE_PREFIX: &str = "# ";

/// A line consisting of exactly this text separates question blocks.
pub const SEPARATOR: &str = "---";

/// Code fence delimiter.
pub const FENCE: &str = "```";

/// Line classification for lesson source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Empty after trimming.
    Blank,

    /// `# Title`; carries the trimmed text after the marker.
    Title(String),

    /// `---`
    Separator,

    /// A fence line. `language` is whatever follows the backticks, trimmed,
    /// or `None` when nothing does.
    Fence { language: Option<String> },

    /// Any other line; carries the trimmed text.
    Text(String),

    /// End of input
    Eof,
}

/// One classified source line.
///
/// `raw` is the line exactly as written (minus any `\r`), which code blocks
/// need to keep indentation intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub raw: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, raw: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            raw: raw.into(),
            span,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.kind, TokenKind::Blank)
    }
}
