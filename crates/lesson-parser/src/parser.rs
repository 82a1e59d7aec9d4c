//! Document parser for lesson source.
//!
//! Consumes the line tokens from `lesson-lexer` in a single left-to-right
//! pass. Scan state is an explicit tagged value ([`ScanState`]) and every
//! token is dispatched in a fixed priority order: title, separator, fence,
//! fenced content, text.
//!
//! Quirks that are part of the format:
//! - every `# ` line overwrites the title, the last one wins;
//! - title and separator lines take priority even inside an open fence;
//! - a fence still open at end of input is dropped, its lines are lost;
//! - blocks left empty (e.g. a `---` right after the title) are removed
//!   after the scan.

use crate::ast::{Block, ContentItem, Document};
use lesson_lexer::{Scanner, Token, TokenKind};

/// Lesson document parser.
pub struct Parser {
    tokens: Vec<Token>,
    title: String,
    blocks: Vec<Block>,
}

/// Where the scan currently is.
#[derive(Debug)]
enum ScanState {
    /// Nothing but titles and blank lines seen so far.
    BeforeContent,
    /// A block is open and collecting text.
    Block(Block),
    /// A block is open and a fence is collecting raw lines.
    Fence { block: Block, fence: OpenFence },
}

#[derive(Debug)]
struct OpenFence {
    language: Option<String>,
    lines: Vec<String>,
    opened_at: usize,
}

impl OpenFence {
    fn new(language: Option<String>, opened_at: usize) -> Self {
        Self {
            language,
            lines: Vec::new(),
            opened_at,
        }
    }

    fn into_item(self) -> ContentItem {
        ContentItem::Code {
            value: self.lines.join("\n"),
            language: self.language,
        }
    }
}

impl Parser {
    /// Create a new parser for the given tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            title: String::new(),
            blocks: Vec::new(),
        }
    }

    /// Parse source text into a document. Never fails.
    pub fn parse(source: &str) -> Document {
        Parser::new(Scanner::tokenize(source)).parse_document()
    }

    /// Run the scan over all tokens and assemble the document.
    pub fn parse_document(mut self) -> Document {
        let tokens = std::mem::take(&mut self.tokens);
        let mut state = ScanState::BeforeContent;

        for token in tokens {
            state = self.step(state, token);
        }

        self.finish(state)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn step(&mut self, state: ScanState, token: Token) -> ScanState {
        let line = token.span.line;

        match token.kind {
            TokenKind::Title(title) => {
                if !self.title.is_empty() {
                    log::debug!("line {line}: title {:?} replaces {:?}", title, self.title);
                }
                self.title = title;
                state
            }

            TokenKind::Separator => match state {
                ScanState::BeforeContent => ScanState::Block(Block::default()),
                ScanState::Block(block) => {
                    self.blocks.push(block);
                    ScanState::Block(Block::default())
                }
                ScanState::Fence { block, fence } => {
                    log::debug!("line {line}: separator inside fence opened at line {}", fence.opened_at);
                    self.blocks.push(block);
                    ScanState::Fence {
                        block: Block::default(),
                        fence,
                    }
                }
            },

            TokenKind::Fence { language } => match state {
                ScanState::BeforeContent => ScanState::Fence {
                    block: Block::default(),
                    fence: OpenFence::new(language, line),
                },
                ScanState::Block(block) => ScanState::Fence {
                    block,
                    fence: OpenFence::new(language, line),
                },
                ScanState::Fence { mut block, fence } => {
                    if let Some(closer) = language {
                        log::debug!("line {line}: closing fence carries language {closer:?}");
                    }
                    block.content.push(fence.into_item());
                    ScanState::Block(block)
                }
            },

            TokenKind::Blank => match state {
                ScanState::Fence { block, mut fence } => {
                    fence.lines.push(token.raw);
                    ScanState::Fence { block, fence }
                }
                other => other,
            },

            TokenKind::Text(text) => match state {
                ScanState::Fence { block, mut fence } => {
                    fence.lines.push(token.raw);
                    ScanState::Fence { block, fence }
                }
                ScanState::BeforeContent => {
                    ScanState::Block(Block::question(vec![ContentItem::text(text)]))
                }
                ScanState::Block(mut block) => {
                    block.content.push(ContentItem::text(text));
                    ScanState::Block(block)
                }
            },

            TokenKind::Eof => state,
        }
    }

    fn finish(mut self, state: ScanState) -> Document {
        match state {
            ScanState::BeforeContent => {}
            ScanState::Block(block) => self.blocks.push(block),
            ScanState::Fence { block, fence } => {
                log::debug!(
                    "unterminated fence opened at line {} dropped ({} lines)",
                    fence.opened_at,
                    fence.lines.len()
                );
                self.blocks.push(block);
            }
        }

        let before = self.blocks.len();
        self.blocks.retain(|block| !block.is_empty());
        if self.blocks.len() != before {
            log::trace!("dropped {} empty blocks", before - self.blocks.len());
        }

        Document {
            title: self.title,
            blocks: self.blocks,
        }
    }
}
