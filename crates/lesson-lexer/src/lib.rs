//! Lesson DSL Lexer
//!
//! Classifies lesson source text line by line. The DSL is line-oriented, so
//! every input line becomes exactly one token: a title (`# `), a block
//! separator (`---`), a code fence (three backticks, optionally followed by a
//! language), plain text, or a blank line.
//!
//! The scanner never fails; malformed structure is the validator's concern.
//!
//! # Example
//!
//! ```
//! use lesson_lexer::{Scanner, TokenKind};
//!
//! let tokens = Scanner::tokenize("");
//! assert_eq!(tokens.len(), 1); // Just EOF
//! assert_eq!(tokens[0].kind, TokenKind::Eof);
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Span, Token, TokenKind, FENCE, SEPARATOR, TITLE_PREFIX};
