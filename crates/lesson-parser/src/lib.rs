//! Lesson DSL Parser
//!
//! Turns lesson source text into a [`Document`] and back again, and checks
//! source for structural problems.
//!
//! ```text
//! source ──parse──▶ Document ──generate──▶ source
//!    └──────────validate(source, Document)──▶ Result<(), ValidationError>
//! ```
//!
//! Parsing never fails: malformed input always degrades to *some* document.
//! Validation is the only layer that reports problems, and [`explain`] turns
//! its diagnostics into longer guidance for authors.

pub mod ast;
pub mod explain;
pub mod generator;
pub mod parser;
pub mod validator;

pub use ast::{Block, BlockKind, ContentItem, Document};
pub use explain::{explain, ErrorCategory};
pub use generator::generate;
pub use parser::Parser;
pub use validator::{validate, validate_source, ValidationError};

/// Parse lesson source into a document. Shorthand for [`Parser::parse`].
pub fn parse(source: &str) -> Document {
    Parser::parse(source)
}
