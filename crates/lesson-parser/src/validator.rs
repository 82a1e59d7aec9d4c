//! Structural checks over lesson source and its parsed document.
//!
//! Checks run in a fixed order and the first failure wins. The messages are
//! shown to authors verbatim and are matched by [`crate::explain`], so they
//! must not change.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::Document;
use crate::parser::Parser;

/// A structural problem in lesson source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Parser returned invalid data")]
    InvalidDocument,

    #[error("Content is empty")]
    EmptyContent,

    #[error("Missing title - content should start with \"# Title\"")]
    MissingTitle,

    #[error("No content blocks found - add some text or questions after the title")]
    NoBlocks,

    #[error("Unmatched code block - every ``` opening must have a closing ```")]
    UnmatchedCodeBlock,

    #[error("Content blocks are empty - add text or code to your questions")]
    EmptyBlocks,
}

/// A bare fence, or a fence followed by a single word such as a language.
static FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(\s*\w+)?$").expect("fence pattern is valid"));

/// Validate raw source against the document parsed from it.
///
/// `parsed` is `None` when there is no document to check, which is always
/// reported first, even for empty source.
pub fn validate(raw: &str, parsed: Option<&Document>) -> Result<(), ValidationError> {
    let Some(doc) = parsed else {
        return Err(ValidationError::InvalidDocument);
    };

    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }

    if doc.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }

    if doc.blocks.is_empty() {
        return Err(ValidationError::NoBlocks);
    }

    if fence_line_count(raw) % 2 != 0 {
        return Err(ValidationError::UnmatchedCodeBlock);
    }

    if doc.blocks.iter().all(|block| block.is_empty()) {
        return Err(ValidationError::EmptyBlocks);
    }

    Ok(())
}

/// Parse and validate in one go, handing back the document when it is valid.
pub fn validate_source(raw: &str) -> Result<Document, ValidationError> {
    let doc = Parser::parse(raw);
    validate(raw, Some(&doc))?;
    Ok(doc)
}

fn fence_line_count(raw: &str) -> usize {
    raw.lines()
        .filter(|line| FENCE_LINE.is_match(line.trim()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Block;

    fn check(source: &str) -> Result<(), ValidationError> {
        validate(source, Some(&Parser::parse(source)))
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    #[test]
    fn test_missing_document_wins_over_empty_text() {
        assert_eq!(validate("", None), Err(ValidationError::InvalidDocument));
        assert_eq!(
            ValidationError::InvalidDocument.to_string(),
            "Parser returned invalid data"
        );
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(check("   \n\t\n"), Err(ValidationError::EmptyContent));
        assert_eq!(ValidationError::EmptyContent.to_string(), "Content is empty");
    }

    #[test]
    fn test_missing_title() {
        assert_eq!(check("Just a question"), Err(ValidationError::MissingTitle));
        assert_eq!(
            ValidationError::MissingTitle.to_string(),
            "Missing title - content should start with \"# Title\""
        );
    }

    #[test]
    fn test_no_blocks() {
        assert_eq!(check("# Title only"), Err(ValidationError::NoBlocks));
        assert_eq!(
            ValidationError::NoBlocks.to_string(),
            "No content blocks found - add some text or questions after the title"
        );
    }

    #[test]
    fn test_unmatched_fence() {
        assert_eq!(
            check("# T\n\nIntro\n```python\nx = 1"),
            Err(ValidationError::UnmatchedCodeBlock)
        );
        assert_eq!(
            ValidationError::UnmatchedCodeBlock.to_string(),
            "Unmatched code block - every ``` opening must have a closing ```"
        );
    }

    #[test]
    fn test_empty_blocks() {
        let doc = Document::new("T", vec![Block::default(), Block::default()]);
        assert_eq!(
            validate("# T\n---\n---", Some(&doc)),
            Err(ValidationError::EmptyBlocks)
        );
        assert_eq!(
            ValidationError::EmptyBlocks.to_string(),
            "Content blocks are empty - add text or code to your questions"
        );
    }

    // =========================================================================
    // Fence counting
    // =========================================================================

    #[test]
    fn test_balanced_fences_pass() {
        assert_eq!(check("# T\n\n```java\nx\n```\n\n```\ny\n```"), Ok(()));
    }

    #[test]
    fn test_spaced_language_counts_as_fence() {
        assert_eq!(fence_line_count("``` java\nx\n```"), 2);
    }

    #[test]
    fn test_fence_with_trailing_text_not_counted() {
        assert_eq!(fence_line_count("```rust ignore\n```"), 1);
        assert_eq!(fence_line_count("```c++\n```"), 1);
    }

    #[test]
    fn test_indented_fences_counted() {
        assert_eq!(fence_line_count("  ```\n  x\n  ```"), 2);
    }

    // =========================================================================
    // Convenience
    // =========================================================================

    #[test]
    fn test_validate_source_returns_document() {
        let doc = validate_source("# Loops\n\nWhat prints?").unwrap();
        assert_eq!(doc.title, "Loops");
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_validate_source_reports_error() {
        assert_eq!(validate_source(""), Err(ValidationError::EmptyContent));
    }
}
