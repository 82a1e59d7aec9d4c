//! Long-form explanations for validation diagnostics.
//!
//! The editor shows the short [`crate::ValidationError`] message inline and
//! this text in the help panel. Matching is by substring so messages from
//! older clients and free-form errors still land in a category.

use std::fmt;

use lesson_lexer::{Scanner, TokenKind};

/// Broad kind of problem an error message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    MissingTitle,
    EmptyContent,
    UnmatchedCodeBlock,
    InvalidStructure,
}

impl ErrorCategory {
    /// Classify an error message.
    pub fn from_message(message: &str) -> Self {
        if message.contains("Missing title") {
            ErrorCategory::MissingTitle
        } else if message.contains("Empty content") {
            ErrorCategory::EmptyContent
        } else if message.contains("Unmatched code block") {
            ErrorCategory::UnmatchedCodeBlock
        } else {
            ErrorCategory::InvalidStructure
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::MissingTitle => "Missing title",
            ErrorCategory::EmptyContent => "Empty content",
            ErrorCategory::UnmatchedCodeBlock => "Unmatched code block",
            ErrorCategory::InvalidStructure => "Invalid content structure",
        }
    }

    fn guidance(self) -> &'static str {
        match self {
            ErrorCategory::MissingTitle => {
                "Every lesson needs a title on its own line, starting with \"# \" \
                 (a hash followed by a space). For example:\n\n    # My Lesson Title"
            }
            ErrorCategory::EmptyContent => {
                "The lesson has no content yet. Add a title, then at least one \
                 question made of text or code below it."
            }
            ErrorCategory::UnmatchedCodeBlock => {
                "A code block was opened with ``` but never closed. Every opening \
                 fence needs a matching closing ``` on its own line, for example:\n\n    \
                 ```python\n    print(\"hello\")\n    ```"
            }
            ErrorCategory::InvalidStructure => {
                "The content could not be read as a lesson. Check that the title, \
                 question separators and code fences follow the format below."
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const FORMAT_REMINDER: &str = "DSL Format Reminder:\n\
    1. Start with a title line: # Lesson Title\n\
    2. Separate questions with a line containing only ---\n\
    3. Wrap code in ``` fences; a language may follow the opening fence (```java)\n\
    4. Close every code block with a bare ``` line";

/// Build a multi-paragraph explanation for an error, using the raw source to
/// point at specific lines where possible.
pub fn explain(error: &impl fmt::Display, raw: &str) -> String {
    let message = error.to_string();
    let category = ErrorCategory::from_message(&message);

    let mut sections = vec![
        format!("Error: {message}"),
        format!("Problem: {category}"),
        category.guidance().to_string(),
    ];

    if category == ErrorCategory::UnmatchedCodeBlock {
        sections.extend(fence_notes(raw));
    }

    sections.push(FORMAT_REMINDER.to_string());
    sections.join("\n\n")
}

/// Point out closing fences that carry a language and a fence left open at
/// the end of the source.
fn fence_notes(raw: &str) -> Vec<String> {
    let mut notes = Vec::new();
    let mut open_at: Option<usize> = None;

    for token in Scanner::tokenize(raw) {
        let TokenKind::Fence { language } = token.kind else {
            continue;
        };
        match (open_at, language) {
            (None, _) => open_at = Some(token.span.line),
            (Some(_), Some(language)) => {
                notes.push(format!(
                    "Note: Language specification on closing code block (line {}). \
                     Closing fences must be a bare ``` with nothing after it; \
                     \"```{language}\" there closes the block and the next fence \
                     opens a new one.",
                    token.span.line
                ));
                open_at = None;
            }
            (Some(_), None) => open_at = None,
        }
    }

    if let Some(line) = open_at {
        notes.push(format!("The code block opened on line {line} is never closed."));
    }

    notes
}
