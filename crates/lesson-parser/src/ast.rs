//! Document model for lesson content.
//!
//! A [`Document`] is a title plus an ordered list of question [`Block`]s,
//! each holding [`ContentItem`]s. The serialized form is the JSON record the
//! storage layer keeps:
//!
//! ```text
//! { "title": "Loops",
//!   "blocks": [ { "type": "question",
//!                 "content": [ { "type": "text", "value": "What prints?" },
//!                              { "type": "code", "value": "x", "language": "js" } ] } ] }
//! ```
//!
//! Records may be hand-edited, so [`Document::from_value`] loads them
//! leniently and skips sections it cannot make sense of.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// One lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            title: title.into(),
            blocks,
        }
    }

    /// Load a stored record from JSON text.
    ///
    /// Returns `Ok(None)` when the JSON is well-formed but is not a document
    /// at all (for example `null` or an array).
    pub fn from_json(json: &str) -> Result<Option<Document>, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Build a document from a loosely-shaped JSON value.
    ///
    /// A missing or non-array `blocks` becomes an empty list, blocks whose
    /// `content` is missing or not an array are skipped, and so are content
    /// items with an unknown `type` or a missing `value`.
    pub fn from_value(value: &Value) -> Option<Document> {
        let record = value.as_object()?;

        let title = record
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let blocks = match record.get("blocks") {
            Some(Value::Array(blocks)) => blocks.iter().filter_map(block_from_value).collect(),
            Some(other) => {
                log::debug!("ignoring non-array blocks field: {other}");
                Vec::new()
            }
            None => Vec::new(),
        };

        Some(Document { title, blocks })
    }

    /// Number of blocks that hold at least one item.
    pub fn non_empty_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_empty()).count()
    }
}

fn block_from_value(value: &Value) -> Option<Block> {
    let Some(content) = value.get("content").and_then(Value::as_array) else {
        log::debug!("skipping block without a content array");
        return None;
    };
    Some(Block::question(items_from_values(content)))
}

fn items_from_values(values: &[Value]) -> Vec<ContentItem> {
    values.iter().filter_map(item_from_value).collect()
}

fn item_from_value(value: &Value) -> Option<ContentItem> {
    let kind = value.get("type").and_then(Value::as_str)?;
    let text_field = |name: &str| value.get(name).and_then(Value::as_str);

    match kind {
        "text" => Some(ContentItem::text(text_field("value")?)),
        "code" => Some(ContentItem::Code {
            value: text_field("value")?.to_string(),
            language: text_field("language")
                .map(str::trim)
                .filter(|lang| !lang.is_empty())
                .map(str::to_string),
        }),
        "collapsible" => Some(ContentItem::Collapsible {
            title: text_field("title").unwrap_or_default().to_string(),
            expanded: value
                .get("expanded")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            content: value
                .get("content")
                .and_then(Value::as_array)
                .map(|items| items_from_values(items))
                .unwrap_or_default(),
        }),
        other => {
            log::debug!("skipping content item of unknown type {other:?}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// Block variants. Only questions exist today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Question,
}

/// A unit of assessment content, delimited by `---` in source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type", default)]
    pub kind: BlockKind,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

impl Block {
    pub fn question(content: Vec<ContentItem>) -> Self {
        Self {
            kind: BlockKind::Question,
            content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Content items
// ---------------------------------------------------------------------------

/// A piece of block content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    /// One trimmed source line. Consecutive lines stay separate items.
    Text { value: String },

    /// Fenced code, kept verbatim.
    Code {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },

    /// A disclosure section. Never produced by the parser; documents built in
    /// code or loaded from storage may contain it.
    Collapsible {
        #[serde(default)]
        title: String,
        #[serde(default)]
        expanded: bool,
        #[serde(default)]
        content: Vec<ContentItem>,
    },
}

impl ContentItem {
    pub fn text(value: impl Into<String>) -> Self {
        ContentItem::Text {
            value: value.into(),
        }
    }

    pub fn code(value: impl Into<String>, language: Option<&str>) -> Self {
        ContentItem::Code {
            value: value.into(),
            language: language.map(str::to_string),
        }
    }

    pub fn collapsible(title: impl Into<String>, expanded: bool, content: Vec<ContentItem>) -> Self {
        ContentItem::Collapsible {
            title: title.into(),
            expanded,
            content,
        }
    }

    /// The `type` tag as it appears in stored records.
    pub fn type_name(&self) -> &'static str {
        match self {
            ContentItem::Text { .. } => "text",
            ContentItem::Code { .. } => "code",
            ContentItem::Collapsible { .. } => "collapsible",
        }
    }

    /// The `value` of text and code items.
    pub fn value(&self) -> Option<&str> {
        match self {
            ContentItem::Text { value } | ContentItem::Code { value, .. } => Some(value),
            ContentItem::Collapsible { .. } => None,
        }
    }
}
