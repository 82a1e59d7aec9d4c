//! WASM bindings for the lesson toolchain.
//!
//! The editor and the student view call into these. Documents cross the
//! boundary as plain JS objects in the stored-record shape; anything coming
//! from JS is loaded leniently, so a hand-edited record never throws.

use lesson_parser::Document;
use lesson_render::{HtmlWriter, View};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Parse lesson source into a document object.
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsError> {
    to_js(&lesson_parser::parse(source))
}

/// Regenerate lesson source from a document object.
#[wasm_bindgen]
pub fn generate(doc: JsValue) -> Result<String, JsError> {
    let doc = document_from_js(doc)?.unwrap_or_default();
    Ok(lesson_parser::generate(&doc))
}

/// Validate lesson source. Returns the diagnostic, or `undefined` when valid.
#[wasm_bindgen]
pub fn validate(source: &str) -> Option<String> {
    validate_message(source)
}

/// Long-form guidance for a diagnostic.
#[wasm_bindgen]
pub fn explain(message: &str, source: &str) -> String {
    lesson_parser::explain(&message, source)
}

/// Render a document (or `null`) to the HTML that goes inside the content
/// container. Anything that is not a document renders as "not found".
#[wasm_bindgen]
pub fn render(doc: JsValue) -> String {
    let doc = render_input(convert_value(doc));
    write_view(&lesson_render::render(doc.as_ref()))
}

/// Render several documents into one stream. Entries that are not documents
/// are skipped; a non-array renders as "not found".
#[wasm_bindgen(js_name = renderMultiple)]
pub fn render_multiple(docs: JsValue) -> String {
    let view = match render_inputs(convert_array(docs)) {
        Some(docs) => lesson_render::render_multiple(&docs),
        None => View::NotFound,
    };
    write_view(&view)
}

/// Render a document to the abstract display tree, for front ends that build
/// their own DOM.
#[wasm_bindgen(js_name = renderTree)]
pub fn render_tree(doc: JsValue) -> Result<JsValue, JsError> {
    let doc = render_input(convert_value(doc));
    to_js(&lesson_render::render(doc.as_ref()))
}

/// Get the toolchain version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// =========================================================================
// Conversions
// =========================================================================

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsError::new(&e.to_string()))
}

fn document_from_js(value: JsValue) -> Result<Option<Document>, JsError> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    let value: serde_json::Value =
        serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(Document::from_value(&value))
}

/// `None` for `null`/`undefined`, otherwise the conversion result.
fn convert_value(value: JsValue) -> Option<Result<serde_json::Value, String>> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    Some(serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string()))
}

/// Each array entry converted on its own, so one bad entry spoils nothing
/// else. `None` when the value is not an array.
fn convert_array(value: JsValue) -> Option<Vec<Result<serde_json::Value, String>>> {
    if !js_sys::Array::is_array(&value) {
        return None;
    }
    let array = js_sys::Array::from(&value);
    Some(
        array
            .iter()
            .map(|item| serde_wasm_bindgen::from_value(item).map_err(|e| e.to_string()))
            .collect(),
    )
}

/// The document to render, if the input was one. Never fails.
fn render_input(converted: Option<Result<serde_json::Value, String>>) -> Option<Document> {
    match converted? {
        Ok(value) => Document::from_value(&value),
        Err(e) => {
            log::debug!("render input is not a document: {e}");
            None
        }
    }
}

/// The documents to render, skipping entries that are not documents.
/// `None` when the input was not a list at all.
fn render_inputs(
    converted: Option<Vec<Result<serde_json::Value, String>>>,
) -> Option<Vec<Document>> {
    let Some(items) = converted else {
        log::debug!("renderMultiple input is not an array");
        return None;
    };
    let docs = items
        .into_iter()
        .filter_map(|item| match item {
            Ok(value) => Document::from_value(&value),
            Err(e) => {
                log::debug!("skipping render entry: {e}");
                None
            }
        })
        .collect();
    Some(docs)
}

fn validate_message(source: &str) -> Option<String> {
    lesson_parser::validate_source(source)
        .err()
        .map(|e| e.to_string())
}

fn write_view(view: &View) -> String {
    let highlighter = highlight::GlobalHighlighter::detect();
    let mut writer = HtmlWriter::default();
    if let Some(highlighter) = &highlighter {
        writer = writer.with_highlighter(highlighter);
    }
    writer.write_inner(view)
}

// =========================================================================
// Syntax highlighting
// =========================================================================

mod highlight {
    use js_sys::{Function, Object, Reflect};
    use lesson_render::Highlighter;
    use wasm_bindgen::{JsCast, JsValue};

    /// Calls a page-global `hljs.highlight(code, { language })` when the page
    /// loaded highlight.js.
    pub struct GlobalHighlighter {
        hljs: JsValue,
    }

    impl GlobalHighlighter {
        #[cfg(target_arch = "wasm32")]
        pub fn detect() -> Option<Self> {
            let hljs = Reflect::get(&js_sys::global(), &JsValue::from_str("hljs")).ok()?;
            (!hljs.is_undefined() && !hljs.is_null()).then_some(Self { hljs })
        }

        #[cfg(not(target_arch = "wasm32"))]
        pub fn detect() -> Option<Self> {
            None
        }
    }

    impl Highlighter for GlobalHighlighter {
        fn highlight(&self, code: &str, language: &str) -> Option<String> {
            let highlight: Function = Reflect::get(&self.hljs, &JsValue::from_str("highlight"))
                .ok()?
                .dyn_into()
                .ok()?;
            let options = Object::new();
            Reflect::set(&options, &JsValue::from_str("language"), &JsValue::from_str(language))
                .ok()?;
            let result = highlight
                .call2(&self.hljs, &JsValue::from_str(code), &options)
                .ok()?;
            Reflect::get(&result, &JsValue::from_str("value"))
                .ok()?
                .as_string()
        }
    }
}
