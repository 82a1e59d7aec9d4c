//! Directory-backed lesson storage.
//!
//! A lesson id maps to `<dir>/<id>.json` (a stored record) or, failing that,
//! `<dir>/<id>.lesson` (source text). Titles looked up through the store are
//! kept in a [`TitleCache`] owned by the store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lesson_parser::{Document, Parser};

use crate::error::CliError;

/// Lesson id → title.
#[derive(Debug, Default)]
pub struct TitleCache {
    titles: HashMap<String, String>,
}

impl TitleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.titles.get(id).map(String::as_str)
    }

    pub fn set(&mut self, id: &str, title: &str) {
        self.titles.insert(id.to_string(), title.to_string());
    }

    pub fn clear(&mut self) {
        self.titles.clear();
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

pub struct DirectoryStore {
    dir: PathBuf,
    titles: TitleCache,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            titles: TitleCache::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn titles(&self) -> &TitleCache {
        &self.titles
    }

    /// Fetch a lesson. `Ok(None)` means there is no such lesson, including
    /// when the record exists but is not a document.
    pub fn fetch(&mut self, id: &str) -> Result<Option<Document>, CliError> {
        if !is_plain_id(id) {
            log::warn!("refusing lesson id {id:?}");
            return Ok(None);
        }

        let json_path = self.dir.join(format!("{id}.json"));
        let source_path = self.dir.join(format!("{id}.lesson"));

        let doc = if json_path.is_file() {
            let text = read(&json_path)?;
            Document::from_json(&text).map_err(|source| CliError::Json {
                path: json_path.clone(),
                source,
            })?
        } else if source_path.is_file() {
            Some(Parser::parse(&read(&source_path)?))
        } else {
            None
        };

        match &doc {
            Some(doc) => {
                log::debug!("fetched {id} ({} blocks)", doc.blocks.len());
                self.titles.set(id, &doc.title);
            }
            None => log::debug!("no lesson {id} in {}", self.dir.display()),
        }
        Ok(doc)
    }

    /// A lesson's title, from the cache when it has been seen before.
    pub fn title(&mut self, id: &str) -> Result<Option<String>, CliError> {
        if let Some(title) = self.titles.get(id) {
            return Ok(Some(title.to_string()));
        }
        Ok(self.fetch(id)?.map(|doc| doc.title))
    }
}

/// Ids are file stems: no separators, no leading dot.
fn is_plain_id(id: &str) -> bool {
    !id.is_empty() && !id.starts_with('.') && !id.contains(['/', '\\'])
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn store_with(files: &[(&str, &str)]) -> (tempfile::TempDir, DirectoryStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        let store = DirectoryStore::new(dir.path());
        (dir, store)
    }

    // =========================================================================
    // Title cache
    // =========================================================================

    #[test]
    fn test_title_cache() {
        let mut cache = TitleCache::new();
        assert!(cache.is_empty());
        cache.set("a", "Loops");
        cache.set("a", "Loops II");
        assert_eq!(cache.get("a"), Some("Loops II"));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert_eq!(cache.get("a"), None);
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    #[test]
    fn test_fetch_json_record() {
        let (_dir, mut store) = store_with(&[(
            "loops.json",
            r#"{"title":"Loops","blocks":[{"type":"question","content":[{"type":"text","value":"Q"}]}]}"#,
        )]);
        let doc = store.fetch("loops").unwrap().unwrap();
        assert_eq!(doc.title, "Loops");
        assert_eq!(store.titles().get("loops"), Some("Loops"));
    }

    #[test]
    fn test_fetch_source_file() {
        let (_dir, mut store) = store_with(&[("intro.lesson", "# Intro\n\nHello")]);
        let doc = store.fetch("intro").unwrap().unwrap();
        assert_eq!(doc.title, "Intro");
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_json_preferred_over_source() {
        let (_dir, mut store) = store_with(&[
            ("x.json", r#"{"title":"From JSON"}"#),
            ("x.lesson", "# From source"),
        ]);
        assert_eq!(store.fetch("x").unwrap().unwrap().title, "From JSON");
    }

    #[test]
    fn test_fetch_missing() {
        let (_dir, mut store) = store_with(&[]);
        assert_eq!(store.fetch("nothing").unwrap(), None);
        assert!(store.titles().is_empty());
    }

    #[test]
    fn test_fetch_non_document_record() {
        let (_dir, mut store) = store_with(&[("odd.json", "[1, 2, 3]")]);
        assert_eq!(store.fetch("odd").unwrap(), None);
    }

    #[test]
    fn test_fetch_broken_json() {
        let (_dir, mut store) = store_with(&[("bad.json", "{ nope")]);
        assert!(matches!(store.fetch("bad"), Err(CliError::Json { .. })));
    }

    #[test]
    fn test_path_like_ids_refused() {
        let (_dir, mut store) = store_with(&[]);
        assert_eq!(store.fetch("../secret").unwrap(), None);
        assert_eq!(store.fetch(".hidden").unwrap(), None);
        assert_eq!(store.fetch("").unwrap(), None);
    }

    #[test]
    fn test_title_uses_cache() {
        let (dir, mut store) = store_with(&[("a.lesson", "# Alpha\n\nx")]);
        assert_eq!(store.title("a").unwrap().as_deref(), Some("Alpha"));
        fs::remove_file(dir.path().join("a.lesson")).unwrap();
        assert_eq!(store.title("a").unwrap().as_deref(), Some("Alpha"));
        assert_eq!(store.title("b").unwrap(), None);
    }
}
