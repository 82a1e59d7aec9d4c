//! `lesson.toml` configuration.
//!
//! ```toml
//! [html]
//! container_class = "lesson-content"
//! not_found_message = "Content not found"
//! stylesheet = "/static/lesson.css"
//!
//! [store]
//! dir = "lessons"
//! ```
//!
//! Every key is optional. Unknown keys are rejected so typos surface.

use std::path::{Path, PathBuf};

use lesson_render::HtmlOptions;
use serde::Deserialize;

use crate::error::CliError;

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "lesson.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub html: HtmlConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// HTML page output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    pub container_class: String,
    pub not_found_message: String,
    /// Stylesheet linked from standalone pages.
    pub stylesheet: Option<String>,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        let options = HtmlOptions::default();
        Self {
            container_class: options.container_class,
            not_found_message: options.not_found_message,
            stylesheet: None,
        }
    }
}

impl HtmlConfig {
    pub fn options(&self) -> HtmlOptions {
        HtmlOptions {
            container_class: self.container_class.clone(),
            not_found_message: self.not_found_message.clone(),
        }
    }
}

/// Where stored lesson records live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("lessons"),
        }
    }
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise `lesson.toml` in `start_dir` is
/// used when present, and defaults when not. Returns the path that was read.
pub fn load(
    explicit: Option<&Path>,
    start_dir: &Path,
) -> Result<(Config, Option<PathBuf>), CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = start_dir.join(CONFIG_FILE);
            if !candidate.is_file() {
                return Ok((Config::default(), None));
            }
            candidate
        }
    };

    let text = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CliError::NotFound { path: path.clone() }
        } else {
            CliError::Read {
                path: path.clone(),
                source,
            }
        }
    })?;

    let config = parse(&text, &path)?;
    Ok((config, Some(path)))
}

/// Parse configuration text. `path` is only used in errors.
pub fn parse(text: &str, path: &Path) -> Result<Config, CliError> {
    toml::from_str(text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}
