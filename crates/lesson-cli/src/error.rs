use std::path::PathBuf;

/// Everything that can stop a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid lesson\n\n{explanation}", path.display())]
    Invalid { path: PathBuf, explanation: String },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}
