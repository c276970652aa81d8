//! Translation engine errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading dictionaries or resolving includes.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    /// A dictionary file could not be parsed.
    #[error("Error occurred while loading {file}: you might have a stray quote")]
    Parse {
        file: String,
        #[source]
        source: DataError,
    },

    /// A `tf` tag references a file that does not exist.
    #[error("Included file '{file}' not found in {} directory", dir.display())]
    IncludeNotFound { file: String, dir: PathBuf },

    /// A `tf` tag references a path that is not allowed.
    #[error(
        "Invalid syntax for include tag. File contains invalid characters or sequences: {0}"
    )]
    InvalidIncludeName(String),
}

/// Structured-data parse failure (YAML, TOML or JSON).
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
