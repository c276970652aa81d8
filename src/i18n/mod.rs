//! Translation engine.
//!
//! | Module       | Purpose                                             |
//! |--------------|-----------------------------------------------------|
//! | `access`     | Dotted-key lookup (`nav.items.0`)                   |
//! | `data`       | YAML/TOML/JSON parsing into one canonical value     |
//! | `dictionary` | Per-language dictionary loading and caching         |
//! | `resolve`    | Lookup with default-language fallback and warnings  |
//! | `include`    | Localized file inclusion (`tf` tag)                 |
//! | `link`       | Cross-language links by namespace (`tl` tag)        |
//! | `exclude`    | Static assets dropped from localized trees          |

pub mod access;
pub mod data;
pub mod dictionary;
mod error;
pub mod exclude;
pub mod include;
pub mod link;
mod resolve;

pub use dictionary::{Dictionary, DictionaryCache, I18N_DIR};
pub use error::{DataError, I18nError};
pub use exclude::StaticAsset;

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// A key that had to fall back to the default language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
    pub lang: String,
    pub key: String,
}

/// Dictionary cache plus missing-key log for one source tree.
///
/// Shared by every pass of a run so each language is loaded once.
#[derive(Debug)]
pub struct Translator {
    source_root: PathBuf,
    cache: DictionaryCache,
    missing: Mutex<Vec<MissingKey>>,
}

impl Translator {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            cache: DictionaryCache::new(),
            missing: Mutex::new(Vec::new()),
        }
    }

    pub fn cache(&self) -> &DictionaryCache {
        &self.cache
    }

    /// Dictionary for `lang`, loaded on first use.
    pub fn dictionary(&self, lang: &str) -> Result<Arc<Dictionary>, I18nError> {
        self.cache.get_or_load(&self.source_root, lang)
    }

    fn record_missing(&self, missing: MissingKey) {
        self.missing.lock().push(missing);
    }

    /// Missing keys recorded so far.
    #[cfg(test)]
    pub fn missing_keys(&self) -> Vec<MissingKey> {
        self.missing.lock().clone()
    }

    /// Drain the missing-key log (one pass worth).
    pub fn take_missing(&self) -> Vec<MissingKey> {
        std::mem::take(&mut *self.missing.lock())
    }
}
