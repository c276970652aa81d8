//! Per-language translation dictionaries.
//!
//! A dictionary is one base document merged with page-scoped documents:
//!
//! ```text
//! _i18n/
//! ├── en.yml            # base: { greeting: hi }
//! └── en/
//!     ├── home.yml      # inserted as dictionary["home"]
//!     ├── about.toml    # inserted as dictionary["about"]
//!     └── intro.md      # inclusion template, not a dictionary
//! ```

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::data::{self, DataFormat};
use super::{I18nError, access};
use crate::{debug, log};

/// Directory holding all dictionaries and inclusion templates.
pub const I18N_DIR: &str = "_i18n";

/// Entries of a language directory that are never parsed.
const SKIPPED_ENTRIES: &[&str] = &[".gitignore", ".gitkeep", ".DS_Store"];

/// Merged translation dictionary for one language.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: Value,
    page_files: usize,
}

impl Dictionary {
    pub fn empty() -> Self {
        Self {
            entries: Value::Object(Map::new()),
            page_files: 0,
        }
    }

    pub fn entries(&self) -> &Value {
        &self.entries
    }

    /// Number of page-scoped documents merged in.
    pub fn page_files(&self) -> usize {
        self.page_files
    }

    /// Look up a dotted key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        access::access(&self.entries, key)
    }

    /// Load `<source_root>/_i18n/<lang>.<ext>` plus `<source_root>/_i18n/<lang>/*`.
    ///
    /// A missing or empty base document yields an empty dictionary. A page
    /// document that fails to parse is an error naming the file.
    pub fn load(source_root: &Path, lang: &str) -> Result<Self, I18nError> {
        let i18n_dir = source_root.join(I18N_DIR);
        let mut dict = Self::empty();

        match base_document_path(&i18n_dir, lang) {
            Some(path) => {
                log!("i18n"; "loading translation from file {}", path.display());
                match read_document(&path)? {
                    Value::Null => {}
                    Value::Object(map) => dict.entries = Value::Object(map),
                    _ => {
                        log!("warning"; "{} is not a mapping, ignoring it", path.display());
                    }
                }
            }
            None => debug!("i18n"; "no base dictionary for \"{}\" in {}", lang, i18n_dir.display()),
        }

        let lang_dir = i18n_dir.join(lang);
        if lang_dir.is_dir() {
            dict.merge_page_documents(&lang_dir)?;
            log!(
                "i18n";
                "loaded {} page-specific translation files from /{}/{}",
                dict.page_files, I18N_DIR, lang
            );
        }

        Ok(dict)
    }

    fn merge_page_documents(&mut self, lang_dir: &Path) -> Result<(), I18nError> {
        let mut files: Vec<PathBuf> = fs::read_dir(lang_dir)
            .map_err(|e| I18nError::Io(lang_dir.to_path_buf(), e))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        for path in files {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if SKIPPED_ENTRIES.contains(&name) {
                continue;
            }
            if DataFormat::from_path(&path).is_none() {
                // Inclusion templates live next to page dictionaries
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let value = read_document(&path)?;
            if let Value::Object(map) = &mut self.entries {
                map.insert(stem.to_string(), value);
            }
            self.page_files += 1;
        }

        Ok(())
    }
}

/// First existing `<i18n_dir>/<lang>.<ext>`.
fn base_document_path(i18n_dir: &Path, lang: &str) -> Option<PathBuf> {
    DataFormat::EXTENSIONS
        .iter()
        .map(|ext| i18n_dir.join(format!("{lang}.{ext}")))
        .find(|path| path.is_file())
}

fn read_document(path: &Path) -> Result<Value, I18nError> {
    let content = fs::read_to_string(path).map_err(|e| I18nError::Io(path.to_path_buf(), e))?;
    let format = DataFormat::from_path(path).unwrap_or(DataFormat::Yaml);

    data::parse(&content, format).map_err(|source| {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log!("error"; "{}", source);
        I18nError::Parse { file, source }
    })
}

// ============================================================================
// Cache
// ============================================================================

/// Process-wide dictionary cache keyed by `(source_root, lang)`.
///
/// The check-then-load runs under one lock, so a dictionary is loaded
/// exactly once even when pages render in parallel. Entries are never
/// evicted.
#[derive(Debug, Default)]
pub struct DictionaryCache {
    entries: Mutex<FxHashMap<(PathBuf, String), Arc<Dictionary>>>,
    loads: AtomicUsize,
}

impl DictionaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dictionary, loading it on first use.
    pub fn get_or_load(&self, source_root: &Path, lang: &str) -> Result<Arc<Dictionary>, I18nError> {
        let key = (source_root.to_path_buf(), lang.to_string());
        let mut entries = self.entries.lock();

        if let Some(dict) = entries.get(&key) {
            return Ok(Arc::clone(dict));
        }

        let dict = Arc::new(Dictionary::load(source_root, lang)?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        entries.insert(key, Arc::clone(&dict));
        Ok(dict)
    }

    /// Number of dictionaries actually read from disk.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_base_and_page_documents_merge() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_i18n/en.yml", "greeting: hi\n");
        write(dir.path(), "_i18n/en/home.yml", "title: Home\n");

        let dict = Dictionary::load(dir.path(), "en").unwrap();
        assert_eq!(dict.entries(), &json!({"greeting": "hi", "home": {"title": "Home"}}));
        assert_eq!(dict.page_files(), 1);
    }

    #[test]
    fn test_missing_base_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let dict = Dictionary::load(dir.path(), "fr").unwrap();
        assert_eq!(dict.entries(), &json!({}));
    }

    #[test]
    fn test_empty_base_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_i18n/fr.yml", "");
        write(dir.path(), "_i18n/fr/nav.toml", "about = \"À propos\"");

        let dict = Dictionary::load(dir.path(), "fr").unwrap();
        assert_eq!(dict.get("nav.about"), Some(&json!("À propos")));
    }

    #[test]
    fn test_placeholders_and_templates_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_i18n/en/.gitignore", "*");
        write(dir.path(), "_i18n/en/intro.md", "# Title: with colon\n");
        write(dir.path(), "_i18n/en/_posts/2024-01-01-a.md", "---\n---\n");

        let dict = Dictionary::load(dir.path(), "en").unwrap();
        assert_eq!(dict.entries(), &json!({}));
        assert_eq!(dict.page_files(), 0);
    }

    #[test]
    fn test_page_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_i18n/en/broken.yml", "title: \"Home\n");

        let err = Dictionary::load(dir.path(), "en").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("broken.yml"));
        assert!(message.contains("stray quote"));
    }

    #[test]
    fn test_cache_returns_same_instance() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_i18n/fr.yml", "nav:\n  home: Accueil\n");

        let cache = DictionaryCache::new();
        let first = cache.get_or_load(dir.path(), "fr").unwrap();
        let second = cache.get_or_load(dir.path(), "fr").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn test_cache_does_not_reread_changed_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_i18n/fr.yml", "a: 1\n");

        let cache = DictionaryCache::new();
        cache.get_or_load(dir.path(), "fr").unwrap();
        write(dir.path(), "_i18n/fr.yml", "a: 2\n");

        let dict = cache.get_or_load(dir.path(), "fr").unwrap();
        assert_eq!(dict.get("a"), Some(&json!(1)));
    }
}
