//! `[i18n]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [i18n]
//! languages = ["en", "fr", "de"]                      # first entry is the default language
//! exclude_from_localizations = ["assets/private"]     # path prefixes only copied for the default language
//! relative_permalinks = false                         # join permalinks with the page directory
//! dont_show_warnings_for_languages = ["en-ca"]        # no missing-key warnings for these
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Ordered language codes. The first one is the default language.
    pub languages: Vec<String>,

    /// Path prefixes (relative to the source root) excluded from every
    /// non-default language tree.
    pub exclude_from_localizations: Vec<String>,

    /// Compute permalinks relative to the page directory instead of
    /// using `permalink_<lang>` overrides.
    pub relative_permalinks: bool,

    /// Languages exempted from missing-key warnings.
    pub dont_show_warnings_for_languages: Vec<String>,
}

impl I18nConfig {
    pub const LANGUAGES: FieldPath = FieldPath::new("i18n.languages");
    pub const EXCLUDE: FieldPath = FieldPath::new("i18n.exclude_from_localizations");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.languages.is_empty() {
            diag.error_with_hint(
                Self::LANGUAGES,
                "at least one language is required",
                "add `languages = [\"en\"]` to the [i18n] section",
            );
        }

        let mut seen = FxHashSet::default();
        for lang in &self.languages {
            if lang.trim().is_empty() {
                diag.error(Self::LANGUAGES, "language codes must not be blank");
            } else if !seen.insert(lang.as_str()) {
                diag.error(Self::LANGUAGES, format!("language '{lang}' is listed twice"));
            }
        }

        for pattern in &self.exclude_from_localizations {
            if pattern.starts_with('/') || pattern.contains("..") {
                diag.error_with_hint(
                    Self::EXCLUDE,
                    format!("'{pattern}' must be relative to the source root"),
                    "drop the leading '/' and any '..' components",
                );
            }
        }
    }
}
