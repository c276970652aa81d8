//! Translation lookup with default-language fallback.

use serde_json::Value;

use super::{I18nError, MissingKey, Translator};
use crate::core::BuildContext;
use crate::{debug, log};

impl Translator {
    /// Resolve `key` for `lang`, falling back to the default language.
    ///
    /// A value that is absent, null, or an empty string counts as missing.
    /// Missing keys are logged and recorded unless `lang` is listed as a
    /// silent language; a key missing from the default language is always
    /// reported. A dictionary that fails to load counts as absent here;
    /// [`Translator::preload`] is where load errors abort a pass.
    pub fn resolve(&self, ctx: &BuildContext, key: &str, lang: &str) -> Option<Value> {
        let primary = self.lookup(lang, key);
        if let Some(value) = primary.filter(|v| !is_blank(v)) {
            return Some(value);
        }

        let fallback = if lang == ctx.default_language {
            None
        } else {
            self.lookup(&ctx.default_language, key)
        };

        if should_warn(lang, &ctx.default_language, &ctx.silent_languages) {
            log!("warning"; "missing i18n key: {}:{}", lang, key);
            self.record_missing(MissingKey {
                lang: lang.to_string(),
                key: key.to_string(),
            });
        }

        fallback.filter(|v| !v.is_null())
    }

    /// Load every configured language up front so parse errors surface
    /// before any page renders.
    pub fn preload(&self, ctx: &BuildContext) -> Result<(), I18nError> {
        for lang in ctx.languages.iter() {
            self.dictionary(lang)?;
        }
        Ok(())
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<Value> {
        match self.dictionary(lang) {
            Ok(dict) => dict.get(key).cloned(),
            Err(e) => {
                debug!("i18n"; "treating \"{}\" as empty: {}", lang, e);
                None
            }
        }
    }
}

/// Null or empty string.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn should_warn(lang: &str, default_lang: &str, silent: &[String]) -> bool {
    lang == default_lang || !silent.iter().any(|s| s == lang)
}
