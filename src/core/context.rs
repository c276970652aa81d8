//! Per-run build state.
//!
//! One [`BuildContext`] exists per orchestrator run. It is mutated in
//! place between language passes and read-only during a pass.

use serde_json::{Value, json};
use std::path::PathBuf;

use crate::config::{ConfigError, SiteConfig};

/// Ordered, non-empty list of language codes. The first is the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages(Vec<String>);

impl Languages {
    pub fn new<I, S>(languages: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let languages: Vec<String> = languages.into_iter().map(Into::into).collect();
        if languages.is_empty() || languages.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::NoLanguages);
        }
        Ok(Self(languages))
    }

    pub fn default_language(&self) -> &str {
        &self.0[0]
    }

    /// Every language after the default, in order.
    pub fn rest(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct BuildContext {
    pub source_root: PathBuf,
    pub languages: Languages,
    pub current_language: String,
    pub default_language: String,
    /// Site base URL without a language suffix.
    pub base_url_root: String,
    /// Base URL of the active pass.
    pub base_url: String,
    pub destination_root: PathBuf,
    /// Output directory of the active pass.
    pub destination_path: PathBuf,
    /// Path prefixes dropped from non-default trees.
    pub exclusion_list: Vec<String>,
    pub relative_permalinks: bool,
    /// Languages whose missing keys are not reported.
    pub silent_languages: Vec<String>,
    pub title: String,
}

impl BuildContext {
    pub fn new(
        source_root: impl Into<PathBuf>,
        destination_root: impl Into<PathBuf>,
        base_url: impl Into<String>,
        languages: Languages,
    ) -> Self {
        let default = languages.default_language().to_string();
        let base_url = base_url.into();
        let destination_root = destination_root.into();

        Self {
            source_root: source_root.into(),
            current_language: default.clone(),
            default_language: default,
            base_url_root: base_url.clone(),
            base_url,
            destination_path: destination_root.clone(),
            destination_root,
            languages,
            exclusion_list: Vec::new(),
            relative_permalinks: false,
            silent_languages: Vec::new(),
            title: String::new(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let languages = Languages::new(config.i18n.languages.iter().cloned())?;
        let mut ctx = Self::new(
            &config.build.source,
            &config.build.destination,
            config.site.baseurl.clone(),
            languages,
        );
        ctx.exclusion_list = config.i18n.exclude_from_localizations.clone();
        ctx.relative_permalinks = config.i18n.relative_permalinks;
        ctx.silent_languages = config.i18n.dont_show_warnings_for_languages.clone();
        ctx.title = config.site.title.clone();
        Ok(ctx)
    }

    pub fn is_default_pass(&self) -> bool {
        self.current_language == self.default_language
    }

    pub fn enter_default_pass(&mut self) {
        self.current_language = self.default_language.clone();
        self.destination_path = self.destination_root.clone();
        self.base_url = self.base_url_root.clone();
    }

    /// Point the context at `<destination_root>/pages/<lang>`.
    pub fn enter_pass(&mut self, lang: &str) {
        if lang == self.default_language {
            self.enter_default_pass();
            return;
        }
        self.current_language = lang.to_string();
        self.destination_path = self.destination_root.join("pages").join(lang);
        self.base_url = format!("{}/", self.base_url_root);
    }

    /// Back to default-language state after a run.
    pub fn restore(&mut self) {
        self.enter_default_pass();
    }

    /// `site.*` template variables for the active pass.
    pub fn site_vars(&self) -> Value {
        json!({
            "title": self.title,
            "lang": self.current_language,
            "default_lang": self.default_language,
            "languages": self.languages.as_slice(),
            "baseurl": self.base_url,
            "baseurl_root": self.base_url_root,
        })
    }
}
