//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Site"
//! url = "https://example.github.io/project"   # path becomes baseurl if baseurl is unset
//! baseurl = ""
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site title, exposed to templates as `site.title`.
    pub title: String,

    /// Absolute site URL (scheme + host + optional path).
    pub url: Option<String>,

    /// URL path prefix for every generated link, without trailing slash.
    pub baseurl: String,
}

impl SiteSectionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(url) = &self.url
            && url::Url::parse(url).is_err()
        {
            diag.error_with_hint(
                FieldPath::new("site.url"),
                format!("'{url}' is not a valid URL"),
                "include the scheme, e.g. https://example.com",
            );
        }

        if self.baseurl.ends_with('/') {
            diag.warn(
                FieldPath::new("site.baseurl"),
                "trailing '/' produces double slashes in generated links",
            );
        }
    }
}
