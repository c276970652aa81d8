//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Derive a `baseurl` from the path component of a site URL.
///
/// Returns `None` if the URL is invalid.
///
/// # Examples
/// ```ignore
/// baseurl_from_url("https://example.github.io/my-project/") -> Some("/my-project")
/// baseurl_from_url("https://example.github.io/a/b")         -> Some("/a/b")
/// baseurl_from_url("https://example.com")                   -> Some("")
/// baseurl_from_url("invalid")                               -> None
/// ```
pub fn baseurl_from_url(url_str: &str) -> Option<String> {
    let parsed = url::Url::parse(url_str).ok()?;
    let path = parsed.path().trim_matches('/');

    if path.is_empty() {
        Some(String::new())
    } else {
        Some(format!("/{path}"))
    }
}

/// Find config file by searching upward from `start`
///
/// ```text
/// /home/user/site/_posts/      ← start
/// /home/user/site/polyglot.toml ← found
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

// ============================================================================
// tests
// ============================================================================
