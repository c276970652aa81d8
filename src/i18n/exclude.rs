//! Static assets dropped from non-default language trees.

use std::path::{Component, Path};

/// A non-content file discovered in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAsset {
    /// Absolute source path.
    pub source: std::path::PathBuf,
    /// Path relative to the source root, `/`-separated.
    pub relative: String,
}

impl StaticAsset {
    pub fn new(source: impl Into<std::path::PathBuf>, relative: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            relative: relative.into(),
        }
    }

    /// Whether this asset is under one of `patterns`.
    pub fn is_excluded(&self, patterns: &[String]) -> bool {
        is_excluded(&self.relative, patterns)
    }
}

/// Keep every asset for the default pass; otherwise drop the ones whose
/// path or an ancestor directory equals one of `patterns`.
pub fn filter(
    assets: Vec<StaticAsset>,
    patterns: &[String],
    is_default_pass: bool,
) -> Vec<StaticAsset> {
    if is_default_pass || patterns.is_empty() {
        return assets;
    }
    assets
        .into_iter()
        .filter(|asset| !asset.is_excluded(patterns))
        .collect()
}

/// Path-prefix match by whole components.
///
/// `assets/private` matches `assets/private` and `assets/private/x.png`,
/// never `assets/private2/x.png`.
pub fn is_excluded(relative: &str, patterns: &[String]) -> bool {
    let path: Vec<_> = normal_components(Path::new(relative));

    patterns.iter().any(|pattern| {
        let prefix = normal_components(Path::new(pattern));
        !prefix.is_empty() && path.starts_with(&prefix)
    })
}

fn normal_components(path: &Path) -> Vec<&std::ffi::OsStr> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect()
}
