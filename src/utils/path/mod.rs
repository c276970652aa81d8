//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Join URL fragments with exactly one `/` between them.
///
/// The result always starts with `/`; a trailing `/` on the last
/// fragment is preserved. `.` and `..` segments are dropped.
///
/// ```ignore
/// join_url(&["/docs", "/about/"])       -> "/docs/about/"
/// join_url(&["", "index.html"])         -> "/index.html"
/// join_url(&["/../../escaped.html"])    -> "/escaped.html"
/// ```
pub fn join_url(parts: &[&str]) -> String {
    let trailing = parts
        .iter()
        .rev()
        .find(|p| !p.is_empty())
        .is_some_and(|p| p.ends_with('/'));

    let joined = url_segments(parts.iter().copied())
        .collect::<Vec<_>>()
        .join("/");

    match (joined.is_empty(), trailing) {
        (true, _) => "/".to_string(),
        (false, true) => format!("/{joined}/"),
        (false, false) => format!("/{joined}"),
    }
}

fn url_segments<'a>(parts: impl Iterator<Item = &'a str>) -> impl Iterator<Item = &'a str> {
    parts
        .flat_map(|p| p.split('/'))
        .filter(|s| !matches!(*s, "" | "." | ".."))
}

/// Map a page URL to its file location under `root`.
///
/// `/a/` -> `root/a/index.html`, `/a.html` -> `root/a.html`. The result
/// never leaves `root`.
pub fn url_to_output(url: &str, root: &Path) -> PathBuf {
    let mut path = root.to_path_buf();
    let mut any = false;
    for segment in url_segments(std::iter::once(url)) {
        path.push(segment);
        any = true;
    }
    if !any || url.ends_with('/') {
        path.push("index.html");
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("assets/img/x.png")), "assets/img/x.png");
        assert_eq!(to_slash(Path::new("./a/b")), "a/b");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url(&["/docs", "/about/"]), "/docs/about/");
        assert_eq!(join_url(&["", "index.html"]), "/index.html");
        assert_eq!(join_url(&["/", ""]), "/");
        assert_eq!(join_url(&["blog//", "x"]), "/blog/x");
        assert_eq!(join_url(&["/docs", "../../escaped.html"]), "/docs/escaped.html");
        assert_eq!(join_url(&["/./a/", ".."]), "/a");
    }

    #[test]
    fn test_url_to_output() {
        let root = Path::new("/out");
        assert_eq!(url_to_output("/", root), PathBuf::from("/out/index.html"));
        assert_eq!(url_to_output("/a/", root), PathBuf::from("/out/a/index.html"));
        assert_eq!(url_to_output("/a.html", root), PathBuf::from("/out/a.html"));
    }

    #[test]
    fn test_url_to_output_stays_under_root() {
        let root = Path::new("/out/pages/fr");
        let path = url_to_output("/../../escaped.html", root);
        assert_eq!(path, PathBuf::from("/out/pages/fr/escaped.html"));
        assert!(url_to_output("/a/../..", root).starts_with(root));
    }
}
