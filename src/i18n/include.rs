//! Localized file inclusion.
//!
//! `{% tf intro.md %}` renders `_i18n/<lang>/intro.md` as a template in
//! the caller's scope, then runs it through the matching converter.

use jwalk::WalkDir;
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use super::{I18N_DIR, I18nError};
use crate::template::{RenderEnv, Scope, TemplateEngine, TemplateError};
use crate::utils::path::to_slash;

static INVALID_SEQUENCES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[./]{2,}").expect("valid regex"));
static VALID_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w/.\-()+~#@]+$").expect("valid regex"));

/// Render `file_key` from `_i18n/<lang>/`.
///
/// `params` become `include.*` for the duration of the render.
pub fn render_include(
    file_key: &str,
    lang: &str,
    params: Option<Map<String, Value>>,
    scope: &mut Scope,
    env: &RenderEnv<'_>,
    engine: &dyn TemplateEngine,
) -> Result<String, TemplateError> {
    validate_file_name(file_key)?;

    let dir = env.ctx.source_root.join(I18N_DIR).join(lang);
    if !list_candidates(&dir).iter().any(|c| c == file_key) {
        return Err(I18nError::IncludeNotFound {
            file: file_key.to_string(),
            dir,
        }
        .into());
    }

    let path = dir.join(file_key);
    let source = fs::read_to_string(&path).map_err(|e| I18nError::Io(path.clone(), e))?;

    let mut frame = Map::new();
    if let Some(params) = params {
        frame.insert("include".to_string(), Value::Object(params));
    }
    scope.push(frame);
    let rendered = engine.render(&source, scope, env);
    scope.pop();

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    Ok(env.converters.convert(ext, &rendered?))
}

/// Reject absolute paths, traversal and unusual characters.
pub fn validate_file_name(file: &str) -> Result<(), I18nError> {
    if file.starts_with('/')
        || INVALID_SEQUENCES.is_match(file)
        || !VALID_FILENAME_CHARS.is_match(file)
    {
        return Err(I18nError::InvalidIncludeName(file.to_string()));
    }
    Ok(())
}

/// Regular files under `dir`, relative and `/`-separated. Symlinks and
/// hidden entries are not candidates.
fn list_candidates(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(dir).ok().map(to_slash))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("intro.md").is_ok());
        assert!(validate_file_name("home/hero-banner_2.html").is_ok());
        assert!(validate_file_name("../secret.yml").is_err());
        assert!(validate_file_name("a/../../b.md").is_err());
        assert!(validate_file_name("/etc/passwd").is_err());
        assert!(validate_file_name("a b.md").is_err());
        assert!(validate_file_name("a//b.md").is_err());
    }

    #[test]
    fn test_candidates_skip_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("intro.md"), "x").unwrap();
        fs::write(dir.path().join("nested/part.html"), "x").unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(dir.path().join("intro.md"), dir.path().join("link.md"))
            .unwrap();

        let mut candidates = list_candidates(dir.path());
        candidates.sort();
        assert_eq!(candidates, vec!["intro.md", "nested/part.html"]);
    }
}
