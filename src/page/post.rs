//! Blog post naming and categories.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::i18n::I18N_DIR;

/// Directory holding posts, either at the source root or under
/// `_i18n/<lang>/`.
pub const POSTS_DIR: &str = "_posts";

static POST_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})-(.+)$").expect("valid regex"));

/// Date and slug parsed from a post file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostName {
    pub date: Option<String>,
    pub slug: String,
}

impl PostName {
    /// `2024-01-31-Hello World` -> date `2024-01-31`, slug `hello-world`.
    pub fn parse(stem: &str) -> Self {
        match POST_NAME.captures(stem) {
            Some(caps) => Self {
                date: Some(caps[1].to_string()),
                slug: slugify(&caps[2]),
            },
            None => Self {
                date: None,
                slug: slugify(stem),
            },
        }
    }
}

/// ASCII, lowercase, dash-separated.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Directories in front of `_posts`, e.g. `blog/_posts/x.md` -> `["blog"]`.
pub fn path_categories(relative: &str) -> Vec<String> {
    let parts: Vec<&str> = relative.split('/').collect();
    match parts.iter().position(|p| *p == POSTS_DIR) {
        Some(idx) => parts[..idx].iter().map(|s| s.to_string()).collect(),
        None => Vec::new(),
    }
}

/// Merge path-derived and front-matter categories.
///
/// Lowercased and deduplicated in first-seen order. `_i18n` and the
/// current language are dropped since localized posts live under
/// `_i18n/<lang>/_posts`.
pub fn categories(data: &Map<String, Value>, from_path: &[String], lang: &str) -> Vec<String> {
    let from_data = ["category", "categories"]
        .iter()
        .filter_map(|key| data.get(*key))
        .flat_map(value_to_list);

    let mut result: Vec<String> = Vec::new();
    for category in from_path.iter().cloned().chain(from_data) {
        let category = category.to_lowercase();
        if category == I18N_DIR || category == lang.to_lowercase() || category.is_empty() {
            continue;
        }
        if !result.contains(&category) {
            result.push(category);
        }
    }
    result
}

/// `"a b"` and `["a", "b"]` both mean two categories.
fn value_to_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s.split_whitespace().map(str::to_string).collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::Number(n) => vec![n.to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_name() {
        let name = PostName::parse("2024-01-31-Hello World");
        assert_eq!(name.date.as_deref(), Some("2024-01-31"));
        assert_eq!(name.slug, "hello-world");

        let name = PostName::parse("Café Über");
        assert_eq!(name.date, None);
        assert_eq!(name.slug, "cafe-uber");
    }

    #[test]
    fn test_path_categories() {
        assert_eq!(path_categories("_i18n/fr/_posts/2024-01-01-a.md"), vec!["_i18n", "fr"]);
        assert_eq!(path_categories("blog/_posts/x.md"), vec!["blog"]);
        assert!(path_categories("_posts/x.md").is_empty());
    }

    #[test]
    fn test_categories_cleanup() {
        let data = json!({"categories": ["News", "fr", "news"], "category": "Tech"});
        let data = data.as_object().unwrap();
        let from_path = vec!["_i18n".to_string(), "fr".to_string()];

        assert_eq!(categories(data, &from_path, "fr"), vec!["tech", "news"]);
    }
}
