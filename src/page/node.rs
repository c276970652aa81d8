use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

use super::post::{self, PostName};
use crate::utils::path::{join_url, url_to_output};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Page,
    Post,
}

/// A page or post discovered for one language pass.
#[derive(Debug, Clone)]
pub struct ContentNode {
    pub kind: NodeKind,
    /// Absolute source path.
    pub source: PathBuf,
    /// Path relative to the source root, `/`-separated.
    pub relative: String,
    /// URL directory of the source file (`/docs`, `/`).
    pub dir: String,
    /// Front matter.
    pub data: Map<String, Value>,
    /// Output URL for the current pass.
    pub url: String,
    /// Content after the front matter block.
    pub body: String,
}

impl ContentNode {
    pub fn page(
        source: impl Into<PathBuf>,
        relative: &str,
        data: Map<String, Value>,
        body: String,
    ) -> Self {
        Self {
            kind: NodeKind::Page,
            source: source.into(),
            relative: relative.to_string(),
            dir: parent_dir(relative),
            data,
            url: default_page_url(relative),
            body,
        }
    }

    /// Post at `relative`, with categories cleaned for `lang`.
    pub fn post(
        source: impl Into<PathBuf>,
        relative: &str,
        lang: &str,
        mut data: Map<String, Value>,
        body: String,
    ) -> Self {
        let stem = Path::new(relative)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = PostName::parse(&stem);
        let categories = post::categories(&data, &post::path_categories(relative), lang);

        let file = format!("{}.html", name.slug);
        let mut parts: Vec<&str> = categories.iter().map(String::as_str).collect();
        parts.push(&file);
        let url = join_url(&parts);

        if let Some(date) = &name.date {
            data.entry("date").or_insert_with(|| json!(date));
        }
        data.insert("slug".into(), json!(name.slug));
        data.insert("categories".into(), json!(categories));

        Self {
            kind: NodeKind::Post,
            source: source.into(),
            relative: relative.to_string(),
            dir: parent_dir(url.trim_start_matches('/')),
            data,
            url,
            body,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Cross-language identifier shared by translations of one page.
    pub fn namespace(&self) -> Option<&str> {
        self.str_field("namespace")
    }

    /// `permalink_<lang>` from front matter.
    pub fn permalink_override(&self, lang: &str) -> Option<&str> {
        self.str_field(&format!("permalink_{lang}"))
    }

    pub fn raw_permalink(&self) -> Option<&str> {
        self.str_field("permalink")
    }

    /// Permalink for `lang`, or `None` when the node has no `permalink`.
    ///
    /// In relative mode the permalink is joined onto the node directory and
    /// language overrides are ignored. `.` and `..` segments are dropped.
    pub fn permalink(&self, lang: &str, relative: bool) -> Option<String> {
        let permalink = self.raw_permalink()?;
        if relative {
            Some(join_url(&[self.dir.as_str(), permalink]))
        } else {
            Some(join_url(&[self.permalink_override(lang).unwrap_or(permalink)]))
        }
    }

    /// Replace the default URL with the permalink, if any.
    pub fn apply_permalink(&mut self, lang: &str, relative: bool) {
        if let Some(permalink) = self.permalink(lang, relative) {
            self.url = permalink;
        }
    }

    pub fn layout(&self) -> Option<&str> {
        self.str_field("layout")
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        url_to_output(&self.url, root)
    }

    /// `page.*` template variables.
    pub fn page_vars(&self) -> Value {
        let mut vars = self.data.clone();
        vars.insert("url".into(), json!(self.url));
        vars.insert("path".into(), json!(self.relative));
        Value::Object(vars)
    }
}

fn parent_dir(relative: &str) -> String {
    let parent = Path::new(relative)
        .parent()
        .map(crate::utils::path::to_slash)
        .unwrap_or_default();
    join_url(&[parent.as_str()])
}

/// `docs/intro.md` -> `/docs/intro.html`, `docs/index.md` -> `/docs/`.
fn default_page_url(relative: &str) -> String {
    let path = Path::new(relative);
    let dir = parent_dir(relative);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some("md" | "markdown") => Some("html"),
        other => other,
    };

    match ext {
        Some("html") if stem == "index" => join_url(&[dir.as_str(), "/"]),
        Some(ext) => join_url(&[dir.as_str(), format!("{stem}.{ext}").as_str()]),
        None => join_url(&[dir.as_str(), stem.as_ref()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::test_node;

    #[test]
    fn test_default_urls() {
        assert_eq!(default_page_url("docs/intro.md"), "/docs/intro.html");
        assert_eq!(default_page_url("index.html"), "/");
        assert_eq!(default_page_url("docs/index.markdown"), "/docs/");
        assert_eq!(default_page_url("feed.xml"), "/feed.xml");
    }

    #[test]
    fn test_permalink_override() {
        let node = test_node(
            "about.md",
            json!({"permalink": "/about/", "permalink_fr": "/a-propos/"}),
        );
        assert_eq!(node.permalink("fr", false).as_deref(), Some("/a-propos/"));
        assert_eq!(node.permalink("de", false).as_deref(), Some("/about/"));
    }

    #[test]
    fn test_override_without_permalink_is_ignored() {
        let node = test_node("about.md", json!({"permalink_fr": "/a-propos/"}));
        assert_eq!(node.permalink("fr", false), None);
    }

    #[test]
    fn test_relative_permalink() {
        let mut node = test_node(
            "docs/guide.md",
            json!({"permalink": "start/", "permalink_fr": "/ignored/"}),
        );
        assert_eq!(node.permalink("fr", true).as_deref(), Some("/docs/start/"));

        node.apply_permalink("fr", true);
        assert_eq!(node.output_path(Path::new("/out")), PathBuf::from("/out/docs/start/index.html"));
    }

    #[test]
    fn test_permalink_cannot_leave_destination() {
        let mut node = test_node("evil.md", json!({"permalink": "/../../escaped.html"}));
        node.apply_permalink("en", false);
        assert_eq!(node.url, "/escaped.html");

        let root = Path::new("/site/_site/pages/fr");
        assert!(node.output_path(root).starts_with(root));
    }

    #[test]
    fn test_post_url_and_categories() {
        let data = json!({"title": "Bonjour", "categories": ["News"]});
        let node = ContentNode::post(
            "/src/_i18n/fr/_posts/2024-03-01-bonjour-le-monde.md",
            "_i18n/fr/_posts/2024-03-01-bonjour-le-monde.md",
            "fr",
            data.as_object().cloned().unwrap(),
            String::new(),
        );

        assert_eq!(node.kind, NodeKind::Post);
        assert_eq!(node.url, "/news/bonjour-le-monde.html");
        assert_eq!(node.data["date"], json!("2024-03-01"));
        assert_eq!(node.data["categories"], json!(["news"]));
        assert_eq!(node.dir, "/news");
    }

    #[test]
    fn test_page_vars() {
        let node = test_node("docs/intro.md", json!({"title": "Intro"}));
        let vars = node.page_vars();
        assert_eq!(vars["title"], "Intro");
        assert_eq!(vars["url"], "/docs/intro.html");
    }
}
