//! Cross-language links between pages sharing a namespace.

use crate::page::{ContentNode, NodeKind};

/// Build the URL of the page with namespace `tokens[0]` in language
/// `tokens[1]` (or `current_lang`).
///
/// Only pages are considered, posts never match. The last page with a
/// matching namespace wins. An unknown namespace yields an empty string.
///
/// ```ignore
/// link("about fr", "en", "en", "/blog", &nodes) -> "/blog/fr/a-propos/"
/// link("about", "en", "en", "/blog", &nodes)    -> "/blog/about/"
/// ```
pub fn link(
    raw_key: &str,
    current_lang: &str,
    default_lang: &str,
    base_url_root: &str,
    nodes: &[ContentNode],
) -> String {
    let mut tokens = raw_key.split_whitespace();
    let Some(namespace) = tokens.next() else {
        return String::new();
    };
    let lang = tokens.next().unwrap_or(current_lang);

    let base = if lang == default_lang {
        base_url_root.to_string()
    } else {
        format!("{base_url_root}/{lang}")
    };

    nodes
        .iter()
        .rev()
        .filter(|node| node.kind == NodeKind::Page)
        .find(|node| node.namespace() == Some(namespace))
        .map(|node| {
            let permalink = node
                .permalink_override(lang)
                .or_else(|| node.raw_permalink())
                .unwrap_or(&node.url);
            format!("{base}{permalink}")
        })
        .unwrap_or_default()
}
