//! Front matter detection.
//!
//! ```text
//! ---                 +++
//! title: Hello        title = "Hello"
//! ---                 +++
//! body                body
//! ```

use serde_json::{Map, Value};

use crate::i18n::DataError;
use crate::i18n::data::{self, DataFormat};

/// Split `content` into its front matter and body.
///
/// Returns `Ok(None)` when there is no front matter block. An empty block
/// yields an empty map.
pub fn split_front_matter(content: &str) -> Result<Option<(Map<String, Value>, &str)>, DataError> {
    let Some((raw, body, format)) = detect(content) else {
        return Ok(None);
    };

    let data = match data::parse(raw, format)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Ok(Some((data, body)))
}

fn detect(content: &str) -> Option<(&str, &str, DataFormat)> {
    let trimmed = content.trim_start_matches('\u{feff}');

    for (fence, format) in [("---", DataFormat::Yaml), ("+++", DataFormat::Toml)] {
        let Some(rest) = trimmed.strip_prefix(fence) else {
            continue;
        };
        if !rest.starts_with(['\n', '\r']) {
            continue;
        }
        let closing = format!("\n{fence}");
        if let Some(end) = rest.find(&closing) {
            let raw = rest[..end].trim();
            let after = &rest[end + closing.len()..];
            let body = after
                .strip_prefix("\r\n")
                .or_else(|| after.strip_prefix('\n'))
                .unwrap_or(after);
            return Some((raw, body, format));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_front_matter() {
        let content = "---\ntitle: Hello\nnamespace: about\n---\n\n# Body";
        let (data, body) = split_front_matter(content).unwrap().unwrap();
        assert_eq!(data["title"], json!("Hello"));
        assert_eq!(data["namespace"], json!("about"));
        assert_eq!(body, "\n# Body");
    }

    #[test]
    fn test_toml_front_matter() {
        let content = "+++\ntitle = \"Hello\"\ntags = [\"a\", \"b\"]\n+++\nBody";
        let (data, body) = split_front_matter(content).unwrap().unwrap();
        assert_eq!(data["tags"], json!(["a", "b"]));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_empty_front_matter() {
        let (data, body) = split_front_matter("---\n---\nplain").unwrap().unwrap();
        assert!(data.is_empty());
        assert_eq!(body, "plain");
    }

    #[test]
    fn test_no_front_matter() {
        assert!(split_front_matter("# Just content").unwrap().is_none());
        assert!(split_front_matter("----\nnot a fence\n").unwrap().is_none());
        assert!(split_front_matter("---\nunterminated").unwrap().is_none());
    }

    #[test]
    fn test_invalid_front_matter() {
        assert!(split_front_matter("+++\ntitle = \n+++\n").is_err());
    }
}
