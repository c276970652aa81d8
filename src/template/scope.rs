use serde_json::{Map, Value};

use crate::i18n::access::access;

/// Stack of variable frames. Lookups search from the innermost frame out.
#[derive(Debug, Clone)]
pub struct Scope {
    frames: Vec<Map<String, Value>>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            frames: vec![Map::new()],
        }
    }

    pub fn push(&mut self, frame: Map<String, Value>) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame. The root frame is never removed.
    pub fn pop(&mut self) -> Option<Map<String, Value>> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Set `key` in the innermost frame.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(key.into(), value);
        }
    }

    /// Resolve `page.title`-style paths. Null counts as unset.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        let value = self.frames.iter().rev().find_map(|f| f.get(head))?;
        match rest {
            Some(rest) => access(value, rest),
            None => (!value.is_null()).then_some(value),
        }
    }
}

/// Render a value the way an output tag prints it.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect(),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_inner_frame_shadows() {
        let mut scope = Scope::new();
        scope.set("page", json!({"title": "Outer", "tags": ["a", "b"]}));
        scope.push(frame(json!({"page": {"title": "Inner"}})));

        assert_eq!(scope.lookup("page.title"), Some(&json!("Inner")));
        assert_eq!(scope.lookup("page.tags"), None);

        scope.pop();
        assert_eq!(scope.lookup("page.tags.1"), Some(&json!("b")));
        assert!(scope.pop().is_none());
    }

    #[test]
    fn test_null_is_unset() {
        let mut scope = Scope::new();
        scope.set("x", Value::Null);
        assert_eq!(scope.lookup("x"), None);
        assert_eq!(scope.lookup("missing.deep"), None);
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&Value::Null), "");
        assert_eq!(stringify(&json!(3)), "3");
        assert_eq!(stringify(&json!(["a", 1, null])), "a1");
        assert_eq!(stringify(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }
}
