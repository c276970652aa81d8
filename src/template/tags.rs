//! Translation tags.
//!
//! | Tag                        | Output                                  |
//! |----------------------------|-----------------------------------------|
//! | `t` / `translate`          | dictionary value for the key            |
//! | `tf` / `translate_file`    | rendered `_i18n/<lang>/<file>`          |
//! | `tl` / `translate_link`    | URL of the page with that namespace     |

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use super::{RenderEnv, Scope, TemplateEngine, TemplateError, stringify};
use crate::i18n::{include, link};

static PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([\w.\-]+))"#).expect("valid regex")
});

pub(super) fn render_tag(
    name: &str,
    markup: &str,
    scope: &mut Scope,
    env: &RenderEnv<'_>,
    engine: &dyn TemplateEngine,
) -> Result<String, TemplateError> {
    match name {
        "t" | "translate" => translate(markup, scope, env, engine),
        "tf" | "translate_file" => translate_file(markup, scope, env, engine),
        "tl" | "translate_link" => translate_link(markup, scope, env, engine),
        other => Err(TemplateError::UnknownTag(other.to_string())),
    }
}

/// A key naming a non-empty variable is replaced by its value, then
/// rendered as a template itself.
///
/// The render runs in its own frame so a key that expands to itself hits
/// the nesting cap.
fn expand_key(
    markup: &str,
    scope: &mut Scope,
    env: &RenderEnv<'_>,
    engine: &dyn TemplateEngine,
) -> Result<String, TemplateError> {
    let key = match scope.lookup(markup).map(stringify) {
        Some(value) if !value.is_empty() => value,
        _ => markup.to_string(),
    };

    scope.push(Map::new());
    let rendered = engine.render(&key, scope, env);
    scope.pop();
    rendered
}

fn translate(
    markup: &str,
    scope: &mut Scope,
    env: &RenderEnv<'_>,
    engine: &dyn TemplateEngine,
) -> Result<String, TemplateError> {
    let key = expand_key(markup.trim(), scope, env, engine)?;
    let value = env
        .translator
        .resolve(env.ctx, key.trim(), &env.ctx.current_language);
    Ok(value.as_ref().map(stringify).unwrap_or_default())
}

fn translate_file(
    markup: &str,
    scope: &mut Scope,
    env: &RenderEnv<'_>,
    engine: &dyn TemplateEngine,
) -> Result<String, TemplateError> {
    let markup = markup.trim();
    let (file, params) = match markup.split_once(char::is_whitespace) {
        Some((file, params)) => (file, Some(params.trim())),
        None => (markup, None),
    };

    let file = expand_key(file, scope, env, engine)?;
    let params = params
        .filter(|p| !p.is_empty())
        .map(|p| parse_params(p, scope));

    include::render_include(
        file.trim(),
        &env.ctx.current_language,
        params,
        scope,
        env,
        engine,
    )
}

fn translate_link(
    markup: &str,
    scope: &mut Scope,
    env: &RenderEnv<'_>,
    engine: &dyn TemplateEngine,
) -> Result<String, TemplateError> {
    let key = expand_key(markup.trim(), scope, env, engine)?;
    let ctx = env.ctx;
    Ok(link::link(
        &key,
        &ctx.current_language,
        &ctx.default_language,
        &ctx.base_url_root,
        env.nodes,
    ))
}

/// `title="Hi" count=page.count` -> `{title: "Hi", count: <page.count>}`.
///
/// Quoted values are literals; bare values are variable lookups.
fn parse_params(markup: &str, scope: &Scope) -> Map<String, Value> {
    PARAM
        .captures_iter(markup)
        .map(|caps| {
            let value = if let Some(literal) = caps.get(2).or_else(|| caps.get(3)) {
                Value::String(literal.as_str().to_string())
            } else {
                caps.get(4)
                    .and_then(|var| scope.lookup(var.as_str()))
                    .cloned()
                    .unwrap_or(Value::Null)
            };
            (caps[1].to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_params() {
        let mut scope = Scope::new();
        scope.set("page", json!({"count": 3}));

        let params = parse_params(r#"title="Hello there" kind='note' n=page.count x=nope"#, &scope);
        assert_eq!(params["title"], json!("Hello there"));
        assert_eq!(params["kind"], json!("note"));
        assert_eq!(params["n"], json!(3));
        assert_eq!(params["x"], Value::Null);
    }
}
