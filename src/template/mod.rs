//! Liquid-style template rendering.
//!
//! Supports `{{ dotted.var }}` output and the translation tags in
//! [`tags`]. Filters and control-flow tags are not part of the language.

mod scope;
mod tags;
mod token;

pub use scope::{Scope, stringify};

use thiserror::Error;

use crate::convert::ConverterRegistry;
use crate::core::BuildContext;
use crate::i18n::{I18nError, Translator};
use crate::page::ContentNode;
use token::Token;

/// Nested renders (`tf` includes and key expansions) allowed before giving up.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unclosed `{delimiter}` near `{snippet}`")]
    Unclosed {
        delimiter: &'static str,
        snippet: String,
    },

    #[error("unknown tag `{0}`")]
    UnknownTag(String),

    #[error("filters are not supported: `{{{{ {0} }}}}`")]
    Filter(String),

    #[error("templates nested too deeply, check for a file including itself or a key expanding to itself")]
    TooDeep,

    #[error(transparent)]
    I18n(#[from] I18nError),
}

/// Everything a tag may consult while rendering one page.
pub struct RenderEnv<'a> {
    pub ctx: &'a BuildContext,
    pub translator: &'a Translator,
    pub nodes: &'a [ContentNode],
    pub converters: &'a ConverterRegistry,
}

pub trait TemplateEngine: Send + Sync {
    fn render(
        &self,
        source: &str,
        scope: &mut Scope,
        env: &RenderEnv<'_>,
    ) -> Result<String, TemplateError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LiquidEngine;

impl TemplateEngine for LiquidEngine {
    fn render(
        &self,
        source: &str,
        scope: &mut Scope,
        env: &RenderEnv<'_>,
    ) -> Result<String, TemplateError> {
        if scope.depth() > MAX_DEPTH {
            return Err(TemplateError::TooDeep);
        }

        let mut out = String::with_capacity(source.len());
        for token in token::tokenize(source)? {
            match token {
                Token::Text(text) => out.push_str(text),
                Token::Output(expr) => out.push_str(&evaluate(expr, scope)?),
                Token::Tag { name, markup } => {
                    out.push_str(&tags::render_tag(name, markup, scope, env, self)?)
                }
            }
        }
        Ok(out)
    }
}

/// `"literal"`, `'literal'` or a variable path.
fn evaluate(expr: &str, scope: &Scope) -> Result<String, TemplateError> {
    if expr.contains('|') {
        return Err(TemplateError::Filter(expr.to_string()));
    }

    for quote in ['"', '\''] {
        if let Some(literal) = expr
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return Ok(literal.to_string());
        }
    }

    Ok(scope.lookup(expr).map(stringify).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_context;
    use crate::page::test_node;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "_i18n/en.yml",
            "nav:\n  home: Home\n  about: About\ngreeting: Hello {{ site.title }}\n",
        );
        write(dir.path(), "_i18n/fr.yml", "nav:\n  home: Accueil\n");
        write(dir.path(), "_i18n/fr/intro.md", "# {% t nav.home %} {{ include.who }}\n");
        write(dir.path(), "_i18n/fr/loop.html", "{% tf loop.html %}");
        dir
    }

    fn render(dir: &Path, lang: &str, source: &str, scope: &mut Scope) -> Result<String, TemplateError> {
        let mut ctx = test_context(dir, &["en", "fr"]);
        ctx.title = "Docs".into();
        ctx.base_url_root = "/site".into();
        ctx.enter_pass(lang);
        let translator = Translator::new(dir);
        let converters = ConverterRegistry::default();
        let nodes = vec![
            test_node("about.md", json!({"namespace": "about", "permalink": "/about/"})),
            test_node("a-propos.md", json!({"namespace": "about", "permalink_fr": "/a-propos/", "permalink": "/about/"})),
        ];
        let env = RenderEnv {
            ctx: &ctx,
            translator: &translator,
            nodes: &nodes,
            converters: &converters,
        };
        scope.set("site", ctx.site_vars());
        LiquidEngine.render(source, scope, &env)
    }

    #[test]
    fn test_output_and_translate() {
        let dir = site();
        let mut scope = Scope::new();
        let out = render(dir.path(), "fr", "{{ site.lang }}: {% t nav.home %} / {% translate nav.about %}", &mut scope).unwrap();
        assert_eq!(out, "fr: Accueil / About");
    }

    #[test]
    fn test_key_from_variable() {
        let dir = site();
        let mut scope = Scope::new();
        scope.set("page", json!({"key": "nav.{{ page.part }}", "part": "home"}));
        let out = render(dir.path(), "fr", "{% t page.key %}", &mut scope).unwrap();
        assert_eq!(out, "Accueil");
    }

    #[test]
    fn test_translated_value_is_not_rendered() {
        let dir = site();
        let mut scope = Scope::new();
        let out = render(dir.path(), "en", "{% t greeting %}", &mut scope).unwrap();
        assert_eq!(out, "Hello {{ site.title }}");
    }

    #[test]
    fn test_translate_file_with_params() {
        let dir = site();
        let mut scope = Scope::new();
        let out = render(dir.path(), "fr", r#"{% tf intro.md who="Ana" %}"#, &mut scope).unwrap();
        assert_eq!(out.trim(), "<h1>Accueil Ana</h1>");
        assert_eq!(scope.depth(), 1);
    }

    #[test]
    fn test_missing_include_is_an_error() {
        let dir = site();
        let mut scope = Scope::new();
        let err = render(dir.path(), "en", "{% tf intro.md %}", &mut scope).unwrap_err();
        assert!(matches!(err, TemplateError::I18n(I18nError::IncludeNotFound { .. })));
        assert!(err.to_string().contains("intro.md"));
    }

    #[test]
    fn test_recursive_include_stops() {
        let dir = site();
        let mut scope = Scope::new();
        let err = render(dir.path(), "fr", "{% tf loop.html %}", &mut scope).unwrap_err();
        assert!(matches!(err, TemplateError::TooDeep));
    }

    #[test]
    fn test_self_referencing_key_stops() {
        let dir = site();
        let mut scope = Scope::new();
        scope.set("page", json!({"key": "{% t page.key %}"}));
        let err = render(dir.path(), "fr", "{% t page.key %}", &mut scope).unwrap_err();
        assert!(matches!(err, TemplateError::TooDeep));
        assert_eq!(scope.depth(), 1);
    }

    #[test]
    fn test_translate_link() {
        let dir = site();
        let mut scope = Scope::new();
        let out = render(dir.path(), "fr", "{% tl about %}|{% tl about en %}|{% tl nope %}", &mut scope).unwrap();
        assert_eq!(out, "/site/fr/a-propos/|/site/about/|");
    }

    #[test]
    fn test_unknown_tag_and_filter() {
        let dir = site();
        let mut scope = Scope::new();
        assert!(matches!(
            render(dir.path(), "en", "{% if x %}", &mut scope),
            Err(TemplateError::UnknownTag(tag)) if tag == "if"
        ));
        assert!(matches!(
            render(dir.path(), "en", "{{ x | upcase }}", &mut scope),
            Err(TemplateError::Filter(_))
        ));
    }

    #[test]
    fn test_literals() {
        let dir = site();
        let mut scope = Scope::new();
        assert_eq!(render(dir.path(), "en", r#"{{ "a" }}{{ 'b' }}{{ nope }}"#, &mut scope).unwrap(), "ab");
    }
}
