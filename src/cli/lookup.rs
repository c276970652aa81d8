//! `lookup` command.

use anyhow::{Context, Result};
use serde_json::Value;

use super::LookupArgs;
use crate::config::SiteConfig;
use crate::core::BuildContext;
use crate::i18n::Translator;

/// Resolve `args.key` and print it as JSON (`null` when missing).
pub fn run_lookup(args: &LookupArgs, config: &SiteConfig) -> Result<()> {
    let ctx = BuildContext::from_config(config)?;
    let translator = Translator::new(ctx.source_root.clone());
    let value = lookup(&ctx, &translator, args)?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{output}");
    Ok(())
}

fn lookup(ctx: &BuildContext, translator: &Translator, args: &LookupArgs) -> Result<Value> {
    let lang = args.lang.as_deref().unwrap_or(&ctx.default_language);
    if !ctx.languages.iter().any(|l| l == lang) {
        anyhow::bail!(
            "unknown language \"{}\", configured languages: {}",
            lang,
            ctx.languages.as_slice().join(", ")
        );
    }

    translator
        .dictionary(lang)
        .with_context(|| format!("failed to load dictionary for \"{lang}\""))?;
    Ok(translator.resolve(ctx, &args.key, lang).unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_context;
    use serde_json::json;
    use std::fs;

    fn args(key: &str, lang: Option<&str>) -> LookupArgs {
        LookupArgs {
            key: key.into(),
            lang: lang.map(str::to_string),
            pretty: false,
        }
    }

    #[test]
    fn test_lookup_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("_i18n")).unwrap();
        fs::write(dir.path().join("_i18n/en.yml"), "nav:\n  home: Home\n  items: [a, b]\n").unwrap();
        fs::write(dir.path().join("_i18n/fr.yml"), "nav:\n  home: Accueil\n").unwrap();

        let ctx = test_context(dir.path(), &["en", "fr"]);
        let translator = Translator::new(dir.path());

        assert_eq!(lookup(&ctx, &translator, &args("nav.home", None)).unwrap(), json!("Home"));
        assert_eq!(lookup(&ctx, &translator, &args("nav.home", Some("fr"))).unwrap(), json!("Accueil"));
        assert_eq!(lookup(&ctx, &translator, &args("nav.items", Some("fr"))).unwrap(), json!(["a", "b"]));
        assert_eq!(lookup(&ctx, &translator, &args("nav.nope", Some("fr"))).unwrap(), Value::Null);
    }

    #[test]
    fn test_unknown_language() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path(), &["en", "fr"]);
        let translator = Translator::new(dir.path());

        let err = lookup(&ctx, &translator, &args("a", Some("de"))).unwrap_err();
        assert!(err.to_string().contains("en, fr"));
    }
}
