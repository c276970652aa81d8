//! Single-pass static site builder.
//!
//! One pass: discover -> render (parallel) -> exclusion hook -> write.

mod render;
mod scan;
mod write;

use anyhow::Result;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::convert::ConverterRegistry;
use crate::core::{BuildContext, PassReport, SiteBuilder};
use crate::i18n::{Translator, exclude};
use crate::logger::ProgressLine;
use crate::template::{LiquidEngine, RenderEnv, TemplateEngine};
use crate::utils::plural_count;
use crate::{debug, log};

pub struct StaticSiteBuilder<E = LiquidEngine> {
    translator: Arc<Translator>,
    engine: E,
    converters: ConverterRegistry,
    includes: Vec<String>,
    excludes: Vec<String>,
    clean: bool,
    cleaned: bool,
}

impl StaticSiteBuilder<LiquidEngine> {
    pub fn new(translator: Arc<Translator>) -> Self {
        Self::with_engine(translator, LiquidEngine)
    }

    /// Builder using the `[build]` include, exclude and clean settings.
    pub fn from_config(config: &SiteConfig, translator: Arc<Translator>) -> Self {
        let mut builder = Self::new(translator);
        builder.includes = config.build.include.clone();
        builder.excludes = config.build.exclude.clone();
        builder.clean = config.build.clean;
        builder
    }
}

impl<E: TemplateEngine> StaticSiteBuilder<E> {
    pub fn with_engine(translator: Arc<Translator>, engine: E) -> Self {
        Self {
            translator,
            engine,
            converters: ConverterRegistry::default(),
            includes: Vec::new(),
            excludes: Vec::new(),
            clean: false,
            cleaned: false,
        }
    }

    /// Remove the destination root before the first pass.
    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

}

impl<E: TemplateEngine> SiteBuilder for StaticSiteBuilder<E> {
    fn build(&mut self, ctx: &BuildContext) -> Result<PassReport> {
        if self.clean && !self.cleaned {
            write::clean_destination(&ctx.destination_root)?;
            self.cleaned = true;
        }

        self.translator.preload(ctx)?;
        self.translator.take_missing();
        debug!(
            "i18n";
            "dictionaries loaded so far: {}",
            self.translator.cache().load_count()
        );

        let discovered = scan::discover(ctx, &self.includes, &self.excludes)?;
        let layouts = scan::load_layouts(&ctx.source_root)?;
        let nodes = discovered.nodes;
        debug!(
            "pass";
            "\"{}\": {} and {} discovered",
            ctx.current_language,
            plural_count(nodes.len(), "page"),
            plural_count(discovered.assets.len(), "asset")
        );

        let progress = ProgressLine::new(&[("pages", nodes.len()), ("assets", discovered.assets.len())]);

        let env = RenderEnv {
            ctx,
            translator: &self.translator,
            nodes: &nodes,
            converters: &self.converters,
        };
        let engine: &dyn TemplateEngine = &self.engine;
        let rendered: Vec<(PathBuf, String)> = nodes
            .par_iter()
            .map(|node| {
                let html = render::render_node(node, &layouts, engine, &env)?;
                Ok((node.output_path(&ctx.destination_path), html))
            })
            .collect::<Result<_>>()?;

        let total_assets = discovered.assets.len();
        let assets = exclude::filter(
            discovered.assets,
            &ctx.exclusion_list,
            ctx.is_default_pass(),
        );

        for (output, html) in &rendered {
            write::write_page(output, html)?;
            progress.inc("pages");
        }
        assets.par_iter().try_for_each(|asset| {
            write::copy_asset(asset, &ctx.destination_path)?;
            progress.inc("assets");
            Ok::<_, anyhow::Error>(())
        })?;
        progress.finish();

        let missing = self.translator.take_missing();
        if !missing.is_empty() {
            log!(
                "i18n";
                "{} in \"{}\"",
                plural_count(missing.len(), "missing key"),
                ctx.current_language
            );
        }

        Ok(PassReport {
            pages: rendered.len(),
            assets: assets.len(),
            excluded_assets: total_assets - assets.len(),
            missing_keys: missing.len(),
        })
    }

    fn includes_mut(&mut self) -> &mut Vec<String> {
        &mut self.includes
    }

    fn excludes_mut(&mut self) -> &mut Vec<String> {
        &mut self.excludes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuildOrchestrator, test_context};
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join(rel)).unwrap()
    }

    fn site(root: &Path) {
        write(root, "_i18n/en.yml", "nav:\n  home: Home\n  about: About\n");
        write(root, "_i18n/fr.yml", "nav:\n  home: Accueil\n");
        write(root, "_i18n/en/intro.md", "Welcome *{{ site.lang }}*\n");
        write(root, "_i18n/fr/intro.md", "Bienvenue *{{ site.lang }}*\n");
        write(root, "_i18n/en/_posts/2024-01-01-hello.md", "---\ntitle: Hello\n---\nen post\n");
        write(root, "_i18n/fr/_posts/2024-01-01-bonjour.md", "---\ntitle: Bonjour\n---\nfr post\n");
        write(root, "_layouts/default.html", "<html lang=\"{{ site.lang }}\">{{ content }}</html>");
        write(
            root,
            "index.md",
            "---\nlayout: default\nnamespace: home\npermalink: /\n---\n# {% t nav.home %}\n\n{% tf intro.md %}\n\n<a href=\"{% tl about %}\">{% t nav.about %}</a>\n",
        );
        write(
            root,
            "about.md",
            "---\nnamespace: about\npermalink: /about/\npermalink_fr: /a-propos/\n---\nAbout\n",
        );
        write(root, ".htaccess", "deny from all");
        write(root, "assets/private/secret.txt", "secret");
        write(root, "assets/public.txt", "public");
        write(root, "_site/stale.txt", "old");
    }

    #[test]
    fn test_builds_every_language_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        site(root);

        let mut ctx = test_context(root, &["en", "fr"]);
        ctx.exclusion_list = vec!["assets/private".into()];

        let translator = Arc::new(Translator::new(root));
        let mut builder = StaticSiteBuilder::new(Arc::clone(&translator)).clean(true);
        builder.includes = vec![".htaccess".into()];

        let report = BuildOrchestrator::new(builder).run(&mut ctx).unwrap();
        let out = root.join("_site");

        let en = read(&out, "index.html");
        assert!(en.starts_with("<html lang=\"en\">"));
        assert!(en.contains("<h1>Home</h1>"));
        assert!(en.contains("Welcome <em>en</em>"));
        assert!(en.contains("<a href=\"/about/\">About</a>"));

        let fr = read(&out, "pages/fr/index.html");
        assert!(fr.starts_with("<html lang=\"fr\">"));
        assert!(fr.contains("<h1>Accueil</h1>"));
        assert!(fr.contains("Bienvenue <em>fr</em>"));
        assert!(fr.contains("<a href=\"/fr/a-propos/\">About</a>"));

        assert!(out.join("about/index.html").exists());
        assert!(out.join("pages/fr/a-propos/index.html").exists());
        assert!(out.join("hello.html").exists());
        assert!(out.join("pages/fr/bonjour.html").exists());
        assert!(!out.join("pages/fr/hello.html").exists());

        assert!(out.join(".htaccess").exists());
        assert!(!out.join("pages/fr/.htaccess").exists());
        assert!(out.join("assets/private/secret.txt").exists());
        assert!(!out.join("pages/fr/assets/private/secret.txt").exists());
        assert!(out.join("pages/fr/assets/public.txt").exists());
        assert!(!out.join("stale.txt").exists());

        assert_eq!(report.passes.len(), 2);
        assert_eq!(report.passes[0].report.missing_keys, 0);
        assert_eq!(report.passes[1].report.missing_keys, 1);
        assert_eq!(report.passes[1].destination, out.join("pages/fr"));
        assert_eq!(translator.cache().load_count(), 2);
    }

    #[test]
    fn test_permalink_output_stays_in_destination() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        write(&root, "evil.md", "---\npermalink: /../../escaped.html\n---\nx");

        let mut ctx = test_context(&root, &["en", "fr"]);
        let builder = StaticSiteBuilder::new(Arc::new(Translator::new(&root)));
        BuildOrchestrator::new(builder).run(&mut ctx).unwrap();

        assert!(!dir.path().join("escaped.html").exists());
        assert!(!root.join("escaped.html").exists());
        assert!(root.join("_site/escaped.html").exists());
        assert!(root.join("_site/pages/fr/escaped.html").exists());
    }

    #[test]
    fn test_missing_include_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "index.md", "---\n---\n{% tf nowhere.md %}");

        let mut ctx = test_context(root, &["en"]);
        let builder = StaticSiteBuilder::new(Arc::new(Translator::new(root)));
        let err = BuildOrchestrator::new(builder).run(&mut ctx).unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("index.md"));
        assert!(message.contains("nowhere.md"));
    }

    #[test]
    fn test_broken_dictionary_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "_i18n/en/home.yml", "title: \"Home\n");
        write(root, "index.md", "---\n---\nhi");

        let mut ctx = test_context(root, &["en"]);
        let builder = StaticSiteBuilder::new(Arc::new(Translator::new(root)));
        let err = BuildOrchestrator::new(builder).run(&mut ctx).unwrap_err();
        assert!(format!("{err:#}").contains("stray quote"));
    }
}
