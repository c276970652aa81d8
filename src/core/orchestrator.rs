//! Multi-pass build driver.
//!
//! ```text
//! pass 0  en  -> <dest>/            base_url = <root>
//! pass 1  fr  -> <dest>/pages/fr/   base_url = <root>/
//! pass 2  de  -> <dest>/pages/de/   base_url = <root>/
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::BuildContext;
use crate::log;
use crate::utils::plural_count;

/// Include entry that only belongs to the root tree.
const HTACCESS: &str = ".htaccess";

/// One full render of the site for the language in the context.
pub trait SiteBuilder {
    fn build(&mut self, ctx: &BuildContext) -> Result<PassReport>;

    /// Entries copied even though discovery would skip them.
    fn includes_mut(&mut self) -> &mut Vec<String>;

    /// Path prefixes discovery never reads.
    fn excludes_mut(&mut self) -> &mut Vec<String>;
}

/// Counts produced by one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub pages: usize,
    pub assets: usize,
    pub excluded_assets: usize,
    pub missing_keys: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub lang: String,
    pub destination: PathBuf,
    pub report: PassReport,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub passes: Vec<PassSummary>,
}

impl RunReport {
    pub fn total_pages(&self) -> usize {
        self.passes.iter().map(|p| p.report.pages).sum()
    }

    pub fn total_missing_keys(&self) -> usize {
        self.passes.iter().map(|p| p.report.missing_keys).sum()
    }
}

/// Runs a [`SiteBuilder`] once per configured language.
pub struct BuildOrchestrator<B> {
    builder: B,
}

impl<B: SiteBuilder> BuildOrchestrator<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    #[cfg(test)]
    pub fn builder(&self) -> &B {
        &self.builder
    }

    #[cfg(test)]
    pub fn into_inner(self) -> B {
        self.builder
    }

    /// Build every language, leaving `ctx` in default-language state
    /// whether or not a pass fails.
    pub fn run(&mut self, ctx: &mut BuildContext) -> Result<RunReport> {
        let result = self.run_passes(ctx);
        ctx.restore();

        if let Ok(report) = &result {
            log!(
                "build";
                "build complete ({} across {})",
                plural_count(report.total_pages(), "page"),
                plural_count(report.passes.len(), "language")
            );
        }
        result
    }

    fn run_passes(&mut self, ctx: &mut BuildContext) -> Result<RunReport> {
        let mut report = RunReport::default();

        ctx.enter_default_pass();
        log!(
            "build";
            "building site for default language \"{}\" to: {}",
            ctx.current_language,
            ctx.destination_path.display()
        );
        let pass = self
            .builder
            .build(ctx)
            .with_context(|| format!("failed to build language \"{}\"", ctx.current_language))?;
        report.push(ctx, pass);

        self.builder.includes_mut().retain(|entry| entry != HTACCESS);

        let languages = ctx.languages.rest().to_vec();
        for lang in &languages {
            ctx.enter_pass(lang);
            log!(
                "build";
                "building site for language \"{}\" to: {}",
                lang,
                ctx.destination_path.display()
            );

            let saved = self.builder.excludes_mut().clone();
            self.builder
                .excludes_mut()
                .extend(ctx.exclusion_list.iter().cloned());
            let result = self.builder.build(ctx);
            *self.builder.excludes_mut() = saved;

            let pass = result.with_context(|| format!("failed to build language \"{lang}\""))?;
            report.push(ctx, pass);
        }

        Ok(report)
    }
}

impl RunReport {
    fn push(&mut self, ctx: &BuildContext, report: PassReport) {
        self.passes.push(PassSummary {
            lang: ctx.current_language.clone(),
            destination: ctx.destination_path.clone(),
            report,
        });
    }
}
