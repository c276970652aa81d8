//! `build` command.

use anyhow::Result;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::core::{BuildContext, BuildOrchestrator, RunReport};
use crate::i18n::Translator;
use crate::log;
use crate::site::StaticSiteBuilder;
use crate::utils::plural_count;

/// Build every language tree described by `config`.
pub fn build_all(config: &SiteConfig) -> Result<RunReport> {
    let mut ctx = BuildContext::from_config(config)?;
    let translator = Arc::new(Translator::new(ctx.source_root.clone()));
    let builder = StaticSiteBuilder::from_config(config, translator);

    let report = BuildOrchestrator::new(builder).run(&mut ctx)?;
    log_build_result(&report);
    Ok(report)
}

fn log_build_result(report: &RunReport) {
    for pass in &report.passes {
        log!(
            "done";
            "{}: {}, {} ({} excluded) -> {}",
            pass.lang,
            plural_count(pass.report.pages, "page"),
            plural_count(pass.report.assets, "asset"),
            pass.report.excluded_assets,
            pass.destination.display()
        );
    }

    let missing = report.total_missing_keys();
    if missing > 0 {
        log!("warning"; "{} fell back to the default language", plural_count(missing, "lookup"));
    }
}
