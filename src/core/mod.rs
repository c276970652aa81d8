//! Build state and the multi-pass orchestrator.

mod context;
mod orchestrator;

pub use context::BuildContext;
pub use orchestrator::{BuildOrchestrator, PassReport, RunReport, SiteBuilder};

/// Context rooted at `root` writing to `root/_site`.
#[cfg(test)]
pub fn test_context(root: &std::path::Path, languages: &[&str]) -> BuildContext {
    let languages = context::Languages::new(languages.iter().copied()).unwrap();
    BuildContext::new(root, root.join("_site"), "", languages)
}
