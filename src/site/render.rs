use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

use super::scan::Layouts;
use crate::log;
use crate::page::ContentNode;
use crate::template::{RenderEnv, Scope, TemplateEngine};

/// Layouts wrapping layouts beyond this depth are treated as a cycle.
const MAX_LAYOUT_DEPTH: usize = 16;

/// Render a page body, convert it, then wrap it in its layout chain.
pub fn render_node(
    node: &ContentNode,
    layouts: &Layouts,
    engine: &dyn TemplateEngine,
    env: &RenderEnv<'_>,
) -> Result<String> {
    let mut scope = Scope::new();
    scope.set("site", env.ctx.site_vars());
    scope.set("page", node.page_vars());

    let rendered = engine
        .render(&node.body, &mut scope, env)
        .with_context(|| format!("failed to render {}", node.relative))?;
    let ext = Path::new(&node.relative)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mut content = env.converters.convert(ext, &rendered);

    let mut next = node.layout().filter(|name| !is_no_layout(name));
    let mut depth = 0;
    while let Some(name) = next {
        let Some(layout) = layouts.get(name) else {
            log!("warning"; "layout '{}' requested in {} does not exist", name, node.relative);
            break;
        };
        depth += 1;
        if depth > MAX_LAYOUT_DEPTH {
            anyhow::bail!("layout '{}' in {} wraps itself", name, node.relative);
        }

        scope.set("content", Value::String(content));
        content = engine
            .render(&layout.body, &mut scope, env)
            .with_context(|| format!("failed to render layout '{name}' for {}", node.relative))?;
        next = layout.parent.as_deref();
    }

    Ok(content)
}

fn is_no_layout(name: &str) -> bool {
    name.is_empty() || name.eq_ignore_ascii_case("none")
}
