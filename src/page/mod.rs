//! Content nodes: pages and posts.

mod frontmatter;
mod node;
pub mod post;

pub use frontmatter::split_front_matter;
pub use node::{ContentNode, NodeKind};

/// Page node at `relative` with front matter `data` (a JSON object).
#[cfg(test)]
pub fn test_node(relative: &str, data: serde_json::Value) -> ContentNode {
    let data = data.as_object().cloned().unwrap_or_default();
    ContentNode::page(std::path::PathBuf::from(relative), relative, data, String::new())
}
