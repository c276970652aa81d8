//! Source tree discovery for one pass.

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rustc_hash::FxHashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::BuildContext;
use crate::i18n::{I18N_DIR, StaticAsset, exclude};
use crate::page::{ContentNode, post::POSTS_DIR, split_front_matter};
use crate::utils::path::to_slash;

/// Layout templates live here, one per `<name>.html`.
pub const LAYOUTS_DIR: &str = "_layouts";

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Extensions accepted inside a posts directory.
const POST_EXTENSIONS: &[&str] = &["md", "markdown", "html"];

#[derive(Debug, Default)]
pub struct Discovered {
    pub nodes: Vec<ContentNode>,
    pub assets: Vec<StaticAsset>,
}

/// Which entries discovery reads.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub root: &'a Path,
    pub destination: &'a Path,
    pub includes: &'a [String],
    pub excludes: &'a [String],
}

impl Selection<'_> {
    /// `_x` and `.x` entries are skipped unless listed in `includes`.
    /// Excluded prefixes and the output tree are always skipped.
    pub fn accepts(&self, path: &Path) -> bool {
        if path.starts_with(self.destination) {
            return false;
        }
        let Ok(relative) = path.strip_prefix(self.root) else {
            return false;
        };
        let relative = to_slash(relative);
        if relative.is_empty() {
            return true;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if IGNORED_FILES.iter().any(|f| *f == name) {
            return false;
        }

        let special = name.starts_with('.') || name.starts_with('_') || name.ends_with('~');
        if special && !self.includes.iter().any(|i| *i == name || *i == relative) {
            return false;
        }

        !exclude::is_excluded(&relative, self.excludes)
    }
}

/// Collect pages, posts and static assets for the language in `ctx`.
pub fn discover(ctx: &BuildContext, includes: &[String], excludes: &[String]) -> Result<Discovered> {
    let selection = Selection {
        root: &ctx.source_root,
        destination: &ctx.destination_root,
        includes,
        excludes,
    };
    let mut discovered = Discovered::default();

    for path in walk(&selection) {
        let relative = relative_to(&path, &ctx.source_root);
        if starts_with_fence(&path) {
            let (data, body) = read_front_matter(&path, &relative)?;
            let mut node = ContentNode::page(&path, &relative, data, body);
            node.apply_permalink(&ctx.current_language, ctx.relative_permalinks);
            discovered.nodes.push(node);
        } else {
            discovered.assets.push(StaticAsset::new(&path, relative));
        }
    }

    let posts_dir = posts_dir(ctx);
    if posts_dir.is_dir() {
        for path in collect_files(&posts_dir) {
            if !has_extension(&path, POST_EXTENSIONS) {
                continue;
            }
            let relative = relative_to(&path, &ctx.source_root);
            let (data, body) = read_front_matter(&path, &relative)?;
            let mut node = ContentNode::post(&path, &relative, &ctx.current_language, data, body);
            node.apply_permalink(&ctx.current_language, ctx.relative_permalinks);
            discovered.nodes.push(node);
        }
    }

    Ok(discovered)
}

/// `_i18n/<lang>/_posts`, unless `_posts` is excluded from localization.
pub fn posts_dir(ctx: &BuildContext) -> PathBuf {
    let translate_posts = !ctx.exclusion_list.iter().any(|e| e == POSTS_DIR);
    if translate_posts {
        ctx.source_root
            .join(I18N_DIR)
            .join(&ctx.current_language)
            .join(POSTS_DIR)
    } else {
        ctx.source_root.join(POSTS_DIR)
    }
}

/// Files accepted by `selection`, sorted. Rejected directories are pruned.
fn walk(selection: &Selection<'_>) -> Vec<PathBuf> {
    let root = selection.root.to_path_buf();
    let destination = selection.destination.to_path_buf();
    let includes = selection.includes.to_vec();
    let excludes = selection.excludes.to_vec();

    WalkDir::new(selection.root)
        .skip_hidden(false)
        .sort(true)
        .process_read_dir(move |_, _, _, children| {
            let selection = Selection {
                root: &root,
                destination: &destination,
                includes: &includes,
                excludes: &excludes,
            };
            children.retain(|entry| {
                entry
                    .as_ref()
                    .map(|e| selection.accepts(&e.path()))
                    .unwrap_or(false)
            });
        })
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect()
}

fn collect_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect()
}

fn relative_to(path: &Path, root: &Path) -> String {
    to_slash(path.strip_prefix(root).unwrap_or(path))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e.to_ascii_lowercase().as_str()))
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Whether the file opens with `---` or `+++` (after an optional BOM),
/// without reading it whole.
fn starts_with_fence(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut head = Vec::with_capacity(7);
    if file.take(7).read_to_end(&mut head).is_err() {
        return false;
    }
    let head = head.strip_prefix(UTF8_BOM).unwrap_or(head.as_slice());
    [b"---\n".as_slice(), b"---\r", b"+++\n", b"+++\r"]
        .iter()
        .any(|fence| head.starts_with(fence))
}

fn read_front_matter(
    path: &Path,
    relative: &str,
) -> Result<(serde_json::Map<String, serde_json::Value>, String)> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let parsed = split_front_matter(&content)
        .with_context(|| format!("invalid front matter in {relative}"))?;

    Ok(match parsed {
        Some((data, body)) => (data, body.to_string()),
        None => (serde_json::Map::new(), content),
    })
}

// ============================================================================
// Layouts
// ============================================================================

#[derive(Debug, Clone)]
pub struct Layout {
    pub body: String,
    /// Layout this one is wrapped in.
    pub parent: Option<String>,
}

pub type Layouts = FxHashMap<String, Layout>;

/// `_layouts/<name>.html`, keyed by name.
pub fn load_layouts(source_root: &Path) -> Result<Layouts> {
    let dir = source_root.join(LAYOUTS_DIR);
    let mut layouts = Layouts::default();
    if !dir.is_dir() {
        return Ok(layouts);
    }

    for path in collect_files(&dir) {
        let Ok(name) = path.strip_prefix(&dir).map(|rel| {
            let rel = to_slash(rel);
            rel.rsplit_once('.').map_or(rel.clone(), |(stem, _)| stem.to_string())
        }) else {
            continue;
        };

        let relative = relative_to(&path, source_root);
        let (data, body) = read_front_matter(&path, &relative)?;
        let parent = data.get("layout").and_then(|v| v.as_str()).map(str::to_string);
        layouts.insert(name, Layout { body, parent });
    }

    Ok(layouts)
}
