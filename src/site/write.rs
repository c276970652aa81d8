//! Output file writing.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::i18n::StaticAsset;

pub fn write_page(output: &Path, content: &str) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, content).with_context(|| format!("failed to write {}", output.display()))
}

/// Copy `asset` to the same relative path under `destination`.
pub fn copy_asset(asset: &StaticAsset, destination: &Path) -> Result<()> {
    let output = destination.join(&asset.relative);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(&asset.source, &output)
        .with_context(|| format!("failed to copy {} to {}", asset.source.display(), output.display()))?;
    Ok(())
}

/// Remove the whole output tree.
pub fn clean_destination(destination: &Path) -> Result<()> {
    if destination.exists() {
        fs::remove_dir_all(destination).with_context(|| {
            format!("failed to clean output directory {}", destination.display())
        })?;
    }
    Ok(())
}
