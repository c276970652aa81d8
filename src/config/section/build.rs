//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "."                     # Content tree root (relative to the config file)
//! destination = "_site"            # Output root; other languages go to <destination>/pages/<lang>
//! include = [".htaccess"]          # Dot/underscore files copied anyway
//! exclude = ["node_modules"]       # Path prefixes never read
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Content source directory.
    pub source: PathBuf,

    /// Build output directory.
    pub destination: PathBuf,

    /// Entries copied even though they start with `.` or `_`.
    pub include: Vec<String>,

    /// Path prefixes skipped during discovery.
    pub exclude: Vec<String>,

    /// Clean output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            source: ".".into(),
            destination: "_site".into(),
            include: vec![".htaccess".into()],
            exclude: vec![
                crate::config::CONFIG_FILE.into(),
                "node_modules".into(),
                "target".into(),
            ],
            clean: false,
        }
    }
}
