//! Asset selection: turn the build's asset map into upload candidates.

use regex::Regex;
use std::path::PathBuf;
use tracing::debug;

use crate::compilation::Compilation;

/// A named build artifact selected for upload.
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// Extract the uploadable artifacts from a finished build.
///
/// Content is fully materialized here, forcing any lazy source into memory.
/// The input map is not mutated; eviction happens later, per successful
/// upload.
pub fn select_assets(compilation: &Compilation, exclude: Option<&Regex>) -> Vec<Asset> {
    let mut selected = Vec::new();
    for (name, source) in compilation.assets_snapshot() {
        if let Some(pattern) = exclude {
            if pattern.is_match(&name) {
                debug!(asset = %name, "Asset matches exclude pattern, skipping");
                continue;
            }
        }
        selected.push(Asset {
            path: source.exists_at.clone(),
            content: source.source(),
            name,
        });
    }
    // Malformed map entries carry no name; drop them.
    selected.retain(|asset| !asset.name.is_empty());
    selected
}
