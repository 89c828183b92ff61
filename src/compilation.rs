//! In-memory model of a completed build.
//!
//! A [`Compilation`] is what the post-emit hook receives from the build
//! pipeline: the named asset map produced by the bundling step and the
//! build's error sink. The publisher reads the map, optionally evicts
//! entries after uploading them, and appends upload failures to the sink;
//! it never creates assets.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::store::StoreError;

/// A single emitted artifact as stored in the build output map.
#[derive(Debug, Clone)]
pub struct AssetSource {
    /// Where the normal emit path would write the artifact on disk.
    pub exists_at: PathBuf,
    bytes: Vec<u8>,
}

impl AssetSource {
    pub fn new(exists_at: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            exists_at: exists_at.into(),
            bytes,
        }
    }

    /// Materialize the full content of the asset.
    pub fn source(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// The result of one build: emitted assets plus the build's error sink.
///
/// Upload completion paths evict entries through a shared reference, hence
/// the interior mutability. All access runs under one cooperative task.
#[derive(Debug, Default)]
pub struct Compilation {
    assets: Mutex<BTreeMap<String, AssetSource>>,
    errors: Mutex<Vec<StoreError>>,
}

impl Compilation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every file under `dist` into an asset map, naming each file by
    /// its `/`-separated path relative to `dist`.
    pub fn from_dir(dist: &Path) -> io::Result<Self> {
        let compilation = Compilation::new();
        collect_assets(dist, dist, &compilation)?;
        Ok(compilation)
    }

    pub fn insert_asset(&self, name: impl Into<String>, source: AssetSource) {
        self.assets
            .lock()
            .expect("asset map lock poisoned")
            .insert(name.into(), source);
    }

    /// Evict an asset so the normal emit path no longer sees it.
    pub fn remove_asset(&self, name: &str) -> Option<AssetSource> {
        self.assets
            .lock()
            .expect("asset map lock poisoned")
            .remove(name)
    }

    pub fn contains_asset(&self, name: &str) -> bool {
        self.assets
            .lock()
            .expect("asset map lock poisoned")
            .contains_key(name)
    }

    pub fn asset_names(&self) -> Vec<String> {
        self.assets
            .lock()
            .expect("asset map lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Clone out the current entries, in map order.
    pub fn assets_snapshot(&self) -> Vec<(String, AssetSource)> {
        self.assets
            .lock()
            .expect("asset map lock poisoned")
            .iter()
            .map(|(name, source)| (name.clone(), source.clone()))
            .collect()
    }

    /// Append a failure to the build's error collection.
    pub fn push_error(&self, err: StoreError) {
        self.errors
            .lock()
            .expect("error sink lock poisoned")
            .push(err);
    }

    pub fn errors(&self) -> Vec<StoreError> {
        self.errors
            .lock()
            .expect("error sink lock poisoned")
            .clone()
    }
}

fn collect_assets(root: &Path, dir: &Path, compilation: &Compilation) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_assets(root, &path, compilation)?;
        } else {
            let name = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let bytes = fs::read(&path)?;
            compilation.insert_asset(name, AssetSource::new(path, bytes));
        }
    }
    Ok(())
}
