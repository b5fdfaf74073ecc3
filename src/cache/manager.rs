//! Region cache for persisting price sheets to disk
//!
//! Provides a `RegionCache` that lays price sheets out as
//! `<base>/<region>/<file_stem>.json` and never overwrites an existing file.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default cache root, relative to the repository root
pub const DEFAULT_BASE_DIR: &str = "src/data/pricing/regions";

/// Manages the on-disk layout of cached price sheets
///
/// A cache file is written at most once. Anything already present at a
/// pair's path, even an empty or malformed file, counts as cached.
#[derive(Debug, Clone)]
pub struct RegionCache {
    /// Directory holding one subdirectory per region
    base_dir: PathBuf,
}

impl RegionCache {
    /// Creates a RegionCache rooted at `base_dir`
    pub fn with_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the path of the cache file for a region and file stem
    pub fn path_for(&self, region: &str, file_stem: &str) -> PathBuf {
        self.base_dir
            .join(region)
            .join(format!("{}.json", file_stem))
    }

    /// Whether a cache file for the pair is already on disk
    pub fn contains(&self, region: &str, file_stem: &str) -> bool {
        self.path_for(region, file_stem).exists()
    }

    /// Writes data to the pair's cache file as indented JSON
    ///
    /// Creates the region directory when missing. The caller is responsible
    /// for checking [`RegionCache::contains`] first; this method replaces
    /// whatever is at the path.
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - The path that was written
    /// * `Err` if serialization, directory creation or file writing fails
    pub fn write<T: Serialize>(&self, region: &str, file_stem: &str, data: &T) -> io::Result<PathBuf> {
        let path = self.path_for(region, file_stem);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(&path, json)?;
        Ok(path)
    }
}

impl Default for RegionCache {
    fn default() -> Self {
        Self::with_dir(PathBuf::from(DEFAULT_BASE_DIR))
    }
}
