//! Cache module for skipping no-op builds
//!
//! Stores a fingerprint of the site content (config plus every post's raw
//! source and categories). An unchanged fingerprint means the output tree
//! is already current and generation can be skipped entirely.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::content::Post;
use crate::Devlog;

/// Cache file name
const CACHE_FILE: &str = ".devlog-cache/db.json";

/// Cache database for tracking site content changes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Fingerprint of config and post sources
    pub site_hash: u64,
    /// Total post count at the time of the last build
    pub post_count: usize,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or create a new empty cache
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<CacheDb>(&content) {
                if cache.version == Self::VERSION {
                    return cache;
                }
                tracing::info!("Cache version mismatch, rebuilding cache");
            }
        }
        Self::default()
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_dir = base_dir.join(".devlog-cache");
        fs::create_dir_all(&cache_dir)?;

        let cache_path = base_dir.join(CACHE_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)?;
        Ok(())
    }

    /// Create a cache recording the current site state
    pub fn from_site(devlog: &Devlog, posts: &[Post]) -> Self {
        Self {
            version: Self::VERSION,
            site_hash: site_fingerprint(devlog, posts),
            post_count: posts.len(),
        }
    }

    /// Whether the recorded state matches the current site
    pub fn is_current(&self, devlog: &Devlog, posts: &[Post]) -> bool {
        self.version == Self::VERSION
            && self.post_count == posts.len()
            && self.site_hash == site_fingerprint(devlog, posts)
    }
}

/// Fingerprint the site: config plus every post's source, content and
/// categories, in load order
pub fn site_fingerprint(devlog: &Devlog, posts: &[Post]) -> u64 {
    let mut hasher = DefaultHasher::new();

    if let Ok(config_yaml) = serde_yaml::to_string(&devlog.config) {
        config_yaml.hash(&mut hasher);
    }

    for post in posts {
        post.source.hash(&mut hasher);
        post.raw.hash(&mut hasher);
        post.categories.hash(&mut hasher);
        post.published.hash(&mut hasher);
    }

    hasher.finish()
}
