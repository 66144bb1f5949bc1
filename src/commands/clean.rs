//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Devlog;

/// Clean the public directory and cache
pub fn run(devlog: &Devlog) -> Result<()> {
    if devlog.public_dir.exists() {
        fs::remove_dir_all(&devlog.public_dir)?;
        tracing::info!("Deleted: {:?}", devlog.public_dir);
    }

    let cache_dir = devlog.base_dir.join(".devlog-cache");
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        tracing::info!("Deleted: {:?}", cache_dir);
    }

    Ok(())
}
