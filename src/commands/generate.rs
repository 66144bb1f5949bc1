//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::cache::CacheDb;
use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::Devlog;

/// Generate the static site (skips when nothing changed)
pub fn run(devlog: &Devlog) -> Result<()> {
    run_with_options(devlog, false)
}

/// Generate with force option
pub fn run_with_options(devlog: &Devlog, force: bool) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(devlog);
    let posts = loader.load_posts()?;

    tracing::info!("Loaded {} posts", posts.len());

    let cache = CacheDb::load(&devlog.base_dir);
    let output_exists = devlog.public_dir.join("index.html").exists();

    if !force && output_exists && cache.is_current(devlog, &posts) {
        tracing::info!("No changes detected, skipping generation");
        return Ok(());
    }

    let generator = Generator::new(devlog)?;
    generator.generate(&posts)?;

    CacheDb::from_site(devlog, &posts).save(&devlog.base_dir)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(devlog: &Devlog) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(devlog.source_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    let config_path = devlog.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = run(devlog) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Continue waiting
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}
