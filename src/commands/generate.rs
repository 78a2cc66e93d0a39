//! Generate static files

use anyhow::{Context, Result};
use notify_debouncer_mini::notify::{RecursiveMode, Watcher as _};
use notify_debouncer_mini::new_debouncer;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::ContentLoader;
use crate::generator::Generator;
use crate::Site;

/// Load every post and write the site
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let loader = ContentLoader::new(site);
    let posts = loader
        .load_posts()
        .with_context(|| format!("Failed to load posts from {:?}", site.posts_dir))?;
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(site)?;
    generator.generate(&posts)?;

    tracing::info!(
        "Generated {:?} in {:.2}s",
        site.output_dir,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Watch the posts, static files and config, and regenerate on change.
///
/// Returns on Ctrl+C or when the watcher shuts down.
pub async fn watch(site: &Site) -> Result<()> {
    let base_dir = site.base_dir.clone();
    let watched = vec![
        site.posts_dir.clone(),
        site.static_dir.clone(),
        site.config_path(),
    ];

    let watcher = tokio::task::spawn_blocking(move || watch_loop(base_dir, watched));

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    tokio::select! {
        result = watcher => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Stopped watching");
            Ok(())
        }
    }
}

/// Blocking watcher loop. The site is reloaded on each change so config
/// edits take effect.
fn watch_loop(base_dir: PathBuf, watched: Vec<PathBuf>) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for path in &watched {
        if !path.exists() {
            continue;
        }
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    for result in rx {
        match result {
            Ok(events) => {
                let relevant = events.iter().any(|e| {
                    let path = e.path.to_string_lossy();
                    !path.contains(".git") && !path.contains(".DS_Store") && !path.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                tracing::info!("Change detected, regenerating...");
                match Site::new(&base_dir).and_then(|site| run(&site)) {
                    Ok(()) => tracing::info!("Regenerated successfully"),
                    Err(e) => tracing::warn!("Generation failed: {:#}", e),
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}
