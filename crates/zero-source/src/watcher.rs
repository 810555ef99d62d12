//! Pages directory watcher.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::watch;

use crate::source::is_under_any;

/// Watches a pages directory and bumps a generation counter on every
/// relevant change.
pub struct PageWatcher {
    path: PathBuf,
    excludes: Vec<PathBuf>,
    changes: Arc<watch::Sender<u64>>,
}

impl PageWatcher {
    /// Create a watcher for `path` feeding `changes`.
    pub fn new(path: &Path, changes: Arc<watch::Sender<u64>>) -> Self {
        Self {
            path: path.to_path_buf(),
            excludes: Vec::new(),
            changes,
        }
    }

    /// Ignore changes under these subtrees, given relative to the root.
    pub fn with_excludes(mut self, excludes: Vec<PathBuf>) -> Self {
        self.excludes = excludes;
        self
    }

    /// Start watching. Changes are reported until the returned watcher is
    /// dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let changes = self.changes.clone();
        let root = self.path.clone();
        let excludes = self.excludes.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_relevant(&root, &excludes, &event) => {
                    tracing::debug!(paths = ?event.paths, kind = ?event.kind, "pages changed");
                    changes.send_modify(|generation| *generation += 1);
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::Recursive)?;

        tracing::info!(path = %self.path.display(), "pages watcher started");
        Ok(watcher)
    }
}

/// Create, modify and remove events outside hidden and excluded
/// directories.
fn is_relevant(root: &Path, excludes: &[PathBuf], event: &Event) -> bool {
    let kind = &event.kind;
    if !(kind.is_create() || kind.is_modify() || kind.is_remove()) {
        return false;
    }
    !event.paths.iter().all(|path| {
        let hidden = path
            .strip_prefix(root)
            .unwrap_or(path)
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
        hidden || is_under_any(root, excludes, path)
    })
}
