//! Directory-backed page source.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use notify::RecommendedWatcher;
use tokio::sync::watch;
use walkdir::{DirEntry, WalkDir};
use zero_router::{LoadError, Module, PageSource};

use crate::error::SourceError;
use crate::front_matter::parse_front_matter;
use crate::page::{Page, PageKind};
use crate::watcher::PageWatcher;

/// Page source reading markdown and HTML pages from a directory tree.
///
/// Keys are `./`-prefixed, forward-slash paths relative to the root, sorted
/// so that discovery order is stable across platforms.
pub struct FsPageSource {
    root: PathBuf,
    excludes: Vec<PathBuf>,
    changes: Arc<watch::Sender<u64>>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl FsPageSource {
    /// Open a pages directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SourceError::NotFound(root));
        }
        let (changes, _) = watch::channel(0);

        Ok(Self {
            root,
            excludes: Vec::new(),
            changes: Arc::new(changes),
            watcher: Mutex::new(None),
        })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Leave a subtree out of listing and watching, e.g. a build output
    /// directory placed inside the pages directory.
    ///
    /// Relative paths are taken relative to the root. Paths outside the
    /// root, or the root itself, are ignored.
    pub fn with_exclude(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let relative = if path.is_relative() {
            Some(path)
        } else {
            path.strip_prefix(&self.root).ok()
        };

        match relative {
            Some(relative) if relative.components().next().is_some() => {
                tracing::debug!(path = %path.display(), "excluding from pages");
                self.excludes.push(relative.to_path_buf());
            }
            _ => tracing::debug!(path = %path.display(), "exclude outside pages root, ignoring"),
        }
        self
    }

    /// Excluded subtrees, relative to the root.
    pub fn excludes(&self) -> &[PathBuf] {
        &self.excludes
    }

    fn is_excluded(&self, path: &Path) -> bool {
        is_under_any(&self.root, &self.excludes, path)
    }

    /// Start watching the directory; every change bumps the channel returned
    /// by `changes`. Calling this again is a no-op.
    pub fn watch(&self) -> Result<(), SourceError> {
        let mut slot = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            let watcher = PageWatcher::new(&self.root, self.changes.clone())
                .with_excludes(self.excludes.clone());
            *slot = Some(watcher.run()?);
        }
        Ok(())
    }

    /// Signal a change by hand.
    pub fn notify_changed(&self) {
        self.changes.send_modify(|generation| *generation += 1);
    }

    /// Absolute path of the file behind a key.
    pub fn path_of(&self, key: &str) -> PathBuf {
        let relative = key.strip_prefix("./").unwrap_or(key);
        relative
            .split('/')
            .filter(|part| !part.is_empty() && *part != "." && *part != "..")
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    fn key_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(format!("./{}", parts.join("/")))
    }

    fn read_page(&self, key: &str) -> Result<Module, SourceError> {
        let path = self.path_of(key);
        let kind = PageKind::from_path(&path).ok_or_else(|| {
            SourceError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a page file"),
            )
        })?;
        let text = std::fs::read_to_string(&path).map_err(|e| SourceError::io(&path, e))?;
        let parsed = parse_front_matter(&path, &text)?;

        let dir = path.parent().unwrap_or(&self.root);
        let page = Page::new(kind, parsed.body, &parsed.props, dir);

        let mut module = Module::new().with_component(Arc::new(page));
        if parsed.format.is_some() {
            module = module.with_front_matter(parsed.props);
        }
        Ok(module)
    }
}

impl PageSource for FsPageSource {
    fn list(&self) -> Vec<String> {
        let mut keys: Vec<String> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !(is_hidden(entry) || self.is_excluded(entry.path()))
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| PageKind::from_path(entry.path()).is_some())
            .filter_map(|entry| self.key_of(entry.path()))
            .collect();

        keys.sort();
        tracing::debug!(root = %self.root.display(), pages = keys.len(), "listed pages");
        keys
    }

    fn load(&self, key: &str) -> Result<Module, LoadError> {
        Ok(self.read_page(key)?)
    }

    fn changes(&self) -> Option<watch::Receiver<u64>> {
        Some(self.changes.subscribe())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "node_modules"
}

/// Whether `path` lies in one of `excludes` (relative to `root`).
pub(crate) fn is_under_any(root: &Path, excludes: &[PathBuf], path: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(relative) => excludes.iter().any(|exclude| relative.starts_with(exclude)),
        Err(_) => false,
    }
}
