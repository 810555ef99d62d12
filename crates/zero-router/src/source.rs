//! Page source capability.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use zero_core::{Component, Props};

/// Error returned by a module loader.
pub type LoadError = Box<dyn std::error::Error + Send + Sync>;

/// The export surface of a loaded page module.
#[derive(Clone, Default)]
pub struct Module {
    /// The module's default export, if it exposes one.
    pub default: Option<Arc<dyn Component>>,
    /// The module itself, when it is directly renderable.
    pub component: Option<Arc<dyn Component>>,
    /// Declarative front-matter metadata.
    pub front_matter: Option<Props>,
}

impl Module {
    /// Create an empty module (not renderable).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a module whose default export is `component`.
    pub fn with_default(component: Arc<dyn Component>) -> Self {
        Self {
            default: Some(component),
            ..Default::default()
        }
    }

    /// Set the module's own component.
    pub fn with_component(mut self, component: Arc<dyn Component>) -> Self {
        self.component = Some(component);
        self
    }

    /// Attach front-matter metadata.
    pub fn with_front_matter(mut self, front_matter: Props) -> Self {
        self.front_matter = Some(front_matter);
        self
    }

    /// Resolve the renderable entry point: the default export, falling back
    /// to the module itself.
    pub fn resolve_component(&self) -> Option<Arc<dyn Component>> {
        self.default.clone().or_else(|| self.component.clone())
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("default", &self.default.is_some())
            .field("component", &self.component.is_some())
            .field("front_matter", &self.front_matter)
            .finish()
    }
}

/// A collection of page modules.
///
/// Implementations may scan a directory, read a build manifest or serve a
/// fixed in-memory set; discovery only relies on this interface.
pub trait PageSource: Send + Sync {
    /// Identifiers of all modules, in a stable order.
    fn list(&self) -> Vec<String>;

    /// Load the module with the given identifier.
    fn load(&self, key: &str) -> Result<Module, LoadError>;

    /// Channel bumped whenever the module graph changes.
    ///
    /// Sources that never change return `None`.
    fn changes(&self) -> Option<watch::Receiver<u64>> {
        None
    }
}

type Loader = Arc<dyn Fn() -> Result<Module, LoadError> + Send + Sync>;

/// In-memory page source.
///
/// Keeps insertion order, which becomes discovery order.
pub struct StaticSource {
    entries: Vec<(String, Loader)>,
    changes: watch::Sender<u64>,
}

impl StaticSource {
    /// Create an empty source.
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            entries: Vec::new(),
            changes,
        }
    }

    /// Add a module under `key`.
    pub fn with_module(self, key: impl Into<String>, module: Module) -> Self {
        self.with_loader(key, move || Ok(module.clone()))
    }

    /// Add a loader under `key`, invoked on every discovery pass.
    pub fn with_loader<F>(mut self, key: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<Module, LoadError> + Send + Sync + 'static,
    {
        self.entries.push((key.into(), Arc::new(loader)));
        self
    }

    /// Signal that the module graph changed.
    pub fn notify_changed(&self) {
        self.changes.send_modify(|generation| *generation += 1);
    }
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for StaticSource {
    fn list(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    fn load(&self, key: &str) -> Result<Module, LoadError> {
        let (_, loader) = self
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .ok_or_else(|| format!("no module named '{}'", key))?;
        loader()
    }

    fn changes(&self) -> Option<watch::Receiver<u64>> {
        Some(self.changes.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use zero_core::{from_fn, Node};

    use super::*;

    #[test]
    fn test_resolve_component_prefers_default() {
        let default = from_fn(|_| Ok(Node::text("default")));
        let itself = from_fn(|_| Ok(Node::text("itself")));
        let module = Module::with_default(default).with_component(itself);

        let resolved = module.resolve_component().unwrap();
        let out = resolved.render(&Props::new()).unwrap();
        assert_eq!(out.to_html(), "default");
    }

    #[test]
    fn test_resolve_component_falls_back_to_module() {
        let module = Module::new().with_component(from_fn(|_| Ok(Node::text("itself"))));

        let out = module
            .resolve_component()
            .unwrap()
            .render(&Props::new())
            .unwrap();
        assert_eq!(out.to_html(), "itself");
    }

    #[test]
    fn test_resolve_component_none() {
        assert!(Module::new().resolve_component().is_none());
    }

    #[test]
    fn test_static_source_keeps_order() {
        let source = StaticSource::new()
            .with_module("./b.md", Module::new())
            .with_module("./a.md", Module::new());

        assert_eq!(source.list(), vec!["./b.md", "./a.md"]);
    }

    #[test]
    fn test_static_source_unknown_key() {
        let source = StaticSource::new();
        assert!(source.load("./missing.md").is_err());
    }

    #[test]
    fn test_static_source_notify_changed() {
        let source = StaticSource::new();
        let rx = source.changes().unwrap();

        source.notify_changed();
        source.notify_changed();

        assert_eq!(*rx.borrow(), 2);
    }
}
