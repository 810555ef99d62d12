//! Live mounts: a render tree committed to a document and kept current
//! across navigation and hot updates.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use tokio::sync::watch;
use zero_core::Node;
use zero_render::{RenderMode, ROOT_ID};
use zero_router::RouteTable;

use crate::app::View;
use crate::error::{MountError, SiteError};
use crate::server::HydrationData;

/// How a tree is committed to its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStrategy {
    /// Replace whatever the container holds.
    Create,
    /// Reconcile with server-rendered markup already in the container.
    Hydrate,
}

/// Handle to a container element in a live document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Element id.
    pub id: String,
}

impl Container {
    /// Create a handle for the element with `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A document that render trees can be mounted into.
pub trait LiveDocument: Send + Sync {
    /// Find an existing container by id.
    fn root(&self, id: &str) -> Option<Container>;

    /// Append a fresh, empty container.
    fn append_root(&self, id: &str) -> Container;

    /// Current location, including the basename.
    fn location(&self) -> String;

    /// Record a new location.
    fn set_location(&self, location: &str);

    /// Commit a tree to a container.
    fn commit(
        &self,
        container: &Container,
        tree: &Node,
        strategy: MountStrategy,
    ) -> Result<(), MountError>;

    /// Reset the viewport to the origin.
    fn reset_scroll(&self) {}

    /// Data embedded by the server when it rendered the existing markup.
    fn hydration_data(&self) -> Option<HydrationData> {
        None
    }
}

/// Hydrate only markup the server rendered for this page. Without embedded
/// data the markup itself is trusted.
pub(crate) fn hydration_strategy(
    document: &dyn LiveDocument,
    view: &View,
    location: &str,
    requested: MountStrategy,
) -> MountStrategy {
    if requested != MountStrategy::Hydrate {
        return requested;
    }
    match document.hydration_data() {
        Some(data) if !data.describes(location, &view.options.basename) => {
            tracing::debug!(
                rendered = %data.location,
                location,
                "server markup is for another page, re-creating"
            );
            MountStrategy::Create
        }
        _ => MountStrategy::Hydrate,
    }
}

/// A mounted site.
///
/// The route table sits behind an atomic swap, so hot updates replace it
/// wholesale while readers keep whichever table they loaded.
pub struct Mounted {
    document: Arc<dyn LiveDocument>,
    container: Container,
    routes: ArcSwap<RouteTable>,
    location: ArcSwap<String>,
    view: View,
    commit_lock: Mutex<()>,
}

impl Mounted {
    pub(crate) fn mount(
        document: Arc<dyn LiveDocument>,
        routes: RouteTable,
        view: View,
        strategy: MountStrategy,
    ) -> Result<Self, MountError> {
        let location = view.relative(&document.location()).to_string();

        let container = match document.root(ROOT_ID) {
            Some(container) => container,
            None => {
                tracing::debug!(id = ROOT_ID, "no root container, appending one");
                document.append_root(ROOT_ID)
            }
        };

        let strategy = hydration_strategy(document.as_ref(), &view, &location, strategy);
        let tree = view.compose(&routes, &location, RenderMode::Live);
        match document.commit(&container, &tree, strategy) {
            Ok(()) => {}
            Err(err @ MountError::Hydration { .. }) => {
                tracing::warn!(error = %err, "hydration failed, re-creating");
                document.commit(&container, &tree, MountStrategy::Create)?;
            }
            Err(err) => return Err(err),
        }

        tracing::info!(
            location = %location,
            routes = routes.len(),
            strategy = ?strategy,
            "mounted"
        );

        Ok(Self {
            document,
            container,
            routes: ArcSwap::from_pointee(routes),
            location: ArcSwap::from_pointee(location),
            view,
            commit_lock: Mutex::new(()),
        })
    }

    /// Current route table.
    pub fn routes(&self) -> Arc<RouteTable> {
        self.routes.load_full()
    }

    /// Current location, relative to the basename.
    pub fn location(&self) -> String {
        self.location.load().as_ref().clone()
    }

    /// The container the site is mounted in.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Compose the tree for `location` from the current table without
    /// committing it.
    pub fn render_at(&self, location: &str) -> Node {
        let routes = self.routes.load();
        self.view.compose(&routes, location, RenderMode::Live)
    }

    /// Replace the route table and re-render in place.
    pub fn hot_update(&self, routes: RouteTable) -> Result<(), MountError> {
        let count = routes.len();
        self.routes.store(Arc::new(routes));
        self.commit()?;

        tracing::info!(routes = count, "hot update applied");
        Ok(())
    }

    /// Move to another location (relative to the basename) and re-render.
    pub fn navigate(&self, location: &str) -> Result<(), MountError> {
        self.location.store(Arc::new(location.to_string()));
        self.document.set_location(&self.view.options.link_to(location));
        self.commit()?;

        if !self.view.options.disable_scroll {
            self.document.reset_scroll();
        }
        tracing::debug!(location, "navigated");
        Ok(())
    }

    /// Rebuild and hot-update on every change until the channel closes.
    ///
    /// A failed rebuild is logged and the current table stays mounted.
    pub async fn watch<F, Fut>(&self, mut changes: watch::Receiver<u64>, mut rebuild: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RouteTable, SiteError>>,
    {
        while changes.changed().await.is_ok() {
            let generation = *changes.borrow_and_update();

            match rebuild().await {
                Ok(routes) => {
                    if let Err(err) = self.hot_update(routes) {
                        tracing::warn!(generation, error = %err, "hot update failed");
                    }
                }
                Err(err) => {
                    tracing::warn!(generation, error = %err, "rebuild failed, keeping current routes");
                }
            }
        }
        tracing::debug!("change channel closed");
    }

    /// Render from the latest table and location, then commit. Serialized,
    /// so the last commit always reflects the latest state.
    fn commit(&self) -> Result<(), MountError> {
        let _guard = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let location = self.location.load();
        let tree = self.render_at(&location);
        self.document.commit(&self.container, &tree, MountStrategy::Create)
    }
}

impl fmt::Debug for Mounted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mounted")
            .field("container", &self.container)
            .field("location", &self.location())
            .field("routes", &self.routes.load().len())
            .finish_non_exhaustive()
    }
}

/// In-memory live document.
///
/// Keeps committed markup per container and counts commits on a watch
/// channel. Used by the dev server as the live view of the site, and by
/// tests.
#[derive(Debug)]
pub struct MemoryDocument {
    location: Mutex<String>,
    roots: Mutex<Vec<(String, String)>>,
    data: Option<HydrationData>,
    commits: watch::Sender<u64>,
    scroll_resets: AtomicUsize,
}

impl MemoryDocument {
    /// Create an empty document at `location`.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Mutex::new(location.into()),
            roots: Mutex::new(Vec::new()),
            data: None,
            commits: watch::channel(0).0,
            scroll_resets: AtomicUsize::new(0),
        }
    }

    /// Add a container holding pre-rendered markup.
    pub fn with_root(self, id: impl Into<String>, html: impl Into<String>) -> Self {
        self.roots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id.into(), html.into()));
        self
    }

    /// Carry server hydration data, as read from a rendered page.
    pub fn with_hydration_data(mut self, data: HydrationData) -> Self {
        self.data = Some(data);
        self
    }

    /// Markup held by a container.
    pub fn html(&self, id: &str) -> Option<String> {
        self.roots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(root, _)| root == id)
            .map(|(_, html)| html.clone())
    }

    /// Markup held by the designated root container.
    pub fn contents(&self) -> Option<String> {
        self.html(ROOT_ID)
    }

    /// Number of successful commits.
    pub fn commits(&self) -> u64 {
        *self.commits.borrow()
    }

    /// Channel bumped after every successful commit.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.commits.subscribe()
    }

    /// Number of scroll resets.
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets.load(Ordering::SeqCst)
    }
}

impl LiveDocument for MemoryDocument {
    fn root(&self, id: &str) -> Option<Container> {
        self.roots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(root, _)| root == id)
            .then(|| Container::new(id))
    }

    fn append_root(&self, id: &str) -> Container {
        self.roots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id.to_string(), String::new()));
        Container::new(id)
    }

    fn location(&self) -> String {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_location(&self, location: &str) {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = location.to_string();
    }

    fn commit(
        &self,
        container: &Container,
        tree: &Node,
        strategy: MountStrategy,
    ) -> Result<(), MountError> {
        let html = tree.to_html();
        let mut roots = self.roots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = roots
            .iter_mut()
            .find(|(root, _)| *root == container.id)
            .ok_or_else(|| MountError::Commit {
                container: container.id.clone(),
                message: "no such container".to_string(),
            })?;

        if strategy == MountStrategy::Hydrate && slot.1 != html {
            return Err(MountError::Hydration {
                container: container.id.clone(),
            });
        }

        slot.1 = html;
        drop(roots);
        self.commits.send_modify(|count| *count += 1);
        Ok(())
    }

    fn reset_scroll(&self) {
        self.scroll_resets.fetch_add(1, Ordering::SeqCst);
    }

    fn hydration_data(&self) -> Option<HydrationData> {
        self.data.clone()
    }
}
