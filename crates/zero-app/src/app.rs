//! Site setup and the mode selector.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use zero_core::{Node, SiteOptions};
use zero_render::{compose, AppShell, RenderMode, RenderRequest};
use zero_router::{build_routes, discover, IndexName, ModuleRecord, PageSource, RouteTable};

use crate::error::SiteError;
use crate::mount::{LiveDocument, MountStrategy, Mounted};

/// A site: a page source, its options and an optional application shell.
///
/// # Example
///
/// ```rust,ignore
/// let site = Site::new(Arc::new(FsPageSource::open("pages")?))
///     .with_options(SiteOptions::new().with_basename("/docs"))
///     .with_shell(Arc::new(shell));
///
/// let routes = site.routes().await?;
/// ```
pub struct Site {
    source: Arc<dyn PageSource>,
    options: SiteOptions,
    shell: Option<Arc<dyn AppShell>>,
}

impl Site {
    /// Create a site with default options.
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            source,
            options: SiteOptions::default(),
            shell: None,
        }
    }

    /// Set the site options.
    pub fn with_options(mut self, options: SiteOptions) -> Self {
        self.options = options;
        self
    }

    /// Use an application shell.
    pub fn with_shell(mut self, shell: Arc<dyn AppShell>) -> Self {
        self.shell = Some(shell);
        self
    }

    /// Get the options.
    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// Change channel of the underlying page source, if it has one.
    pub fn changes(&self) -> Option<watch::Receiver<u64>> {
        self.source.changes()
    }

    /// Discover page modules, honoring the `match` option.
    pub fn discover(&self) -> Result<Vec<ModuleRecord>, SiteError> {
        let records = discover(self.source.as_ref(), self.options.match_pattern.as_deref())?;
        Ok(records)
    }

    /// Discover pages and build a fresh route table.
    ///
    /// Nothing is cached: every call re-runs discovery and every
    /// initial-data hook.
    pub async fn routes(&self) -> Result<RouteTable, SiteError> {
        let started = Instant::now();
        let records = self.discover()?;
        let index = IndexName::from_filename(self.options.filename.as_deref());
        let routes = build_routes(records, &index).await?;

        tracing::debug!(
            routes = routes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "site routes ready"
        );
        Ok(routes)
    }

    /// Compose the render tree for `location` (relative to the basename).
    pub fn render(&self, routes: &RouteTable, location: &str, mode: RenderMode) -> Node {
        self.view().compose(routes, location, mode)
    }

    /// Build the routes once and either render or mount, depending on the
    /// runtime.
    pub async fn start(&self, runtime: Runtime) -> Result<Started, SiteError> {
        let routes = self.routes().await?;

        match runtime {
            Runtime::Server { location } => {
                tracing::debug!(location = %location, "rendering once");
                Ok(Started::Rendered(self.render(&routes, &location, RenderMode::Static)))
            }
            Runtime::Client { document, dev } => {
                let strategy = if dev {
                    MountStrategy::Create
                } else {
                    MountStrategy::Hydrate
                };
                let mounted = Mounted::mount(document, routes, self.view(), strategy)?;
                Ok(Started::Mounted(mounted))
            }
        }
    }

    pub(crate) fn view(&self) -> View {
        View {
            options: self.options.clone(),
            shell: self.shell.clone(),
        }
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("options", &self.options)
            .field("shell", &self.shell.is_some())
            .finish_non_exhaustive()
    }
}

/// Render settings shared by one-shot renders and live mounts.
#[derive(Clone)]
pub(crate) struct View {
    pub(crate) options: SiteOptions,
    pub(crate) shell: Option<Arc<dyn AppShell>>,
}

impl View {
    pub(crate) fn compose(&self, routes: &RouteTable, location: &str, mode: RenderMode) -> Node {
        let request = RenderRequest::new(routes, location)
            .with_basename(&self.options.basename)
            .with_scroll_reset(!self.options.disable_scroll)
            .with_shell(self.shell.as_deref())
            .with_mode(mode);
        compose(&request)
    }

    /// Location relative to the basename; paths outside it are kept as-is
    /// and fall through to the route index.
    pub(crate) fn relative<'a>(&self, location: &'a str) -> &'a str {
        self.options.strip_base(location).unwrap_or(location)
    }
}

/// Where the site runs.
#[derive(Clone)]
pub enum Runtime {
    /// No live document: render once.
    Server {
        /// Location to render, relative to the basename.
        location: String,
    },
    /// A live document to mount into.
    Client {
        /// The mount target.
        document: Arc<dyn LiveDocument>,
        /// Development mode: create fresh markup instead of hydrating.
        dev: bool,
    },
}

impl Runtime {
    /// Interactive iff a live document is supplied.
    pub fn detect(document: Option<Arc<dyn LiveDocument>>, dev: bool) -> Self {
        match document {
            Some(document) => Self::Client { document, dev },
            None => Self::Server {
                location: "/".to_string(),
            },
        }
    }

    /// Set the location of a one-shot render. Live documents report their
    /// own location, so this has no effect on them.
    pub fn at(self, location: impl Into<String>) -> Self {
        match self {
            Self::Server { .. } => Self::Server {
                location: location.into(),
            },
            client => client,
        }
    }

    /// Whether this runtime mounts into a live document.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Client { .. })
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server { location } => f.debug_struct("Server").field("location", location).finish(),
            Self::Client { dev, .. } => f.debug_struct("Client").field("dev", dev).finish_non_exhaustive(),
        }
    }
}

/// Result of `Site::start`.
#[derive(Debug)]
pub enum Started {
    /// One-shot render output.
    Rendered(Node),
    /// A live mount.
    Mounted(Mounted),
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;
    use zero_core::{from_fn, Component, DataError, InitialPropsContext, Props, RenderError};
    use zero_router::{Module, StaticSource};

    use super::*;
    use crate::mount::MemoryDocument;

    fn page(text: &'static str) -> Module {
        Module::with_default(from_fn(move |_| Ok(Node::element("p").child(text).into_node())))
    }

    fn site() -> Site {
        Site::new(Arc::new(
            StaticSource::new()
                .with_module("./index.md", page("home"))
                .with_module("./about.md", page("about"))
                .with_module("./_draft.md", page("draft")),
        ))
    }

    /// Counts initial-data hook invocations.
    struct Counted(Arc<Mutex<usize>>);

    #[async_trait]
    impl Component for Counted {
        fn render(&self, _props: &Props) -> Result<Node, RenderError> {
            Ok(Node::Empty)
        }

        fn has_initial_props(&self) -> bool {
            true
        }

        async fn initial_props(&self, _ctx: &InitialPropsContext) -> Result<Props, DataError> {
            *self.0.lock().unwrap() += 1;
            Ok(Props::new())
        }
    }

    // === Runtime Tests ===

    #[test]
    fn test_detect_without_document_is_server() {
        let runtime = Runtime::detect(None, true);

        assert!(!runtime.is_interactive());
        assert!(matches!(runtime, Runtime::Server { ref location } if location == "/"));
    }

    #[test]
    fn test_detect_with_document_is_client() {
        let document: Arc<dyn LiveDocument> = Arc::new(MemoryDocument::new("/"));
        let runtime = Runtime::detect(Some(document), false).at("/ignored");

        assert!(runtime.is_interactive());
        assert!(matches!(runtime, Runtime::Client { dev: false, .. }));
    }

    #[test]
    fn test_at_sets_server_location() {
        let runtime = Runtime::detect(None, false).at("/about");
        assert!(matches!(runtime, Runtime::Server { ref location } if location == "/about"));
    }

    // === Site Tests ===

    #[test]
    fn test_discover_skips_reserved_names() {
        let keys: Vec<_> = site().discover().unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["./index.md", "./about.md"]);
    }

    #[test]
    fn test_discover_honors_match_option() {
        let site = site().with_options(SiteOptions::new().with_match("about*"));

        let keys: Vec<_> = site.discover().unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["./about.md"]);
    }

    #[tokio::test]
    async fn test_routes_use_filename_as_index() {
        let site = site().with_options(SiteOptions::new().with_filename("about.md"));

        let routes = site.routes().await.unwrap();

        assert_eq!(routes.routes()[0].href, "/index");
        assert_eq!(routes.routes()[1].href, "/");
        assert!(routes.routes()[1].exact);
    }

    #[tokio::test]
    async fn test_routes_are_rebuilt_every_call() {
        let calls = Arc::new(Mutex::new(0));
        let source = StaticSource::new()
            .with_module("./index.md", Module::with_default(Arc::new(Counted(calls.clone()))));
        let site = Site::new(Arc::new(source));

        site.routes().await.unwrap();
        site.routes().await.unwrap();

        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_start_server_renders_once() {
        let started = site().start(Runtime::detect(None, false).at("/about")).await.unwrap();

        let Started::Rendered(tree) = started else {
            panic!("expected a one-shot render");
        };
        let html = tree.to_html();
        assert!(html.contains(r#"data-mode="static""#));
        assert!(html.contains("<p>about</p>"));
        assert!(!html.contains("<p>home</p>"));
    }

    #[tokio::test]
    async fn test_start_server_honors_options() {
        let site = site().with_options(
            SiteOptions::new()
                .with_basename("/docs")
                .with_scroll_reset(false),
        );

        let Started::Rendered(tree) = site.start(Runtime::detect(None, false)).await.unwrap() else {
            panic!("expected a one-shot render");
        };
        let html = tree.to_html();

        assert!(html.contains(r#"data-basename="/docs""#));
        assert!(!html.contains("data-zero-scroll-reset"));
    }

    #[tokio::test]
    async fn test_start_client_mounts() {
        let document = Arc::new(MemoryDocument::new("/about"));
        let runtime = Runtime::detect(Some(document.clone()), true);

        let started = site().start(runtime).await.unwrap();

        assert!(matches!(started, Started::Mounted(_)));
        let html = document.contents().unwrap();
        assert!(html.contains(r#"data-mode="live""#));
        assert!(html.contains("<p>about</p>"));
    }

    #[tokio::test]
    async fn test_start_propagates_discovery_failure() {
        let source = StaticSource::new().with_loader("./broken.md", || Err("syntax error".into()));
        let site = Site::new(Arc::new(source));

        let err = site.start(Runtime::detect(None, false)).await.unwrap_err();

        assert!(matches!(err, SiteError::Discovery(_)));
    }

    #[tokio::test]
    async fn test_render_props_reach_pages() {
        let source = StaticSource::new().with_module(
            "./index.md",
            Module::with_default(from_fn(|props| {
                Ok(Node::text(props.get("title").and_then(|t| t.as_str()).unwrap_or("").to_string()))
            }))
            .with_front_matter(json!({"title": "Welcome"}).as_object().cloned().unwrap()),
        );
        let site = Site::new(Arc::new(source));
        let routes = site.routes().await.unwrap();

        let html = site.render(&routes, "/", RenderMode::Static).to_html();

        assert!(html.contains("Welcome"));
    }
}
