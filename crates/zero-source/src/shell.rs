//! `_app.html` application shell.

use std::path::{Path, PathBuf};

use serde_json::json;
use zero_core::{merge_props, Node, Props, RenderError};
use zero_render::{route_nav, AppShell, ShellContext};

use crate::error::SourceError;
use crate::front_matter::parse_front_matter;
use crate::page::interpolate;

/// File name looked up when no shell is configured.
pub const APP_FILE: &str = "_app.html";

/// Marker replaced by the default page output.
pub const PAGE_MARKER: &str = "<!-- zero:page -->";

/// Marker replaced by a list of links to every route.
pub const NAV_MARKER: &str = "<!-- zero:nav -->";

/// Application shell loaded from an HTML file.
///
/// The file may carry front-matter; its keys are handed to every page as
/// shell props and are available to `{{ key }}` placeholders in the shell
/// itself, next to `location` and `basename`.
#[derive(Debug, Clone)]
pub struct FsAppShell {
    path: PathBuf,
    before: String,
    after: Option<String>,
    props: Props,
}

impl FsAppShell {
    /// Load a shell file.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|e| SourceError::io(&path, e))?;
        let parsed = parse_front_matter(&path, &text)?;

        let (before, after) = match parsed.body.split_once(PAGE_MARKER) {
            Some((before, after)) => (before.to_string(), Some(after.to_string())),
            None => (parsed.body.to_string(), None),
        };

        tracing::debug!(path = %path.display(), "loaded application shell");
        Ok(Self {
            path,
            before,
            after,
            props: parsed.props,
        })
    }

    /// Look for `_app.html` in `dir` and its ancestors.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .map(|ancestor| ancestor.join(APP_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load the shell at `app` when given, else the nearest `_app.html`
    /// above `dir`. Returns `None` when there is neither.
    pub fn resolve(dir: &Path, app: Option<&Path>) -> Result<Option<Self>, SourceError> {
        match app {
            Some(path) => Self::load(path).map(Some),
            None => Self::find(dir).map(Self::load).transpose(),
        }
    }

    /// Path the shell was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shell props from the front-matter.
    pub fn props(&self) -> &Props {
        &self.props
    }

    fn fill(&self, chunk: &str, ctx: &ShellContext<'_>, vars: &Props) -> Node {
        let mut html = interpolate(chunk, vars);
        if html.contains(NAV_MARKER) {
            html = html.replace(NAV_MARKER, &route_nav(ctx).to_html());
        }
        Node::raw(html)
    }
}

impl AppShell for FsAppShell {
    fn render(&self, ctx: &ShellContext<'_>) -> Result<Node, RenderError> {
        let context = json!({ "location": ctx.location, "basename": ctx.basename });
        let vars = merge_props(context.as_object().unwrap_or(&Props::new()), &self.props);

        let page = ctx.render(&self.props);
        let before = self.fill(&self.before, ctx, &vars);

        Ok(match &self.after {
            Some(after) => Node::fragment([before, page, self.fill(after, ctx, &vars)]),
            None => Node::fragment([before, page]),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use zero_core::from_fn;
    use zero_render::{compose, RenderRequest};
    use zero_router::{build_routes, discover, IndexName, Module, RouteTable, StaticSource};

    use super::*;

    async fn routes() -> RouteTable {
        let page = |text: &'static str| {
            Module::with_default(from_fn(move |props| {
                let site = props.get("site").and_then(|v| v.as_str()).unwrap_or("?");
                Ok(Node::raw(format!("<p>{} on {}</p>", text, site)))
            }))
        };
        let source = StaticSource::new()
            .with_module("./index.md", page("home"))
            .with_module("./about.md", page("about"));
        build_routes(discover(&source, None).unwrap(), &IndexName::default())
            .await
            .unwrap()
    }

    fn shell(dir: &Path, contents: &str) -> FsAppShell {
        let path = dir.join(APP_FILE);
        fs::write(&path, contents).unwrap();
        FsAppShell::load(path).unwrap()
    }

    // === Lookup Tests ===

    #[test]
    fn test_find_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("site").join("pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(dir.path().join(APP_FILE), "").unwrap();

        assert_eq!(FsAppShell::find(&pages), Some(dir.path().join(APP_FILE)));
    }

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(APP_FILE), "found").unwrap();
        let custom = dir.path().join("layout.html");
        fs::write(&custom, "custom").unwrap();

        let shell = FsAppShell::resolve(dir.path(), Some(&custom)).unwrap().unwrap();

        assert_eq!(shell.path(), custom);
    }

    #[test]
    fn test_resolve_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.html");

        assert!(FsAppShell::resolve(dir.path(), Some(&missing)).is_err());
    }

    // === Render Tests ===

    #[tokio::test]
    async fn test_shell_wraps_page_output() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell(
            dir.path(),
            "---\nsite: Zero\n---\n<header>{{ site }} at {{ location }}</header><main><!-- zero:page --></main>",
        );
        let routes = routes().await;

        let html = compose(&RenderRequest::new(&routes, "/about").with_shell(Some(&shell))).to_html();

        assert!(html.contains("<header>Zero at /about</header><main><p>about on Zero</p></main>"));
    }

    #[tokio::test]
    async fn test_shell_nav_marks_current_route() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell(dir.path(), "<nav><!-- zero:nav --></nav><!-- zero:page -->");
        let routes = routes().await;

        let html = compose(&RenderRequest::new(&routes, "/").with_shell(Some(&shell))).to_html();

        assert!(html.contains(r#"<ul class="zero-nav">"#));
        assert!(html.contains(r#"<a href="/" aria-current="page">/</a>"#));
        assert!(html.contains(r#"<a href="/about">/about</a>"#));
    }

    #[tokio::test]
    async fn test_shell_without_marker_appends_page() {
        let dir = tempfile::tempdir().unwrap();
        let shell = shell(dir.path(), "<h1>Top</h1>");
        let routes = routes().await;

        let html = compose(&RenderRequest::new(&routes, "/").with_shell(Some(&shell))).to_html();

        assert!(html.contains("<h1>Top</h1><p>home on ?</p>"));
    }

    #[tokio::test]
    async fn test_shell_is_shareable() {
        let dir = tempfile::tempdir().unwrap();
        let shell: Arc<dyn AppShell> = Arc::new(shell(dir.path(), "<!-- zero:page -->"));
        let routes = routes().await;

        let html = compose(&RenderRequest::new(&routes, "/").with_shell(Some(shell.as_ref()))).to_html();

        assert!(html.contains("<p>home on ?</p>"));
    }
}
