//! Render tree composition.
//!
//! ```text
//! location boundary   data-zero-location, static or live
//! └── theme           fixed visual context
//!     ├── router boundary
//!     │   └── shell (or DefaultApp)
//!     │       └── per-route boundaries, only matching routes render
//!     └── scroll reset (unless disabled)
//! ```

use serde_json::json;
use zero_core::{merge_props, Node, Props};
use zero_router::{Route, RouteTable};

use crate::boundary::{boundary, BoundaryScope};
use crate::shell::{AppShell, DefaultApp, ShellContext};

/// Fixed theme applied to every page.
pub const THEME_STYLE: &str = "font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.5; color: #111; background-color: #fff;";

const SCROLL_RESET_SCRIPT: &str = "window.scrollTo(0, 0);";

/// Whether the tree is rendered once or driven by a live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// One-shot render for serialization.
    #[default]
    Static,
    /// Interactive render, re-run on navigation and hot updates.
    Live,
}

impl RenderMode {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Live => "live",
        }
    }
}

/// Everything needed for a single render. Created per render and dropped
/// afterwards.
pub struct RenderRequest<'a> {
    /// Target location, relative to the basename.
    pub path: &'a str,
    /// URL prefix for all routes.
    pub basename: &'a str,
    /// Route table to render from.
    pub routes: &'a RouteTable,
    /// Whether scroll reset is active.
    pub scroll_reset: bool,
    /// Optional application shell.
    pub shell: Option<&'a dyn AppShell>,
    /// Static or live rendering.
    pub mode: RenderMode,
}

impl<'a> RenderRequest<'a> {
    /// Create a static request for `path` with default settings.
    pub fn new(routes: &'a RouteTable, path: &'a str) -> Self {
        Self {
            path,
            basename: "/",
            routes,
            scroll_reset: true,
            shell: None,
            mode: RenderMode::Static,
        }
    }

    /// Set the basename.
    pub fn with_basename(mut self, basename: &'a str) -> Self {
        self.basename = basename;
        self
    }

    /// Enable or disable scroll reset.
    pub fn with_scroll_reset(mut self, enabled: bool) -> Self {
        self.scroll_reset = enabled;
        self
    }

    /// Use an application shell.
    pub fn with_shell(mut self, shell: Option<&'a dyn AppShell>) -> Self {
        self.shell = shell;
        self
    }

    /// Set the render mode.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Compose the render tree for a request.
///
/// Never fails: route failures become inline fallbacks in their own
/// boundary, router and shell failures become a body-wide fallback inside
/// the location and theme wrappers.
pub fn compose(request: &RenderRequest<'_>) -> Node {
    let body = boundary(BoundaryScope::Router, request.path, || {
        let route = request.routes.find(request.path);
        let default_output = |shell_props: &Props| render_routes(request, shell_props);
        let ctx = ShellContext::new(
            request.routes,
            route,
            request.path,
            request.basename,
            &default_output,
        );

        match request.shell {
            Some(shell) => shell.render(&ctx),
            None => DefaultApp.render(&ctx),
        }
    });

    let mut themed = vec![body];
    if request.scroll_reset {
        themed.push(scroll_reset());
    }

    Node::element("div")
        .attr("data-zero-location", "")
        .attr("data-basename", request.basename)
        .attr("data-path", request.path)
        .attr("data-mode", request.mode.as_str())
        .child(
            Node::element("div")
                .attr("class", "zero-theme")
                .attr("style", THEME_STYLE)
                .children(themed),
        )
        .into_node()
}

/// Default per-route output: every route whose path equals the location
/// renders inside its own boundary; the rest render nothing.
fn render_routes(request: &RenderRequest<'_>, shell_props: &Props) -> Node {
    Node::fragment(
        request
            .routes
            .iter()
            .filter(|route| route.path == request.path)
            .map(|route| render_route(request, route, shell_props)),
    )
}

fn render_route(request: &RenderRequest<'_>, route: &Route, shell_props: &Props) -> Node {
    let props = merge_props(
        &merge_props(&router_props(request, route), shell_props),
        &route.props,
    );
    boundary(BoundaryScope::Route, &route.path, || {
        route.component.render(&props)
    })
}

fn router_props(request: &RenderRequest<'_>, route: &Route) -> Props {
    let props = json!({
        "location": request.path,
        "basename": request.basename,
        "path": route.path,
        "href": route.href,
        "exact": route.exact,
    });
    props.as_object().cloned().unwrap_or_default()
}

fn scroll_reset() -> Node {
    Node::element("script")
        .attr("data-zero-scroll-reset", "")
        .child(Node::raw(SCROLL_RESET_SCRIPT))
        .into_node()
}
