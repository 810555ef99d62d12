//! Application shells.

use zero_core::{Node, Props, RenderError};
use zero_router::{Route, RouteTable};

/// What an application shell receives on every render.
pub struct ShellContext<'a> {
    /// Every route in table order.
    pub routes: &'a RouteTable,
    /// The route matching the current location, if any.
    pub route: Option<&'a Route>,
    /// Current location, relative to the basename.
    pub location: &'a str,
    /// URL prefix for links.
    pub basename: &'a str,
    render: &'a dyn Fn(&Props) -> Node,
}

impl<'a> ShellContext<'a> {
    pub(crate) fn new(
        routes: &'a RouteTable,
        route: Option<&'a Route>,
        location: &'a str,
        basename: &'a str,
        render: &'a dyn Fn(&Props) -> Node,
    ) -> Self {
        Self {
            routes,
            route,
            location,
            basename,
            render,
        }
    }

    /// Default per-route output. `shell_props` are handed to every page
    /// component; route props override them on conflict.
    pub fn render(&self, shell_props: &Props) -> Node {
        (self.render)(shell_props)
    }

    /// Prefix a route href with the basename.
    pub fn link_to(&self, href: &str) -> String {
        format!("{}{}", self.basename.trim_end_matches('/'), href)
    }
}

/// A user-supplied wrapper controlling page composition.
///
/// A shell may wrap, reorder or ignore the default output obtained through
/// `ShellContext::render`.
pub trait AppShell: Send + Sync {
    /// Render the page around the default route output.
    fn render(&self, ctx: &ShellContext<'_>) -> Result<Node, RenderError>;
}

/// Shell used when none is supplied: the matching route's output, or an
/// index of every route when nothing matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultApp;

impl AppShell for DefaultApp {
    fn render(&self, ctx: &ShellContext<'_>) -> Result<Node, RenderError> {
        if ctx.route.is_some() {
            Ok(ctx.render(&Props::new()))
        } else {
            Ok(route_index(ctx))
        }
    }
}

/// Listing of every route, shown when no route matches the location.
pub fn route_index(ctx: &ShellContext<'_>) -> Node {
    let items = ctx.routes.iter().map(|route| {
        Node::element("li")
            .child(
                Node::element("a")
                    .attr("href", ctx.link_to(&route.href))
                    .child(route.href.as_str()),
            )
            .into_node()
    });

    Node::element("nav")
        .attr("class", "zero-route-index")
        .child(Node::element("h1").child("Pages"))
        .child(
            Node::element("p").child(format!("No page found at {}", ctx.location)),
        )
        .child(Node::element("ul").children(items))
        .into_node()
}

/// Navigation list linking every route; handy for shells.
pub fn route_nav(ctx: &ShellContext<'_>) -> Node {
    let items = ctx.routes.iter().map(|route| {
        let mut link = Node::element("a")
            .attr("href", ctx.link_to(&route.href))
            .child(route_label(route));
        if route.path == ctx.location {
            link = link.attr("aria-current", "page");
        }
        Node::element("li").child(link).into_node()
    });

    Node::element("ul")
        .attr("class", "zero-nav")
        .children(items)
        .into_node()
}

/// Human label for a route: its `title` prop, else its href.
pub fn route_label(route: &Route) -> String {
    route
        .props
        .get("title")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| route.href.clone())
}
