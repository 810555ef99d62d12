//! Error boundaries.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use zero_core::{Node, RenderError};

/// Where a boundary sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryScope {
    /// Around route resolution and the application shell.
    Router,
    /// Around a single route's component.
    Route,
}

impl BoundaryScope {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Router => "router",
            Self::Route => "route",
        }
    }
}

/// Run a render step, turning both errors and panics into `RenderError`.
pub fn try_render<F>(render: F) -> Result<Node, RenderError>
where
    F: FnOnce() -> Result<Node, RenderError>,
{
    match panic::catch_unwind(AssertUnwindSafe(render)) {
        Ok(result) => result,
        Err(payload) => Err(RenderError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Render inside a boundary. Failures are logged and replaced with an
/// inline fallback; they never propagate past this call.
pub fn boundary<F>(scope: BoundaryScope, label: &str, render: F) -> Node
where
    F: FnOnce() -> Result<Node, RenderError>,
{
    match try_render(render) {
        Ok(node) => node,
        Err(err) => {
            tracing::warn!(scope = scope.as_str(), at = %label, error = %err, "render failed, showing fallback");
            fallback(scope, &err)
        }
    }
}

/// Fallback shown in place of a failed subtree.
pub fn fallback(scope: BoundaryScope, err: &RenderError) -> Node {
    Node::element("pre")
        .attr("class", "zero-error")
        .attr("data-zero-error", scope.as_str())
        .attr(
            "style",
            "font-family: Menlo, monospace; color: white; background-color: red; padding: 32px;",
        )
        .child(err.to_string())
        .into_node()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
