//! Page component capability.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{DataError, RenderError};
use crate::node::Node;

/// Key-value data handed to components (front-matter, initial data, router
/// and shell props).
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Overlay `overlay` onto `base`; keys from `overlay` win.
pub fn merge_props(base: &Props, overlay: &Props) -> Props {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Context passed to an initial-data hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialPropsContext {
    /// Canonical href of the route being built.
    pub path: String,
}

/// A renderable page component.
///
/// Only modules exposing a `Component` are eligible to become routes.
/// `render` may be called many times (every navigation and hot update in a
/// live document), so it must not mutate shared state.
#[async_trait]
pub trait Component: Send + Sync {
    /// Render the component with fully merged props.
    fn render(&self, props: &Props) -> Result<Node, RenderError>;

    /// Whether this component exposes an initial-data hook.
    fn has_initial_props(&self) -> bool {
        false
    }

    /// Resolve initial data for a route. Only called when
    /// `has_initial_props` returns true.
    async fn initial_props(&self, ctx: &InitialPropsContext) -> Result<Props, DataError> {
        let _ = ctx;
        Ok(Props::new())
    }
}

/// Component backed by a plain render function.
pub struct FnComponent<F> {
    render: F,
}

#[async_trait]
impl<F> Component for FnComponent<F>
where
    F: Fn(&Props) -> Result<Node, RenderError> + Send + Sync,
{
    fn render(&self, props: &Props) -> Result<Node, RenderError> {
        (self.render)(props)
    }
}

/// Wrap a render function as a shared component.
pub fn from_fn<F>(render: F) -> Arc<dyn Component>
where
    F: Fn(&Props) -> Result<Node, RenderError> + Send + Sync + 'static,
{
    Arc::new(FnComponent { render })
}
