//! Route table types.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use zero_core::{Component, Props};

/// The display name that marks a directory's index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexName(String);

impl IndexName {
    /// Derive the index name from an optional primary filename: its file
    /// stem, or `index` when no filename is configured.
    pub fn from_filename(filename: Option<&str>) -> Self {
        let name = filename
            .and_then(|f| Path::new(f).file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("index");
        Self(name.to_string())
    }

    /// The index name as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for IndexName {
    fn default() -> Self {
        Self::from_filename(None)
    }
}

/// A single routable page.
#[derive(Clone)]
pub struct Route {
    /// Route key (same as `name`).
    pub key: String,
    /// `/` for the index page, else `/` + display name.
    pub name: String,
    /// Canonical link target, unaffected by a metadata `path` override.
    pub href: String,
    /// Effective path used for matching.
    pub path: String,
    /// Whether this is its directory's index route.
    pub exact: bool,
    /// Front-matter overlaid with initial data.
    pub props: Props,
    /// Shared reference to the page component.
    pub component: Arc<dyn Component>,
    /// Identifier of the module this route was built from.
    pub source: String,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("href", &self.href)
            .field("path", &self.path)
            .field("exact", &self.exact)
            .field("props", &self.props)
            .field("source", &self.source)
            .finish()
    }
}

/// Ordered, immutable set of routes from one build.
///
/// Order mirrors discovery order. A rebuild produces a whole new table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Arc<[Route]>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RouteTable {
    /// Create a table from routes in discovery order.
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes: routes.into(),
        }
    }

    /// All routes in order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Iterate routes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the route matching a location exactly.
    pub fn find(&self, location: &str) -> Option<&Route> {
        crate::match_route(&self.routes, location)
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_name_default() {
        assert_eq!(IndexName::from_filename(None).as_str(), "index");
        assert_eq!(IndexName::default().as_str(), "index");
    }

    #[test]
    fn test_index_name_from_filename() {
        assert_eq!(IndexName::from_filename(Some("home.md")).as_str(), "home");
        assert_eq!(
            IndexName::from_filename(Some("/site/pages/readme.markdown")).as_str(),
            "readme"
        );
    }

    #[test]
    fn test_empty_table() {
        let table = RouteTable::default();

        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.find("/").is_none());
    }
}
