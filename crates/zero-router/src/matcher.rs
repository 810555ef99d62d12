//! Route matching.

use crate::route::Route;

/// Select the route whose effective path equals `location`.
///
/// Matching is exact string equality, not prefix or pattern matching. If
/// several routes share a path the first in table order wins.
pub fn match_route<'a>(routes: &'a [Route], location: &str) -> Option<&'a Route> {
    routes.iter().find(|route| route.path == location)
}

#[cfg(test)]
mod tests {
    use zero_core::{from_fn, Node, Props};

    use super::*;

    fn route(name: &str, path: &str) -> Route {
        Route {
            key: name.to_string(),
            name: name.to_string(),
            href: path.to_string(),
            path: path.to_string(),
            exact: false,
            props: Props::new(),
            component: from_fn(|_| Ok(Node::Empty)),
            source: format!(".{}.md", name),
        }
    }

    #[test]
    fn test_exact_match() {
        let routes = vec![route("/", "/"), route("/hello", "/posts/hello")];

        let found = match_route(&routes, "/posts/hello").unwrap();
        assert_eq!(found.name, "/hello");
    }

    #[test]
    fn test_no_prefix_or_trailing_slash_match() {
        let routes = vec![route("/hello", "/posts/hello")];

        assert!(match_route(&routes, "/posts/hello/").is_none());
        assert!(match_route(&routes, "/posts").is_none());
        assert!(match_route(&routes, "/posts/hello/world").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let routes = vec![route("/first", "/dup"), route("/second", "/dup")];

        let found = match_route(&routes, "/dup").unwrap();
        assert_eq!(found.name, "/first");
    }

    #[test]
    fn test_empty_table() {
        assert!(match_route(&[], "/").is_none());
    }
}
