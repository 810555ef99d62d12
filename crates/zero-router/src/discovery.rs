//! Page discovery.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use globset::{GlobBuilder, GlobMatcher};
use zero_core::Component;

use crate::error::DiscoveryError;
use crate::source::{Module, PageSource};

/// A discovered, renderable page module.
#[derive(Clone)]
pub struct ModuleRecord {
    /// Stable identifier, e.g. `./blog/hello.md`.
    pub key: String,
    /// Identifier with directory and extension stripped.
    pub display_name: String,
    /// The module's export surface.
    pub module: Module,
    /// Resolved renderable entry point.
    pub component: Arc<dyn Component>,
}

impl fmt::Debug for ModuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRecord")
            .field("key", &self.key)
            .field("display_name", &self.display_name)
            .field("module", &self.module)
            .finish()
    }
}

/// Glob filter applied to module identifiers.
///
/// `*` does not cross `/`; `**` does. Wildcards never match a segment
/// starting with `.` unless the pattern itself names a dot segment.
#[derive(Debug, Clone)]
pub struct PageFilter {
    matcher: GlobMatcher,
    dot: bool,
}

impl PageFilter {
    /// Compile a filter from a glob pattern.
    pub fn new(pattern: &str) -> Result<Self, DiscoveryError> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| DiscoveryError::Filter {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            matcher: glob.compile_matcher(),
            dot: pattern.split('/').any(is_dot_segment),
        })
    }

    /// Check an identifier, ignoring a leading `./`.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.strip_prefix("./").unwrap_or(key);
        if !self.dot && key.split('/').any(is_dot_segment) {
            return false;
        }
        self.matcher.is_match(key)
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment.starts_with('.') && segment != "." && segment != ".."
}

/// Identifier with directory and extension stripped.
pub fn display_name(key: &str) -> String {
    Path::new(key)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Whether a display name is reserved (`.hidden`, `_private`).
fn is_reserved(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

/// Scan a page source and return its renderable page modules in listing
/// order.
///
/// Every identifier passing the filter is loaded. A single failing loader
/// aborts the whole pass.
pub fn discover<S>(source: &S, filter: Option<&str>) -> Result<Vec<ModuleRecord>, DiscoveryError>
where
    S: PageSource + ?Sized,
{
    let filter = filter.map(PageFilter::new).transpose()?;
    let mut records = Vec::new();

    for key in source.list() {
        if let Some(filter) = &filter {
            if !filter.matches(&key) {
                tracing::debug!(key = %key, "skipping module outside match filter");
                continue;
            }
        }

        let module = source.load(&key).map_err(|e| DiscoveryError::Load {
            key: key.clone(),
            message: e.to_string(),
        })?;

        let component = module.resolve_component();
        let display_name = display_name(&key);

        if is_reserved(&display_name) {
            tracing::debug!(key = %key, "skipping reserved module");
            continue;
        }

        let Some(component) = component else {
            tracing::debug!(key = %key, "skipping module without a component");
            continue;
        };

        records.push(ModuleRecord {
            key,
            display_name,
            module,
            component,
        });
    }

    tracing::info!(pages = records.len(), "discovered pages");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use zero_core::{from_fn, Node};

    use super::*;
    use crate::source::StaticSource;

    fn page(text: &'static str) -> Module {
        Module::with_default(from_fn(move |_| Ok(Node::text(text))))
    }

    fn keys(records: &[ModuleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.key.as_str()).collect()
    }

    // === display_name Tests ===

    #[test]
    fn test_display_name_strips_dir_and_extension() {
        assert_eq!(display_name("./blog/hello.md"), "hello");
        assert_eq!(display_name("./index.js"), "index");
        assert_eq!(display_name("./notes.v2.md"), "notes.v2");
        assert_eq!(display_name("./.hidden"), ".hidden");
    }

    // === PageFilter Tests ===

    #[test]
    fn test_filter_strips_leading_dot_slash() {
        let filter = PageFilter::new("*.md").unwrap();

        assert!(filter.matches("./about.md"));
        assert!(filter.matches("about.md"));
        assert!(!filter.matches("./about.html"));
    }

    #[test]
    fn test_filter_star_does_not_cross_directories() {
        let filter = PageFilter::new("*.md").unwrap();
        assert!(!filter.matches("./blog/hello.md"));

        let deep = PageFilter::new("**/*.md").unwrap();
        assert!(deep.matches("./blog/hello.md"));
        assert!(deep.matches("./about.md"));
    }

    #[test]
    fn test_filter_wildcards_skip_dot_segments() {
        let deep = PageFilter::new("**/*.md").unwrap();
        assert!(!deep.matches("./.drafts/post.md"));
        assert!(!deep.matches("./blog/.hidden.md"));
        assert!(deep.matches("./blog/post.md"));

        let named = PageFilter::new(".drafts/*.md").unwrap();
        assert!(named.matches("./.drafts/post.md"));
        assert!(!named.matches("./drafts/post.md"));
    }

    #[test]
    fn test_invalid_filter() {
        let err = PageFilter::new("[unclosed").unwrap_err();
        assert!(matches!(err, DiscoveryError::Filter { .. }));
    }

    // === discover Tests ===

    #[test]
    fn test_discover_excludes_reserved_names() {
        let source = StaticSource::new()
            .with_module("_draft.js", page("draft"))
            .with_module("index.js", page("home"));

        let records = discover(&source, None).unwrap();

        assert_eq!(keys(&records), vec!["index.js"]);
    }

    #[test]
    fn test_discover_excludes_dot_names() {
        let source = StaticSource::new()
            .with_module("./.secret.md", page("secret"))
            .with_module("./blog/_layout.md", page("layout"))
            .with_module("./blog/post.md", page("post"));

        let records = discover(&source, None).unwrap();

        assert_eq!(keys(&records), vec!["./blog/post.md"]);
        assert_eq!(records[0].display_name, "post");
    }

    #[test]
    fn test_discover_excludes_modules_without_component() {
        let source = StaticSource::new()
            .with_module("./data.json", Module::new())
            .with_module("./about.md", page("about"));

        let records = discover(&source, None).unwrap();

        assert_eq!(keys(&records), vec!["./about.md"]);
    }

    #[test]
    fn test_discover_keeps_listing_order() {
        let source = StaticSource::new()
            .with_module("./c.md", page("c"))
            .with_module("./a.md", page("a"))
            .with_module("./b.md", page("b"));

        let records = discover(&source, None).unwrap();

        assert_eq!(keys(&records), vec!["./c.md", "./a.md", "./b.md"]);
    }

    #[test]
    fn test_discover_applies_filter_before_loading() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let source = StaticSource::new()
            .with_loader("./blog/post.md", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(page("post"))
            })
            .with_module("./about.md", page("about"));

        let records = discover(&source, Some("*.md")).unwrap();

        assert_eq!(keys(&records), vec!["./about.md"]);
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_discover_loader_failure_aborts_pass() {
        let source = StaticSource::new()
            .with_module("./index.md", page("home"))
            .with_loader("./broken.md", || Err("syntax error".into()));

        let err = discover(&source, None).unwrap_err();

        match err {
            DiscoveryError::Load { key, message } => {
                assert_eq!(key, "./broken.md");
                assert!(message.contains("syntax error"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_discover_reserved_module_is_still_loaded() {
        let source = StaticSource::new().with_loader("./_broken.md", || Err("boom".into()));

        assert!(discover(&source, None).is_err());
    }
}
