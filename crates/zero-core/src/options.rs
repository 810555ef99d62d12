//! Site configuration surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Recognized site options.
///
/// Unrecognized keys are kept in `extra` and passed through untouched to
/// whatever collaborator reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteOptions {
    /// Primary page file; its stem becomes the index identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// URL prefix for all routes.
    #[serde(default = "default_basename")]
    pub basename: String,

    /// Suppress the scroll-reset behavior.
    #[serde(default, alias = "disableScroll")]
    pub disable_scroll: bool,

    /// Glob restricting which modules are discovered.
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_pattern: Option<String>,

    /// Path to a custom application shell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,

    /// Site title used when a page does not set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Options not recognized by the core.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Options given explicitly on top of a loaded configuration, such as
/// command-line flags. `None` leaves the underlying value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteOptionsOverride {
    pub filename: Option<String>,
    pub basename: Option<String>,
    pub disable_scroll: Option<bool>,
    pub match_pattern: Option<String>,
    pub app: Option<String>,
    pub title: Option<String>,
}

fn default_basename() -> String {
    "/".to_string()
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            filename: None,
            basename: default_basename(),
            disable_scroll: false,
            match_pattern: None,
            app: None,
            title: None,
            extra: BTreeMap::new(),
        }
    }
}

impl SiteOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary page file.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the URL prefix.
    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    /// Enable or disable scroll reset on navigation.
    pub fn with_scroll_reset(mut self, enabled: bool) -> Self {
        self.disable_scroll = !enabled;
        self
    }

    /// Restrict discovery to modules matching a glob.
    pub fn with_match(mut self, pattern: impl Into<String>) -> Self {
        self.match_pattern = Some(pattern.into());
        self
    }

    /// Set the application shell path.
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Set the site title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Apply explicit overrides; every field the override sets wins, even
    /// when it equals the default.
    pub fn apply(mut self, overrides: SiteOptionsOverride) -> Self {
        if let Some(filename) = overrides.filename {
            self.filename = Some(filename);
        }
        if let Some(basename) = overrides.basename {
            self.basename = basename;
        }
        if let Some(disable_scroll) = overrides.disable_scroll {
            self.disable_scroll = disable_scroll;
        }
        if let Some(pattern) = overrides.match_pattern {
            self.match_pattern = Some(pattern);
        }
        if let Some(app) = overrides.app {
            self.app = Some(app);
        }
        if let Some(title) = overrides.title {
            self.title = Some(title);
        }
        self
    }

    /// Basename without a trailing slash; `"/"` becomes `""`.
    pub fn base_prefix(&self) -> &str {
        self.basename.trim_end_matches('/')
    }

    /// Prefix a route href with the basename.
    pub fn link_to(&self, href: &str) -> String {
        format!("{}{}", self.base_prefix(), href)
    }

    /// Strip the basename from a request path.
    ///
    /// Returns `None` when the path lies outside the basename.
    pub fn strip_base<'a>(&self, path: &'a str) -> Option<&'a str> {
        let prefix = self.base_prefix();
        if prefix.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(prefix) {
            Some("") => Some("/"),
            Some(rest) if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}
