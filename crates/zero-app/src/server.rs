//! Static rendering to HTML documents.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use zero_core::{Node, Props};
use zero_render::{Document, Head, RenderMode, Template, DATA_ID};
use zero_router::RouteTable;

use crate::app::Site;

/// How pages are wrapped into documents.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Custom HTML template.
    pub template: Option<Template>,
    /// Embed route props for hand-off to a live document.
    pub hydrate: bool,
    /// Stylesheet links added to every page.
    pub stylesheets: Vec<String>,
    /// Inline scripts appended to every page.
    pub scripts: Vec<String>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            template: None,
            hydrate: true,
            stylesheets: Vec::new(),
            scripts: Vec::new(),
        }
    }
}

impl DocumentOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom template.
    pub fn with_template(mut self, template: Option<Template>) -> Self {
        self.template = template;
        self
    }

    /// Enable or disable the embedded hydration data.
    pub fn with_hydrate(mut self, enabled: bool) -> Self {
        self.hydrate = enabled;
        self
    }

    /// Add a stylesheet link.
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheets.push(href.into());
        self
    }

    /// Add an inline script.
    pub fn with_script(mut self, js: impl Into<String>) -> Self {
        self.scripts.push(js.into());
        self
    }
}

/// What a server-rendered page tells the live document taking it over:
/// the page it was rendered for, and that page's route props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationData {
    /// Location relative to the basename.
    pub location: String,
    pub basename: String,
    /// Props of the matched route; `None` when nothing matched.
    #[serde(default)]
    pub props: Option<Props>,
}

impl HydrationData {
    pub fn to_props(&self) -> Props {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Props::new(),
        }
    }

    /// Read the data embedded in a rendered page, if any.
    pub fn from_html(html: &str) -> Option<Self> {
        let open = format!(r#"<script id="{}" type="application/json">"#, DATA_ID);
        let start = html.find(&open)? + open.len();
        let len = html[start..].find("</script>")?;

        match serde_json::from_str(&html[start..start + len]) {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed hydration data");
                None
            }
        }
    }

    /// Whether the markup was rendered for `location` under `basename`.
    pub fn describes(&self, location: &str, basename: &str) -> bool {
        self.location == location
            && self.basename.trim_end_matches('/') == basename.trim_end_matches('/')
    }
}

/// One statically rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Route path, relative to the basename.
    pub path: String,
    /// Output file, relative to the output directory.
    pub file: PathBuf,
    /// Complete HTML document.
    pub html: String,
}

impl Site {
    /// Wrap an already composed tree into a document for `location`.
    pub fn document(
        &self,
        routes: &RouteTable,
        location: &str,
        tree: Node,
        options: &DocumentOptions,
    ) -> Document {
        let route = routes.find(location);
        let site = self.options();

        let mut head = Head::for_route(route, site.title.as_deref());
        for href in &options.stylesheets {
            head = head.with_stylesheet(href.as_str());
        }

        let mut document = Document::new(head, tree).with_template(options.template.clone());

        if options.hydrate {
            let data = HydrationData {
                location: location.to_string(),
                basename: site.basename.clone(),
                props: route.map(|r| r.props.clone()),
            };
            document = document.with_data(&data.to_props());
        }

        for js in &options.scripts {
            document = document.with_script(js.clone());
        }
        document
    }

    /// Render `location` into a complete HTML document.
    pub fn render_document(
        &self,
        routes: &RouteTable,
        location: &str,
        options: &DocumentOptions,
    ) -> String {
        let tree = self.render(routes, location, RenderMode::Static);
        self.document(routes, location, tree, options).render()
    }

    /// Render every distinct route path. Output order follows the table.
    pub fn render_pages(&self, routes: &RouteTable, options: &DocumentOptions) -> Vec<RenderedPage> {
        let mut seen = Vec::new();
        let mut pages = Vec::new();

        for route in routes {
            if seen.contains(&route.path) {
                tracing::debug!(path = %route.path, source = %route.source, "duplicate path, skipping");
                continue;
            }
            seen.push(route.path.clone());

            pages.push(RenderedPage {
                path: route.path.clone(),
                file: output_file(&route.path),
                html: self.render_document(routes, &route.path, options),
            });
        }
        pages
    }
}

/// Output file for a route path: `/` -> `index.html`,
/// `/blog/hello` -> `blog/hello/index.html`.
pub fn output_file(path: &str) -> PathBuf {
    let mut file = PathBuf::new();
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        file.push(segment);
    }
    file.push("index.html");
    file
}
