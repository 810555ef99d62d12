//! Page components backed by files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pulldown_cmark::{html, Options, Parser};
use serde_json::Value;
use zero_core::{escape_html, Component, DataError, InitialPropsContext, Node, Props, RenderError};

/// Front-matter key naming a JSON data file, relative to the page.
pub const DATA_KEY: &str = "data";

/// Kind of page file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// CommonMark with tables, footnotes and strikethrough.
    Markdown,
    /// HTML fragment, used as-is.
    Html,
}

impl PageKind {
    /// Kind for a file extension, if it is a page.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Kind for a path, if it is a page.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// A page read from disk.
#[derive(Debug, Clone)]
pub struct Page {
    kind: PageKind,
    html: String,
    data: Option<PathBuf>,
}

impl Page {
    /// Create a page from its body. `dir` is the page's directory, used to
    /// resolve the data file named in `front_matter`.
    pub fn new(kind: PageKind, body: &str, front_matter: &Props, dir: &Path) -> Self {
        let html = match kind {
            PageKind::Markdown => markdown_to_html(body),
            PageKind::Html => body.to_string(),
        };
        let data = front_matter
            .get(DATA_KEY)
            .and_then(|v| v.as_str())
            .map(|file| dir.join(file));

        Self { kind, html, data }
    }

    /// Kind of page.
    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// Data file read by the initial-data hook, if any.
    pub fn data_file(&self) -> Option<&Path> {
        self.data.as_deref()
    }
}

#[async_trait]
impl Component for Page {
    fn render(&self, props: &Props) -> Result<Node, RenderError> {
        Ok(Node::raw(interpolate(&self.html, props)))
    }

    fn has_initial_props(&self) -> bool {
        self.data.is_some()
    }

    async fn initial_props(&self, ctx: &InitialPropsContext) -> Result<Props, DataError> {
        let Some(path) = &self.data else {
            return Ok(Props::new());
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DataError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(props)) => {
                tracing::debug!(route = %ctx.path, file = %path.display(), keys = props.len(), "loaded page data");
                Ok(props)
            }
            Ok(_) => Err(DataError::Invalid(format!(
                "{} must contain a JSON object",
                path.display()
            ))),
            Err(e) => Err(DataError::Invalid(format!("{}: {}", path.display(), e))),
        }
    }
}

/// Convert markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Fill `{{ key }}` placeholders from props.
///
/// Dotted keys reach into nested objects. Strings are escaped, other scalars
/// are printed as JSON, and missing or non-scalar values render as nothing.
pub fn interpolate(template: &str, props: &Props) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);

        let key = rest[start + 2..start + 2 + len].trim();
        match lookup(props, key) {
            Some(Value::String(s)) => out.push_str(&escape_html(s)),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => out.push_str(&v.to_string()),
            _ => tracing::trace!(key, "no scalar prop for placeholder"),
        }
        rest = &rest[start + 2 + len + 2..];
    }

    out.push_str(rest);
    out
}

fn lookup<'a>(props: &'a Props, key: &str) -> Option<&'a Value> {
    let mut parts = key.split('.');
    let mut value = props.get(parts.next()?)?;
    for part in parts {
        value = value.as_object()?.get(part)?;
    }
    Some(value)
}
