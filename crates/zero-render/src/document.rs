//! HTML document around a composed render tree.

use zero_core::{escape_html, Node, Props};
use zero_router::Route;

/// Id of the designated root container element.
pub const ROOT_ID: &str = "root";

/// Id of the script element carrying serialized route props.
pub const DATA_ID: &str = "__zero_data";

/// A tag emitted inside `<head>` after the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadTag {
    Meta { name: String, content: String },
    Stylesheet(String),
    Script(String),
}

impl HeadTag {
    fn to_html(&self) -> String {
        match self {
            HeadTag::Meta { name, content } => format!(
                r#"<meta name="{}" content="{}">"#,
                escape_html(name),
                escape_html(content)
            ),
            HeadTag::Stylesheet(href) => {
                format!(r#"<link rel="stylesheet" href="{}">"#, escape_html(href))
            }
            HeadTag::Script(js) => format!("<script>{}</script>", js),
        }
    }
}

/// Title plus the remaining `<head>` tags of a page.
#[derive(Debug, Clone, Default)]
pub struct Head {
    pub title: Option<String>,
    pub tags: Vec<HeadTag>,
}

impl Head {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            tags: Vec::new(),
        }
    }

    /// Head for a route: its `title` and `description` props, falling back
    /// to the site title and then to `zero`.
    pub fn for_route(route: Option<&Route>, site_title: Option<&str>) -> Self {
        let prop = |key: &str| route?.props.get(key)?.as_str().map(str::to_string);

        let title = prop("title")
            .or_else(|| site_title.map(str::to_string))
            .unwrap_or_else(|| "zero".to_string());

        let head = Self::new(title);
        match prop("description") {
            Some(description) => head.with(HeadTag::Meta {
                name: "description".to_string(),
                content: description,
            }),
            None => head,
        }
    }

    pub fn with(mut self, tag: HeadTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_stylesheet(self, href: impl Into<String>) -> Self {
        self.with(HeadTag::Stylesheet(href.into()))
    }

    pub fn to_html(&self) -> String {
        self.title
            .iter()
            .map(|title| format!("<title>{}</title>", escape_html(title)))
            .chain(self.tags.iter().map(HeadTag::to_html))
            .fold(String::new(), |mut html, line| {
                html.push_str(&line);
                html.push('\n');
                html
            })
    }
}

/// User-supplied HTML template.
///
/// Recognized placeholders: `{{ title }}`, `{{ head }}`, `{{ body }}` and
/// `{{ scripts }}` (inner spaces optional).
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    /// Create a template from its source text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Fill the template in one pass over its source. Substituted values
    /// are never scanned again, and unknown placeholders are left as-is.
    pub fn render(&self, title: &str, head: &str, body: &str, scripts: &str) -> String {
        let mut html = String::with_capacity(self.source.len() + body.len());
        let mut rest = self.source.as_str();

        while let Some(start) = rest.find("{{") {
            html.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let slot = after.find("}}").and_then(|end| {
                let value = match after[..end].trim() {
                    "title" => title,
                    "head" => head,
                    "body" => body,
                    "scripts" => scripts,
                    _ => return None,
                };
                Some((value, end))
            });

            match slot {
                Some((value, end)) => {
                    html.push_str(value);
                    rest = &after[end + 2..];
                }
                None => {
                    html.push_str("{{");
                    rest = after;
                }
            }
        }
        html.push_str(rest);
        html
    }
}

/// A complete HTML page.
#[derive(Debug, Clone)]
pub struct Document {
    pub head: Head,
    /// Composed tree placed in the root container.
    pub body: Node,
    /// Scripts appended after the root container.
    pub scripts: Vec<String>,
    template: Option<Template>,
}

impl Document {
    /// Create a document around a composed tree.
    pub fn new(head: Head, body: Node) -> Self {
        Self {
            head,
            body,
            scripts: Vec::new(),
            template: None,
        }
    }

    /// Use a custom template instead of the built-in layout.
    pub fn with_template(mut self, template: Option<Template>) -> Self {
        self.template = template;
        self
    }

    /// Append an inline script after the root container.
    pub fn with_script(mut self, js: impl Into<String>) -> Self {
        self.scripts.push(format!("<script>{}</script>", js.into()));
        self
    }

    /// Embed route props for hand-off to a live document.
    pub fn with_data(mut self, props: &Props) -> Self {
        let json = serde_json::to_string(props)
            .unwrap_or_else(|_| "{}".to_string())
            .replace("</", "<\\/");
        self.scripts.push(format!(
            r#"<script id="{}" type="application/json">{}</script>"#,
            DATA_ID, json
        ));
        self
    }

    /// Render the body container markup.
    pub fn render_body(&self) -> String {
        format!(r#"<div id="{}">{}</div>"#, ROOT_ID, self.body.to_html())
    }

    /// Render the full page.
    pub fn render(&self) -> String {
        let head = self.head.to_html();
        let body = self.render_body();
        let scripts = self.scripts.join("\n");

        if let Some(template) = &self.template {
            let title = self.head.title.as_deref().map(escape_html).unwrap_or_default();
            return template.render(&title, &head, &body, &scripts);
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head}</head>
<body>
{body}
{scripts}
</body>
</html>
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use zero_core::from_fn;

    use super::*;

    fn route_with(props: serde_json::Value) -> Route {
        Route {
            key: "/about".to_string(),
            name: "/about".to_string(),
            href: "/about".to_string(),
            path: "/about".to_string(),
            exact: false,
            props: props.as_object().cloned().unwrap(),
            component: from_fn(|_| Ok(Node::Empty)),
            source: "./about.md".to_string(),
        }
    }

    // === Head Tests ===

    #[test]
    fn test_head_for_route_uses_props() {
        let route = route_with(json!({"title": "About us", "description": "Who we are"}));

        let html = Head::for_route(Some(&route), Some("Site")).to_html();

        assert!(html.contains("<title>About us</title>"));
        assert!(html.contains(r#"<meta name="description" content="Who we are">"#));
    }

    #[test]
    fn test_head_for_route_falls_back_to_site_title() {
        let route = route_with(json!({}));

        assert_eq!(
            Head::for_route(Some(&route), Some("Site")).title.as_deref(),
            Some("Site")
        );
        assert_eq!(Head::for_route(None, None).title.as_deref(), Some("zero"));
    }

    #[test]
    fn test_head_escapes_title() {
        let html = Head::new("A & B").with_stylesheet("/style.css").to_html();

        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains(r#"<link rel="stylesheet" href="/style.css">"#));
    }

    // === Document Tests ===

    #[test]
    fn test_document_default_layout() {
        let doc = Document::new(Head::new("Home"), Node::text("hello"));
        let html = doc.render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div id="root">hello</div>"#));
        assert!(html.contains("<title>Home</title>"));
    }

    #[test]
    fn test_document_with_data_escapes_script_end() {
        let props = json!({"html": "</script><b>"}).as_object().cloned().unwrap();
        let html = Document::new(Head::default(), Node::Empty)
            .with_data(&props)
            .render();

        assert!(html.contains(r#"<script id="__zero_data" type="application/json">"#));
        assert!(html.contains(r#"<\/script><b>"#));
    }

    #[test]
    fn test_template_values_are_not_rescanned() {
        let template = Template::new("<title>{{ title }}</title><main>{{ body }}</main>{{ other }}");

        let html = template.render("Using {{ body }} in templates", "", "PAGE {{ title }}", "");

        assert_eq!(
            html,
            "<title>Using {{ body }} in templates</title><main>PAGE {{ title }}</main>{{ other }}"
        );
    }

    #[test]
    fn test_document_template_title_with_placeholder() {
        let html = Document::new(Head::new("Using {{ body }} in templates"), Node::text("PAGE"))
            .with_template(Some(Template::new("<title>{{ title }}</title>{{ body }}")))
            .render();

        assert_eq!(
            html,
            "<title>Using {{ body }} in templates</title><div id=\"root\">PAGE</div>"
        );
    }

    #[test]
    fn test_document_with_template() {
        let template = Template::new("<html><title>{{ title }}</title>{{head}}<main>{{ body }}</main>{{ scripts }}</html>");
        let html = Document::new(Head::new("T"), Node::text("x"))
            .with_template(Some(template))
            .with_script("init()")
            .render();

        assert_eq!(
            html,
            "<html><title>T</title><title>T</title>\n<main><div id=\"root\">x</div></main><script>init()</script></html>"
        );
    }
}
