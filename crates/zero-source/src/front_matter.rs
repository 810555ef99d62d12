//! Front-matter blocks.

use std::path::Path;

use serde_json::Value;
use zero_core::Props;

use crate::error::SourceError;

/// Front-matter syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    /// `---` fenced YAML.
    Yaml,
    /// `+++` fenced TOML.
    Toml,
}

impl FrontMatterFormat {
    fn from_fence(line: &str) -> Option<Self> {
        match line {
            "---" => Some(Self::Yaml),
            "+++" => Some(Self::Toml),
            _ => None,
        }
    }

    fn fence(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// A page split into its metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter<'a> {
    /// Parsed metadata; empty when the page has none.
    pub props: Props,
    /// Everything after the closing fence.
    pub body: &'a str,
    /// Syntax of the block, if one was present.
    pub format: Option<FrontMatterFormat>,
}

/// Split a page into front-matter props and body.
///
/// A block is recognized only when the very first line is a fence. `path`
/// is used for error reporting.
pub fn parse_front_matter<'a>(path: &Path, text: &'a str) -> Result<FrontMatter<'a>, SourceError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (first, rest) = split_line(text);

    let Some(format) = FrontMatterFormat::from_fence(first.trim_end()) else {
        return Ok(FrontMatter {
            props: Props::new(),
            body: text,
            format: None,
        });
    };

    let invalid = |message: String| SourceError::FrontMatter {
        path: path.to_path_buf(),
        message,
    };

    let mut offset = 0;
    let mut remaining = rest;
    let (block, body) = loop {
        if remaining.is_empty() {
            return Err(invalid(format!("missing closing `{}`", format.fence())));
        }
        let (line, next) = split_line(remaining);
        if line.trim_end() == format.fence() {
            break (&rest[..offset], next);
        }
        offset += remaining.len() - next.len();
        remaining = next;
    };

    let value = if block.trim().is_empty() {
        Value::Object(Props::new())
    } else {
        match format {
            FrontMatterFormat::Yaml => {
                serde_yaml::from_str::<Value>(block).map_err(|e| invalid(e.to_string()))?
            }
            FrontMatterFormat::Toml => {
                toml::from_str::<Value>(block).map_err(|e| invalid(e.to_string()))?
            }
        }
    };

    match value {
        Value::Object(props) => Ok(FrontMatter {
            props,
            body,
            format: Some(format),
        }),
        Value::Null => Ok(FrontMatter {
            props: Props::new(),
            body,
            format: Some(format),
        }),
        _ => Err(invalid("front-matter must be a mapping".to_string())),
    }
}

/// Split off the first line, dropping its terminator.
fn split_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(i) => (&text[..i], &text[i + 1..]),
        None => (text, ""),
    }
}
