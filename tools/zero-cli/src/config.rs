//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use zero_core::SiteOptions;

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["zero.toml", ".zero.toml", "zero.json"];

/// Key holding zero's config inside a `package.json`.
const PACKAGE_KEY: &str = "zero";

/// CLI configuration file.
///
/// Site options sit at the top level next to the CLI-only keys; anything
/// unrecognized ends up in `site.extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Static build output directory (default `dist`).
    #[serde(default, alias = "outDir", skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Dev server port (default 8080).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Omit hydration data from built pages.
    #[serde(default, rename = "static")]
    pub static_html: bool,

    /// Custom HTML template for built pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Site options.
    #[serde(flatten)]
    pub site: SiteOptions,
}

impl CliConfig {
    /// Load config from a file. `package.json` files are read from their
    /// `zero` key.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.file_name().is_some_and(|name| name == "package.json") {
            let mut package: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            let section = package
                .get_mut(PACKAGE_KEY)
                .map(serde_json::Value::take)
                .unwrap_or_else(|| serde_json::json!({}));
            serde_json::from_value(section)
                .with_context(|| format!("Invalid `{}` key in {}", PACKAGE_KEY, path.display()))
        } else if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Resolve relative paths against `base`, the directory holding the
    /// config file.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let join = |path: &Path| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        };

        self.out_dir = self.out_dir.as_deref().map(join);
        self.template = self.template.as_deref().map(join);
        self.site.app = self
            .site
            .app
            .as_deref()
            .map(|app| join(Path::new(app)).display().to_string());
        self
    }

    /// Find the nearest config file at or above `start`.
    ///
    /// A `package.json` only counts when it has a `zero` key.
    pub fn find(start: &Path) -> Result<Option<(PathBuf, Self)>> {
        for dir in start.ancestors() {
            for name in CONFIG_NAMES {
                let path = dir.join(name);
                if path.is_file() {
                    return Ok(Some((path.clone(), Self::load(&path)?)));
                }
            }

            let package = dir.join("package.json");
            if package.is_file() && has_package_key(&package) {
                return Ok(Some((package.clone(), Self::load(&package)?)));
            }
        }
        Ok(None)
    }
}

fn has_package_key(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
        .is_some_and(|package| package.get(PACKAGE_KEY).is_some())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    // === load Tests ===

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.toml");
        fs::write(
            &path,
            "basename = \"/docs\"\nport = 3000\nout_dir = \"public\"\nstatic = true\nmatch = \"*.md\"\ntheme = \"dark\"\n",
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();

        assert_eq!(config.port, Some(3000));
        assert_eq!(config.out_dir, Some(PathBuf::from("public")));
        assert!(config.static_html);
        assert_eq!(config.site.basename, "/docs");
        assert_eq!(config.site.match_pattern.as_deref(), Some("*.md"));
        assert_eq!(config.site.extra.get("theme"), Some(&serde_json::json!("dark")));
    }

    #[test]
    fn test_load_json_with_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.json");
        fs::write(&path, r#"{"outDir": "site", "disableScroll": true, "title": "Docs"}"#).unwrap();

        let config = CliConfig::load(&path).unwrap();

        assert_eq!(config.out_dir, Some(PathBuf::from("site")));
        assert!(config.site.disable_scroll);
        assert_eq!(config.site.title.as_deref(), Some("Docs"));
        assert_eq!(config.site.basename, "/");
    }

    #[test]
    fn test_load_package_json_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{"name": "site", "zero": {"basename": "/blog"}}"#).unwrap();

        let config = CliConfig::load(&path).unwrap();

        assert_eq!(config.site.basename, "/blog");
        assert!(config.site.extra.is_empty());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.toml");
        fs::write(&path, "port = \"not a number\"").unwrap();

        let err = CliConfig::load(&path).unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_resolve_paths_against_config_dir() {
        let base = Path::new("/work/site");
        let config = CliConfig {
            out_dir: Some(PathBuf::from("public")),
            template: Some(PathBuf::from("/abs/page.html")),
            site: SiteOptions::new().with_app("layout/_app.html"),
            ..CliConfig::default()
        };

        let config = config.resolve_paths(base);

        assert_eq!(config.out_dir, Some(PathBuf::from("/work/site/public")));
        assert_eq!(config.template, Some(PathBuf::from("/abs/page.html")));
        assert_eq!(
            config.site.app.map(PathBuf::from),
            Some(PathBuf::from("/work/site/layout/_app.html"))
        );
    }

    // === find Tests ===

    #[test]
    fn test_find_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(".zero.toml"), "port = 4000").unwrap();

        let (path, config) = CliConfig::find(&nested).unwrap().unwrap();

        assert_eq!(path, dir.path().join(".zero.toml"));
        assert_eq!(config.port, Some(4000));
    }

    #[test]
    fn test_find_skips_package_without_key() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("pkg");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("package.json"), r#"{"name": "other"}"#).unwrap();
        fs::write(dir.path().join("zero.toml"), "port = 5000").unwrap();

        let (path, _) = CliConfig::find(&nested).unwrap().unwrap();

        assert_eq!(path, dir.path().join("zero.toml"));
    }

    #[test]
    fn test_find_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("site");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("zero.toml"), "port = 1").unwrap();
        fs::write(nested.join("zero.json"), r#"{"port": 2}"#).unwrap();

        let (_, config) = CliConfig::find(&nested).unwrap().unwrap();

        assert_eq!(config.port, Some(2));
    }
}
