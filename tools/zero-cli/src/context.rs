//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use zero_app::Site;
use zero_core::{SiteOptions, SiteOptionsOverride};
use zero_source::{FsAppShell, FsPageSource};

use crate::commands::SiteArgs;
use crate::config::CliConfig;
use crate::output::Output;

/// Default static build output directory.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

/// A site opened from the command line.
pub struct Project {
    /// Pages directory.
    pub dirname: PathBuf,
    /// The page source, kept for watching.
    pub source: Arc<FsPageSource>,
    /// The site.
    pub site: Arc<Site>,
}

impl Context {
    /// Load context from an explicit config file, or the nearest one above
    /// the working directory.
    pub fn load(config_path: Option<&Path>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_in(cwd, config_path, output)
    }

    /// Same as `load`, rooted at `cwd`.
    pub fn load_in(cwd: PathBuf, config_path: Option<&Path>, output: Output) -> Result<Self> {
        let (config_path, config) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                let config = CliConfig::load(&path)?;
                (Some(path), config)
            }
            None => match CliConfig::find(&cwd)? {
                Some((path, config)) => (Some(path), config),
                None => (None, CliConfig::default()),
            },
        };

        let config = match &config_path {
            Some(path) => {
                output.debug(&format!("Using config {}", path.display()));
                match path.parent() {
                    Some(base) => config.resolve_paths(base),
                    None => config,
                }
            }
            None => config,
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        resolve(&self.cwd, path)
    }

    /// Site options from the config file overlaid with command-line flags.
    ///
    /// Returns the pages directory alongside. A file input scans its
    /// directory and becomes the primary page.
    pub fn site_options(&self, args: &SiteArgs) -> Result<(PathBuf, SiteOptions)> {
        let input = self.resolve_path(args.input.as_deref().unwrap_or(Path::new(".")));
        let metadata = std::fs::metadata(&input)
            .with_context(|| format!("Cannot read input {}", input.display()))?;

        let (dirname, filename) = if metadata.is_dir() {
            (input, None)
        } else {
            let dirname = input.parent().map(Path::to_path_buf).unwrap_or_else(|| self.cwd.clone());
            let filename = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            (dirname, filename)
        };

        let flags = SiteOptionsOverride {
            filename,
            basename: args.basename.clone(),
            disable_scroll: args.disable_scroll,
            match_pattern: args.match_pattern.clone(),
            app: args
                .app
                .as_deref()
                .map(|app| self.resolve_path(app).display().to_string()),
            title: args.title.clone(),
        };
        let options = self.config.site.clone().apply(flags);

        Ok((dirname, options))
    }

    /// Build output directory: the flag, else the config, else `dist`.
    pub fn out_dir(&self, flag: Option<&Path>) -> PathBuf {
        self.resolve_path(
            flag.or(self.config.out_dir.as_deref())
                .unwrap_or(Path::new(DEFAULT_OUT_DIR)),
        )
    }

    /// Open the site described by the config and flags. Pages under
    /// `out_dir` are never picked up.
    pub fn project(&self, args: &SiteArgs, out_dir: &Path) -> Result<Project> {
        let (dirname, options) = self.site_options(args)?;

        let source = Arc::new(
            FsPageSource::open(&dirname)
                .with_context(|| format!("Cannot open pages in {}", dirname.display()))?
                .with_exclude(out_dir),
        );
        let shell = FsAppShell::resolve(&dirname, options.app.as_deref().map(Path::new))
            .context("Failed to load the application shell")?;

        let mut site = Site::new(source.clone()).with_options(options);
        if let Some(shell) = shell {
            self.output.debug(&format!("Using shell {}", shell.path().display()));
            site = site.with_shell(Arc::new(shell));
        }

        Ok(Project {
            dirname,
            source,
            site: Arc::new(site),
        })
    }
}

fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
