//! CLI command implementations.

pub mod build;
pub mod dev;

use std::path::PathBuf;

use clap::Args;

/// Arguments shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct SiteArgs {
    /// Pages directory, or a page file whose directory is scanned.
    pub input: Option<PathBuf>,

    /// Config file path.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// URL prefix for all routes.
    #[arg(long)]
    pub basename: Option<String>,

    /// Only treat files matching this glob as pages.
    #[arg(long = "match", value_name = "GLOB")]
    pub match_pattern: Option<String>,

    /// Application shell file (default: nearest `_app.html`).
    #[arg(long)]
    pub app: Option<PathBuf>,

    /// Site title for pages without one.
    #[arg(long)]
    pub title: Option<String>,

    /// Turn the scroll reset on navigation off (`true`) or back on (`false`).
    #[arg(long, value_name = "BOOL")]
    pub disable_scroll: Option<bool>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Use JSON output format.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the dev command.
#[derive(Args, Debug, Clone, Default)]
pub struct DevArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Port for the dev server (default 8080).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Open the dev server in the default browser.
    #[arg(short, long)]
    pub open: bool,
}

/// Arguments for the build command.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Output directory (default dist).
    #[arg(short = 'd', long)]
    pub out_dir: Option<PathBuf>,

    /// Output static HTML without hydration data.
    #[arg(long = "static")]
    pub static_html: bool,

    /// Custom HTML template.
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}
