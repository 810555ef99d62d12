//! zero CLI - zero-configuration site generator.
//!
//! Commands:
//! - `zero [dev] <pages>` - Serve pages with live reload (default)
//! - `zero build <pages>` - Render every page to static HTML

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, DevArgs, SiteArgs};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "ZERO_LOG";

/// zero - Turn a directory of pages into a site
#[derive(Parser)]
#[command(name = "zero")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    dev: DevArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dev server (default)
    Dev(DevArgs),

    /// Build a static site
    Build(BuildArgs),
}

impl Commands {
    fn site(&self) -> &SiteArgs {
        match self {
            Self::Dev(args) => &args.site,
            Self::Build(args) => &args.site,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dev(cli.dev));
    let site = command.site();

    init_tracing(site.verbose);

    // Setup output formatting
    let output = output::Output::new(site.verbose, site.json);

    // Load config
    let ctx = match context::Context::load(site.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match command {
        Commands::Dev(args) => commands::dev::run(args, &ctx).await,
        Commands::Build(args) => commands::build::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Commands {
        let cli = Cli::try_parse_from(args).unwrap();
        cli.command.unwrap_or(Commands::Dev(cli.dev))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dev_is_default() {
        let Commands::Dev(args) = parse(&["zero", "pages", "-p", "3000", "-o"]) else {
            panic!("expected dev");
        };

        assert_eq!(args.site.input, Some(PathBuf::from("pages")));
        assert_eq!(args.port, Some(3000));
        assert!(args.open);
    }

    #[test]
    fn test_explicit_dev() {
        let Commands::Dev(args) = parse(&["zero", "dev", "docs", "--basename", "/docs"]) else {
            panic!("expected dev");
        };

        assert_eq!(args.site.input, Some(PathBuf::from("docs")));
        assert_eq!(args.site.basename.as_deref(), Some("/docs"));
    }

    #[test]
    fn test_build_flags() {
        let Commands::Build(args) = parse(&[
            "zero", "build", "pages", "-d", "public", "--static", "-t", "page.html", "--match",
            "**/*.md", "-v",
        ]) else {
            panic!("expected build");
        };

        assert_eq!(args.out_dir, Some(PathBuf::from("public")));
        assert!(args.static_html);
        assert_eq!(args.template, Some(PathBuf::from("page.html")));
        assert_eq!(args.site.match_pattern.as_deref(), Some("**/*.md"));
        assert!(args.site.verbose);
    }

    #[test]
    fn test_no_input_defaults_to_cwd() {
        let Commands::Dev(args) = parse(&["zero"]) else {
            panic!("expected dev");
        };
        assert_eq!(args.site.input, None);
    }
}
