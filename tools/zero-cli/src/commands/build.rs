//! Build a static site.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context as _, Result};
use serde::Serialize;
use zero_app::DocumentOptions;
use zero_render::Template;

use super::BuildArgs;
use crate::context::Context;
use crate::output::format_bytes;

#[derive(Debug, Serialize)]
struct BuildReport {
    out_dir: PathBuf,
    pages: Vec<PageReport>,
    bytes: u64,
    elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
struct PageReport {
    path: String,
    file: PathBuf,
}

/// Run the build command.
pub async fn run(args: BuildArgs, ctx: &Context) -> Result<()> {
    let started = Instant::now();
    let out_dir = ctx.out_dir(args.out_dir.as_deref());
    let project = ctx.project(&args.site, &out_dir)?;
    let static_html = args.static_html || ctx.config.static_html;
    let template = match args.template.as_ref().or(ctx.config.template.as_ref()) {
        Some(path) => Some(load_template(&ctx.resolve_path(path)).await?),
        None => None,
    };

    ctx.output.badge("building static site");
    ctx.output.debug(&format!("Pages: {}", project.dirname.display()));

    let spinner = ctx.output.spinner("Resolving routes...");
    let routes = project.site.routes().await;
    spinner.finish_and_clear();
    let routes = routes.context("Failed to build routes")?;

    let options = DocumentOptions::new()
        .with_template(template)
        .with_hydrate(!static_html);
    let pages = project.site.render_pages(&routes, &options);

    let pb = ctx.output.progress(pages.len() as u64, "Writing pages");
    let mut bytes = 0;
    let mut report = Vec::with_capacity(pages.len());

    for page in pages {
        let file = out_dir.join(&page.file);
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&file, &page.html)
            .await
            .with_context(|| format!("Failed to write {}", file.display()))?;

        bytes += page.html.len() as u64;
        ctx.output.debug(&format!("{} -> {}", page.path, file.display()));
        pb.inc(1);
        report.push(PageReport {
            path: page.path,
            file,
        });
    }
    pb.finish_and_clear();

    tracing::info!(pages = report.len(), out_dir = %out_dir.display(), "static build finished");

    if ctx.output.is_json() {
        ctx.output.json(&BuildReport {
            out_dir,
            pages: report,
            bytes,
            elapsed_ms: started.elapsed().as_millis() as u64,
        });
        return Ok(());
    }

    ctx.output.success(&format!("Rendered {} pages", report.len()));
    ctx.output.kv("Size", &format_bytes(bytes));
    ctx.output.badge(&format!("site saved to {}", out_dir.display()));
    Ok(())
}

async fn load_template(path: &Path) -> Result<Template> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read template {}", path.display()))?;
    Ok(Template::new(source))
}
