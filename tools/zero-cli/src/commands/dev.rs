//! Development server with live reload.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};
use tower_http::trace::TraceLayer;
use zero_app::{DocumentOptions, MemoryDocument, Mounted, Runtime, Site, Started};

use super::DevArgs;
use crate::context::Context;

/// Default dev server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Server-sent events endpoint announcing re-renders.
pub const RELOAD_PATH: &str = "/__zero/reload";

const RELOAD_SCRIPT: &str = r#"new EventSource("/__zero/reload").addEventListener("reload", function () { location.reload(); });"#;

/// State shared by the dev server handlers.
#[derive(Clone)]
pub struct DevState {
    site: Arc<Site>,
    mounted: Arc<Mounted>,
    document: Arc<MemoryDocument>,
    options: DocumentOptions,
}

impl DevState {
    /// Mount `site` into a fresh in-memory document.
    pub async fn start(site: Arc<Site>) -> Result<Self> {
        let document = Arc::new(MemoryDocument::new(site.options().link_to("/")));
        let started = site
            .start(Runtime::detect(Some(document.clone()), true))
            .await
            .context("Failed to start site")?;

        let Started::Mounted(mounted) = started else {
            bail!("site did not mount into the dev document");
        };

        Ok(Self {
            site,
            mounted: Arc::new(mounted),
            document,
            options: DocumentOptions::new()
                .with_hydrate(false)
                .with_script(RELOAD_SCRIPT),
        })
    }

    /// The dev server's router.
    pub fn router(self) -> Router {
        Router::new()
            .route(RELOAD_PATH, get(reload))
            .fallback(page)
            .with_state(self)
            .layer(TraceLayer::new_for_http())
    }
}

/// Run the dev command.
pub async fn run(args: DevArgs, ctx: &Context) -> Result<()> {
    // A build output inside the pages directory is not part of the site.
    let project = ctx.project(&args.site, &ctx.out_dir(None))?;
    let port = args.port.or(ctx.config.port).unwrap_or(DEFAULT_PORT);

    ctx.output.badge("starting dev server");

    let state = DevState::start(project.site.clone()).await?;

    project
        .source
        .watch()
        .with_context(|| format!("Failed to watch {}", project.dirname.display()))?;
    if let Some(changes) = project.site.changes() {
        let site = project.site.clone();
        let mounted = state.mounted.clone();
        tokio::spawn(async move {
            mounted.watch(changes, || site.routes()).await;
        });
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let url = format!(
        "http://localhost:{}{}",
        port,
        project.site.options().link_to("/")
    );
    ctx.output.badge(&format!("dev server listening on {}", console::style(&url).green()));
    tracing::info!(address = %addr, pages = %project.dirname.display(), "dev server started");

    if args.open {
        if let Err(err) = open::that(&url) {
            ctx.output.warn(&format!("Could not open browser: {}", err));
        }
    }

    axum::serve(listener, state.router())
        .await
        .context("Dev server stopped")?;
    Ok(())
}

async fn page(State(state): State<DevState>, uri: Uri) -> Response {
    let options = state.site.options();
    let Some(location) = options.strip_base(uri.path()) else {
        return (
            StatusCode::NOT_FOUND,
            format!("{} is outside {}", uri.path(), options.basename),
        )
            .into_response();
    };

    let routes = state.mounted.routes();
    let status = if routes.find(location).is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };

    let tree = state.mounted.render_at(location);
    let html = state
        .site
        .document(&routes, location, tree, &state.options)
        .render();

    (status, [(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response()
}

async fn reload(State(state): State<DevState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = WatchStream::from_changes(state.document.subscribe())
        .map(|generation| Ok(Event::default().event("reload").data(generation.to_string())));

    Sse::new(stream).keep_alive(KeepAlive::default())
}
