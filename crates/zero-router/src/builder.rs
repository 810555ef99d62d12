//! Route building.

use std::time::Instant;

use futures::future::try_join_all;
use zero_core::{merge_props, InitialPropsContext, Props};

use crate::discovery::ModuleRecord;
use crate::error::BuildError;
use crate::route::{IndexName, Route, RouteTable};

/// Build the route table for discovered pages.
///
/// Initial-data hooks for all pages run concurrently; the table is returned
/// only once every hook has resolved, in the same order as `records`. Any
/// failing hook fails the whole build.
pub async fn build_routes(
    records: Vec<ModuleRecord>,
    index: &IndexName,
) -> Result<RouteTable, BuildError> {
    let started = Instant::now();
    let routes = try_join_all(records.into_iter().map(|record| build_route(record, index))).await?;

    tracing::info!(
        routes = routes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "built route table"
    );
    Ok(RouteTable::new(routes))
}

async fn build_route(record: ModuleRecord, index: &IndexName) -> Result<Route, BuildError> {
    let exact = record.display_name == index.as_str();
    let name = if exact {
        "/".to_string()
    } else {
        format!("/{}", record.display_name)
    };
    let href = format!("{}{}", route_dir(&record.key), name);

    let initial = if record.component.has_initial_props() {
        let ctx = InitialPropsContext { path: href.clone() };
        record
            .component
            .initial_props(&ctx)
            .await
            .map_err(|source| BuildError::InitialProps {
                key: record.key.clone(),
                href: href.clone(),
                source,
            })?
    } else {
        Props::new()
    };

    let meta = record.module.front_matter.clone().unwrap_or_default();
    let props = merge_props(&meta, &initial);
    let path = props
        .get("path")
        .and_then(|p| p.as_str())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| href.clone());

    tracing::debug!(key = %record.key, href = %href, path = %path, exact, "built route");

    Ok(Route {
        key: name.clone(),
        name,
        href,
        path,
        exact,
        props,
        component: record.component,
        source: record.key,
    })
}

/// Directory portion of a module key with a single leading `.` stripped:
/// `./blog/post.md` -> `/blog`, `./index.md` -> ``.
fn route_dir(key: &str) -> String {
    let dir = key.rfind('/').map_or(".", |i| &key[..i]);
    let dir = dir.strip_prefix('.').unwrap_or(dir);

    if dir.is_empty() || dir.starts_with('/') {
        dir.to_string()
    } else {
        format!("/{}", dir)
    }
}
