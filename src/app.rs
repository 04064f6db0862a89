//! Application bootstrap
//!
//! Builds the router every page is served from. Rendering reads the handle
//! once per page for diagnostics and hands the page back unchanged.

use crate::gate::EnvHandle;
use crate::middleware::env_diagnostics;
use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;

pub fn router(env: EnvHandle) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .layer(axum::middleware::from_fn_with_state(
            env.clone(),
            env_diagnostics,
        ))
        .with_state(env)
}

/// Log the handle and return `page` as given
pub fn render<T>(env: &EnvHandle, page: T) -> T {
    tracing::info!(env = ?env, "_app");
    page
}

async fn index(State(env): State<EnvHandle>) -> Html<String> {
    let mode = env
        .node_env()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let page = Html(format!(
        "<!doctype html>\n<html><body><h1>env-gate</h1><p>mode: {}</p></body></html>\n",
        mode
    ));
    render(&env, page)
}
