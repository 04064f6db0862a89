//! Request-entry hook
//!
//! Logs the gated environment for every inbound request and forwards the
//! request untouched. Install with `axum::middleware::from_fn_with_state`.

use crate::gate::EnvHandle;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

pub async fn env_diagnostics(State(env): State<EnvHandle>, request: Request, next: Next) -> Response {
    tracing::debug!(
        method = %request.method(),
        path = %request.uri().path(),
        context = %env.context(),
        node_env = ?env.node_env(),
        "request environment"
    );
    next.run(request).await
}
