use std::net::SocketAddr;

use axum::Router;
use color_eyre::eyre::WrapErr;
use tokio::net::TcpListener;
use tower_cookies::CookieManagerLayer;

use crate::AppState;
pub(crate) use errors::ServerError;

pub(crate) mod cmd;
pub(crate) mod cookies;
pub(crate) mod errors;
pub(crate) mod routes;
pub(crate) mod session;
mod templates;
mod trace;

#[cfg(test)]
pub(crate) mod test_helpers;

pub(crate) mod pages {
    pub mod admin;
    pub mod edit_recipe;
    pub mod home;
    pub mod login;
    pub mod notes;
    pub mod recipes;
    pub mod transfer;
}

type ResponseResult<T = axum::response::Response> = Result<T, ServerError>;

/// The full application: routes, request tracing and the cookie jar.
pub(crate) fn app(app_state: AppState) -> Router {
    let tracer = trace::Tracer;
    let trace_layer = tower_http::trace::TraceLayer::new_for_http()
        .make_span_with(tracer)
        .on_response(tracer);

    routes::make_router()
        .with_state(app_state)
        .layer(trace_layer)
        .layer(CookieManagerLayer::new())
}

pub(crate) async fn run_server(app_state: AppState) -> color_eyre::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], app_state.app.port));

    tracing::info!("Starting server on port {}", addr.port());
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err("Failed to open port")?;

    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app(app_state))
        .await
        .wrap_err("Failed to run server")
}
