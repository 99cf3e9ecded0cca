mod api;
mod auth;
mod config;
mod db;
mod models;
mod repo;
mod schema;
mod state;
mod storage;
mod telemetry;

#[cfg(test)]
mod test_support;

use std::env;

use anyhow::Context;
use axum::http::{Request, Response};
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    telemetry::init()?;

    let config = Config::from_env().context("invalid configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let state = AppState::from_config(&config).await?;

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let app = api::router(state).merge(swagger_ui).layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| telemetry::request_span(request))
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                    telemetry::log_response(response, latency, span)
                },
            )
            .on_failure(
                |error: ServerErrorsFailureClass, latency: std::time::Duration, span: &Span| {
                    telemetry::log_failure(error, latency, span)
                },
            ),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
