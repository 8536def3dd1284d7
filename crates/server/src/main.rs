use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use shared::protocol::NEWS_ROUTE;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod upstream;

use api::{proxy_news, ApiContext, NewsParams, ProxyError};
use app_state::AppState;
use config::load_settings;
use upstream::NewsApiClient;

const CACHE_CONTROL_VALUE: &str = "s-maxage=300, stale-while-revalidate";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    if settings.news_api_key.is_none() {
        warn!("NEWS_API_KEY is not set; every /api/news request will fail until it is configured");
    }

    let upstream = NewsApiClient::new(
        settings.news_api_base_url.as_str(),
        Duration::from_secs(settings.upstream_timeout_secs),
    )
    .context("failed to build upstream http client")?;
    info!(
        upstream = %upstream.base_url(),
        timeout_secs = settings.upstream_timeout_secs,
        "news api upstream configured"
    );

    let state = AppState {
        api: ApiContext {
            upstream,
            api_key: settings.news_api_key,
        },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "news proxy listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(NEWS_ROUTE, get(http_news))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_news(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = NewsParams::from_pairs(pairs);
    match proxy_news(&state.api, params).await {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
                (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET")),
                (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE)),
            ],
            body,
        )
            .into_response(),
        Err(err) => {
            match &err {
                ProxyError::MissingApiKey => error!("rejecting news request: api key not configured"),
                ProxyError::Upstream(upstream) => error!(error = %upstream, "error fetching news"),
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err.envelope())).into_response()
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
