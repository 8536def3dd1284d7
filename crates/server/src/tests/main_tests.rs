use super::*;
use axum::{
    body::{self, Body},
    extract::RawQuery,
    http::Request,
};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};
use tokio::net::TcpListener;
use tower::ServiceExt;

const API_KEY: &str = "test-secret-key";

struct FakeNewsApi {
    status: StatusCode,
    body: String,
    hits: AtomicUsize,
    last_raw_query: Mutex<Option<String>>,
}

async fn fake_everything(
    State(fake): State<Arc<FakeNewsApi>>,
    RawQuery(raw): RawQuery,
) -> impl IntoResponse {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    *fake.last_raw_query.lock().expect("lock") = raw;
    (
        fake.status,
        [(header::CONTENT_TYPE, "application/json")],
        fake.body.clone(),
    )
}

async fn spawn_fake_news_api(status: StatusCode, body: &str) -> (String, Arc<FakeNewsApi>) {
    let fake = Arc::new(FakeNewsApi {
        status,
        body: body.to_string(),
        hits: AtomicUsize::new(0),
        last_raw_query: Mutex::new(None),
    });
    let app = Router::new()
        .route("/v2/everything", get(fake_everything))
        .with_state(Arc::clone(&fake));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}/v2/everything"), fake)
}

fn proxy_app(base_url: &str, api_key: Option<&str>) -> Router {
    let upstream = NewsApiClient::new(base_url, Duration::from_secs(5)).expect("client");
    build_router(Arc::new(AppState {
        api: ApiContext {
            upstream,
            api_key: api_key.and_then(config::ApiKey::new),
        },
    }))
}

fn upstream_params(fake: &FakeNewsApi) -> HashMap<String, String> {
    let raw = fake
        .last_raw_query
        .lock()
        .expect("lock")
        .clone()
        .expect("upstream saw a query string");
    raw.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| {
            (
                k.to_string(),
                urlencoding::decode(v).expect("decode").into_owned(),
            )
        })
        .collect()
}

async fn get_news(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (
        status,
        headers,
        String::from_utf8(bytes.to_vec()).expect("utf8"),
    )
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = proxy_app("http://127.0.0.1:9/v2/everything", None);
    let (status, _, body) = get_news(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn missing_api_key_returns_500_without_calling_upstream() {
    let (base_url, fake) = spawn_fake_news_api(StatusCode::OK, r#"{"status":"ok"}"#).await;
    let app = proxy_app(&base_url, None);

    let (status, _, body) = get_news(app, "/api/news?q=rust").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let value: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(value, serde_json::json!({ "error": "API key not configured." }));
    assert_eq!(fake.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn success_relays_upstream_body_with_cors_and_cache_headers() {
    let upstream_body =
        r#"{"status":"ok","totalResults":12,"articles":[{"title":"a","url":"https://a"}]}"#;
    let (base_url, fake) = spawn_fake_news_api(StatusCode::OK, upstream_body).await;
    let app = proxy_app(&base_url, Some(API_KEY));

    let (status, headers, body) = get_news(
        app,
        "/api/news?q=rust%20%26%20tokio&page=2&sortBy=relevancy&pageSize=6",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, upstream_body);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "s-maxage=300, stale-while-revalidate"
    );

    let params = upstream_params(&fake);
    assert_eq!(params["q"], "rust & tokio");
    assert_eq!(params["page"], "2");
    assert_eq!(params["sortBy"], "relevancy");
    assert_eq!(params["pageSize"], "6");
    assert_eq!(params["apiKey"], API_KEY);
}

#[tokio::test]
async fn defaults_are_forwarded_when_params_are_absent() {
    let (base_url, fake) = spawn_fake_news_api(StatusCode::OK, r#"{"status":"ok"}"#).await;
    let app = proxy_app(&base_url, Some(API_KEY));

    let (status, _, _) = get_news(app, "/api/news").await;

    assert_eq!(status, StatusCode::OK);
    let params = upstream_params(&fake);
    assert_eq!(params["q"], "latest");
    assert_eq!(params["page"], "1");
    assert_eq!(params["sortBy"], "publishedAt");
    assert_eq!(params["pageSize"], "6");
}

#[tokio::test]
async fn repeated_params_forward_the_first_value() {
    let (base_url, fake) = spawn_fake_news_api(StatusCode::OK, r#"{"status":"ok"}"#).await;
    let app = proxy_app(&base_url, Some(API_KEY));

    let (status, _, _) = get_news(app, "/api/news?q=rust&q=go&page=1&page=2").await;

    assert_eq!(status, StatusCode::OK);
    let params = upstream_params(&fake);
    assert_eq!(params["q"], "rust");
    assert_eq!(params["page"], "1");
}

#[tokio::test]
async fn repeated_params_without_key_still_get_the_json_envelope() {
    let (base_url, fake) = spawn_fake_news_api(StatusCode::OK, r#"{"status":"ok"}"#).await;
    let app = proxy_app(&base_url, None);

    let (status, headers, body) = get_news(app, "/api/news?q=rust&q=go").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    let value: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(value, serde_json::json!({ "error": "API key not configured." }));
    assert_eq!(fake.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn upstream_error_message_is_relayed_without_leaking_key() {
    let (base_url, _fake) = spawn_fake_news_api(
        StatusCode::UNAUTHORIZED,
        r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid or incorrect."}"#,
    )
    .await;
    let app = proxy_app(&base_url, Some(API_KEY));

    let (status, headers, body) = get_news(app, "/api/news?q=rust").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let value: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(
        value,
        serde_json::json!({ "error": "Your API key is invalid or incorrect." })
    );
    assert!(!body.contains(API_KEY));
    assert!(headers.get(header::CACHE_CONTROL).is_none());
}

#[tokio::test]
async fn upstream_failure_without_message_reports_status() {
    let (base_url, _fake) = spawn_fake_news_api(StatusCode::BAD_GATEWAY, "gateway down").await;
    let app = proxy_app(&base_url, Some(API_KEY));

    let (status, _, body) = get_news(app, "/api/news").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let value: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(
        value["error"],
        "News API request failed with status 502"
    );
}

#[tokio::test]
async fn malformed_upstream_success_body_is_an_error() {
    let (base_url, _fake) = spawn_fake_news_api(StatusCode::OK, "<html>nope</html>").await;
    let app = proxy_app(&base_url, Some(API_KEY));

    let (status, _, body) = get_news(app, "/api/news").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let value: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(value["error"], "Failed to fetch news.");
}

#[tokio::test]
async fn transport_failure_returns_generic_error_without_key() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let app = proxy_app(&format!("http://{addr}/v2/everything"), Some(API_KEY));

    let (status, _, body) = get_news(app, "/api/news?q=rust").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains(API_KEY));
    let value: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(value["error"], "Failed to fetch news.");
}

#[tokio::test]
async fn non_get_methods_are_rejected() {
    let app = proxy_app("http://127.0.0.1:9/v2/everything", Some(API_KEY));
    let request = Request::post("/api/news")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
