#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use mingzi_core::orchestrator::NameOrchestrator;
use mingzi_core::provider::{CompletionProvider, CompletionRequest, ProviderError};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

use mingzi_api::auth::jwt::{generate_access_token, JwtConfig};
use mingzi_api::config::ServerConfig;
use mingzi_api::payments::{CreemClient, PaymentConfig};
use mingzi_api::routes;
use mingzi_api::state::AppState;

pub const WEBHOOK_SECRET: &str = "whsec_test";

/// Given names the stub provider cycles through, all under surname 林.
const STUB_NAMES: [(&str, &str); 12] = [
    ("林晓峰", "Lín Xiǎofēng"),
    ("林雨桐", "Lín Yǔtóng"),
    ("林思远", "Lín Sīyuǎn"),
    ("林嘉怡", "Lín Jiāyí"),
    ("林子墨", "Lín Zǐmò"),
    ("林若溪", "Lín Ruòxī"),
    ("林浩然", "Lín Hàorán"),
    ("林书瑶", "Lín Shūyáo"),
    ("林致远", "Lín Zhìyuǎn"),
    ("林语嫣", "Lín Yǔyān"),
    ("林俊熙", "Lín Jùnxī"),
    ("林清妍", "Lín Qīngyán"),
];

/// Completion provider that answers with a fresh well-formed name per call.
#[derive(Default)]
pub struct StubProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let (chinese, pinyin) = STUB_NAMES[n % STUB_NAMES.len()];
        let characters: Vec<serde_json::Value> = chinese
            .chars()
            .map(|c| serde_json::json!({ "character": c.to_string(), "pinyin": "x", "meaning": "m" }))
            .collect();
        Ok(serde_json::json!({
            "chinese": chinese,
            "pinyin": pinyin,
            "characters": characters,
            "meaning": "A test name",
            "culturalNotes": "Notes",
            "personalityMatch": "Match",
        })
        .to_string())
    }

    fn model(&self) -> &str {
        "stub/model"
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        free_daily_generations: 1,
        jwt: JwtConfig {
            secret: "test-jwt-secret".to_string(),
        },
        payment: PaymentConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            api_key: "test-creem-key".to_string(),
            webhook_secret: WEBHOOK_SECRET.to_string(),
            success_url: None,
        },
    }
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs`, with the stub provider in
/// place of the HTTP client.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let payments = CreemClient::new(config.payment.clone()).unwrap();
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let state = AppState {
        pool,
        config: Arc::new(config),
        orchestrator: NameOrchestrator::new(Arc::new(StubProvider::default()), Duration::from_secs(5)),
        payments: Arc::new(payments),
        shutdown: CancellationToken::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3000".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Bearer token for `user_id` signed with the test secret.
pub fn token_for(user_id: Uuid, email: Option<&str>) -> String {
    let ttl = chrono::Duration::minutes(15);
    generate_access_token(user_id, email, ttl, &test_config().jwt).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// POST a JSON body with optional bearer token and extra headers.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
    token: Option<&str>,
    headers: &[(&str, &str)],
) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// POST raw bytes, as a webhook sender would.
pub async fn post_raw(app: Router, uri: &str, body: Vec<u8>, headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
