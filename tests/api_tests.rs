/// Integration tests for the HTTP surface, driven through the router
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use logbuddy::{
    config::WeatherConfig,
    handlers::AppState,
    server::create_router,
    weather::WeatherClient,
    CsvExporter, EventStore, WebhookQueue,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::{path::Path, sync::Arc, time::Duration};
use tower::util::ServiceExt;

async fn test_app(export_dir: &Path, max_limit: Option<u64>) -> (Router, EventStore) {
    let store = EventStore::in_memory().await.unwrap();
    let (webhooks, _workers) = WebhookQueue::spawn(store.clone(), 16, 2);

    let state = AppState {
        store: store.clone(),
        webhooks,
        exporter: CsvExporter::new(export_dir),
        weather: WeatherClient::new(reqwest::Client::new(), WeatherConfig::default()),
        max_limit,
    };
    let metrics_handle = Arc::new(PrometheusBuilder::new().build_recorder().handle());

    (create_router(state, metrics_handle), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn seed_three(app: &Router) {
    for (level, source) in [("INFO", "app"), ("WARNING", "monitoring"), ("ERROR", "database")] {
        let (status, _) = send(
            app,
            post_json(
                "/logs",
                json!({"level": level, "message": format!("{} happened", level), "source": source}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_root_and_health() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, _) = test_app(dir.path(), None).await;

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to LogBuddy - Your logging companion!");

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_create_log_returns_stored_event() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, store) = test_app(dir.path(), None).await;

    let (status, body) = send(
        &app,
        post_json(
            "/logs",
            json!({
                "level": "INFO",
                "message": "User logged in",
                "source": "auth",
                "user_id": "u-42",
                "extra_data": {"ip": "10.0.0.1", "attempt": 1}
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["level"], "INFO");
    assert_eq!(body["user_id"], "u-42");
    assert_eq!(body["extra_data"], json!({"ip": "10.0.0.1", "attempt": 1}));
    assert!(body["timestamp"].is_string());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_log_missing_field_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, store) = test_app(dir.path(), None).await;

    let (status, _) = send(&app, post_json("/logs", json!({"level": "INFO", "message": "x"}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_filters_by_level() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, _) = test_app(dir.path(), None).await;
    seed_three(&app).await;

    let (status, body) = send(&app, get("/logs?level=ERROR")).await;
    assert_eq!(status, StatusCode::OK);

    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["level"], "ERROR");
    assert_eq!(events[0]["source"], "database");

    let (_, body) = send(&app, get("/logs?level=ERROR&source=app")).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = send(&app, get("/logs?level=&source=")).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_pagination() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, _) = test_app(dir.path(), None).await;
    seed_three(&app).await;

    let (_, body) = send(&app, get("/logs?skip=1&limit=1")).await;
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], 2);

    let (_, body) = send(&app, get("/logs?skip=10")).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = send(&app, get("/logs?limit=-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_respects_configured_max_limit() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, _) = test_app(dir.path(), Some(2)).await;
    seed_three(&app).await;

    let (_, body) = send(&app, get("/logs?limit=1000")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_analytics_counts() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, _) = test_app(dir.path(), None).await;
    seed_three(&app).await;

    let (status, body) = send(&app, get("/analytics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_logs"], 3);
    assert_eq!(body["logs_by_level"], json!({"INFO": 1, "WARNING": 1, "ERROR": 1}));
    assert_eq!(
        body["logs_by_source"],
        json!({"app": 1, "monitoring": 1, "database": 1})
    );

    let recent = body["recent_activity"].as_array().unwrap();
    assert_eq!(recent.len(), 3);
    assert!(recent[0].get("user_id").is_none());
}

#[tokio::test]
async fn test_analytics_empty_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, _) = test_app(dir.path(), None).await;

    let (status, body) = send(&app, get("/analytics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "total_logs": 0,
            "logs_by_level": {},
            "logs_by_source": {},
            "recent_activity": []
        })
    );
}

#[tokio::test]
async fn test_webhook_is_ingested_in_background() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, store) = test_app(dir.path(), None).await;

    let payload = json!({"type": "user_action", "action": "click", "target": "buy"});
    let (status, body) = send(&app, post_json("/external-api/webhook", payload.clone())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");

    let mut events = Vec::new();
    for _ in 0..50 {
        events = store.all().await.unwrap();
        if !events.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, "INFO");
    assert_eq!(events[0].source, "webhook");
    assert_eq!(events[0].message, "Webhook processed: user_action");
    assert_eq!(events[0].extra_data.as_ref(), Some(&payload));
}

fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn wait_for_events(store: &EventStore, expected: usize) -> Vec<logbuddy::LogEvent> {
    for _ in 0..50 {
        let events = store.all().await.unwrap();
        if events.len() >= expected {
            return events;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("store never reached {} events", expected);
}

#[tokio::test]
async fn test_big_integers_survive_direct_and_webhook_ingestion() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, store) = test_app(dir.path(), None).await;

    let (status, body) = send(
        &app,
        post_raw(
            "/logs",
            r#"{"level":"INFO","message":"order placed","source":"billing",
                "extra_data":{"order_id":123456789012345678901234567890,"ratio":0.1}}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["extra_data"]["order_id"].to_string(),
        "123456789012345678901234567890"
    );

    let (status, _) = send(
        &app,
        post_raw(
            "/external-api/webhook",
            r#"{"type":"payment","amount":123456789012345678901234567890}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let events = wait_for_events(&store, 2).await;
    let direct = events[0].extra_data.as_ref().unwrap();
    assert_eq!(
        serde_json::to_string(direct).unwrap(),
        r#"{"order_id":123456789012345678901234567890,"ratio":0.1}"#
    );
    let webhook = events[1].extra_data.as_ref().unwrap();
    assert_eq!(webhook["amount"].to_string(), "123456789012345678901234567890");

    let (_, listed) = send(&app, get("/logs")).await;
    assert_eq!(
        listed[1]["extra_data"]["amount"].to_string(),
        "123456789012345678901234567890"
    );
}

#[tokio::test]
async fn test_webhook_rejects_non_object_payload() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, _) = test_app(dir.path(), None).await;

    let (status, _) = send(&app, post_json("/external-api/webhook", json!([1, 2, 3]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_export_writes_csv() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, _) = test_app(dir.path(), None).await;
    seed_three(&app).await;

    let (status, body) = send(&app, get("/export/csv")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Export completed");
    assert_eq!(body["records_exported"], 3);

    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("logs_export_"));
    assert!(filename.ends_with(".csv"));

    let contents = std::fs::read_to_string(dir.path().join(filename)).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "id,timestamp,level,message,source,user_id");
}

#[tokio::test]
async fn test_export_failure_returns_generic_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_directory");
    std::fs::write(&blocker, "occupied").unwrap();
    let (app, _) = test_app(&blocker, None).await;

    let (status, body) = send(&app, get("/export/csv")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Failed to export logs");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let dir = tempfile::TempDir::new().unwrap();
    let (app, _) = test_app(dir.path(), None).await;

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; version=0.0.4"
    );
}
