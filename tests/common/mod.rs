#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use signage_admin::api::{ApiClient, RequestInterceptor};

/// One request as the mock control plane saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.query.as_deref().unwrap_or_default().as_bytes())
            .into_owned()
            .collect()
    }
}

type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

/// In-process stand-in for the control plane, listening on a free port
pub struct MockControlPlane {
    pub base_url: String,
    requests: Recorder,
}

impl MockControlPlane {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock control plane")?;

        let requests: Recorder = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(respond).with_state(requests.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Exactly one request must have been recorded
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected one request, got {:?}", requests);
        requests.into_iter().next().unwrap()
    }

    /// Client whose base URL is `<mock>/api`
    pub fn client(&self) -> ApiClient {
        self.client_with(Duration::from_secs(10), Vec::new())
    }

    pub fn client_with(&self, timeout: Duration, interceptors: Vec<Arc<dyn RequestInterceptor>>) -> ApiClient {
        ApiClient::new(format!("{}/api", self.base_url), timeout, interceptors).expect("client")
    }

    /// Client whose base URL is `<mock><prefix>`; `/plain` answers in text/plain
    pub fn client_at(&self, prefix: &str) -> ApiClient {
        ApiClient::new(format!("{}{}", self.base_url, prefix), Duration::from_secs(10), Vec::new()).expect("client")
    }
}

async fn respond(
    State(requests): State<Recorder>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    };
    requests.lock().unwrap().push(recorded.clone());

    // Proxies and health endpoints that answer in plain text
    if recorded.path.starts_with("/plain/") {
        return match method {
            Method::DELETE => (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response(),
            _ => (StatusCode::OK, "OK").into_response(),
        };
    }

    json_route(method, &recorded).await.into_response()
}

async fn json_route(method: Method, recorded: &RecordedRequest) -> (StatusCode, Json<Value>) {
    let path = recorded.path.strip_prefix("/api").unwrap_or(&recorded.path);

    match (method, path) {
        (Method::POST, "/v1/commands") => {
            let payload = recorded.json();
            match payload["action"].as_str() {
                Some("explode") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": "gateway unreachable" }))),
                Some("hang") => {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    (StatusCode::OK, Json(json!({ "status": "success" })))
                }
                action => (
                    StatusCode::OK,
                    Json(json!({
                        "status": "success",
                        "cmd_id": payload["cmd_id"],
                        "msg": format!("command {} dispatched", action.unwrap_or_default()),
                    })),
                ),
            }
        }
        (Method::GET, "/v1/commands") => (
            StatusCode::OK,
            Json(json!({
                "items": [{
                    "cmd_id": "c-1",
                    "device_id": "dev-01",
                    "action": "reboot",
                    "status": "sent",
                    "send_ts": 1_700_000_000,
                    "result": null
                }],
                "total": 1
            })),
        ),
        (Method::GET, "/v1/materials") => (
            StatusCode::OK,
            Json(json!({
                "total": 1,
                "items": [{ "material_id": "mat_1a2b3c4d", "file_name": "spring.mp4", "type": "video" }]
            })),
        ),
        (Method::POST, "/v1/materials/upload") => (
            StatusCode::OK,
            Json(json!({
                "material_id": "mat_0000beef",
                "filename": "poster.png",
                "md5": "d41d8cd98f00b204e9800998ecf8427e",
                "status": "PENDING"
            })),
        ),
        (Method::DELETE, p) if p.starts_with("/v1/materials/") => (
            StatusCode::OK,
            Json(json!({ "deleted": p.trim_start_matches("/v1/materials/") })),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))),
    }
}
