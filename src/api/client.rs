use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, Request, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::interceptor::{AuthPlaceholder, RequestInterceptor};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Shared HTTP client for the control plane.
///
/// Base URL, timeout and interceptor chain are fixed at construction. Clones
/// share the same connection pool and configuration.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    origin: Option<Url>,
    timeout: Duration,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

/// Full response wrapper: status, headers and parsed body
#[derive(Debug, Clone)]
pub struct ApiResponse<T = Value> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: T,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        interceptors: Vec<Arc<dyn RequestInterceptor>>,
    ) -> ApiResult<Self> {
        Self::with_origin(base_url, None, timeout, interceptors)
    }

    /// Like [`ApiClient::new`], resolving relative base URLs against `origin`
    pub fn with_origin(
        base_url: impl Into<String>,
        origin: Option<&str>,
        timeout: Duration,
        interceptors: Vec<Arc<dyn RequestInterceptor>>,
    ) -> ApiResult<Self> {
        let origin = origin
            .map(|o| {
                Url::parse(o).map_err(|e| ApiError::InvalidUrl {
                    url: o.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: base_url.into(),
                origin,
                timeout,
                interceptors,
            }),
        })
    }

    /// Factory: configured base URL (or `/api`), fixed timeout, auth placeholder interceptor
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        Self::with_origin(
            config.effective_base_url(),
            config.origin.as_deref(),
            config.timeout(),
            vec![Arc::new(AuthPlaceholder)],
        )
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// `<base URL><path>` before origin resolution
    pub fn effective_url(&self, path: &str) -> String {
        combine_urls(&self.inner.base_url, path)
    }

    /// Absolute URL a request for `path` will be sent to
    pub fn endpoint(&self, path: &str) -> ApiResult<Url> {
        let joined = self.effective_url(path);

        match Url::parse(&joined) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.inner.origin {
                Some(origin) => origin.join(&joined).map_err(|e| ApiError::InvalidUrl {
                    url: joined.clone(),
                    reason: e.to_string(),
                }),
                None => Err(ApiError::InvalidUrl {
                    url: joined,
                    reason: "relative URL and no origin configured".to_string(),
                }),
            },
            Err(e) => Err(ApiError::InvalidUrl {
                url: joined,
                reason: e.to_string(),
            }),
        }
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        Ok(self.inner.http.request(method, url))
    }

    pub(crate) async fn execute(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let request = builder.build()?;
        self.dispatch(request).await
    }

    /// Run the interceptor chain, send, and reject non-2xx statuses
    pub(crate) async fn dispatch(&self, mut request: Request) -> ApiResult<Response> {
        for interceptor in &self.inner.interceptors {
            request = interceptor.intercept(request);
        }

        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!("{} {}", method, url);

        let response = self.inner.http.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            // An unreadable error body must not hide the status
            let bytes = response.bytes().await.unwrap_or_else(|e| {
                tracing::debug!("failed to read error body from {}: {}", url, e);
                Default::default()
            });
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            };
            tracing::warn!("{} {} failed with {}", method, url, status);
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("origin", &self.inner.origin.as_ref().map(Url::as_str))
            .field("timeout", &self.inner.timeout)
            .field("interceptors", &self.inner.interceptors.len())
            .finish()
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    pub(crate) async fn from_response(response: Response) -> ApiResult<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let data = read_body(response).await?;
        Ok(Self { status, headers, data })
    }
}

impl ApiResponse<Value> {
    /// Decode the body into a typed value, dropping status and headers
    pub fn into_data<T: DeserializeOwned>(self) -> ApiResult<T> {
        Ok(serde_json::from_value(self.data)?)
    }
}

/// Parse a response body, treating an empty body as JSON `null`.
///
/// A body that is not JSON is handed over as a JSON string, so untyped
/// callers still see a successful response; typed callers get `Decode`.
pub(crate) async fn read_body<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    decode_body(&bytes)
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    if bytes.is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(e) => {
            let text = Value::String(String::from_utf8_lossy(bytes).into_owned());
            serde_json::from_value(text).map_err(|_| ApiError::Decode(e))
        }
    }
}

/// Flatten query params the way axios does: null values are dropped, arrays
/// repeat the key as `key[]`, nested objects are sent as JSON text.
pub(crate) fn query_pairs<P>(params: &P) -> ApiResult<Vec<(String, String)>>
where
    P: Serialize + ?Sized,
{
    let value = serde_json::to_value(params).map_err(|e| ApiError::InvalidParams(e.to_string()))?;
    let mut pairs = Vec::new();

    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, value) in map {
                push_param(&mut pairs, key, value);
            }
        }
        // Sequence of (key, value) tuples
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Array(pair) if pair.len() == 2 && pair[0].is_string() => {
                        let mut pair = pair.into_iter();
                        if let (Some(Value::String(key)), Some(value)) = (pair.next(), pair.next()) {
                            push_param(&mut pairs, key, value);
                        }
                    }
                    other => {
                        return Err(ApiError::InvalidParams(format!(
                            "expected a (key, value) pair, got {}",
                            other
                        )))
                    }
                }
            }
        }
        other => {
            return Err(ApiError::InvalidParams(format!(
                "expected a map of query params, got {}",
                other
            )))
        }
    }

    Ok(pairs)
}

fn push_param(pairs: &mut Vec<(String, String)>, key: String, value: Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            let key = format!("{}[]", key);
            for item in items {
                if let Some(text) = param_text(item) {
                    pairs.push((key.clone(), text));
                }
            }
        }
        other => {
            if let Some(text) = param_text(other) {
                pairs.push((key, text));
            }
        }
    }
}

fn param_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn combine_urls(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return base_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
