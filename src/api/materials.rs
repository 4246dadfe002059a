use std::fmt;
use std::path::Path;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::client::{query_pairs, read_body, ApiClient};
use crate::error::{ApiError, ApiResult};

pub const MATERIALS_PATH: &str = "/v1/materials";
pub const UPLOAD_PATH: &str = "/v1/materials/upload";

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Material library wrappers. Every call returns only the decoded response body.
pub struct MaterialsApi<'a> {
    client: &'a ApiClient,
}

/// File plus form fields for an upload
#[derive(Debug, Clone)]
pub struct MaterialForm {
    pub file_name: String,
    pub content: Vec<u8>,
    pub mime: Option<String>,
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
}

pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Per-upload options. Headers here are applied after the multipart content type.
#[derive(Clone, Default)]
pub struct UploadOptions {
    pub headers: HeaderMap,
    pub on_upload_progress: Option<ProgressCallback>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialMeta {
    pub material_id: String,
    pub advertiser: Option<String>,
    pub ad_id: Option<String>,
    pub file_name: Option<String>,
    pub oss_url: Option<String>,
    pub md5: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub duration_sec: Option<i64>,
    pub size_bytes: Option<i64>,
    pub uploader_id: Option<String>,
    pub status: Option<String>,
    pub versions: Option<Value>,
    pub tags: Option<Value>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub extra: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialList {
    pub total: u64,
    pub items: Vec<MaterialMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialUploadResponse {
    pub material_id: String,
    pub filename: String,
    pub md5: String,
    pub status: String,
    #[serde(default)]
    pub extra: Option<Map<String, Value>>,
}

impl ApiClient {
    pub fn materials(&self) -> MaterialsApi<'_> {
        MaterialsApi { client: self }
    }
}

impl<'a> MaterialsApi<'a> {
    /// GET /v1/materials
    pub async fn list_materials<T, P>(&self, params: &P) -> ApiResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let builder = self.client.request(Method::GET, MATERIALS_PATH)?.query(&query_pairs(params)?);
        let response = self.client.execute(builder).await?;
        read_body(response).await
    }

    /// POST /v1/materials/upload as multipart/form-data
    pub async fn upload_material<T>(&self, form: MaterialForm, options: UploadOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let total = form.content.len() as u64;
        let body = progress_body(form.content, options.on_upload_progress.clone());

        let mut file = Part::stream_with_length(body, total).file_name(form.file_name);
        if let Some(mime) = &form.mime {
            file = file.mime_str(mime).map_err(|e| ApiError::InvalidMime {
                mime: mime.clone(),
                reason: e.to_string(),
            })?;
        }

        let mut multipart = Form::new().part("file", file);
        if let Some(metadata) = form.metadata {
            multipart = multipart.text("metadata", metadata);
        }

        let mut request = self
            .client
            .request(Method::POST, UPLOAD_PATH)?
            .multipart(multipart)
            .build()?;

        // Caller headers win over the fixed multipart content type
        for (name, value) in options.headers.iter() {
            request.headers_mut().insert(name.clone(), value.clone());
        }

        let response = self.client.dispatch(request).await?;
        read_body(response).await
    }

    /// DELETE /v1/materials/{id}
    pub async fn delete_material<T>(&self, material_id: impl fmt::Display) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("{}/{}", MATERIALS_PATH, material_id);
        let builder = self.client.request(Method::DELETE, &path)?;
        let response = self.client.execute(builder).await?;
        read_body(response).await
    }
}

/// Stream the file in chunks, reporting progress as the transport pulls each one
fn progress_body(content: Vec<u8>, on_progress: Option<ProgressCallback>) -> Body {
    let total = content.len() as u64;
    let chunks: Vec<Vec<u8>> = content.chunks(UPLOAD_CHUNK_SIZE).map(<[u8]>::to_vec).collect();

    let mut loaded = 0u64;
    let chunks = stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        if let Some(callback) = &on_progress {
            callback(UploadProgress { loaded, total });
        }
        Ok::<_, std::io::Error>(chunk)
    });

    Body::wrap_stream(chunks)
}

impl MaterialForm {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            mime: None,
            metadata: None,
        }
    }

    /// Read a file from disk, keeping its base name as the upload file name
    pub async fn from_path(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        Ok(Self::new(file_name, content))
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

impl UploadProgress {
    /// Fraction sent, 1.0 for an empty file
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f64 / self.total as f64
        }
    }
}

impl UploadOptions {
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn on_upload_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(UploadProgress) + Send + Sync + 'static,
    {
        self.on_upload_progress = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("headers", &self.headers)
            .field("on_upload_progress", &self.on_upload_progress.is_some())
            .finish()
    }
}
