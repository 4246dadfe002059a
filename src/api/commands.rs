use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::client::{query_pairs, ApiClient, ApiResponse};
use crate::error::ApiResult;

pub const COMMANDS_PATH: &str = "/v1/commands";

/// Device command wrappers. Both calls hand back the full response wrapper.
pub struct CommandsApi<'a> {
    client: &'a ApiClient,
}

/// Command dispatched to a device, e.g. `capture` or `reboot`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub action: String,
    pub target_device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd_id: Option<String>,
    /// Action-specific fields forwarded alongside the standard ones
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub cmd_id: String,
    pub device_id: Option<String>,
    pub action: Option<String>,
    pub status: String,
    pub send_ts: i64,
    pub result: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandList {
    pub items: Vec<CommandRecord>,
    pub total: u64,
}

impl ApiClient {
    pub fn commands(&self) -> CommandsApi<'_> {
        CommandsApi { client: self }
    }
}

impl<'a> CommandsApi<'a> {
    /// POST /v1/commands
    pub async fn send_command<B>(&self, payload: &B) -> ApiResult<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.client.request(Method::POST, COMMANDS_PATH)?.json(payload);
        let response = self.client.execute(builder).await?;
        ApiResponse::from_response(response).await
    }

    /// GET /v1/commands
    pub async fn list_commands<P>(&self, params: &P) -> ApiResult<ApiResponse>
    where
        P: Serialize + ?Sized,
    {
        let builder = self.client.request(Method::GET, COMMANDS_PATH)?.query(&query_pairs(params)?);
        let response = self.client.execute(builder).await?;
        ApiResponse::from_response(response).await
    }
}

impl CommandPayload {
    pub fn new(action: impl Into<String>, target_device_id: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            target_device_id: target_device_id.into(),
            cmd_id: None,
            extra: Map::new(),
        }
    }

    pub fn with_cmd_id(mut self, cmd_id: impl Into<String>) -> Self {
        self.cmd_id = Some(cmd_id.into());
        self
    }

    /// Assign a fresh v4 id so the caller can correlate the command later
    pub fn with_generated_id(self) -> Self {
        self.with_cmd_id(Uuid::new_v4().to_string())
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl CommandRecord {
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.send_ts, 0)
    }
}
