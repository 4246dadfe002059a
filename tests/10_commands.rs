mod common;

use std::time::Duration;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;
use signage_admin::api::{CommandList, CommandListParams, CommandPayload};
use signage_admin::ApiError;

#[tokio::test]
async fn send_command_posts_json_and_returns_full_wrapper() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;
    let client = mock.client();

    let payload = CommandPayload::new("set_volume", "dev-01")
        .with_cmd_id("c-42")
        .with_field("volume", json!(40));

    let response = client.commands().send_command(&payload).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.contains_key("content-type"));
    assert_eq!(response.data["status"], "success");
    assert_eq!(response.data["cmd_id"], "c-42");

    let request = mock.single_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/v1/commands");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(
        request.json(),
        json!({ "action": "set_volume", "target_device_id": "dev-01", "cmd_id": "c-42", "volume": 40 })
    );
    Ok(())
}

#[tokio::test]
async fn send_command_forwards_arbitrary_payload_verbatim() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;

    let payload = json!({ "action": "capture", "target_device_id": "dev-07", "nested": { "quality": [1, 2] } });
    let response = mock.client().commands().send_command(&payload).await?;

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(mock.single_request().json(), payload);
    Ok(())
}

#[tokio::test]
async fn list_commands_forwards_query_and_returns_wrapper() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;

    let response = mock
        .client()
        .commands()
        .list_commands(&CommandListParams { limit: Some(5) })
        .await?;

    assert_eq!(response.status, StatusCode::OK);
    let list: CommandList = response.into_data()?;
    assert_eq!(list.total, 1);
    assert_eq!(list.items[0].cmd_id, "c-1");

    let request = mock.single_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/api/v1/commands");
    assert_eq!(request.query.as_deref(), Some("limit=5"));
    assert!(request.body.is_empty());
    Ok(())
}

#[tokio::test]
async fn list_commands_without_params_sends_no_query() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;

    mock.client().commands().list_commands(&CommandListParams::default()).await?;

    assert_eq!(mock.single_request().query, None);
    Ok(())
}

#[tokio::test]
async fn list_commands_drops_null_params() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;

    mock.client()
        .commands()
        .list_commands(&json!({ "page": 1, "device_id": null }))
        .await?;

    let request = mock.single_request();
    assert_eq!(request.query.as_deref(), Some("page=1"));
    Ok(())
}

#[tokio::test]
async fn list_commands_repeats_array_params() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;

    mock.client()
        .commands()
        .list_commands(&json!({ "tags": ["a", "b"] }))
        .await?;

    assert_eq!(
        mock.single_request().query_pairs(),
        vec![
            ("tags[]".to_string(), "a".to_string()),
            ("tags[]".to_string(), "b".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn list_commands_rejects_scalar_params_before_sending() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;

    let err = mock.client().commands().list_commands(&json!(5)).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidParams(_)), "got {:?}", err);
    assert!(mock.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn list_commands_accepts_plain_text_body() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;

    let response = mock
        .client_at("/plain")
        .commands()
        .list_commands(&CommandListParams::default())
        .await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data, json!("OK"));
    Ok(())
}

#[tokio::test]
async fn server_error_propagates_with_status_and_body() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;

    let err = mock
        .client()
        .commands()
        .send_command(&CommandPayload::new("explode", "dev-01"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.body().unwrap()["detail"], "gateway unreachable");
    assert!(matches!(err, ApiError::Status { .. }));
    assert_eq!(mock.requests().len(), 1, "no retries");
    Ok(())
}

#[tokio::test]
async fn slow_server_surfaces_timeout() -> Result<()> {
    let mock = common::MockControlPlane::start().await?;
    let client = mock.client_with(Duration::from_millis(200), Vec::new());

    let err = client
        .commands()
        .send_command(&CommandPayload::new("hang", "dev-01"))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
    Ok(())
}
