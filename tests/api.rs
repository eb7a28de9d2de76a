use serde_json::{json, Map, Value};
use web_tools::client::ApiClient;
use web_tools::config::Config;
use web_tools::models::{AppSettings, Theme, ToolRequest};
use web_tools::server::{create_router, AppState};

/// Boot the real router on an ephemeral port and return a client for it.
async fn spawn_server() -> ApiClient {
    let config = Config::default();
    let state = AppState::new(&config);
    let router = create_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    ApiClient::new(format!("http://{}/api", addr))
}

fn request_with_mode(input: &str, mode: &str) -> ToolRequest {
    let mut settings = Map::new();
    settings.insert("mode".to_string(), Value::String(mode.to_string()));
    ToolRequest {
        input: input.to_string(),
        settings,
    }
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let client = spawn_server().await;

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert!(!health.timestamp.is_empty());
}

#[tokio::test]
async fn tool_catalog_is_served() {
    let client = spawn_server().await;

    let tools = client.list_tools().await.unwrap();
    assert!(tools.iter().any(|t| t.id == "base64"));
    assert!(tools.iter().any(|t| t.id == "protobuf"));

    let tool = client.get_tool("json").await.unwrap();
    assert_eq!(tool.name, "JSON Formatter/Validator");
}

#[tokio::test]
async fn unknown_tool_surfaces_the_error_field() {
    let client = spawn_server().await;

    let err = client.get_tool("nonexistent").await.unwrap_err();
    assert_eq!(err.to_string(), "Tool not found");

    let err = client
        .process_tool("nonexistent", &ToolRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Tool not found");
}

#[tokio::test]
async fn base64_round_trip_over_the_wire() {
    let client = spawn_server().await;

    let encoded = client
        .process_tool("base64", &request_with_mode("hello", "encode"))
        .await
        .unwrap();
    assert_eq!(encoded.output, "aGVsbG8=");
    assert!(encoded.error.is_none());

    let decoded = client
        .process_tool("base64", &request_with_mode("aGVsbG8=", "decode"))
        .await
        .unwrap();
    assert_eq!(decoded.output, "hello");
}

#[tokio::test]
async fn tool_failures_are_soft_errors_not_http_errors() {
    let client = spawn_server().await;

    let response = client
        .process_tool("json", &request_with_mode("{broken", "format"))
        .await
        .unwrap();
    assert!(response.output.is_empty());
    assert!(response.error.unwrap().starts_with("Invalid JSON:"));
}

#[tokio::test]
async fn settings_round_trip() {
    let client = spawn_server().await;

    let initial = client.get_settings().await.unwrap();
    assert_eq!(initial, AppSettings::default());

    let mut settings = AppSettings::default();
    settings.theme = Theme::Dark;
    settings.language = "de".to_string();

    let message = client.update_settings(&settings).await.unwrap();
    assert_eq!(message.message, "Settings updated successfully");

    let stored = client.get_settings().await.unwrap();
    assert_eq!(stored, settings);
}

#[tokio::test]
async fn history_records_successful_runs_only() {
    let client = spawn_server().await;

    client
        .process_tool("base64", &request_with_mode("hello", "encode"))
        .await
        .unwrap();
    client
        .process_tool("json", &request_with_mode("{broken", "format"))
        .await
        .unwrap();

    let history_url = format!("{}/history", client.base_url());
    let entries: Vec<Value> = reqwest::get(&history_url).await.unwrap().json().await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["tool_id"], "base64");
    assert_eq!(entries[0]["output"], "aGVsbG8=");
}

#[tokio::test]
async fn history_is_not_recorded_when_disabled() {
    let client = spawn_server().await;

    let mut settings = AppSettings::default();
    settings.tool_history = false;
    client.update_settings(&settings).await.unwrap();

    client
        .process_tool("url", &request_with_mode("a b", "encode"))
        .await
        .unwrap();

    let history_url = format!("{}/history", client.base_url());
    let entries: Vec<Value> = reqwest::get(&history_url).await.unwrap().json().await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn malformed_process_body_is_rejected() {
    let client = spawn_server().await;

    let url = format!("{}/tools/base64/process", client.base_url());
    let response = reqwest::Client::new()
        .post(&url)
        .header("content-type", "application/json")
        .body(json!({"bogus": true}).to_string())
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
