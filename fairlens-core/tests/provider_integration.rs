//! Integration tests for configuration layering and provider construction.

use fairlens_core::config::{WORKSPACE_CONFIG_DIR, workspace_config_path};
use fairlens_core::{
    CompletionRequest, FairlensConfig, LlmConfig, LlmError, LlmProvider, MockLlmProvider,
    ResponseFormat, create_provider, load_config,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;

fn write_workspace_config(dir: &std::path::Path, content: &str) {
    fs::create_dir_all(dir.join(WORKSPACE_CONFIG_DIR)).unwrap();
    fs::write(workspace_config_path(dir), content).unwrap();
}

#[test]
fn test_workspace_config_drives_provider() {
    let dir = tempfile::tempdir().unwrap();
    write_workspace_config(
        dir.path(),
        r#"
[llm]
provider = "gemini"
model = "gemini-2.5-pro"
api_key_env = "FAIRLENS_TEST_UNUSED_KEY"
api_key = "from-file"
max_tokens = 2048
timeout_secs = 30
"#,
    );

    let config = load_config(Some(dir.path()), None).unwrap();
    assert_eq!(config.llm.model, "gemini-2.5-pro");
    assert_eq!(config.llm.max_tokens, 2048);
    assert!(config.llm.validate().is_empty());

    let provider = create_provider(&config.llm).unwrap();
    assert_eq!(provider.model_name(), "gemini-2.5-pro");
    assert!(provider.supports_response_schema());
}

#[test]
fn test_overrides_beat_workspace_file() {
    let dir = tempfile::tempdir().unwrap();
    write_workspace_config(dir.path(), "[llm]\nmodel = \"from-file\"\n");

    let overrides = FairlensConfig {
        llm: LlmConfig {
            model: "from-override".into(),
            ..Default::default()
        },
    };
    let config = load_config(Some(dir.path()), Some(&overrides)).unwrap();
    assert_eq!(config.llm.model, "from-override");
}

#[test]
fn test_unsupported_provider_is_rejected() {
    let config = LlmConfig {
        provider: "carrier-pigeon".into(),
        api_key: Some("k".into()),
        ..Default::default()
    };
    match create_provider(&config) {
        Err(LlmError::UnsupportedProvider { provider }) => assert_eq!(provider, "carrier-pigeon"),
        other => panic!("expected UnsupportedProvider, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_connection_error() {
    let config = LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some("http://127.0.0.1:9".into()),
        timeout_secs: 5,
        ..Default::default()
    };
    let provider = create_provider(&config).unwrap();
    let request = CompletionRequest::from_prompt("hello", 0.1)
        .with_response_format(ResponseFormat::json(serde_json::json!({"type": "OBJECT"})));
    let err = provider.complete(request).await.unwrap_err();
    assert!(
        matches!(err, LlmError::Connection { .. } | LlmError::Timeout { .. }),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_mock_provider_behind_trait_object() {
    let mock = Arc::new(MockLlmProvider::with_response("{\"concept\": \"nurse\"}"));
    let provider: Arc<dyn LlmProvider> = mock.clone();

    let response = provider
        .complete(CompletionRequest::from_prompt("Extract", 0.1))
        .await
        .unwrap();
    assert_eq!(response.text(), "{\"concept\": \"nurse\"}");

    let err = provider
        .complete(CompletionRequest::from_prompt("Again", 0.1))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ApiRequest { .. }));
    assert_eq!(mock.recorded_requests().len(), 2);
}
