//! End-to-end scenarios
//!
//! Each test drives one public operation against the mock service and checks
//! both the returned value and what reached the wire.

use crate::fixtures::*;
use crate::mock_service::*;
use pretty_assertions::assert_eq;
use together_sdk::{
    ChatCompletionsRequest, ChatCompletionsResponse, Client, CompletionsRequest, Context,
    EmbeddingsRequest, ErrorKind,
};

/// Empty message list is rejected before anything is sent
#[tokio::test]
async fn test_empty_messages_sends_nothing() {
    let mock = MockTogether::new().await;
    mock.mock_chat_completion("unused").await;
    let client = mock.client();
    let ctx = Context::background();

    let err = client
        .chat_completions(Some(&ctx), MODEL, Vec::new(), ChatCompletionsRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("messages"));
    assert_eq!(mock.request_count().await, 0);
}

/// A 200 with a non-JSON body is a decode error
#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mock = MockTogether::new().await;
    mock.mock_raw("POST", "/v1/chat/completions", 200, "not json")
        .await;
    let client = mock.client();
    let ctx = Context::background();

    let err = client
        .chat_completions(
            Some(&ctx),
            MODEL,
            hello_messages(),
            ChatCompletionsRequest::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(mock.request_count().await, 1);
}

/// A 400 is a remote error carrying the body verbatim
#[tokio::test]
async fn test_bad_request_is_remote_error() {
    let mock = MockTogether::new().await;
    mock.mock_raw(
        "POST",
        "/v1/chat/completions",
        400,
        "model `a` is not available",
    )
    .await;
    let client = mock.client();
    let ctx = Context::background();

    let err = client
        .chat_completions(
            Some(&ctx),
            MODEL,
            hello_messages(),
            ChatCompletionsRequest::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.status_code(), Some(400));
    assert!(err.to_string().contains("model `a` is not available"));
    // Client errors are not retried.
    assert_eq!(mock.request_count().await, 1);
}

/// Structured error bodies stay opaque text
#[tokio::test]
async fn test_json_error_body_is_kept_verbatim() {
    let mock = MockTogether::new().await;
    let body = error_json_response("Input validation error");
    mock.mock_json("POST", "/v1/completions", 422, body.clone())
        .await;
    let client = mock.client();
    let ctx = Context::background();

    let err = client
        .completions(Some(&ctx), MODEL, "p", 8, CompletionsRequest::default())
        .await
        .unwrap_err();

    match err {
        together_sdk::Error::Remote { status, body: text } => {
            assert_eq!(status, 422);
            let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(parsed, body);
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

/// An empty JSON object decodes to the default response
#[tokio::test]
async fn test_empty_object_is_default_response() {
    let mock = MockTogether::new().await;
    mock.mock_raw("POST", "/v1/chat/completions", 200, "{}").await;
    let client = mock.client();
    let ctx = Context::background();

    let response = client
        .chat_completions(
            Some(&ctx),
            MODEL,
            hello_messages(),
            ChatCompletionsRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(response, ChatCompletionsResponse::default());
}

/// `max_tokens = 0` fails even with no server at all
#[tokio::test]
async fn test_zero_max_tokens_without_server() {
    let client = Client::builder()
        .api_key(API_KEY)
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();
    let ctx = Context::background();

    let err = client
        .completions(Some(&ctx), MODEL, "Once upon a time", 0, CompletionsRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("max_tokens"));
}

/// Every operation refuses to run without a context
#[tokio::test]
async fn test_missing_context_sends_nothing() {
    let mock = MockTogether::new().await;
    let client = mock.client();

    let errors = vec![
        client
            .completions(None, MODEL, "p", 8, CompletionsRequest::default())
            .await
            .unwrap_err(),
        client
            .chat_completions(None, MODEL, hello_messages(), ChatCompletionsRequest::default())
            .await
            .unwrap_err(),
        client
            .embeddings(None, MODEL, "text", EmbeddingsRequest::default())
            .await
            .unwrap_err(),
        client.list_running_instances(None).await.unwrap_err(),
        client
            .start_fine_tuned_instance(None, "user/model")
            .await
            .unwrap_err(),
        client
            .stop_fine_tuned_instance(None, "user/model")
            .await
            .unwrap_err(),
    ];

    for err in errors {
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("no context provided"));
    }
    assert_eq!(mock.request_count().await, 0);
}

/// The first failing argument decides the error
#[tokio::test]
async fn test_validation_reports_first_failure() {
    let mock = MockTogether::new().await;
    let client = mock.client();
    let ctx = Context::background();

    let err = client
        .completions(Some(&ctx), "", "", 0, CompletionsRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("model"));

    let err = client
        .completions(Some(&ctx), MODEL, "", 0, CompletionsRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("prompt"));

    let err = client
        .chat_completions(Some(&ctx), "", Vec::new(), ChatCompletionsRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("messages"));

    let err = client
        .chat_completions(Some(&ctx), "", hello_messages(), ChatCompletionsRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("model"));

    let err = client
        .embeddings(Some(&ctx), "", "", EmbeddingsRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("model"));

    let err = client
        .start_fine_tuned_instance(Some(&ctx), "")
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("name"));

    assert_eq!(mock.request_count().await, 0);
}
