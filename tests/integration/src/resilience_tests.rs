//! Retry and cancellation tests
//!
//! Transient failures are retried with backoff; the caller's context can
//! abandon a call at any point.

use crate::fixtures::*;
use crate::mock_service::*;
use std::time::Duration;
use together_sdk::{
    ChatCompletionsRequest, Context, EmbeddingsRequest, ErrorKind, RetryConfig, TransportError,
};

/// 503s are retried until the server recovers
#[tokio::test]
async fn test_retries_unavailable_then_succeeds() {
    let mock = MockTogether::new().await;
    mock.mock_failures("POST", "/v1/chat/completions", 503, 2)
        .await;
    mock.mock_chat_completion("recovered").await;
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

    assert_eq!(response.content(), "recovered");
    assert_eq!(mock.request_count().await, 3);
}

/// Rate limiting is transient too
#[tokio::test]
async fn test_retries_rate_limit() {
    let mock = MockTogether::new().await;
    mock.mock_failures("POST", "/embeddings", 429, 1).await;
    mock.mock_embeddings(2).await;
    let client = mock.client();
    let ctx = Context::background();

    let response = client
        .embeddings(Some(&ctx), MODEL, "text", EmbeddingsRequest::default())
        .await
        .unwrap();

    assert_eq!(response.first_embedding().len(), 2);
    assert_eq!(mock.request_count().await, 2);
}

/// 501 is final: one attempt, surfaced as a remote error
#[tokio::test]
async fn test_not_implemented_is_not_retried() {
    let mock = MockTogether::new().await;
    mock.mock_raw("GET", "/instances", 501, "not implemented")
        .await;
    let client = mock.client();
    let ctx = Context::background();

    let err = client.list_running_instances(Some(&ctx)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.status_code(), Some(501));
    assert_eq!(mock.request_count().await, 1);
}

/// A server that never recovers exhausts `max_retries + 1` attempts
#[tokio::test]
async fn test_persistent_failure_exhausts_retries() {
    let mock = MockTogether::new().await;
    mock.mock_raw("POST", "/v1/chat/completions", 500, "boom")
        .await;
    let client = mock.client_builder().max_retries(2).build().unwrap();
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

    assert_eq!(err.kind(), ErrorKind::Transport);
    match err {
        together_sdk::Error::Transport(TransportError::RetriesExhausted { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, TransportError::Status(s) if s.as_u16() == 500));
        }
        other => panic!("expected exhausted retries, got {other:?}"),
    }
    assert_eq!(mock.request_count().await, 3);
}

/// Zero retries means exactly one attempt
#[tokio::test]
async fn test_zero_retries_single_attempt() {
    let mock = MockTogether::new().await;
    mock.mock_raw("POST", "/v1/chat/completions", 502, "bad gateway")
        .await;
    let client = mock
        .client_builder()
        .retry(RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        })
        .build()
        .unwrap();
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

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(mock.request_count().await, 1);
}

/// A deadline aborts a slow in-flight request
#[tokio::test]
async fn test_deadline_aborts_slow_response() {
    let mock = MockTogether::new().await;
    mock.mock_slow_chat_completion(Duration::from_secs(5)).await;
    let client = mock.client();
    let ctx = Context::background().with_timeout(Duration::from_millis(100));

    let started = std::time::Instant::now();
    let err = client
        .chat_completions(
            Some(&ctx),
            MODEL,
            hello_messages(),
            ChatCompletionsRequest::default(),
        )
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(matches!(
        err,
        together_sdk::Error::Transport(TransportError::DeadlineExceeded)
    ));
    assert!(started.elapsed() < Duration::from_secs(2));
}

/// Cancelling from another task stops a pending backoff
#[tokio::test]
async fn test_cancel_during_backoff() {
    let mock = MockTogether::new().await;
    mock.mock_raw("POST", "/v1/chat/completions", 503, "busy")
        .await;
    let client = mock
        .client_builder()
        .retry_initial_delay(Duration::from_secs(30))
        .retry_max_delay(Duration::from_secs(30))
        .build()
        .unwrap();
    let ctx = Context::background().with_cancel();

    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let err = client
        .chat_completions(
            Some(&ctx),
            MODEL,
            hello_messages(),
            ChatCompletionsRequest::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        together_sdk::Error::Transport(TransportError::Cancelled)
    ));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(mock.request_count().await, 1);
}

/// Cancelling one call leaves its siblings alone
#[tokio::test]
async fn test_cancel_is_scoped_to_one_call() {
    let mock = MockTogether::new().await;
    mock.mock_chat_completion("ok").await;
    let client = mock.client();
    let root = Context::background();

    let cancelled = root.with_cancel();
    cancelled.cancel();
    let sibling = root.with_cancel();

    let err = client
        .chat_completions(
            Some(&cancelled),
            MODEL,
            hello_messages(),
            ChatCompletionsRequest::default(),
        )
        .await
        .unwrap_err();
    let response = client
        .chat_completions(
            Some(&sibling),
            MODEL,
            hello_messages(),
            ChatCompletionsRequest::default(),
        )
        .await
        .unwrap();

    assert!(err.is_cancelled());
    assert_eq!(response.content(), "ok");
    assert!(!root.is_cancelled());
    assert_eq!(mock.request_count().await, 1);
}
