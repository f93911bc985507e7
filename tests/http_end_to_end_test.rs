//! End-to-end tests over real HTTP using wiremock.
//!
//! These drive `ChatClient` with the reqwest transport against a local mock
//! of the chat-agent endpoint.

mod common;

use common::*;
use docchat::adapters::mock::RecordingRenderSink;
use docchat::error::{ChatError, RequestError, EXCHANGE_FAILED_MESSAGE};
use docchat::state::{lock_session, ExchangeOutcome, ExchangePhase};
use docchat::{ChatClient, Submission};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint_path() -> String {
    format!("/teams/{}/bots/{}/chat-agent", TEAM_ID, BOT_ID)
}

#[tokio::test]
async fn test_streamed_answer_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint_path()))
        .and(header("Accept", "text/event-stream"))
        .and(body_partial_json(serde_json::json!({
            "question": "[Product: X] hi",
            "stream": true,
            "full_source": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(HI_THERE_STREAM, "text/event-stream"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ChatClient::new(test_config(&mock_server.uri()));
    let session = new_session();
    let sink = RecordingRenderSink::new();

    let result = client.submit(&session, "[Product: X] hi", &sink).await;
    assert!(
        matches!(result, Ok(Submission::Completed(_))),
        "Expected Completed, got {:?}",
        result
    );

    let guard = lock_session(&session);
    let last = guard.transcript().last().unwrap();
    assert_eq!(last.content, "Hi there!");
    assert_eq!(last.sources.len(), 1);
    assert_eq!(last.sources[0].url.as_deref(), Some("http://x"));
    assert_eq!(guard.phase(), ExchangePhase::Idle);
    assert_eq!(guard.last_outcome(), Some(ExchangeOutcome::Completed));
}

#[tokio::test]
async fn test_conversation_id_is_stable_across_questions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint_path()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LEGACY_STREAM, "text/event-stream"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = ChatClient::new(test_config(&mock_server.uri()));
    let session = new_session();
    let sink = RecordingRenderSink::new();

    client.submit(&session, "first", &sink).await.unwrap();
    client.submit(&session, "second", &sink).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let ids: Vec<serde_json::Value> = requests
        .iter()
        .map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).unwrap()["conversationId"].clone())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], ids[1]);
    assert_eq!(ids[0], lock_session(&session).conversation_id());

    assert_eq!(lock_session(&session).transcript().len(), 4);
}

#[tokio::test]
async fn test_server_error_fails_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let client = ChatClient::new(test_config(&mock_server.uri()));
    let session = new_session();
    let sink = RecordingRenderSink::new();

    let err = client.submit(&session, "hi", &sink).await.unwrap_err();
    assert_eq!(err.error_code(), "E_REQ_STATUS");
    match &err {
        ChatError::Request(RequestError::HttpStatus { status, message }) => {
            assert_eq!(*status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("Expected HttpStatus, got {:?}", other),
    }

    assert_eq!(sink.failures(), vec![EXCHANGE_FAILED_MESSAGE.to_string()]);

    let guard = lock_session(&session);
    assert_eq!(guard.phase(), ExchangePhase::Idle);
    assert_eq!(guard.last_outcome(), Some(ExchangeOutcome::Failed));
    // Only the question; no bot turn was started
    assert_eq!(guard.transcript().len(), 1);
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let client = ChatClient::new(test_config("http://127.0.0.1:1"));
    let session = new_session();
    let sink = RecordingRenderSink::new();

    let err = client.submit(&session, "hi", &sink).await.unwrap_err();
    assert!(err.is_exchange_failure());
    assert!(lock_session(&session).can_submit());
    assert_eq!(sink.failures().len(), 1);
}
