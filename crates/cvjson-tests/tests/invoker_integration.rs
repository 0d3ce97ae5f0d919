//! Drives `OpenAiInvoker` against a local stand-in for the chat-completions API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use cvjson_core::{AppConfig, CvJsonError, Deadline, ExtractedText, ModelInvoker, PromptRequest};
use cvjson_extraction::{OpenAiInvoker, RetryingInvoker};

#[derive(Clone)]
struct Provider {
    /// Status codes to answer with before succeeding, in order.
    failures: Arc<Vec<u16>>,
    calls: Arc<AtomicUsize>,
    last_body: Arc<std::sync::Mutex<Option<(String, Value)>>>,
}

async fn chat_completions(
    State(provider): State<Provider>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let call = provider.calls.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    *provider.last_body.lock().unwrap() = Some((auth, body));

    if let Some(status) = provider.failures.get(call) {
        let status = StatusCode::from_u16(*status).unwrap();
        return (
            status,
            Json(json!({ "error": { "message": format!("scripted {}", status.as_u16()) } })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl-test",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "{\"employee\":{\"name\":\"Jane Doe\"}}" },
                "finish_reason": "stop"
            }]
        })),
    )
}

async fn spawn_provider(failures: Vec<u16>) -> (AppConfig, Provider) {
    let provider = Provider {
        failures: Arc::new(failures),
        calls: Arc::new(AtomicUsize::new(0)),
        last_body: Arc::new(std::sync::Mutex::new(None)),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(provider.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = AppConfig {
        openai_api_key: "sk-test".into(),
        openai_base_url: format!("http://{addr}/v1"),
        request_timeout_secs: 5,
        ..AppConfig::default()
    };
    (config, provider)
}

fn request() -> PromptRequest {
    PromptRequest::new(
        "Return JSON only.",
        &ExtractedText::from("Jane Doe"),
        "gpt-4o-mini",
        0.7,
        None,
    )
}

#[tokio::test]
async fn returns_first_choice_content() {
    let (config, provider) = spawn_provider(vec![]).await;
    let invoker = OpenAiInvoker::new(&config).unwrap();

    let reply = invoker
        .invoke(&request(), Some(Deadline::after(Duration::from_secs(5))))
        .await
        .expect("invocation should succeed");

    assert_eq!(reply.as_str(), r#"{"employee":{"name":"Jane Doe"}}"#);

    let (auth, body) = provider.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(auth, "Bearer sk-test");
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"][0]["content"], "Return JSON only.");
    assert_eq!(body["messages"][1]["role"], "user");
}

#[tokio::test]
async fn unauthorized_carries_status_and_provider_message() {
    let (config, _) = spawn_provider(vec![401]).await;
    let invoker = OpenAiInvoker::new(&config).unwrap();

    let err = invoker.invoke(&request(), None).await.unwrap_err();
    match err {
        CvJsonError::ModelInvocationFailed { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "scripted 401");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_retries_fails_once() {
    let (config, provider) = spawn_provider(vec![500]).await;
    let invoker = OpenAiInvoker::new(&config).unwrap();

    let err = invoker.invoke(&request(), None).await.unwrap_err();
    assert!(matches!(err, CvJsonError::ModelInvocationFailed { status: Some(500), .. }));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retrying_invoker_recovers_from_transient_errors() {
    let (config, provider) = spawn_provider(vec![503, 429]).await;
    let invoker = RetryingInvoker::new(
        OpenAiInvoker::new(&config).unwrap(),
        2,
        Duration::from_millis(10),
    );

    let reply = invoker.invoke(&request(), None).await.unwrap();
    assert!(reply.as_str().contains("Jane Doe"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unreachable_provider_is_invocation_failure() {
    let config = AppConfig {
        openai_api_key: "sk-test".into(),
        // Port 9 (discard) on loopback is not expected to be listening.
        openai_base_url: "http://127.0.0.1:9/v1".into(),
        request_timeout_secs: 2,
        ..AppConfig::default()
    };
    let invoker = OpenAiInvoker::new(&config).unwrap();

    let err = invoker.invoke(&request(), None).await.unwrap_err();
    assert!(matches!(err, CvJsonError::ModelInvocationFailed { status: None, .. }));
}
