//! End-to-end tests against a mockito server standing in for the Responses API.

use ai_lib_responses::error::DecodeTarget;
use ai_lib_responses::transport::TransportError;
use ai_lib_responses::{
    Effort, Error, GenerationOptions, JobRequest, JobStatus, Prompt, ResponsesClient,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use mockito::{Matcher, Server, ServerGuard};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Deserialize, PartialEq)]
struct Reply {
    response: String,
}

fn client(server: &ServerGuard) -> ResponsesClient {
    ResponsesClient::builder()
        .api_key("sk-test")
        .base_url(format!("{}/v1", server.url()))
        .poll(Duration::from_millis(10), Duration::from_secs(5))
        .build()
        .expect("client")
}

fn reply_schema() -> Map<String, Value> {
    json!({"response": {"type": "string"}})
        .as_object()
        .cloned()
        .unwrap()
}

fn envelope(id: &str, status: &str, text: Option<&str>) -> String {
    let output = match text {
        Some(t) => json!([
            {"type": "reasoning", "id": "rs_1", "summary": []},
            {"type": "message", "role": "assistant", "content": [{"type": "output_text", "text": t, "annotations": []}]}
        ]),
        None => json!([]),
    };
    json!({
        "id": id,
        "object": "response",
        "status": status,
        "model": "gpt-5-mini-2025-08-07",
        "temperature": 1.0,
        "reasoning": {"effort": "low", "summary": null},
        "output": output,
        "usage": {
            "input_tokens": 100,
            "input_tokens_details": {"cached_tokens": 0},
            "output_tokens": 50,
            "output_tokens_details": {"reasoning_tokens": 32},
            "total_tokens": 150
        },
        "error": null
    })
    .to_string()
}

#[tokio::test]
async fn test_completed_on_submit_is_not_polled() {
    let mut server = Server::new_async().await;
    let post = server
        .mock("POST", "/v1/responses")
        .match_header("authorization", "Bearer sk-test")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-5-mini",
            "background": true,
            "store": true,
            "tool_choice": "auto",
            "text": {"format": {"type": "json_schema", "name": "structured_output", "strict": true}}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope("resp_1", "completed", Some(r#"{"response":"hello"}"#)))
        .expect(1)
        .create_async()
        .await;
    let get = server
        .mock("GET", Matcher::Regex(r"^/v1/responses/.*$".to_string()))
        .expect(0)
        .create_async()
        .await;

    let generation = client(&server)
        .generate_structured::<Reply>(&Prompt::new("hi"), reply_schema(), &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(generation.output, Reply { response: "hello".into() });
    assert_eq!(generation.raw_text, r#"{"response":"hello"}"#);
    let meta = &generation.metadata;
    assert_eq!(meta.response_id, "resp_1");
    assert_eq!(meta.model, "gpt-5-mini");
    assert_eq!(meta.model_snapshot, "2025-08-07");
    assert_eq!(meta.reasoning_effort.as_deref(), Some("low"));
    assert_eq!((meta.tokens_in, meta.tokens_out, meta.tokens_total), (100, 50, 150));
    assert_eq!(meta.tokens_reasoning, 32);
    assert_eq!(meta.response_logs_url, "https://platform.openai.com/logs/resp_1");

    post.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn test_backgrounded_job_is_polled_until_completed() {
    let mut server = Server::new_async().await;
    let _post = server
        .mock("POST", "/v1/responses")
        .with_status(200)
        .with_body(envelope("resp_2", "queued", None))
        .create_async()
        .await;
    let pending = server
        .mock("GET", "/v1/responses/resp_2")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_body(envelope("resp_2", "in_progress", None))
        .expect(2)
        .create_async()
        .await;
    let done = server
        .mock("GET", "/v1/responses/resp_2")
        .with_status(200)
        .with_body(envelope("resp_2", "completed", Some(r#"{"response":"later"}"#)))
        .expect(1)
        .create_async()
        .await;

    let generation = client(&server)
        .generate_structured::<Reply>(&Prompt::new("hi"), reply_schema(), &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(generation.output.response, "later");
    assert_eq!(generation.metadata.status, JobStatus::Completed);
    pending.assert_async().await;
    done.assert_async().await;
}

#[tokio::test]
async fn test_failed_job_carries_vendor_error() {
    let mut server = Server::new_async().await;
    let _post = server
        .mock("POST", "/v1/responses")
        .with_status(200)
        .with_body(envelope("resp_3", "in_progress", None))
        .create_async()
        .await;
    let failed = json!({
        "id": "resp_3",
        "status": "failed",
        "model": "gpt-5-mini",
        "output": [],
        "usage": {"input_tokens": 7, "output_tokens": 0, "total_tokens": 7},
        "error": {"code": "server_error", "message": "The model failed to generate a response."}
    });
    let _get = server
        .mock("GET", "/v1/responses/resp_3")
        .with_status(200)
        .with_body(failed.to_string())
        .create_async()
        .await;

    let request = JobRequest::new("gpt-5-mini", Effort::Low).user_content("hi");
    let err = client(&server).run(&request).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(err.job_id(), Some("resp_3"));
    match err {
        Error::JobFailed { status, payload, metadata, .. } => {
            assert_eq!(status, JobStatus::Failed);
            assert_eq!(payload.unwrap()["code"], "server_error");
            let meta = metadata.expect("failed job keeps its run metadata");
            assert_eq!(meta.response_id, "resp_3");
            assert_eq!(meta.status, JobStatus::Failed);
            assert_eq!(meta.model, "gpt-5-mini");
            assert_eq!(meta.tokens_in, 7);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_polling_deadline_times_out() {
    let mut server = Server::new_async().await;
    let _post = server
        .mock("POST", "/v1/responses")
        .with_status(200)
        .with_body(envelope("resp_4", "in_progress", None))
        .create_async()
        .await;
    let _get = server
        .mock("GET", "/v1/responses/resp_4")
        .with_status(200)
        .with_body(envelope("resp_4", "in_progress", None))
        .create_async()
        .await;

    let client = ResponsesClient::builder()
        .api_key("sk-test")
        .base_url(format!("{}/v1", server.url()))
        .poll(Duration::from_millis(10), Duration::from_millis(50))
        .build()
        .unwrap();
    let request = JobRequest::new("gpt-5-mini", Effort::Low).user_content("hi");
    let err = client.run(&request).await.unwrap_err();

    match &err {
        Error::Timeout { job_id, last_status, waited } => {
            assert_eq!(job_id, "resp_4");
            assert_eq!(*last_status, JobStatus::InProgress);
            assert!(*waited >= Duration::from_millis(50));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.terminal_status(), Some(JobStatus::Timeout));
}

#[tokio::test]
async fn test_non_success_status_surfaces_body() {
    let mut server = Server::new_async().await;
    let body = r#"{"error":{"message":"Invalid schema for response_format","type":"invalid_request_error"}}"#;
    let _post = server
        .mock("POST", "/v1/responses")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let request = JobRequest::new("gpt-5-mini", Effort::Low).user_content("hi");
    let err = client(&server).submit(&request).await.unwrap_err();

    match err {
        Error::Transport(TransportError::Status { status, body: got, url, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(got, body);
            assert!(url.ends_with("/v1/responses"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_gzip_body_is_decoded() {
    let mut server = Server::new_async().await;
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(envelope("resp_5", "completed", Some(r#"{"response":"zipped"}"#)).as_bytes())
        .unwrap();
    let gz = enc.finish().unwrap();

    let _post = server
        .mock("POST", "/v1/responses")
        .match_header("accept-encoding", "gzip, deflate, br")
        .with_status(200)
        .with_header("content-encoding", "gzip")
        .with_body(gz)
        .create_async()
        .await;

    let generation = client(&server)
        .generate_structured::<Reply>(&Prompt::new("hi"), reply_schema(), &GenerationOptions::default())
        .await
        .unwrap();
    assert_eq!(generation.output.response, "zipped");
}

#[tokio::test]
async fn test_undecodable_gzip_body_keeps_raw_excerpt() {
    let mut server = Server::new_async().await;
    let _post = server
        .mock("POST", "/v1/responses")
        .with_status(200)
        .with_header("content-encoding", "gzip")
        .with_body("upstream proxy error: plain text")
        .create_async()
        .await;

    let request = JobRequest::new("gpt-5-mini", Effort::Low).user_content("hi");
    let err = client(&server).submit(&request).await.unwrap_err();

    match err {
        Error::Transport(TransportError::Body { encoding, raw_excerpt, url, .. }) => {
            assert_eq!(encoding, "gzip");
            assert_eq!(raw_excerpt, "upstream proxy error: plain text");
            assert!(url.ends_with("/v1/responses"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_output_outside_schema_is_rejected() {
    let mut server = Server::new_async().await;
    let raw = r#"{"response":"hi","confidence":0.9}"#;
    let _post = server
        .mock("POST", "/v1/responses")
        .with_status(200)
        .with_body(envelope("resp_6", "completed", Some(raw)))
        .create_async()
        .await;

    let err = client(&server)
        .generate_structured::<Reply>(&Prompt::new("hi"), reply_schema(), &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(!err.is_retryable());
    match err {
        Error::SchemaViolation { raw: got, violations, metadata, .. } => {
            assert_eq!(got, raw);
            assert!(!violations.is_empty());
            assert_eq!(metadata.map(|m| m.tokens_total), Some(150));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_output_is_an_output_decode_error() {
    let mut server = Server::new_async().await;
    let _post = server
        .mock("POST", "/v1/responses")
        .with_status(200)
        .with_body(envelope("resp_7", "completed", Some("Sure! The answer is 42.")))
        .create_async()
        .await;

    let client = ResponsesClient::builder()
        .api_key("sk-test")
        .base_url(format!("{}/v1", server.url()))
        .validate_output(false)
        .build()
        .unwrap();
    let err = client
        .generate_structured::<Reply>(&Prompt::new("hi"), reply_schema(), &GenerationOptions::default())
        .await
        .unwrap_err();

    let meta = err.metadata().expect("decode failure keeps run metadata");
    assert_eq!(meta.response_id, "resp_7");
    assert_eq!((meta.tokens_in, meta.tokens_out, meta.tokens_total), (100, 50, 150));
    assert_eq!(meta.model_snapshot, "2025-08-07");
    assert!(meta.finished_at >= meta.started_at);

    match err {
        Error::Decode { target, raw, context, .. } => {
            assert_eq!(target, DecodeTarget::Output);
            assert_eq!(raw, "Sure! The answer is 42.");
            assert_eq!(context.job_id.as_deref(), Some("resp_7"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_organization_and_project_headers_are_sent() {
    let mut server = Server::new_async().await;
    let post = server
        .mock("POST", "/v1/responses")
        .match_header("OpenAI-Organization", "org-test")
        .match_header("OpenAI-Project", "proj-test")
        .match_header("x-client-request-id", Matcher::Any)
        .with_status(200)
        .with_body(envelope("resp_8", "", None))
        .create_async()
        .await;

    let client = ResponsesClient::builder()
        .api_key("sk-test")
        .base_url(format!("{}/v1", server.url()))
        .organization("org-test")
        .project("proj-test")
        .build()
        .unwrap();
    let request = JobRequest::new("gpt-5-mini", Effort::Minimal).user_content("hi");
    let done = client.run(&request).await.unwrap();

    assert_eq!(done.response.status, JobStatus::Unset);
    assert_eq!(done.text, "");
    post.assert_async().await;
}
