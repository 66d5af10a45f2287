//! Integration tests for the Replicate provider using wiremock.
//!
//! The two-step flow is mocked end to end: the create-prediction POST
//! returns a stream URL pointing back at the mock server, whose GET
//! endpoint serves a canned SSE body.

use futures::StreamExt;
use skiff_provider_replicate::{Replicate, ReplicateSettings};
use skiff_types::{
    FinishReason, GenerationRequest, LanguageModel, Message, ProviderError, StreamPart,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn minimal_request() -> GenerationRequest {
    GenerationRequest {
        model: "meta/llama-3-8b-instruct".into(),
        messages: vec![Message::user("Hello")],
    }
}

/// Mount the stream GET endpoint serving `sse` and return the full URL.
async fn mount_stream(server: &MockServer, sse: &str) -> String {
    Mock::given(method("GET"))
        .and(path("/v1/streams/p1"))
        .and(header("accept", "text/event-stream"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse.to_string(), "text/event-stream"),
        )
        .mount(server)
        .await;
    format!("{}/v1/streams/p1", server.uri())
}

fn prediction_body(stream_url: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "p1",
        "status": "starting",
        "output": null,
        "urls": { "stream": stream_url }
    })
}

const HELLO_WORLD_SSE: &str =
    "event: output\ndata: Hello\n\nevent: output\ndata:  world\n\nevent: done\ndata: {}\n\n";

#[tokio::test]
async fn stream_sends_bearer_token_and_transcodes() {
    let mock_server = MockServer::start().await;
    let stream_url = mount_stream(&mock_server, HELLO_WORLD_SSE).await;

    Mock::given(method("POST"))
        .and(path("/v1/models/meta/llama-3-8b-instruct/predictions"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction_body(&stream_url)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let model = Replicate::new("test-token").base_url(mock_server.uri());
    let handle = model.stream(minimal_request()).await.unwrap();
    let parts: Vec<StreamPart> = handle.receiver.collect().await;

    assert_eq!(
        parts,
        vec![
            StreamPart::TextDelta("Hello".into()),
            StreamPart::TextDelta(" world".into()),
            StreamPart::Finish {
                reason: FinishReason::Stop,
                usage: Default::default(),
            },
        ]
    );
}

#[tokio::test]
async fn generate_concatenates_deltas() {
    let mock_server = MockServer::start().await;
    let stream_url = mount_stream(&mock_server, HELLO_WORLD_SSE).await;

    Mock::given(method("POST"))
        .and(path("/v1/models/meta/llama-3-8b-instruct/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction_body(&stream_url)))
        .mount(&mock_server)
        .await;

    let model = Replicate::new("test-token").base_url(mock_server.uri());
    let response = model.generate(minimal_request()).await.unwrap();

    assert_eq!(response.text, "Hello world");
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.usage.input_tokens, 0);
    assert_eq!(response.usage.output_tokens, 0);
}

#[tokio::test]
async fn unrecognized_events_are_ignored() {
    let mock_server = MockServer::start().await;
    let sse = "event: ping\ndata: {}\n\nevent: output\ndata: ok\n\nevent: logs\ndata: warming up\n\nevent: done\ndata: {}\n\n";
    let stream_url = mount_stream(&mock_server, sse).await;

    Mock::given(method("POST"))
        .and(path("/v1/models/meta/llama-3-8b-instruct/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction_body(&stream_url)))
        .mount(&mock_server)
        .await;

    let model = Replicate::new("test-token").base_url(mock_server.uri());
    let parts: Vec<StreamPart> = model
        .stream(minimal_request())
        .await
        .unwrap()
        .receiver
        .collect()
        .await;

    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], StreamPart::TextDelta("ok".into()));
    assert!(matches!(parts[1], StreamPart::Finish { .. }));
}

#[tokio::test]
async fn versioned_model_routes_to_generic_endpoint() {
    let mock_server = MockServer::start().await;
    let stream_url = mount_stream(&mock_server, HELLO_WORLD_SSE).await;

    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .and(body_partial_json(serde_json::json!({ "version": "abc123" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction_body(&stream_url)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let model = Replicate::new("test-token").base_url(mock_server.uri());
    let request = GenerationRequest {
        model: "meta/llama-3-8b-instruct:abc123".into(),
        ..minimal_request()
    };
    let response = model.generate(request).await.unwrap();
    assert_eq!(response.text, "Hello world");
}

#[tokio::test]
async fn unversioned_body_omits_version_key() {
    let mock_server = MockServer::start().await;
    let stream_url = mount_stream(&mock_server, HELLO_WORLD_SSE).await;

    Mock::given(method("POST"))
        .and(path("/v1/models/meta/llama-3-8b-instruct/predictions"))
        .respond_with(move |req: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            assert!(body.get("version").is_none());
            assert_eq!(body["input"]["prompt"], "Hello");
            ResponseTemplate::new(201).set_body_json(prediction_body(&stream_url))
        })
        .mount(&mock_server)
        .await;

    let model = Replicate::new("test-token").base_url(mock_server.uri());
    let response = model.generate(minimal_request()).await.unwrap();
    assert_eq!(response.text, "Hello world");
}

#[tokio::test]
async fn settings_shape_the_input_object() {
    let mock_server = MockServer::start().await;
    let stream_url = mount_stream(&mock_server, HELLO_WORLD_SSE).await;

    Mock::given(method("POST"))
        .and(path("/v1/models/meta/llama-3-8b-instruct/predictions"))
        .and(body_partial_json(serde_json::json!({
            "input": {
                "text": "Hello",
                "sys": "be terse",
                "max_new_tokens": 512,
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction_body(&stream_url)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = ReplicateSettings::new()
        .prompt_key("text")
        .system_prompt_key("sys")
        .input("max_new_tokens", 512);
    let model = Replicate::new("test-token")
        .base_url(mock_server.uri())
        .settings(settings);

    let request = GenerationRequest {
        model: "meta/llama-3-8b-instruct".into(),
        messages: vec![Message::system("be terse"), Message::user("Hello")],
    };
    model.generate(request).await.unwrap();
}

#[tokio::test]
async fn api_error_detail_surfaces_before_stream_opens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/models/meta/llama-3-8b-instruct/predictions"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "detail": "rate limited"
            })),
        )
        .mount(&mock_server)
        .await;
    // No stream mock mounted: a stream GET would 404 and fail differently.

    let model = Replicate::new("test-token").base_url(mock_server.uri());

    let stream_err = model.stream(minimal_request()).await.unwrap_err();
    assert!(stream_err.to_string().contains("rate limited"));

    let generate_err = model.generate(minimal_request()).await.unwrap_err();
    assert!(
        matches!(generate_err, ProviderError::Api { status: 429, ref detail } if detail == "rate limited")
    );
}

#[tokio::test]
async fn schema_mismatch_is_an_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/models/meta/llama-3-8b-instruct/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "p1",
            "urls": {}
        })))
        .mount(&mock_server)
        .await;

    let model = Replicate::new("test-token").base_url(mock_server.uri());
    let err = model.stream(minimal_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn failing_stream_open_is_a_stream_error() {
    let mock_server = MockServer::start().await;
    let stream_url = format!("{}/v1/streams/missing", mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/v1/models/meta/llama-3-8b-instruct/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(prediction_body(&stream_url)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/streams/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let model = Replicate::new("test-token").base_url(mock_server.uri());
    let err = model.stream(minimal_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Stream(_)));
}

#[tokio::test]
async fn invalid_model_ref_fails_without_network() {
    // The base URL points at a closed port: reaching the network would
    // surface Network, not InvalidModelRef.
    let model = Replicate::new("test-token").base_url("http://127.0.0.1:1");
    let request = GenerationRequest {
        model: "not-a-reference".into(),
        ..minimal_request()
    };
    let err = model.generate(request).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidModelRef { .. }));
}
