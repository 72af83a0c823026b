/*!
 * Tests for LLM provider request building
 */

use lectern::providers::ollama::{GenerationRequest, GenerationResponse};

/// Test that a bare request serializes without optional fields
#[test]
fn test_generation_request_withNoOptions_shouldOmitOptionalFields() {
    let request = GenerationRequest::new("llama3.2:3b", "What is Rust?");
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["model"], "llama3.2:3b");
    assert_eq!(value["prompt"], "What is Rust?");
    assert_eq!(value["stream"], false);
    assert!(value.get("system").is_none());
    assert!(value.get("options").is_none());
}

/// Test that builder methods populate the options object
#[test]
fn test_generation_request_withSamplingOptions_shouldSerializeThem() {
    let request = GenerationRequest::new("llama3.2:3b", "Question")
        .system("You are a teacher.")
        .temperature(0.7)
        .top_p(0.9)
        .num_predict(256);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["system"], "You are a teacher.");
    let options = &value["options"];
    assert!((options["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert!((options["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    assert_eq!(options["num_predict"], 256);
}

/// Test deserializing a non-streaming generation response
#[test]
fn test_generation_response_withApiShape_shouldDeserialize() {
    let body = r#"{
        "model": "llama3.2:3b",
        "created_at": "2025-01-01T00:00:00Z",
        "response": "Rust is a systems language.",
        "done": true
    }"#;

    let response: GenerationResponse = serde_json::from_str(body).unwrap();
    assert_eq!(response.response, "Rust is a systems language.");
    assert!(response.done);
}

/// Test that a missing created_at falls back to the default
#[test]
fn test_generation_response_withMissingCreatedAt_shouldDefault() {
    let body = r#"{
        "model": "llama3.2:3b",
        "response": "Answer.",
        "done": true
    }"#;

    let response: GenerationResponse = serde_json::from_str(body).unwrap();
    assert_eq!(response.created_at, "");
}
