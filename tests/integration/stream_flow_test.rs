use std::process::Output;

use serde_json::json;
use tokio::process::Command;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn task_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Quarterly report",
        "description": "Summarize Q3",
        "user_message": "Please summarize",
        "status": "in_progress",
        "created_at": "2025-09-10T10:00:00",
        "updated_at": "2025-09-10T10:00:00",
        "main_agent_id": "agent-main",
        "agents": [{
            "id": "agent-main",
            "name": "Coordinator",
            "role": "Main coordinator",
            "description": "Coordinates sub agents",
            "task_id": id,
            "status": "active",
            "type": "main"
        }],
        "chat_history": []
    })
}

fn sse(events: &[serde_json::Value]) -> String {
    events
        .iter()
        .map(|e| format!("data: {}\n\n", e))
        .collect()
}

async fn hub_with_stream(body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("t1")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/stream-chat"))
        .and(query_param("task_id", "t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;
    server
}

async fn run_stream(server: &MockServer, message: &str, json_output: bool) -> Output {
    let mut args = vec!["chat", "stream", "t1", message];
    if json_output {
        args.extend(["--format", "json"]);
    }
    Command::new(env!("CARGO_BIN_EXE_agenthub"))
        .args(&args)
        .env("AGENTHUB_API_BASE_URL", server.uri())
        .env("AGENTHUB_LOG_LEVEL", "error")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to execute agenthub command")
}

fn parse_stdout(output: &Output) -> serde_json::Value {
    serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("valid json")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[tokio::test]
async fn test_stream_commits_one_reply() {
    let server = hub_with_stream(sse(&[
        json!({"type": "agent_created", "data": {"id": "sub-1", "name": "SQL Reader"}}),
        json!({"type": "chunk", "data": {"task_id": "t1", "text": "Q3"}}),
        json!({"type": "chunk", "data": {"task_id": "t1", "text": "Q3 revenue grew"}}),
        json!({"type": "task_completed", "data": {"task_id": "t1", "response": "Q3 revenue grew"}}),
    ]))
    .await;

    let output = run_stream(&server, "How did Q3 go?", true).await;
    assert!(output.status.success(), "{}", stderr(&output));

    let body = parse_stdout(&output);
    assert_eq!(body["task_id"], "t1");
    assert!(body["error"].is_null());

    let history = body["chat_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["from"], "user");
    assert_eq!(history[0]["text"], "How did Q3 go?");
    assert_eq!(history[1]["from"], "agent");
    assert_eq!(history[1]["text"], "Q3 revenue grew");
}

#[tokio::test]
async fn test_stream_text_output_shows_reply() {
    let server = hub_with_stream(sse(&[
        json!({"type": "chunk", "data": {"task_id": "t1", "text": "hello"}}),
        json!({"type": "chunk", "data": {"task_id": "t1", "text": "hello back"}}),
        json!({"type": "task_completed", "data": {"task_id": "t1", "response": "hello back"}}),
    ]))
    .await;

    let output = run_stream(&server, "hello", false).await;
    let out = String::from_utf8_lossy(&output.stdout).to_string();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(out.contains("hello back"));
    assert!(out.contains("Quarterly report"));
}

#[tokio::test]
async fn test_stream_error_event_fails_command() {
    let server = hub_with_stream(sse(&[
        json!({"type": "error", "data": {"message": "Main agent not found"}}),
    ]))
    .await;

    let output = run_stream(&server, "hi", true).await;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Main agent not found"));

    let body = parse_stdout(&output);
    assert_eq!(body["error"], "Main agent not found");
    assert_eq!(body["chat_history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stream_without_completion_is_flushed() {
    let server = hub_with_stream(sse(&[
        json!({"type": "chunk", "data": {"task_id": "t1", "text": "partial"}}),
        json!({"type": "chunk", "data": {"task_id": "t1", "text": "partial answer"}}),
    ]))
    .await;

    let output = run_stream(&server, "hi", true).await;
    assert!(output.status.success(), "{}", stderr(&output));

    let history = parse_stdout(&output)["chat_history"].clone();
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[1]["text"], "partial answer");
}

#[tokio::test]
async fn test_malformed_frame_is_skipped() {
    let body = format!(
        "data: {{not json\n\n{}",
        sse(&[
            json!({"type": "chunk", "data": {"task_id": "t1", "text": "still here"}}),
            json!({"type": "task_completed", "data": {"task_id": "t1", "response": "still here"}}),
        ])
    );
    let server = hub_with_stream(body).await;

    let output = run_stream(&server, "hi", true).await;
    assert!(output.status.success(), "{}", stderr(&output));

    let body = parse_stdout(&output);
    assert!(body["error"].is_null());
    assert_eq!(body["chat_history"][1]["text"], "still here");
}

#[tokio::test]
async fn test_completed_history_replaces_local() {
    let server = hub_with_stream(sse(&[
        json!({"type": "chunk", "data": {"task_id": "t1", "text": "draft"}}),
        json!({"type": "task_completed", "data": {
            "task_id": "t1",
            "response": "final",
            "chat_history": [
                {"from": "user", "text": "hi", "timestamp": "2025-09-10T10:00:00"},
                {"from": "agent", "text": "final", "timestamp": "2025-09-10T10:00:05"}
            ]
        }}),
    ]))
    .await;

    let output = run_stream(&server, "hi", true).await;
    assert!(output.status.success(), "{}", stderr(&output));

    let history = parse_stdout(&output)["chat_history"].clone();
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[1]["text"], "final");
}

#[tokio::test]
async fn test_unknown_task_fails_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/stream-chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_stream(&server, "hi", false).await;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Task not found: t1"));
}
