use agenthub_core::models::{Sender, TaskStatus};
use agenthub_core::{HubClient, HubConfig, HubError, TaskStore, NO_RESPONSE};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> HubConfig {
    let mut config = HubConfig::default();
    config.api.base_url = server.uri();
    config
}

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

mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_and_get_tasks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"tasks": [task_json("t1")]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_json("t1")))
            .mount(&server)
            .await;

        let client = HubClient::new(&config_for(&server)).unwrap();
        let tasks = client.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::InProgress);

        let task = client.get_task("t1").await.unwrap();
        assert_eq!(task.main_agent().unwrap().name, "Coordinator");
    }

    #[tokio::test]
    async fn test_missing_task_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Task not found"})))
            .mount(&server)
            .await;

        let client = HubClient::new(&config_for(&server)).unwrap();
        let err = client.get_task("ghost").await.unwrap_err();
        assert!(matches!(err, HubError::TaskNotFound(ref id) if id == "ghost"));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HubClient::new(&config_for(&server)).unwrap();
        let err = client.list_tasks().await.unwrap_err();
        assert!(err.is_network_error());
        assert_eq!(err.display_message(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = HubClient::new(&config_for(&server)).unwrap();
        assert!(client.list_tasks().await.unwrap_err().is_parse_error());
    }

    #[tokio::test]
    async fn test_chat_with_agent_sends_query_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/agents/agent-main/chat"))
            .and(query_param("message", "status?"))
            .and(body_json(json!({"message": "status?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "All good"})))
            .mount(&server)
            .await;

        let client = HubClient::new(&config_for(&server)).unwrap();
        assert_eq!(
            client.chat_with_agent("agent-main", "status?").await.unwrap(),
            "All good"
        );
    }

    #[tokio::test]
    async fn test_chat_with_agent_without_response_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/agents/a1/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = HubClient::new(&config_for(&server)).unwrap();
        assert_eq!(client.chat_with_agent("a1", "hi").await.unwrap(), NO_RESPONSE);
    }

    #[tokio::test]
    async fn test_health_outside_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"status": "healthy", "timestamp": "2025-09-10T10:00:00"}),
            ))
            .mount(&server)
            .await;

        let client = HubClient::new(&config_for(&server)).unwrap();
        assert_eq!(client.health().await.unwrap().status, "healthy");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let mut config = HubConfig::default();
        config.api.base_url = "http://127.0.0.1:9".to_string();
        let client = HubClient::new(&config).unwrap();

        let err = client.list_tasks().await.unwrap_err();
        assert!(err.is_network_error());
    }
}

mod task_store_tests {
    use super::*;

    async fn store_with_task(server: &MockServer) -> TaskStore {
        Mock::given(method("POST"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_json("t1")))
            .mount(server)
            .await;

        let config = config_for(server);
        let store = TaskStore::new(HubClient::new(&config).unwrap(), &config.stream);
        store
            .create_task_with_agents("Quarterly report", "Summarize Q3", "Please summarize")
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_task_becomes_active() {
        let server = MockServer::start().await;
        let store = store_with_task(&server).await;

        let state = store.state().await;
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.active_task_id.as_deref(), Some("t1"));
        assert_eq!(state.active_agent_id.as_deref(), Some("agent-main"));
        assert_eq!(store.current_agent().await.unwrap().name, "Coordinator");
    }

    #[tokio::test]
    async fn test_stream_commits_one_agent_message() {
        let server = MockServer::start().await;
        let store = store_with_task(&server).await;

        let body = sse(&[
            json!({"type": "agent_created", "data": {"id": "sub-1"}}),
            json!({"type": "chunk", "data": {"task_id": "t1", "text": "Q3"}}),
            json!({"type": "chunk", "data": {"task_id": "t1", "text": "Q3 revenue grew"}}),
            json!({"type": "task_completed", "data": {"task_id": "t1", "response": "Q3 revenue grew"}}),
        ]);
        Mock::given(method("POST"))
            .and(path("/api/stream-chat"))
            .and(query_param("task_id", "t1"))
            .and(query_param("message", "How did Q3 go?"))
            .and(header("accept", "text/event-stream"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;

        store.stream_chat_message("t1", "How did Q3 go?").await.unwrap();

        let chat = store.active_chat().await;
        assert_eq!(chat.len(), 2);
        assert_eq!(chat[0].from, Sender::User);
        assert_eq!(chat[0].text, "How did Q3 go?");
        assert_eq!(chat[1].from, Sender::Agent);
        assert_eq!(chat[1].text, "Q3 revenue grew");

        let progress = store.progress("t1").await;
        assert!(!progress.is_streaming);
        assert_eq!(progress.response, "");
        assert!(progress.error.is_none());
    }

    #[tokio::test]
    async fn test_stream_error_event_and_flush() {
        let server = MockServer::start().await;
        let store = store_with_task(&server).await;

        let body = format!(
            "{}data: {{broken\n\n{}",
            sse(&[json!({"type": "chunk", "data": {"text": "partial answer"}})]),
            sse(&[json!({"type": "error", "data": {"message": "Main agent not found"}})])
        );
        Mock::given(method("POST"))
            .and(path("/api/stream-chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        store.stream_chat_message("t1", "hi").await.unwrap();

        let progress = store.progress("t1").await;
        assert_eq!(progress.error.as_deref(), Some("Main agent not found"));
        let chat = store.active_chat().await;
        assert_eq!(chat.len(), 2);
        assert_eq!(chat[1].text, "partial answer");
    }

    #[tokio::test]
    async fn test_stream_http_error_sets_error() {
        let server = MockServer::start().await;
        let store = store_with_task(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/stream-chat"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = store.stream_chat_message("t1", "hi").await.unwrap_err();
        assert!(err.is_network_error());

        let progress = store.progress("t1").await;
        assert!(!progress.is_streaming);
        assert_eq!(progress.error.as_deref(), Some("HTTP error! status: 503"));
        assert_eq!(store.active_chat().await.len(), 1);
    }

    #[tokio::test]
    async fn test_second_stream_replaces_first() {
        let server = MockServer::start().await;
        let store = store_with_task(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/stream-chat"))
            .and(query_param("message", "slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(sse(&[json!({"type": "chunk", "data": {"text": "old"}})]))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/stream-chat"))
            .and(query_param("message", "fast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(sse(&[json!({"type": "chunk", "data": {"text": "new"}})])),
            )
            .mount(&server)
            .await;

        let first = store.start_stream("t1", "slow").await;
        store.stream_chat_message("t1", "fast").await.unwrap();

        let joined = first.await;
        assert!(joined.unwrap_err().is_cancelled());

        let texts: Vec<String> = store
            .active_chat()
            .await
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["slow", "fast", "new"]);
        assert!(store.active_streams().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_task_upserts() {
        let server = MockServer::start().await;
        let store = store_with_task(&server).await;

        let mut updated = task_json("t1");
        updated["status"] = json!("completed");
        Mock::given(method("GET"))
            .and(path("/api/tasks/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/t2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_json("t2")))
            .mount(&server)
            .await;

        store.refresh_task("t1").await.unwrap();
        store.refresh_task("t2").await.unwrap();

        let state = store.state().await;
        assert_eq!(state.tasks.len(), 2);
        assert_eq!(state.tasks[0].id, "t2");
        assert_eq!(state.task("t1").unwrap().status, TaskStatus::Completed);
    }
}
