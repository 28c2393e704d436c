use std::process::Output;

use serde_json::json;
use tokio::process::Command;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn task_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "Summarize Q3",
        "user_message": "Please summarize",
        "status": "pending",
        "created_at": "2025-09-10T10:00:00",
        "updated_at": "2025-09-10T10:05:00",
        "main_agent_id": "agent-main",
        "agents": [
            {
                "id": "agent-main",
                "name": "Coordinator",
                "role": "Main coordinator",
                "description": "Coordinates sub agents",
                "task_id": id,
                "status": "active",
                "type": "main"
            },
            {
                "id": "agent-sql",
                "name": "SQL Reader",
                "role": "Reads sales tables",
                "description": "",
                "task_id": id,
                "status": "inactive",
                "type": "sub"
            }
        ],
        "chat_history": [
            {"from": "user", "text": "Please summarize", "timestamp": "2025-09-10T10:00:00"}
        ]
    })
}

async fn run_agenthub(server: &MockServer, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_agenthub"))
        .args(args)
        .env("AGENTHUB_API_BASE_URL", server.uri())
        .env("AGENTHUB_LOG_LEVEL", "error")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to execute agenthub command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod list_tests {
    use super::*;

    async fn server_with_tasks() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tasks": [task_json("t1", "Quarterly report"), task_json("t2", "Churn analysis")]
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_tasks_list_table() {
        let server = server_with_tasks().await;
        let output = run_agenthub(&server, &["tasks", "list"]).await;
        let out = stdout(&output);

        assert!(output.status.success(), "{}", stderr(&output));
        assert!(out.contains("Quarterly report"));
        assert!(out.contains("Churn analysis"));
        assert!(out.contains("pending"));
    }

    #[tokio::test]
    async fn test_tasks_list_is_default_subcommand() {
        let server = server_with_tasks().await;
        let output = run_agenthub(&server, &["tasks"]).await;

        assert!(output.status.success());
        assert!(stdout(&output).contains("Quarterly report"));
    }

    #[tokio::test]
    async fn test_tasks_list_json() {
        let server = server_with_tasks().await;
        let output = run_agenthub(&server, &["tasks", "list", "--format", "json"]).await;
        assert!(output.status.success());

        let tasks: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(tasks.as_array().unwrap().len(), 2);
        assert_eq!(tasks[1]["id"], "t2");
        assert_eq!(tasks[0]["agents"][0]["type"], "main");
    }

    #[tokio::test]
    async fn test_tasks_list_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": []})))
            .mount(&server)
            .await;

        let output = run_agenthub(&server, &["tasks", "list"]).await;
        assert!(output.status.success());
        assert!(stdout(&output).contains("No tasks yet"));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let output = run_agenthub(&server, &["tasks", "list"]).await;
        let err = stderr(&output);

        assert!(!output.status.success());
        assert!(err.contains("Error"));
        assert!(err.contains("HTTP error! status: 500"));
        assert!(err.contains("boom"));
    }
}

mod detail_tests {
    use super::*;

    #[tokio::test]
    async fn test_tasks_show() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/t1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(task_json("t1", "Quarterly report")),
            )
            .mount(&server)
            .await;

        let output = run_agenthub(&server, &["tasks", "show", "t1"]).await;
        let out = stdout(&output);

        assert!(output.status.success(), "{}", stderr(&output));
        assert!(out.contains("Quarterly report"));
        assert!(out.contains("Coordinator"));
        assert!(out.contains("SQL Reader"));
        assert!(out.contains("Please summarize"));
    }

    #[tokio::test]
    async fn test_tasks_show_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let output = run_agenthub(&server, &["tasks", "show", "ghost"]).await;
        let err = stderr(&output);

        assert!(!output.status.success());
        assert!(err.contains("Task not found: ghost"));
    }

    #[tokio::test]
    async fn test_tasks_agents_json() {
        let server = MockServer::start().await;
        let agents = task_json("t1", "Quarterly report")["agents"].clone();
        Mock::given(method("GET"))
            .and(path("/api/tasks/t1/agents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"agents": agents})))
            .mount(&server)
            .await;

        let output = run_agenthub(&server, &["tasks", "agents", "t1", "--format", "json"]).await;
        assert!(output.status.success(), "{}", stderr(&output));

        let listed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(listed[1]["name"], "SQL Reader");
        assert_eq!(listed[1]["status"], "inactive");
    }
}

mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_tasks_create_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks"))
            .and(body_json(json!({
                "title": "Quarterly report",
                "description": "Summarize Q3",
                "user_message": "Please summarize"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(task_json("t9", "Quarterly report")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let output = run_agenthub(
            &server,
            &[
                "tasks",
                "create",
                "Quarterly report",
                "--description",
                "Summarize Q3",
                "--message",
                "Please summarize",
            ],
        )
        .await;
        let out = stdout(&output);

        assert!(output.status.success(), "{}", stderr(&output));
        assert!(out.contains("Created task"));
        assert!(out.contains("t9"));
        assert!(out.contains("Main agent: Coordinator"));
    }

    #[tokio::test]
    async fn test_tasks_create_requires_message() {
        let server = MockServer::start().await;
        let output = run_agenthub(&server, &["tasks", "create", "No message"]).await;
        assert!(!output.status.success());
    }
}

mod agent_chat_tests {
    use super::*;

    #[tokio::test]
    async fn test_chat_agent_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/agents/agent-sql/chat"))
            .and(query_param("message", "How many rows?"))
            .and(body_json(json!({"message": "How many rows?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "42 rows"})))
            .mount(&server)
            .await;

        let output = run_agenthub(
            &server,
            &["chat", "agent", "agent-sql", "How many rows?", "--format", "json"],
        )
        .await;
        assert!(output.status.success(), "{}", stderr(&output));

        let body: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(body["agent_id"], "agent-sql");
        assert_eq!(body["response"], "42 rows");
    }

    #[tokio::test]
    async fn test_chat_agent_without_response_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/agents/agent-sql/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let output = run_agenthub(&server, &["chat", "agent", "agent-sql", "hi"]).await;
        assert!(output.status.success());
        assert!(stdout(&output).contains("No response received"));
    }
}
