use serde::{Deserialize, Serialize};

use crate::error::{HubError, HubResult};
use crate::models::ChatMessage;

/// One decoded `{"type": ..., "data": ...}` frame of a chat stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Cumulative partial response; replaces the transient text.
    Chunk(ChunkData),
    AgentCreated(serde_json::Value),
    TaskCompleted(TaskCompletedData),
    Error(StreamErrorData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkData {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamErrorData {
    pub message: String,
}

impl StreamEvent {
    /// Parses the payload of a single `data: ` line.
    pub fn parse(payload: &str) -> HubResult<Self> {
        serde_json::from_str(payload).map_err(|e| HubError::FrameParseError(e.to_string()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Chunk(_) => "chunk",
            StreamEvent::AgentCreated(_) => "agent_created",
            StreamEvent::TaskCompleted(_) => "task_completed",
            StreamEvent::Error(_) => "error",
        }
    }

    pub fn chunk(text: impl Into<String>) -> Self {
        StreamEvent::Chunk(ChunkData {
            text: text.into(),
            task_id: None,
            agent_id: None,
            is_complete: false,
        })
    }

    pub fn completed(task_id: impl Into<String>) -> Self {
        StreamEvent::TaskCompleted(TaskCompletedData {
            task_id: Some(task_id.into()),
            response: None,
            chat_history: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error(StreamErrorData {
            message: message.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chunk() {
        let event = StreamEvent::parse(
            r#"{"type":"chunk","data":{"task_id":"t1","agent_id":"a1","text":"Hello there","is_complete":false}}"#,
        )
        .unwrap();

        match event {
            StreamEvent::Chunk(data) => {
                assert_eq!(data.text, "Hello there");
                assert_eq!(data.task_id.as_deref(), Some("t1"));
                assert!(!data.is_complete);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_parse_task_completed_with_history() {
        let event = StreamEvent::parse(
            r#"{"type":"task_completed","data":{"task_id":"t1","response":"done","chat_history":[{"from":"agent","text":"done","timestamp":"2025-09-10T10:00:00"}]}}"#,
        )
        .unwrap();

        assert_eq!(event.kind(), "task_completed");
        if let StreamEvent::TaskCompleted(data) = event {
            assert_eq!(data.chat_history.map(|h| h.len()), Some(1));
        }
    }

    #[test]
    fn test_parse_error_and_agent_created() {
        let event = StreamEvent::parse(r#"{"type":"error","data":{"message":"Task not found"}}"#)
            .unwrap();
        assert_eq!(event, StreamEvent::error("Task not found"));

        let event =
            StreamEvent::parse(r#"{"type":"agent_created","data":{"id":"sub-1"}}"#).unwrap();
        assert_eq!(event.kind(), "agent_created");
    }

    #[test]
    fn test_parse_failures() {
        for payload in [
            "not json",
            r#"{"type":"mystery","data":{}}"#,
            r#"{"type":"chunk","data":{}}"#,
            r#"{"data":{"text":"x"}}"#,
        ] {
            let err = StreamEvent::parse(payload).unwrap_err();
            assert!(err.is_parse_error(), "{} should be a parse error", payload);
        }
    }
}
