use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Agent,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Agent => write!(f, "agent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            from: Sender::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            from: Sender::Agent,
            text: text.into(),
        }
    }
}

/// A hub-side conversation with one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    /// Creation time formatted `YYYY-MM-DD HH:MM`.
    pub ts: String,
    pub agent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

const PREVIEW_CHARS: usize = 80;

impl Chat {
    /// Starts a new chat for `agent_name` whose first user message is `text`.
    ///
    /// The id is `c<unix millis>` (bumped past any id already issued), the preview is the first 80 characters of
    /// `text` followed by an ellipsis.
    pub fn start(agent_id: &str, agent_name: &str, text: &str, now: DateTime<Utc>) -> Self {
        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        Self {
            id: format!("c{}", super::unique_stamp(now)),
            title: format!("New chat – {}", agent_name),
            ts: now.format("%Y-%m-%d %H:%M").to_string(),
            agent_id: agent_id.to_string(),
            preview: Some(format!("{}…", preview)),
            messages: Vec::new(),
        }
    }
}
