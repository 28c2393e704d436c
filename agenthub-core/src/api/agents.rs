use async_trait::async_trait;

use crate::error::HubResult;
use crate::models::{Agent, AgentPatch, Chat, NewAgent};

/// Backend for hub-side agents and their chats.
#[async_trait]
pub trait AgentsApi: Send + Sync {
    fn name(&self) -> &str;

    async fn get_agents(&self) -> HubResult<Vec<Agent>>;

    async fn get_chats(&self) -> HubResult<Vec<Chat>>;

    async fn create_agent(&self, agent: NewAgent) -> HubResult<Agent>;

    async fn update_agent(&self, id: &str, patch: AgentPatch) -> HubResult<Agent>;

    async fn delete_agent(&self, id: &str) -> HubResult<()>;
}
