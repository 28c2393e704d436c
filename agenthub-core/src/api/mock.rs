use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::AgentsApi;
use crate::config::MockConfig;
use crate::error::{HubError, HubResult};
use crate::models::{
    unique_stamp, Agent, AgentPatch, AgentSettings, Chat, Message, NewAgent, SettingItem,
};

/// In-memory agents service with simulated latency.
pub struct MockAgentsApi {
    agents: RwLock<Vec<Agent>>,
    chats: Vec<Chat>,
    delays: MockConfig,
}

impl MockAgentsApi {
    pub fn new(delays: MockConfig) -> Self {
        Self {
            agents: RwLock::new(seed_agents()),
            chats: seed_chats(),
            delays,
        }
    }

    /// Seed data with every delay set to zero.
    pub fn instant() -> Self {
        Self::new(MockConfig::instant())
    }

    async fn pause(ms: u64) {
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

impl Default for MockAgentsApi {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

#[async_trait]
impl AgentsApi for MockAgentsApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_agents(&self) -> HubResult<Vec<Agent>> {
        Self::pause(self.delays.get_agents_delay_ms).await;
        Ok(self.agents.read().await.clone())
    }

    async fn get_chats(&self) -> HubResult<Vec<Chat>> {
        Self::pause(self.delays.get_chats_delay_ms).await;
        Ok(self.chats.clone())
    }

    async fn create_agent(&self, agent: NewAgent) -> HubResult<Agent> {
        Self::pause(self.delays.create_agent_delay_ms).await;

        let agent = agent.into_agent(format!("agent_{}", unique_stamp(Utc::now())));
        debug!(agent_id = %agent.id, "Mock service created agent");
        self.agents.write().await.push(agent.clone());
        Ok(agent)
    }

    async fn update_agent(&self, id: &str, patch: AgentPatch) -> HubResult<Agent> {
        Self::pause(self.delays.update_agent_delay_ms).await;

        let mut agents = self.agents.write().await;
        let agent = agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| HubError::AgentNotFound(id.to_string()))?;
        agent.apply(patch);
        Ok(agent.clone())
    }

    async fn delete_agent(&self, id: &str) -> HubResult<()> {
        Self::pause(self.delays.delete_agent_delay_ms).await;

        let mut agents = self.agents.write().await;
        let index = agents
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| HubError::AgentNotFound(id.to_string()))?;

        if agents[index].fixed {
            return Err(HubError::AgentFixed(id.to_string()));
        }

        agents.remove(index);
        Ok(())
    }
}

fn items(titles: &[&str]) -> Vec<SettingItem> {
    titles.iter().map(|t| SettingItem::new(*t)).collect()
}

fn seed_agents() -> Vec<Agent> {
    vec![
        Agent::new("root", "SimplyFire Lead Associate", "Admin agent")
            .with_desc("Cannot be deleted, system-level permissions.")
            .fixed()
            .with_settings(AgentSettings {
                instructions: items(&[
                    "Business tone",
                    "Short, concise answers",
                    "Cite sources",
                ]),
                apps: items(&[
                    "Outlook Connector (send/receive e-mail)",
                    "SQL driver",
                    "LibreOffice Writer/Calc",
                    "PDF engine",
                    "Image (png/jpeg) ingest",
                ]),
                resources: items(&[
                    "/shared/drive/projects",
                    "Azure Blob: sf-prod-01",
                    "Local: /data/vectors",
                    "Secrets: managed vault",
                ]),
            }),
        Agent::new("a_demo_1", "Financial Analyst", "Analyst")
            .with_desc("Cashflow forecasting, SQL reads.")
            .with_settings(AgentSettings {
                instructions: items(&["Analytical tone", "Justify numbers"]),
                apps: items(&["SQL read-only", "PDF export"]),
                resources: items(&["DB: sales-read", "/reports/finance"]),
            }),
    ]
}

fn seed_chats() -> Vec<Chat> {
    vec![
        Chat {
            id: "c1".to_string(),
            title: "Add connector – OneDrive".to_string(),
            ts: "2025-09-02 10:05".to_string(),
            agent_id: "root".to_string(),
            preview: Some("Please install the OneDrive connector…".to_string()),
            messages: vec![
                Message::agent("Hi! Which storage do you need access to?"),
                Message::user("OneDrive Business, read-only."),
            ],
        },
        Chat {
            id: "c2".to_string(),
            title: "Schedule job – weekly PDF report".to_string(),
            ts: "2025-09-08 09:12".to_string(),
            agent_id: "root".to_string(),
            preview: Some("Weekly report to PDF on Fridays at 16:00…".to_string()),
            messages: vec![
                Message::user("Weekly report on Fridays at 16:00, please."),
                Message::agent("Done. I'll email the PDF."),
            ],
        },
    ]
}
