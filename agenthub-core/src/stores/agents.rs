use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::request_state::{execute, RequestState, RequestStates};
use crate::api::AgentsApi;
use crate::config::MockConfig;
use crate::error::{HubError, HubResult};
use crate::forms::{NewApp, NewInstruction, NewResource};
use crate::models::{Agent, AgentPatch, Chat, Message, NewAgent, SettingItem, SettingKind};

pub const DEFAULT_AGENT_ID: &str = "root";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentsState {
    pub agents: Vec<Agent>,
    pub active_agent_id: String,
    pub active_chat_by_agent: HashMap<String, Option<String>>,
    pub chats: Vec<Chat>,
    pub loading: bool,
    pub error: Option<String>,
    pub requests: RequestStates,
}

impl Default for AgentsState {
    fn default() -> Self {
        Self {
            agents: Vec::new(),
            active_agent_id: DEFAULT_AGENT_ID.to_string(),
            active_chat_by_agent: HashMap::new(),
            chats: Vec::new(),
            loading: false,
            error: None,
            requests: RequestStates::default(),
        }
    }
}

impl AgentsState {
    pub fn current_agent(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == self.active_agent_id)
    }

    /// Chats owned by the active agent, newest first.
    pub fn agent_chats(&self) -> Vec<&Chat> {
        self.chats
            .iter()
            .filter(|c| c.agent_id == self.active_agent_id)
            .collect()
    }

    pub fn active_chat(&self) -> Option<&Chat> {
        let chat_id = self
            .active_chat_by_agent
            .get(&self.active_agent_id)?
            .as_ref()?;
        self.chats.iter().find(|c| &c.id == chat_id)
    }

    fn current_agent_mut(&mut self) -> Option<&mut Agent> {
        let id = &self.active_agent_id;
        self.agents.iter_mut().find(|a| &a.id == id)
    }

    fn push_message(&mut self, chat_id: &str, message: Message) -> bool {
        match self.chats.iter_mut().find(|c| c.id == chat_id) {
            Some(chat) => {
                chat.messages.push(message);
                true
            }
            None => false,
        }
    }
}

fn agents_slot(state: &mut AgentsState) -> &mut RequestState<Vec<Agent>> {
    &mut state.requests.agents
}

fn chats_slot(state: &mut AgentsState) -> &mut RequestState<Vec<Chat>> {
    &mut state.requests.chats
}

fn send_message_slot(state: &mut AgentsState) -> &mut RequestState<()> {
    &mut state.requests.send_message
}

/// Hub-side agents, their settings and their chats.
#[derive(Clone)]
pub struct AgentsStore {
    api: Arc<dyn AgentsApi>,
    state: Arc<RwLock<AgentsState>>,
    timing: Arc<MockConfig>,
}

impl AgentsStore {
    pub fn new(api: Arc<dyn AgentsApi>, timing: MockConfig) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(AgentsState::default())),
            timing: Arc::new(timing),
        }
    }

    pub async fn state(&self) -> AgentsState {
        self.state.read().await.clone()
    }

    pub async fn current_agent(&self) -> Option<Agent> {
        self.state.read().await.current_agent().cloned()
    }

    pub async fn agent_chats(&self) -> Vec<Chat> {
        self.state
            .read()
            .await
            .agent_chats()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn active_chat(&self) -> Option<Chat> {
        self.state.read().await.active_chat().cloned()
    }

    pub async fn load_agents(&self) -> HubResult<()> {
        self.begin_loading().await;
        let result = execute(&*self.state, agents_slot, self.api.get_agents()).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(agents) => {
                info!("Loaded {} agents from {} service", agents.len(), self.api.name());
                state.agents = agents;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load agents: {}", e);
                state.error = Some(e.display_message());
                Err(e)
            }
        }
    }

    pub async fn load_chats(&self) -> HubResult<()> {
        let result = execute(&*self.state, chats_slot, self.api.get_chats()).await;

        let mut state = self.state.write().await;
        match result {
            Ok(chats) => {
                debug!("Loaded {} chats", chats.len());
                state.chats = chats;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load chats: {}", e);
                state.error = Some(e.display_message());
                Err(e)
            }
        }
    }

    pub async fn set_active_agent(&self, id: &str) {
        self.state.write().await.active_agent_id = id.to_string();
    }

    pub async fn set_active_chat_for_agent(&self, agent_id: &str, chat_id: Option<&str>) {
        self.state
            .write()
            .await
            .active_chat_by_agent
            .insert(agent_id.to_string(), chat_id.map(str::to_string));
    }

    /// Appends a user message to the active chat, starting a new chat when
    /// the active agent has none, and schedules the demo reply.
    pub async fn send_message(&self, text: &str) -> HubResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        execute(&*self.state, send_message_slot, self.post_user_message(text)).await
    }

    async fn post_user_message(&self, text: &str) -> HubResult<()> {
        let chat_id = {
            let mut state = self.state.write().await;
            let agent_id = state.active_agent_id.clone();

            let chat_id = match state.active_chat().map(|c| c.id.clone()) {
                Some(id) => id,
                None => {
                    let agent_name = state
                        .current_agent()
                        .map(|a| a.name.clone())
                        .ok_or_else(|| HubError::AgentNotFound(agent_id.clone()))?;
                    let chat = Chat::start(&agent_id, &agent_name, text, Utc::now());
                    let id = chat.id.clone();
                    debug!(chat_id = %id, agent_id = %agent_id, "Starting new chat");
                    state.chats.insert(0, chat);
                    state
                        .active_chat_by_agent
                        .insert(agent_id, Some(id.clone()));
                    id
                }
            };

            state.push_message(&chat_id, Message::user(text));
            chat_id
        };

        self.schedule_reply(chat_id);
        Ok(())
    }

    fn schedule_reply(&self, chat_id: String) {
        let state = Arc::clone(&self.state);
        let delay = self.timing.reply_delay();
        let reply = self.timing.demo_reply.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !state.write().await.push_message(&chat_id, Message::agent(reply)) {
                debug!(chat_id = %chat_id, "Chat vanished before demo reply");
            }
        });
    }

    pub async fn create_agent(&self, agent: NewAgent) -> HubResult<Agent> {
        self.begin_loading().await;
        let result = self.api.create_agent(agent).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(agent) => {
                info!(agent_id = %agent.id, "Created agent '{}'", agent.name);
                state.agents.push(agent.clone());
                let agents = state.agents.clone();
                state.requests.agents.succeed(agents);
                Ok(agent)
            }
            Err(e) => Err(Self::record_failure(&mut state, e)),
        }
    }

    pub async fn update_agent(&self, id: &str, patch: AgentPatch) -> HubResult<Agent> {
        self.begin_loading().await;
        let result = self.api.update_agent(id, patch).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(updated) => {
                match state.agents.iter_mut().find(|a| a.id == updated.id) {
                    Some(existing) => *existing = updated.clone(),
                    None => state.agents.push(updated.clone()),
                }
                let agents = state.agents.clone();
                state.requests.agents.succeed(agents);
                Ok(updated)
            }
            Err(e) => Err(Self::record_failure(&mut state, e)),
        }
    }

    /// Deletes a non-fixed agent. The active agent falls back to the default
    /// agent when it is the one removed.
    pub async fn delete_agent(&self, id: &str) -> HubResult<()> {
        {
            let mut state = self.state.write().await;
            if state.agents.iter().any(|a| a.id == id && a.fixed) {
                return Err(Self::record_failure(
                    &mut state,
                    HubError::AgentFixed(id.to_string()),
                ));
            }
        }

        self.begin_loading().await;
        let result = self.api.delete_agent(id).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(()) => {
                info!(agent_id = %id, "Deleted agent");
                state.agents.retain(|a| a.id != id);
                state.active_chat_by_agent.remove(id);
                if state.active_agent_id == id {
                    state.active_agent_id = DEFAULT_AGENT_ID.to_string();
                }
                let agents = state.agents.clone();
                state.requests.agents.succeed(agents);
                Ok(())
            }
            Err(e) => Err(Self::record_failure(&mut state, e)),
        }
    }

    pub async fn add_instruction(&self, instruction: NewInstruction) -> bool {
        let item = SettingItem::new(instruction.title)
            .with_note(instruction.description)
            .highlighted();
        self.add_setting(SettingKind::Instruction, item).await
    }

    pub async fn add_app(&self, app: NewApp) -> bool {
        let item = SettingItem::new(app.title)
            .with_note(format!("{} connector", app.connector_type))
            .with_config(app.config.to_string())
            .highlighted();
        self.add_setting(SettingKind::App, item).await
    }

    pub async fn add_resource(&self, resource: NewResource) -> bool {
        let types = resource
            .file_types
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let config = serde_json::json!({
            "folder": resource.folder,
            "files": resource.files,
        });
        let item = SettingItem::new(resource.name)
            .with_note(format!("{} files, {}", resource.files.len(), types))
            .with_config(config.to_string())
            .highlighted();
        self.add_setting(SettingKind::Resource, item).await
    }

    pub async fn delete_instruction(&self, title: &str) -> usize {
        self.delete_setting(SettingKind::Instruction, title).await
    }

    pub async fn delete_app(&self, title: &str) -> usize {
        self.delete_setting(SettingKind::App, title).await
    }

    pub async fn delete_resource(&self, title: &str) -> usize {
        self.delete_setting(SettingKind::Resource, title).await
    }

    /// Appends `item` to the current agent's list. Returns false when the
    /// agent has no settings.
    async fn add_setting(&self, kind: SettingKind, item: SettingItem) -> bool {
        let agent_id = {
            let mut state = self.state.write().await;
            let Some(agent) = state.current_agent_mut() else {
                return false;
            };
            let Some(settings) = agent.settings.as_mut() else {
                return false;
            };
            debug!(agent_id = %agent.id, "Adding {} '{}'", kind, item.title);
            settings.list_mut(kind).push(item);
            agent.id.clone()
        };

        self.schedule_highlight_clear(agent_id, kind);
        true
    }

    fn schedule_highlight_clear(&self, agent_id: String, kind: SettingKind) {
        let state = Arc::clone(&self.state);
        let delay = self.timing.highlight_delay();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.write().await;
            if let Some(settings) = state
                .agents
                .iter_mut()
                .find(|a| a.id == agent_id)
                .and_then(|a| a.settings.as_mut())
            {
                for item in settings.list_mut(kind).iter_mut() {
                    item.is_new = false;
                }
            }
        });
    }

    /// Removes every item titled `title`; returns how many were removed.
    async fn delete_setting(&self, kind: SettingKind, title: &str) -> usize {
        let mut state = self.state.write().await;
        let Some(settings) = state
            .current_agent_mut()
            .and_then(|a| a.settings.as_mut())
        else {
            return 0;
        };

        let list = settings.list_mut(kind);
        let before = list.len();
        list.retain(|item| item.title != title);
        before - list.len()
    }

    async fn begin_loading(&self) {
        let mut state = self.state.write().await;
        state.loading = true;
        state.error = None;
    }

    fn record_failure(state: &mut AgentsState, err: HubError) -> HubError {
        err.log();
        let message = err.display_message();
        state.error = Some(message.clone());
        state.requests.agents.fail(message);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockAgentsApi;
    use crate::forms::{ConnectorType, FileType};
    use crate::models::Sender;
    use std::time::Duration;

    async fn loaded_store(timing: MockConfig) -> AgentsStore {
        let store = AgentsStore::new(Arc::new(MockAgentsApi::instant()), timing);
        store.load_agents().await.unwrap();
        store.load_chats().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_load_populates_state() {
        let store = loaded_store(MockConfig::instant()).await;
        let state = store.state().await;

        assert_eq!(state.agents.len(), 2);
        assert_eq!(state.chats.len(), 2);
        assert!(!state.loading);
        assert_eq!(state.requests.agents.data.as_ref().map(Vec::len), Some(2));
        assert_eq!(store.current_agent().await.unwrap().id, "root");
        assert_eq!(store.agent_chats().await.len(), 2);
        assert!(store.active_chat().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_hello_creates_chat_then_one_reply() {
        let store = loaded_store(MockConfig::default()).await;

        store.send_message("hello").await.unwrap();

        let chat = store.active_chat().await.unwrap();
        assert!(chat.id.starts_with('c'));
        assert!(chat.title.starts_with("New chat – "));
        assert_eq!(chat.preview.as_deref(), Some("hello…"));
        assert_eq!(chat.messages, vec![Message::user("hello")]);
        assert_eq!(store.state().await.chats[0].id, chat.id);

        tokio::time::sleep(Duration::from_millis(350)).await;

        let chat = store.active_chat().await.unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[1].from, Sender::Agent);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.active_chat().await.unwrap().messages.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_reuses_active_chat() {
        let store = loaded_store(MockConfig::default()).await;
        store.set_active_chat_for_agent("root", Some("c1")).await;

        store.send_message("more please").await.unwrap();
        tokio::time::sleep(Duration::from_millis(350)).await;

        let state = store.state().await;
        assert_eq!(state.chats.len(), 2);
        assert_eq!(store.active_chat().await.unwrap().messages.len(), 4);
    }

    #[tokio::test]
    async fn test_send_blank_is_ignored() {
        let store = loaded_store(MockConfig::instant()).await;
        store.send_message("   ").await.unwrap();
        assert_eq!(store.state().await.chats.len(), 2);
        assert!(store.state().await.requests.send_message.data.is_none());
    }

    #[tokio::test]
    async fn test_send_without_agent_records_error() {
        let store = loaded_store(MockConfig::instant()).await;
        store.set_active_agent("ghost").await;

        assert!(store.send_message("hi").await.is_err());
        let state = store.state().await;
        assert!(state.requests.send_message.error.is_some());
        assert_eq!(state.chats.len(), 2);
    }

    #[tokio::test]
    async fn test_create_update_delete_agent() {
        let store = loaded_store(MockConfig::instant()).await;

        let agent = store
            .create_agent(NewAgent {
                name: "Writer".to_string(),
                role: "Copywriter".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(store.state().await.agents.len(), 3);

        let updated = store
            .update_agent(
                &agent.id,
                AgentPatch {
                    role: Some("Editor".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, "Editor");

        store.set_active_agent(&agent.id).await;
        store.delete_agent(&agent.id).await.unwrap();
        let state = store.state().await;
        assert_eq!(state.agents.len(), 2);
        assert_eq!(state.active_agent_id, DEFAULT_AGENT_ID);
    }

    #[tokio::test]
    async fn test_delete_fixed_agent_refused() {
        let store = loaded_store(MockConfig::instant()).await;

        let err = store.delete_agent("root").await.unwrap_err();
        assert!(matches!(err, HubError::AgentFixed(_)));

        let state = store.state().await;
        assert_eq!(state.agents.len(), 2);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_delete_unknown_agent() {
        let store = loaded_store(MockConfig::instant()).await;
        let err = store.delete_agent("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_instruction_highlight_clears() {
        let store = loaded_store(MockConfig::default()).await;

        assert!(
            store
                .add_instruction(NewInstruction {
                    title: "Formal tone".to_string(),
                    description: "Answer formally".to_string(),
                })
                .await
        );

        let agent = store.current_agent().await.unwrap();
        let added = agent.settings.unwrap().instructions.pop().unwrap();
        assert_eq!(added.note.as_deref(), Some("Answer formally"));
        assert!(added.is_new);

        tokio::time::sleep(Duration::from_millis(650)).await;
        let agent = store.current_agent().await.unwrap();
        assert!(agent
            .settings
            .unwrap()
            .instructions
            .iter()
            .all(|i| !i.is_new));
    }

    #[tokio::test]
    async fn test_add_app_and_resource_notes() {
        let store = loaded_store(MockConfig::instant()).await;

        store
            .add_app(NewApp {
                title: "Mailbox".to_string(),
                connector_type: ConnectorType::Email,
                config: serde_json::json!({"emailServer": "imap.example.com"}),
            })
            .await;
        store
            .add_resource(NewResource {
                name: "Finance".to_string(),
                folder: "/reports".to_string(),
                files: vec!["q3.xlsx".to_string(), "q3.pdf".to_string()],
                file_types: vec![FileType::Excel, FileType::Pdf],
            })
            .await;

        let settings = store.current_agent().await.unwrap().settings.unwrap();
        let app = settings.apps.last().unwrap();
        assert_eq!(app.note.as_deref(), Some("email connector"));
        let config: serde_json::Value =
            serde_json::from_str(app.config.as_deref().unwrap()).unwrap();
        assert_eq!(config["emailServer"], "imap.example.com");

        let resource = settings.resources.last().unwrap();
        assert_eq!(resource.note.as_deref(), Some("2 files, excel, pdf"));
        let config: serde_json::Value =
            serde_json::from_str(resource.config.as_deref().unwrap()).unwrap();
        assert_eq!(config["folder"], "/reports");
        assert_eq!(config["files"][1], "q3.pdf");
    }

    #[tokio::test]
    async fn test_delete_by_title_preserves_order() {
        let store = loaded_store(MockConfig::instant()).await;

        let removed = store.delete_app("SQL driver").await;
        assert_eq!(removed, 1);

        let titles: Vec<String> = store
            .current_agent()
            .await
            .unwrap()
            .settings
            .unwrap()
            .apps
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Outlook Connector (send/receive e-mail)",
                "LibreOffice Writer/Calc",
                "PDF engine",
                "Image (png/jpeg) ingest",
            ]
        );

        assert_eq!(store.delete_resource("no such resource").await, 0);
        assert_eq!(store.delete_instruction("Cite sources").await, 1);
    }

    #[tokio::test]
    async fn test_back_to_back_creates_get_distinct_ids() {
        let store = loaded_store(MockConfig::instant()).await;
        let new_agent = |name: &str| NewAgent {
            name: name.to_string(),
            role: "Helper".to_string(),
            ..Default::default()
        };

        let a = store.create_agent(new_agent("A")).await.unwrap();
        let b = store.create_agent(new_agent("B")).await.unwrap();
        assert_ne!(a.id, b.id);

        store.delete_agent(&a.id).await.unwrap();
        let names: Vec<String> = store
            .state()
            .await
            .agents
            .into_iter()
            .map(|agent| agent.name)
            .collect();
        assert_eq!(
            names,
            vec!["SimplyFire Lead Associate", "Financial Analyst", "B"]
        );

        store.set_active_chat_for_agent("root", None).await;
        store.send_message("hello").await.unwrap();
        store.set_active_agent("a_demo_1").await;
        store.send_message("hello").await.unwrap();

        let state = store.state().await;
        let root_chat = state.active_chat_by_agent["root"].clone().unwrap();
        let demo_chat = state.active_chat_by_agent["a_demo_1"].clone().unwrap();
        assert_ne!(root_chat, demo_chat);
        assert_eq!(state.chats.iter().filter(|c| c.id == demo_chat).count(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_title_removes_exact_matches_only() {
        let store = loaded_store(MockConfig::instant()).await;
        store.set_active_agent("a_demo_1").await;
        for title in ["Escalate", "escalate", "Escalate now", "Escalate"] {
            assert!(
                store
                    .add_instruction(NewInstruction {
                        title: title.to_string(),
                        description: "note".to_string(),
                    })
                    .await
            );
        }

        assert_eq!(store.delete_instruction("Escalate").await, 2);

        let titles: Vec<String> = store
            .current_agent()
            .await
            .unwrap()
            .settings
            .unwrap()
            .instructions
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Analytical tone",
                "Justify numbers",
                "escalate",
                "Escalate now",
            ]
        );
        assert_eq!(store.delete_instruction("Escalate").await, 0);
    }

    #[tokio::test]
    async fn test_settings_mutations_noop_without_settings() {
        let store = loaded_store(MockConfig::instant()).await;
        let agent = store
            .create_agent(NewAgent {
                name: "Bare".to_string(),
                role: "None".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        store.set_active_agent(&agent.id).await;

        let added = store
            .add_instruction(NewInstruction {
                title: "t".to_string(),
                description: "d".to_string(),
            })
            .await;
        assert!(!added);
        assert_eq!(store.delete_app("SQL driver").await, 0);
    }
}
