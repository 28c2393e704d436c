use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use agenthub_core::{
    AgentsStore, HubClient, HubConfig, MockAgentsApi, SettingKind, TaskStore, ThemeStore,
};
use anyhow::{Context, Result};
use crossterm::event;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::data::AppData;
use crate::events::{Action, EventHandler, InputMode};
use crate::theme::{Theme, ThemeManager};
use crate::ui::layout::MainLayout;
use crate::ui::views::setting_rows;
use crate::ui::widgets::{ConfirmDialog, DialogResult, DialogState, FormDialog, FormKind, FormOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Agents,
    Chat,
    Tasks,
    Help,
}

impl View {
    pub fn all() -> &'static [View] {
        &[View::Agents, View::Chat, View::Tasks, View::Help]
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Agents => "Agents",
            View::Chat => "Chat",
            View::Tasks => "Tasks",
            View::Help => "Help",
        }
    }

    pub fn index(&self) -> usize {
        View::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        View::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let views = View::all();
        views[(self.index() + 1) % views.len()]
    }

    pub fn prev(&self) -> View {
        let views = View::all();
        let idx = self.index();
        if idx == 0 {
            views[views.len() - 1]
        } else {
            views[idx - 1]
        }
    }
}

/// Which pane of a two-column view receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Detail,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub agent_index: usize,
    pub setting_index: usize,
    pub chat_index: usize,
    pub task_index: usize,
    pub focus: Focus,
    pub scroll: u16,
}

/// Deletion waiting on the confirm dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Agent { id: String, name: String },
    Setting { kind: SettingKind, title: String },
}

/// Result of a store operation that ran in the background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    Done(String),
    Failed(String),
}

pub struct App {
    pub should_quit: bool,
    pub current_view: View,
    pub state: AppState,
    pub data: AppData,
    pub theme_manager: ThemeManager,
    pub theme_store: ThemeStore,
    pub agents: AgentsStore,
    pub tasks: TaskStore,
    pub event_handler: EventHandler,
    pub dialog_state: DialogState,
    pub form: Option<FormDialog>,
    pub pending_delete: Option<PendingDelete>,
    pub input: String,
    pub status_message: Option<String>,
    pub tick: u64,
    tick_rate: Duration,
    ops_tx: mpsc::UnboundedSender<OpOutcome>,
    ops_rx: mpsc::UnboundedReceiver<OpOutcome>,
}

impl App {
    pub async fn new(config: &HubConfig) -> Result<Self> {
        let api = Arc::new(MockAgentsApi::new(config.mock.clone()));
        let agents = AgentsStore::new(api, config.mock.clone());

        let client = HubClient::new(config).context("Failed to create hub client")?;
        let tasks = TaskStore::new(client, &config.stream);

        let preference_path = config
            .preference_path()
            .unwrap_or_else(|| PathBuf::from("preferences.toml"));
        let theme_store = ThemeStore::init(preference_path);

        let mut app = Self::with_stores(agents, tasks, theme_store);
        app.tick_rate = config.tick_rate();
        Ok(app)
    }

    pub fn with_stores(agents: AgentsStore, tasks: TaskStore, theme_store: ThemeStore) -> Self {
        let theme_manager = ThemeManager::new(theme_store.current());
        let (ops_tx, ops_rx) = mpsc::unbounded_channel();

        Self {
            should_quit: false,
            current_view: View::Agents,
            state: AppState::default(),
            data: AppData::default(),
            status_message: Some(format!(
                "Welcome to Agenthub! {}. Press '?' for help.",
                theme_manager.mode().label()
            )),
            theme_manager,
            theme_store,
            agents,
            tasks,
            event_handler: EventHandler::new(),
            dialog_state: DialogState::new(),
            form: None,
            pending_delete: None,
            input: String::new(),
            tick: 0,
            tick_rate: Duration::from_millis(250),
            ops_tx,
            ops_rx,
        }
    }

    pub fn current_theme(&self) -> &dyn Theme {
        self.theme_manager.current_theme()
    }

    pub fn input_mode(&self) -> InputMode {
        self.event_handler.input_mode()
    }

    /// Loads agents, chats and tasks in the background.
    pub fn initialize_data(&self) {
        let agents = self.agents.clone();
        self.spawn_op(async move {
            if let Err(e) = agents.load_agents().await {
                return OpOutcome::Failed(e.display_message());
            }
            match agents.load_chats().await {
                Ok(()) => OpOutcome::Done("Agents loaded".to_string()),
                Err(e) => OpOutcome::Failed(e.display_message()),
            }
        });

        let tasks = self.tasks.clone();
        self.spawn_op(async move {
            match tasks.list_tasks().await {
                Ok(list) => OpOutcome::Done(format!("{} tasks", list.len())),
                Err(e) => OpOutcome::Failed(e.display_message()),
            }
        });
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        self.initialize_data();

        loop {
            self.tick = self.tick.wrapping_add(1);
            self.drain_ops();
            self.refresh_snapshot().await;

            terminal.draw(|frame| {
                MainLayout::render(frame, self);
            })?;

            if event::poll(self.tick_rate)? {
                let evt = event::read()?;
                if let Some(action) = self.event_handler.handle_event(evt) {
                    self.handle_action(action).await;
                }
            }

            if self.should_quit {
                break;
            }
        }

        self.tasks.clear_streaming_state().await;
        info!("TUI exited");
        Ok(())
    }

    pub async fn refresh_snapshot(&mut self) {
        self.data = AppData::capture(&self.agents, &self.tasks).await;
        self.clamp_selection();
    }

    /// Moves finished background results into the status line.
    pub fn drain_ops(&mut self) {
        while let Ok(outcome) = self.ops_rx.try_recv() {
            match outcome {
                OpOutcome::Done(message) => self.status_message = Some(message),
                OpOutcome::Failed(message) => {
                    warn!("Background operation failed: {}", message);
                    self.status_message = Some(format!("Error: {}", message));
                }
            }
        }
    }

    fn spawn_op<F>(&self, op: F)
    where
        F: Future<Output = OpOutcome> + Send + 'static,
    {
        let tx = self.ops_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(op.await);
        });
    }

    pub async fn handle_action(&mut self, action: Action) {
        debug!(?action, "Handling action");
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextView => self.switch_view(self.current_view.next()),
            Action::PrevView => self.switch_view(self.current_view.prev()),
            Action::GoToView(index) => {
                if let Some(view) = View::from_index(index) {
                    self.switch_view(view);
                }
            }
            Action::Help => self.switch_view(View::Help),
            Action::Up => self.move_selection(-1),
            Action::Down => self.move_selection(1),
            Action::Top => self.move_selection(i64::MIN),
            Action::Bottom => self.move_selection(i64::MAX),
            Action::Left => match self.form.as_mut() {
                Some(form) => form.cycle_connector(false),
                None if self.event_handler.input_mode() == InputMode::Normal => self.state.focus = Focus::List,
                None => {}
            },
            Action::Right => match self.form.as_mut() {
                Some(form) => form.cycle_connector(true),
                None if self.event_handler.input_mode() == InputMode::Normal => {
                    self.state.focus = Focus::Detail
                }
                None => {}
            },
            Action::Select => self.select().await,
            Action::Back => self.back().await,
            Action::Refresh => {
                self.status_message = Some("Refreshing…".to_string());
                self.initialize_data();
            }
            Action::ToggleTheme => self.toggle_theme(),
            Action::ResetTheme => self.reset_theme(),
            Action::New => self.new_item().await,
            Action::Delete => self.request_delete(),
            Action::CancelStream => self.cancel_stream().await,
            Action::AddInstruction => self.open_form(FormKind::Instruction),
            Action::AddApp => self.open_form(FormKind::App),
            Action::AddResource => self.open_form(FormKind::Resource),
            Action::StartInput => {
                if matches!(self.current_view, View::Chat | View::Tasks) {
                    self.event_handler.set_input_mode(InputMode::Editing);
                }
            }
            Action::InputChar(c) => match self.form.as_mut() {
                Some(form) => form.push_char(c),
                None => self.input.push(c),
            },
            Action::InputBackspace => match self.form.as_mut() {
                Some(form) => form.backspace(),
                None => {
                    self.input.pop();
                }
            },
            Action::InputSubmit => {
                if self.form.is_some() {
                    self.submit_form().await;
                } else {
                    self.submit_input().await;
                }
            }
            Action::InputCancel => {
                self.form = None;
                self.event_handler.set_input_mode(InputMode::Normal);
            }
            Action::NextField => {
                if let Some(form) = self.form.as_mut() {
                    form.next_field();
                }
            }
            Action::PrevField => {
                if let Some(form) = self.form.as_mut() {
                    form.prev_field();
                }
            }
            Action::DialogConfirm => self.dialog_state.confirm(),
            Action::DialogCancel => self.dialog_state.cancel(),
            Action::DialogSwitch => self.dialog_state.switch(),
            Action::DialogExecute => self.dialog_state.execute_selected(),
            Action::Resize { .. } => {}
        }

        if self.input_mode() == InputMode::Dialog && !self.dialog_state.is_open() {
            self.event_handler.set_input_mode(InputMode::Normal);
            self.resolve_dialog().await;
        }

        self.refresh_snapshot().await;
    }

    fn switch_view(&mut self, view: View) {
        self.current_view = view;
        self.state.focus = Focus::List;
        self.state.scroll = 0;
    }

    fn list_len(&self) -> usize {
        match (self.current_view, self.state.focus) {
            (View::Agents, Focus::List) => self.data.agents.agents.len(),
            (View::Agents, Focus::Detail) => self
                .data
                .agents
                .current_agent()
                .map(|a| setting_rows(a).len())
                .unwrap_or(0),
            (View::Chat, Focus::List) => self.data.agents.agent_chats().len(),
            (View::Tasks, Focus::List) => self.data.tasks.tasks.len(),
            _ => 0,
        }
    }

    fn move_selection(&mut self, delta: i64) {
        let scrolling = matches!(
            (self.current_view, self.state.focus),
            (View::Chat | View::Tasks, Focus::Detail) | (View::Help, _)
        );
        if scrolling {
            let next = (self.state.scroll as i64).saturating_add(delta).clamp(0, u16::MAX as i64);
            self.state.scroll = next as u16;
            return;
        }

        let max = self.list_len().saturating_sub(1) as i64;
        let index = match (self.current_view, self.state.focus) {
            (View::Agents, Focus::List) => &mut self.state.agent_index,
            (View::Agents, Focus::Detail) => &mut self.state.setting_index,
            (View::Chat, _) => &mut self.state.chat_index,
            _ => &mut self.state.task_index,
        };
        *index = (*index as i64).saturating_add(delta).clamp(0, max) as usize;
    }

    fn clamp_selection(&mut self) {
        let agents = self.data.agents.agents.len();
        let settings = self
            .data
            .agents
            .current_agent()
            .map(|a| setting_rows(a).len())
            .unwrap_or(0);
        let chats = self.data.agents.agent_chats().len();
        let tasks = self.data.tasks.tasks.len();

        self.state.agent_index = self.state.agent_index.min(agents.saturating_sub(1));
        self.state.setting_index = self.state.setting_index.min(settings.saturating_sub(1));
        self.state.chat_index = self.state.chat_index.min(chats.saturating_sub(1));
        self.state.task_index = self.state.task_index.min(tasks.saturating_sub(1));
    }

    async fn select(&mut self) {
        match self.current_view {
            View::Agents => {
                let Some(agent) = self.data.agents.agents.get(self.state.agent_index) else {
                    return;
                };
                let (id, name) = (agent.id.clone(), agent.name.clone());
                self.agents.set_active_agent(&id).await;
                self.state.setting_index = 0;
                self.state.chat_index = 0;
                self.state.focus = Focus::Detail;
                self.status_message = Some(format!("Active agent: {}", name));
            }
            View::Chat => {
                let chat_id = self
                    .data
                    .agents
                    .agent_chats()
                    .get(self.state.chat_index)
                    .map(|c| c.id.clone());
                let agent_id = self.data.agents.active_agent_id.clone();
                if let Some(chat_id) = chat_id {
                    self.agents
                        .set_active_chat_for_agent(&agent_id, Some(&chat_id))
                        .await;
                    self.state.scroll = 0;
                }
            }
            View::Tasks => {
                let Some(task) = self.data.tasks.tasks.get(self.state.task_index) else {
                    return;
                };
                let task_id = task.id.clone();
                self.tasks.set_active_task(&task_id).await;
                self.state.scroll = 0;

                let tasks = self.tasks.clone();
                self.spawn_op(async move {
                    match tasks.refresh_task(&task_id).await {
                        Ok(task) => OpOutcome::Done(format!("Opened '{}'", task.title)),
                        Err(e) => OpOutcome::Failed(e.display_message()),
                    }
                });
            }
            View::Help => {}
        }
    }

    async fn back(&mut self) {
        if self.state.focus == Focus::Detail {
            self.state.focus = Focus::List;
        } else if self.current_view == View::Chat {
            self.start_new_chat().await;
        }
    }

    /// Clears the active chat so the next message opens a new one.
    async fn start_new_chat(&mut self) {
        let agent_id = self.data.agents.active_agent_id.clone();
        self.agents.set_active_chat_for_agent(&agent_id, None).await;
        self.status_message = Some("New chat".to_string());
    }

    fn toggle_theme(&mut self) {
        match self.theme_store.toggle_theme() {
            Ok(mode) => {
                self.theme_manager.set_mode(mode);
                self.status_message = Some(mode.label().to_string());
            }
            Err(e) => {
                warn!("Failed to save theme preference: {}", e);
                self.status_message = Some(format!("Error: {}", e.display_message()));
            }
        }
    }

    fn reset_theme(&mut self) {
        match self.theme_store.reset_to_system() {
            Ok(()) => {
                let mode = self.theme_store.current();
                self.theme_manager.set_mode(mode);
                self.status_message = Some(format!("{} (system)", mode.label()));
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {}", e.display_message()));
            }
        }
    }

    async fn new_item(&mut self) {
        match self.current_view {
            View::Agents => self.open_form(FormKind::Agent),
            View::Chat => self.start_new_chat().await,
            View::Tasks => self.open_form(FormKind::Task),
            View::Help => {}
        }
    }

    fn open_form(&mut self, kind: FormKind) {
        let needs_agents_view = matches!(
            kind,
            FormKind::Instruction | FormKind::App | FormKind::Resource
        );
        if needs_agents_view && self.current_view != View::Agents {
            return;
        }
        self.form = Some(FormDialog::new(kind));
        self.event_handler.set_input_mode(InputMode::Form);
    }

    async fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let output = match form.submit() {
            Ok(output) => output,
            Err(e) => {
                debug!("Form rejected: {}", e);
                return;
            }
        };
        self.form = None;
        self.event_handler.set_input_mode(InputMode::Normal);

        match output {
            FormOutput::Agent(new_agent) => {
                let agents = self.agents.clone();
                self.spawn_op(async move {
                    match agents.create_agent(new_agent).await {
                        Ok(agent) => OpOutcome::Done(format!("Created agent '{}'", agent.name)),
                        Err(e) => OpOutcome::Failed(e.display_message()),
                    }
                });
            }
            FormOutput::Instruction(instruction) => {
                let title = instruction.title.clone();
                let added = self.agents.add_instruction(instruction).await;
                self.report_added("instruction", &title, added);
            }
            FormOutput::App(app) => {
                let title = app.title.clone();
                let added = self.agents.add_app(app).await;
                self.report_added("app", &title, added);
            }
            FormOutput::Resource(resource) => {
                let name = resource.name.clone();
                let added = self.agents.add_resource(resource).await;
                self.report_added("resource", &name, added);
            }
            FormOutput::Task {
                title,
                description,
                user_message,
            } => {
                let tasks = self.tasks.clone();
                self.switch_view(View::Tasks);
                self.spawn_op(async move {
                    let task = match tasks
                        .create_task_with_agents(&title, &description, &user_message)
                        .await
                    {
                        Ok(task) => task,
                        Err(e) => return OpOutcome::Failed(e.display_message()),
                    };
                    match tasks.stream_chat_message(&task.id, &user_message).await {
                        Ok(()) => OpOutcome::Done(format!("Task '{}' answered", task.title)),
                        Err(e) => OpOutcome::Failed(e.display_message()),
                    }
                });
            }
        }
    }

    fn report_added(&mut self, what: &str, title: &str, added: bool) {
        self.status_message = Some(if added {
            format!("Added {} '{}'", what, title)
        } else {
            format!("Active agent has no settings for {} '{}'", what, title)
        });
    }

    async fn submit_input(&mut self) {
        let text = self.input.trim().to_string();
        self.event_handler.set_input_mode(InputMode::Normal);
        if text.is_empty() {
            return;
        }

        match self.current_view {
            View::Chat => match self.agents.send_message(&text).await {
                Ok(()) => {
                    self.input.clear();
                    self.state.scroll = 0;
                }
                Err(e) => self.status_message = Some(format!("Error: {}", e.display_message())),
            },
            View::Tasks => {
                let Some(task_id) = self.data.tasks.active_task_id.clone() else {
                    self.status_message = Some("Select a task first".to_string());
                    return;
                };
                self.input.clear();
                let tasks = self.tasks.clone();
                self.spawn_op(async move {
                    match tasks.stream_chat_message(&task_id, &text).await {
                        Ok(()) => OpOutcome::Done("Reply received".to_string()),
                        Err(e) => OpOutcome::Failed(e.display_message()),
                    }
                });
            }
            _ => {}
        }
    }

    async fn cancel_stream(&mut self) {
        if self.current_view != View::Tasks {
            return;
        }
        if let Some(task_id) = self.data.tasks.active_task_id.clone() {
            if self.tasks.cancel_stream(&task_id).await {
                self.status_message = Some("Stream cancelled".to_string());
            }
        }
    }

    fn request_delete(&mut self) {
        if self.current_view != View::Agents {
            return;
        }

        let pending = match self.state.focus {
            Focus::List => {
                let Some(agent) = self.data.agents.agents.get(self.state.agent_index) else {
                    return;
                };
                if agent.fixed {
                    self.status_message = Some(format!("'{}' cannot be deleted", agent.name));
                    return;
                }
                PendingDelete::Agent {
                    id: agent.id.clone(),
                    name: agent.name.clone(),
                }
            }
            Focus::Detail => {
                let Some(agent) = self.data.agents.current_agent() else {
                    return;
                };
                let rows = setting_rows(agent);
                let Some((kind, item)) = rows.get(self.state.setting_index) else {
                    return;
                };
                PendingDelete::Setting {
                    kind: *kind,
                    title: item.title.clone(),
                }
            }
        };

        let (title, message) = match &pending {
            PendingDelete::Agent { name, .. } => {
                ("Delete agent".to_string(), format!("Delete '{}'?", name))
            }
            PendingDelete::Setting { kind, title } => {
                (format!("Delete {}", kind), format!("Delete '{}'?", title))
            }
        };
        self.pending_delete = Some(pending);
        self.dialog_state.show(ConfirmDialog::danger(title, message));
        self.event_handler.set_input_mode(InputMode::Dialog);
    }

    async fn resolve_dialog(&mut self) {
        let result = self.dialog_state.take_result();
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        if result != DialogResult::Confirmed {
            self.status_message = Some("Cancelled".to_string());
            return;
        }

        match pending {
            PendingDelete::Agent { id, name } => {
                let agents = self.agents.clone();
                self.spawn_op(async move {
                    match agents.delete_agent(&id).await {
                        Ok(()) => OpOutcome::Done(format!("Deleted '{}'", name)),
                        Err(e) => OpOutcome::Failed(e.display_message()),
                    }
                });
            }
            PendingDelete::Setting { kind, title } => {
                let removed = match kind {
                    SettingKind::Instruction => self.agents.delete_instruction(&title).await,
                    SettingKind::App => self.agents.delete_app(&title).await,
                    SettingKind::Resource => self.agents.delete_resource(&title).await,
                };
                self.status_message = Some(format!("Removed {} {}(s)", removed, kind));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenthub_core::{MockConfig, Sender, StreamConfig, ThemeMode};
    use tempfile::TempDir;

    fn test_app(dir: &TempDir) -> App {
        let agents = AgentsStore::new(Arc::new(MockAgentsApi::instant()), MockConfig::instant());
        let client = HubClient::new(&HubConfig::default()).unwrap();
        let tasks = TaskStore::new(client, &StreamConfig::default());
        let theme = ThemeStore::with_system(dir.path().join("preferences.toml"), ThemeMode::Dark);
        App::with_stores(agents, tasks, theme)
    }

    async fn loaded_app(dir: &TempDir) -> App {
        let mut app = test_app(dir);
        app.agents.load_agents().await.unwrap();
        app.agents.load_chats().await.unwrap();
        app.refresh_snapshot().await;
        app
    }

    async fn press(app: &mut App, actions: &[Action]) {
        for action in actions {
            app.handle_action(action.clone()).await;
        }
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Help.next(), View::Agents);
        assert_eq!(View::Agents.prev(), View::Help);
        assert_eq!(View::from_index(2), Some(View::Tasks));
        assert_eq!(View::from_index(9), None);
    }

    #[tokio::test]
    async fn test_theme_toggle_is_persisted() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        assert_eq!(app.theme_manager.mode(), ThemeMode::Dark);

        app.handle_action(Action::ToggleTheme).await;
        assert_eq!(app.theme_manager.mode(), ThemeMode::Light);
        assert_eq!(app.status_message.as_deref(), Some("Light theme"));

        let reopened = ThemeStore::with_system(dir.path().join("preferences.toml"), ThemeMode::Dark);
        assert_eq!(reopened.current(), ThemeMode::Light);

        app.handle_action(Action::ResetTheme).await;
        assert_eq!(app.theme_manager.mode(), ThemeMode::Dark);
    }

    #[tokio::test]
    async fn test_view_switching_resets_focus() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        press(&mut app, &[Action::Right, Action::NextView]).await;
        assert_eq!(app.current_view, View::Chat);
        assert_eq!(app.state.focus, Focus::List);

        press(&mut app, &[Action::GoToView(3)]).await;
        assert_eq!(app.current_view, View::Help);
    }

    #[tokio::test]
    async fn test_fixed_agent_cannot_be_deleted() {
        let dir = TempDir::new().unwrap();
        let mut app = loaded_app(&dir).await;

        press(&mut app, &[Action::Delete]).await;
        assert!(!app.dialog_state.is_open());
        assert!(app.pending_delete.is_none());
    }

    #[tokio::test]
    async fn test_delete_setting_after_confirm() {
        let dir = TempDir::new().unwrap();
        let mut app = loaded_app(&dir).await;

        press(&mut app, &[Action::Right, Action::Delete]).await;
        assert_eq!(app.input_mode(), InputMode::Dialog);
        assert_eq!(
            app.pending_delete,
            Some(PendingDelete::Setting {
                kind: SettingKind::Instruction,
                title: "Business tone".to_string(),
            })
        );

        press(&mut app, &[Action::DialogConfirm]).await;
        assert_eq!(app.input_mode(), InputMode::Normal);
        let agent = app.data.agents.current_agent().unwrap();
        let titles: Vec<&str> = setting_rows(agent)
            .iter()
            .map(|(_, item)| item.title.as_str())
            .collect();
        assert!(!titles.contains(&"Business tone"));
        assert_eq!(titles[0], "Short, concise answers");
    }

    #[tokio::test]
    async fn test_cancelled_dialog_keeps_setting() {
        let dir = TempDir::new().unwrap();
        let mut app = loaded_app(&dir).await;

        press(&mut app, &[Action::Right, Action::Delete, Action::DialogCancel]).await;
        assert!(app.pending_delete.is_none());
        let agent = app.data.agents.current_agent().unwrap();
        assert_eq!(setting_rows(agent)[0].1.title, "Business tone");
    }

    #[tokio::test]
    async fn test_add_instruction_form() {
        let dir = TempDir::new().unwrap();
        let mut app = loaded_app(&dir).await;

        press(&mut app, &[Action::AddInstruction]).await;
        assert_eq!(app.input_mode(), InputMode::Form);

        let mut actions: Vec<Action> = "Escalate".chars().map(Action::InputChar).collect();
        actions.push(Action::NextField);
        actions.extend("Page on-call".chars().map(Action::InputChar));
        actions.push(Action::InputSubmit);
        press(&mut app, &actions).await;

        assert!(app.form.is_none());
        assert_eq!(app.input_mode(), InputMode::Normal);
        let agent = app.data.agents.current_agent().unwrap();
        let added = agent
            .settings
            .as_ref()
            .unwrap()
            .instructions
            .iter()
            .find(|i| i.title == "Escalate")
            .unwrap();
        assert_eq!(added.note.as_deref(), Some("Page on-call"));
    }

    #[tokio::test]
    async fn test_invalid_form_stays_open() {
        let dir = TempDir::new().unwrap();
        let mut app = loaded_app(&dir).await;

        press(&mut app, &[Action::AddInstruction, Action::InputSubmit]).await;
        assert!(app.form.is_some());
        assert!(app.form.as_ref().unwrap().error.is_some());
    }

    #[tokio::test]
    async fn test_send_hello_starts_chat() {
        let dir = TempDir::new().unwrap();
        let mut app = loaded_app(&dir).await;

        press(&mut app, &[Action::GoToView(1), Action::New, Action::StartInput]).await;
        assert_eq!(app.input_mode(), InputMode::Editing);

        let mut actions: Vec<Action> = "hello".chars().map(Action::InputChar).collect();
        actions.push(Action::InputSubmit);
        press(&mut app, &actions).await;

        assert!(app.input.is_empty());
        let chat = app.data.agents.active_chat().unwrap();
        assert_eq!(chat.messages[0].from, Sender::User);
        assert_eq!(chat.messages[0].text, "hello");
        assert_eq!(app.data.agents.agent_chats().len(), 3);
    }

    #[tokio::test]
    async fn test_task_message_without_task() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        press(
            &mut app,
            &[
                Action::GoToView(2),
                Action::StartInput,
                Action::InputChar('x'),
                Action::InputSubmit,
            ],
        )
        .await;
        assert_eq!(app.status_message.as_deref(), Some("Select a task first"));
    }
}
