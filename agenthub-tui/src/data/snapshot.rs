use agenthub_core::{AgentsState, AgentsStore, TaskStore, TasksState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    Idle,
    Loading,
    Success,
    Error,
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error)
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            LoadingState::Idle => "",
            LoadingState::Loading => "⟳",
            LoadingState::Success => "✓",
            LoadingState::Error => "✗",
        }
    }
}

/// Copy of both stores taken once per frame so rendering never awaits.
#[derive(Debug, Clone, Default)]
pub struct AppData {
    pub agents: AgentsState,
    pub tasks: TasksState,
}

impl AppData {
    pub async fn capture(agents: &AgentsStore, tasks: &TaskStore) -> Self {
        Self {
            agents: agents.state().await,
            tasks: tasks.state().await,
        }
    }

    pub fn loading_state(&self) -> LoadingState {
        if self.agents.loading || self.tasks.loading || self.agents.requests.is_any_loading() {
            LoadingState::Loading
        } else if self.agents.error.is_some() || self.tasks.error.is_some() {
            LoadingState::Error
        } else {
            LoadingState::Success
        }
    }

    /// First error worth surfacing in the footer.
    pub fn error(&self) -> Option<&str> {
        self.agents
            .error
            .as_deref()
            .or(self.tasks.error.as_deref())
    }

    pub fn is_streaming(&self) -> bool {
        self.tasks.streams.values().any(|p| p.is_streaming)
    }
}
