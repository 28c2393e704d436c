#![allow(
    clippy::needless_borrows_for_generic_args,
    clippy::manual_range_contains,
    clippy::derivable_impls,
    clippy::type_complexity,
    clippy::len_zero,
    dead_code,
    unused_imports,
    unused_variables,
    unused_mut
)]

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod logging;
pub mod models;
pub mod stores;
pub mod stream;

pub use api::{AgentsApi, HealthStatus, HubClient, MockAgentsApi, NO_RESPONSE};
pub use config::{
    ensure_config_dir, ensure_data_dir, get_config_dir, get_data_dir, ApiConfig, ConfigLoadError,
    HubConfig, LoggingConfig, MockConfig, StreamConfig, ThemeConfig, TuiConfig,
};
pub use error::{CliErrorDisplay, ErrorContext, HubError, HubResult};
pub use forms::{
    AppForm, ConnectorType, FileType, FormError, InstructionForm, NewApp, NewInstruction,
    NewResource, ResourceForm,
};
pub use models::{
    Agent, AgentKind, AgentPatch, AgentSettings, AgentStatus, Chat, ChatMessage, Message,
    NewAgent, Sender, SettingItem, SettingKind, Task, TaskAgent, TaskCreate, TaskStatus,
};
pub use stores::{
    AgentsState, AgentsStore, RequestState, RequestStates, StreamProgress, TaskStore,
    TaskStreamEvent, TasksState, ThemeMode, ThemeState, ThemeStore, DEFAULT_AGENT_ID,
};
pub use stream::{FrameDecoder, StreamEvent};
