mod agents;
pub mod request_state;
mod tasks;
mod theme;

pub use agents::{AgentsState, AgentsStore, DEFAULT_AGENT_ID};
pub use request_state::{RequestState, RequestStates};
pub use tasks::{StreamProgress, TaskStore, TaskStreamEvent, TasksState};
pub use theme::{
    detect_system_theme, system_theme_from_colorfgbg, ThemeMode, ThemeState, ThemeStore,
    PREFERENCE_KEY,
};
