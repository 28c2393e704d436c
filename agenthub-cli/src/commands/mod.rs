use serde::Serialize;

pub mod agents;
pub mod chat;
pub mod health;
pub mod tasks;
pub mod theme;
pub mod version;

pub use agents::{handle_agents_command, AgentsCommand};
pub use chat::{handle_chat_command, ChatCommand};
pub use health::handle_health_command;
pub use tasks::{handle_tasks_command, TasksCommand};
pub use theme::{handle_theme_command, ThemeCommand};
pub use version::handle_version_command;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
