mod agents;
mod chat;
mod help;
mod tasks;

pub use agents::{setting_rows, AgentsView};
pub use chat::{message_lines, ChatView};
pub use help::{HelpView, KEYBINDS};
pub use tasks::TasksView;
