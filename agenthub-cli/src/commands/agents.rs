use std::sync::Arc;

use agenthub_core::{
    Agent, AgentsStore, HubConfig, HubError, MockAgentsApi, MockConfig, SettingKind,
};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use super::print_json;

#[derive(Subcommand)]
pub enum AgentsCommand {
    #[command(about = "List configurable agents")]
    List {
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    #[command(about = "Show an agent with its instructions, apps and resources")]
    Show {
        #[arg(help = "Agent id")]
        id: String,

        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

pub async fn handle_agents_command(
    _config: &HubConfig,
    cmd: Option<AgentsCommand>,
) -> anyhow::Result<()> {
    // The agents service is in-memory; its demo latencies only matter to the TUI.
    let store = AgentsStore::new(
        Arc::new(MockAgentsApi::new(MockConfig::instant())),
        MockConfig::instant(),
    );
    store.load_agents().await?;

    match cmd.unwrap_or(AgentsCommand::List {
        format: "text".to_string(),
    }) {
        AgentsCommand::List { format } => cmd_agents_list(&store, &format).await,
        AgentsCommand::Show { id, format } => cmd_agents_show(&store, &id, &format).await,
    }
}

async fn cmd_agents_list(store: &AgentsStore, format: &str) -> anyhow::Result<()> {
    let state = store.state().await;

    if format == "json" {
        return print_json(&state.agents);
    }

    println!("{}", "Agents".cyan().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("ID").fg(Color::White),
            Cell::new("Name").fg(Color::White),
            Cell::new("Role").fg(Color::White),
            Cell::new("Instructions").fg(Color::White),
            Cell::new("Apps").fg(Color::White),
            Cell::new("Resources").fg(Color::White),
        ]);

    for agent in &state.agents {
        let name = if agent.fixed {
            Cell::new(format!("{} (fixed)", agent.name)).fg(Color::Cyan)
        } else {
            Cell::new(&agent.name)
        };
        table.add_row(vec![
            Cell::new(&agent.id).fg(Color::DarkGrey),
            name,
            Cell::new(&agent.role),
            Cell::new(setting_count(agent, SettingKind::Instruction)),
            Cell::new(setting_count(agent, SettingKind::App)),
            Cell::new(setting_count(agent, SettingKind::Resource)),
        ]);
    }

    println!("{table}");
    Ok(())
}

async fn cmd_agents_show(store: &AgentsStore, id: &str, format: &str) -> anyhow::Result<()> {
    let state = store.state().await;
    let agent = state
        .agents
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| HubError::AgentNotFound(id.to_string()))?;

    if format == "json" {
        return print_json(agent);
    }

    println!("{}", agent.name.cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  {:<8} {}", "ID:".bold(), agent.id);
    println!("  {:<8} {}", "Role:".bold(), agent.role);
    if let Some(desc) = &agent.desc {
        println!("  {:<8} {}", "About:".bold(), desc);
    }
    if agent.fixed {
        println!("  {}", "Fixed agent, cannot be deleted".dimmed());
    }

    let Some(settings) = &agent.settings else {
        return Ok(());
    };
    for (kind, heading) in [
        (SettingKind::Instruction, "Instructions"),
        (SettingKind::App, "Apps"),
        (SettingKind::Resource, "Resources"),
    ] {
        println!();
        println!("  {}", heading.yellow().bold());
        let items = settings.list(kind);
        if items.is_empty() {
            println!("    {}", "none".dimmed());
        }
        for item in items {
            match &item.note {
                Some(note) => println!("    • {}  {}", item.title, note.dimmed()),
                None => println!("    • {}", item.title),
            }
        }
    }
    Ok(())
}

fn setting_count(agent: &Agent, kind: SettingKind) -> usize {
    agent
        .settings
        .as_ref()
        .map(|s| s.list(kind).len())
        .unwrap_or(0)
}
