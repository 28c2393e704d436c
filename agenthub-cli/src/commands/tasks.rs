use agenthub_core::{
    AgentKind, AgentStatus, HubClient, HubConfig, Sender, Task, TaskAgent, TaskStatus, TaskStore,
};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use super::print_json;

#[derive(Subcommand)]
pub enum TasksCommand {
    #[command(about = "List all tasks")]
    List {
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    #[command(about = "Show one task with its agents and chat history")]
    Show {
        #[arg(help = "Task id")]
        id: String,

        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    #[command(about = "Create a task; the backend spawns its agents")]
    Create {
        #[arg(help = "Task title")]
        title: String,

        #[arg(short, long, default_value = "", help = "Task description")]
        description: String,

        #[arg(short, long, help = "First message for the main agent")]
        message: String,

        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    #[command(about = "List the agents working on a task")]
    Agents {
        #[arg(help = "Task id")]
        id: String,

        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

pub async fn handle_tasks_command(
    config: &HubConfig,
    cmd: Option<TasksCommand>,
) -> anyhow::Result<()> {
    let store = TaskStore::new(HubClient::new(config)?, &config.stream);

    match cmd.unwrap_or(TasksCommand::List {
        format: "text".to_string(),
    }) {
        TasksCommand::List { format } => cmd_tasks_list(&store, &format).await,
        TasksCommand::Show { id, format } => cmd_tasks_show(&store, &id, &format).await,
        TasksCommand::Create {
            title,
            description,
            message,
            format,
        } => cmd_tasks_create(&store, &title, &description, &message, &format).await,
        TasksCommand::Agents { id, format } => cmd_tasks_agents(&store, &id, &format).await,
    }
}

async fn cmd_tasks_list(store: &TaskStore, format: &str) -> anyhow::Result<()> {
    let tasks = store.list_tasks().await?;

    if format == "json" {
        return print_json(&tasks);
    }

    if tasks.is_empty() {
        println!("{}", "No tasks yet.".yellow());
        println!(
            "{}",
            "Run 'agenthub tasks create <title> --message <text>' to start one.".dimmed()
        );
        return Ok(());
    }

    println!("{}", "Tasks".cyan().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("ID").fg(Color::White),
            Cell::new("Title").fg(Color::White),
            Cell::new("Status").fg(Color::White),
            Cell::new("Agents").fg(Color::White),
            Cell::new("Messages").fg(Color::White),
            Cell::new("Updated").fg(Color::White),
        ]);

    for task in &tasks {
        table.add_row(vec![
            Cell::new(&task.id).fg(Color::DarkGrey),
            Cell::new(&task.title),
            status_cell(task.status),
            Cell::new(task.agents.len()),
            Cell::new(task.chat_history.len()),
            Cell::new(&task.updated_at).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} {}", "Total:".dimmed(), tasks.len());
    Ok(())
}

async fn cmd_tasks_show(store: &TaskStore, id: &str, format: &str) -> anyhow::Result<()> {
    let task = store.refresh_task(id).await?;

    if format == "json" {
        return print_json(&task);
    }

    print_task(&task);
    Ok(())
}

async fn cmd_tasks_create(
    store: &TaskStore,
    title: &str,
    description: &str,
    message: &str,
    format: &str,
) -> anyhow::Result<()> {
    let task = store
        .create_task_with_agents(title, description, message)
        .await?;

    if format == "json" {
        return print_json(&task);
    }

    println!(
        "{} Created task {} ({})",
        "✓".green().bold(),
        task.title.bold(),
        task.id.dimmed()
    );
    if let Some(main) = task.main_agent() {
        println!("  {} Main agent: {}", "→".blue(), main.name);
    }
    println!(
        "  {} agenthub chat stream {} \"<message>\"",
        "Next:".dimmed(),
        task.id
    );
    Ok(())
}

async fn cmd_tasks_agents(store: &TaskStore, id: &str, format: &str) -> anyhow::Result<()> {
    let agents = store.task_agents(id).await?;

    if format == "json" {
        return print_json(&agents);
    }

    if agents.is_empty() {
        println!("{}", "No agents on this task yet.".yellow());
        return Ok(());
    }

    println!("{}", agents_table(&agents));
    Ok(())
}

pub fn print_task(task: &Task) {
    println!("{}", task.title.cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  {:<13} {}", "ID:".bold(), task.id);
    println!("  {:<13} {}", "Status:".bold(), colored_status(task.status));
    if !task.description.is_empty() {
        println!("  {:<13} {}", "Description:".bold(), task.description);
    }
    println!("  {:<13} {}", "Created:".bold(), task.created_at);
    println!("  {:<13} {}", "Updated:".bold(), task.updated_at);

    if !task.agents.is_empty() {
        println!();
        println!("  {}", "Agents".yellow().bold());
        println!("{}", agents_table(&task.agents));
    }

    println!();
    println!("  {}", "Chat".yellow().bold());
    if task.chat_history.is_empty() {
        println!("    {}", "No messages".dimmed());
    }
    for message in &task.chat_history {
        let who = match message.from {
            Sender::User => "you".blue().bold(),
            Sender::Agent => "agent".magenta().bold(),
        };
        println!("    {:>5}  {}", who, message.text);
    }
}

fn agents_table(agents: &[TaskAgent]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("ID").fg(Color::White),
            Cell::new("Name").fg(Color::White),
            Cell::new("Role").fg(Color::White),
            Cell::new("Kind").fg(Color::White),
            Cell::new("Status").fg(Color::White),
        ]);

    for agent in agents {
        let kind = match agent.kind {
            AgentKind::Main => Cell::new("main").fg(Color::Cyan),
            AgentKind::Sub => Cell::new("sub"),
        };
        let status = match agent.status {
            AgentStatus::Active => Cell::new("active").fg(Color::Green),
            AgentStatus::Inactive => Cell::new("inactive").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(&agent.id).fg(Color::DarkGrey),
            Cell::new(&agent.name),
            Cell::new(&agent.role),
            kind,
            status,
        ]);
    }
    table
}

fn status_cell(status: TaskStatus) -> Cell {
    match status {
        TaskStatus::Pending => Cell::new("pending").fg(Color::Yellow),
        TaskStatus::InProgress => Cell::new("in progress").fg(Color::Blue),
        TaskStatus::Completed => Cell::new("completed").fg(Color::Green),
    }
}

fn colored_status(status: TaskStatus) -> colored::ColoredString {
    match status {
        TaskStatus::Pending => "pending".yellow(),
        TaskStatus::InProgress => "in progress".blue(),
        TaskStatus::Completed => "completed".green(),
    }
}
