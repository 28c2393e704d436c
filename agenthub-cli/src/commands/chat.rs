use std::io::Write;

use agenthub_core::{HubClient, HubConfig, HubError, StreamEvent, TaskStore};
use clap::Subcommand;
use colored::Colorize;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::print_json;
use super::tasks::print_task;

#[derive(Subcommand)]
pub enum ChatCommand {
    #[command(about = "Send a message to a task and stream the main agent's reply")]
    Stream {
        #[arg(help = "Task id")]
        task_id: String,

        #[arg(help = "Message text")]
        message: String,

        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    #[command(about = "Send one message to an agent and print its answer")]
    Agent {
        #[arg(help = "Agent id")]
        agent_id: String,

        #[arg(help = "Message text")]
        message: String,

        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

pub async fn handle_chat_command(config: &HubConfig, cmd: ChatCommand) -> anyhow::Result<()> {
    let store = TaskStore::new(HubClient::new(config)?, &config.stream);

    match cmd {
        ChatCommand::Stream {
            task_id,
            message,
            format,
        } => cmd_chat_stream(&store, &task_id, &message, &format).await,
        ChatCommand::Agent {
            agent_id,
            message,
            format,
        } => cmd_chat_agent(&store, &agent_id, &message, &format).await,
    }
}

async fn cmd_chat_stream(
    store: &TaskStore,
    task_id: &str,
    message: &str,
    format: &str,
) -> anyhow::Result<()> {
    store.refresh_task(task_id).await?;
    store.set_active_task(task_id).await;

    let live = format != "json";
    let mut events = store.subscribe();
    let mut handle = store.start_stream(task_id, message).await;
    let mut printer = ChunkPrinter::default();

    let result = loop {
        tokio::select! {
            finished = &mut handle => break finished,
            received = events.recv() => match received {
                Ok(event) if live && event.task_id == task_id => printer.show(&event.event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => debug!("Skipped {} stream events", skipped),
                Err(RecvError::Closed) => {}
            },
        }
    };

    while let Ok(event) = events.try_recv() {
        if live && event.task_id == task_id {
            printer.show(&event.event);
        }
    }
    printer.end();

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(e.into()),
        Err(e) if e.is_cancelled() => {
            return Err(HubError::StreamCancelled(task_id.to_string()).into())
        }
        Err(e) => return Err(HubError::Internal(format!("Stream task failed: {}", e)).into()),
    }

    let state = store.state().await;
    let progress = state.progress(task_id);
    let task = state
        .task(task_id)
        .cloned()
        .ok_or_else(|| HubError::TaskNotFound(task_id.to_string()))?;

    if format == "json" {
        print_json(&serde_json::json!({
            "task_id": task.id,
            "chat_history": task.chat_history,
            "error": progress.error.clone(),
        }))?;
    } else {
        println!();
        print_task(&task);
    }

    match progress.error {
        Some(error) => Err(anyhow::anyhow!(error)),
        None => Ok(()),
    }
}

async fn cmd_chat_agent(
    store: &TaskStore,
    agent_id: &str,
    message: &str,
    format: &str,
) -> anyhow::Result<()> {
    let response = store.chat_with_agent(agent_id, message).await?;

    if format == "json" {
        return print_json(&serde_json::json!({
            "agent_id": agent_id,
            "response": response,
        }));
    }

    println!("{} {}", "agent ›".magenta().bold(), response);
    Ok(())
}

/// Prints cumulative chunks as they grow.
#[derive(Default)]
struct ChunkPrinter {
    shown: String,
}

impl ChunkPrinter {
    fn show(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Chunk(data) => {
                if let Some(rest) = data.text.strip_prefix(self.shown.as_str()) {
                    print!("{}", rest);
                } else {
                    print!("\n{}", data.text);
                }
                let _ = std::io::stdout().flush();
                self.shown = data.text.clone();
            }
            StreamEvent::AgentCreated(agent) => {
                let name = agent
                    .get("name")
                    .and_then(|n| n.as_str())
                    .unwrap_or("agent");
                eprintln!("{} {}", "+ agent".dimmed(), name);
            }
            StreamEvent::TaskCompleted(_) => self.end(),
            StreamEvent::Error(data) => {
                self.end();
                eprintln!("{} {}", "stream error:".red(), data.message);
            }
        }
    }

    fn end(&mut self) {
        if !self.shown.is_empty() {
            println!();
            self.shown.clear();
        }
    }
}
