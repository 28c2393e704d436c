#![allow(
    dead_code,
    unused_imports,
    unused_variables,
    unused_mut,
    clippy::too_many_arguments,
    clippy::needless_borrows_for_generic_args,
    clippy::useless_format,
    clippy::len_zero,
    clippy::format_in_format_args
)]

use std::process::ExitCode;

use agenthub_core::{logging, CliErrorDisplay, HubConfig, HubError};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::{
    handle_agents_command, handle_chat_command, handle_health_command, handle_tasks_command,
    handle_theme_command, handle_version_command, AgentsCommand, ChatCommand, TasksCommand,
    ThemeCommand,
};

#[derive(Parser)]
#[command(name = "agenthub")]
#[command(version)]
#[command(about = "Agenthub - talk to the agents and tasks of an AI hub")]
#[command(long_about = r#"
Agenthub talks to an AI hub backend. Tasks are created on the backend, which
spawns agents for them; a task's main agent answers over a streamed chat.

Use 'agenthub tasks create' to start a task, then 'agenthub chat stream' to
talk to it. 'agenthub health' checks that the backend is reachable.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Create and inspect tasks on the hub backend")]
    Tasks {
        #[command(subcommand)]
        action: Option<TasksCommand>,
    },

    #[command(about = "Chat with a task's main agent or a single agent")]
    Chat {
        #[command(subcommand)]
        action: ChatCommand,
    },

    #[command(about = "Browse the configurable agents")]
    Agents {
        #[command(subcommand)]
        action: Option<AgentsCommand>,
    },

    #[command(about = "Show or change the theme preference")]
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommand>,
    },

    #[command(about = "Check that the hub backend is reachable")]
    Health {
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<HubError>() {
                Some(hub) => eprint!(
                    "{}: {}",
                    "Error".red().bold(),
                    CliErrorDisplay::new(hub)
                ),
                None => eprintln!("{}: {:#}", "Error".red().bold(), e),
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable.
fn init_logging(config: &HubConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("agenthub=debug,agenthub_core=debug")
    } else {
        logging::env_filter(&config.logging, &["agenthub", "agenthub_core"])
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = HubConfig::load()?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Tasks { action } => handle_tasks_command(&config, action).await,
        Commands::Chat { action } => handle_chat_command(&config, action).await,
        Commands::Agents { action } => handle_agents_command(&config, action).await,
        Commands::Theme { action } => handle_theme_command(&config, action),
        Commands::Health { format } => handle_health_command(&config, &format).await,
        Commands::Version { detailed } => handle_version_command(detailed),
    }
}
