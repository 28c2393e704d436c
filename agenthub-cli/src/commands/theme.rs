use std::path::PathBuf;

use agenthub_core::{HubConfig, HubError, ThemeMode, ThemeStore};
use clap::Subcommand;
use colored::Colorize;

use super::print_json;

#[derive(Subcommand)]
pub enum ThemeCommand {
    #[command(about = "Show the current theme and where it comes from")]
    Show {
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    #[command(about = "Save a theme preference")]
    Set {
        #[arg(help = "dark or light")]
        mode: ThemeMode,
    },

    #[command(about = "Switch between dark and light and save the choice")]
    Toggle,

    #[command(about = "Forget the saved preference and follow the terminal")]
    Reset,
}

pub fn handle_theme_command(config: &HubConfig, cmd: Option<ThemeCommand>) -> anyhow::Result<()> {
    let path = config.preference_path().ok_or_else(|| HubError::InvalidConfigValue {
        key: "theme.preference_file".to_string(),
        message: "No config directory found; set AGENTHUB_PREFERENCE_FILE".to_string(),
    })?;
    let mut store = ThemeStore::init(path);

    match cmd.unwrap_or(ThemeCommand::Show {
        format: "text".to_string(),
    }) {
        ThemeCommand::Show { format } => cmd_theme_show(&store, &format),
        ThemeCommand::Set { mode } => {
            store.set_theme(mode)?;
            println!("{} {}", "✓".green().bold(), mode.label());
            Ok(())
        }
        ThemeCommand::Toggle => {
            let mode = store.toggle_theme()?;
            println!("{} {}", "✓".green().bold(), mode.label());
            Ok(())
        }
        ThemeCommand::Reset => {
            store.reset_to_system()?;
            println!(
                "{} {} (following the terminal)",
                "✓".green().bold(),
                store.current().label()
            );
            Ok(())
        }
    }
}

fn cmd_theme_show(store: &ThemeStore, format: &str) -> anyhow::Result<()> {
    let state = store.state();

    if format == "json" {
        return print_json(&serde_json::json!({
            "current": state.current,
            "system": state.system,
            "user_preference": state.user_preference,
            "path": store.path().display().to_string(),
        }));
    }

    let source = match state.user_preference {
        Some(_) => "saved preference",
        None => "system",
    };
    println!("{} ({})", state.current.label().bold(), source.dimmed());
    println!("  {} {}", "File:".dimmed(), store.path().display());
    Ok(())
}
