use agenthub_core::{HubClient, HubConfig};
use colored::Colorize;

use super::print_json;

pub async fn handle_health_command(config: &HubConfig, format: &str) -> anyhow::Result<()> {
    let client = HubClient::new(config)?;
    let health = client.health().await?;

    if format == "json" {
        return print_json(&health);
    }

    println!("{}", "Hub Backend".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  {:<11} {}", "URL:".bold(), client.base_url());
    println!("  {:<11} {}", "Status:".bold(), health.status.green());
    if let Some(timestamp) = &health.timestamp {
        println!("  {:<11} {}", "Timestamp:".bold(), timestamp);
    }
    Ok(())
}
