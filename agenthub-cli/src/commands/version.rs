use colored::Colorize;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

pub fn handle_version_command(detailed: bool) -> anyhow::Result<()> {
    if !detailed {
        println!("agenthub {}", VERSION);
        return Ok(());
    }

    println!("{}", "Agenthub Version Information".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  {:<15} {}", "Version:".bold(), VERSION);
    println!("  {:<15} {}", "Name:".bold(), NAME);
    println!("  {:<15} Apache-2.0", "License:".bold());
    println!();
    println!("  {}", "Build Information:".bold());
    println!("    Rust Edition: 2021");
    #[cfg(debug_assertions)]
    println!("    Build:        Debug");
    #[cfg(not(debug_assertions))]
    println!("    Build:        Release");
    Ok(())
}
