//! User confirmation prompt for bump operations.
//!
//! Displays the plan and waits for confirmation. Skipped with `--yes` or
//! `--dry-run`; declined automatically when stdin is not a terminal.

use crate::config::BumpConfig;
use crate::error::Result;
use crate::ports::Port;
use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// Prints the bump plan.
pub fn print_plan(config: &BumpConfig, ports: &[Port]) {
    let bumps = ports.iter().filter(|p| p.needs_bump).count();
    let sonames = ports.iter().filter(|p| p.has_embedded_soname).count();

    println!("\n{}", "Bump Plan:".bold().cyan());
    println!("  {} {}", "Library:".bold(), config.scan.tokens);
    println!("  {} {}", "Port:".bold(), config.scan.target_origin);
    println!("  {} Bump PORTREVISION in {} port(s)", "✓".green(), bumps);
    println!("  {} Rewrite soname in {} port(s)", "✓".green(), sonames);

    match &config.checkout {
        Some(checkout) => println!(
            "  {} Check out {} port(s) from {}",
            "✓".green(),
            ports.len(),
            checkout.root
        ),
        None => println!("  {} Rewrite in place", "✓".green()),
    }
    println!(
        "  {} Rewrite under {}",
        "✓".green(),
        config.rewrite_root.display()
    );
}

/// Prompts the user for confirmation before checking out and rewriting.
///
/// # Returns
///
/// - `Ok(true)` if user confirms or prompt is skipped
/// - `Ok(false)` if user declines or stdin is not interactive
pub fn confirm_operation(config: &BumpConfig) -> Result<bool> {
    if config.assume_yes || config.dry_run {
        return Ok(true);
    }

    if !io::stdin().is_terminal() {
        log::warn!("Non-interactive terminal detected. Use --yes to confirm automatically.");
        return Ok(false);
    }

    print!("\n{} [y/N] ", "Continue?".bold());
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;

    Ok(response.trim().eq_ignore_ascii_case("y"))
}
