//! Discovery-only run: report affected ports without touching anything.

use crate::cli::ScanArgs;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::ports::walk::TreeScan;
use crate::ports::{BuildTool, MakeTool, Port, walk_ports};
use crate::verify::check_ports_tree;
use colored::Colorize;

/// Executes `portbump scan`.
pub fn execute(args: ScanArgs) -> Result<()> {
    let config = ScanConfig::try_from(&args.library)?;
    let tool = MakeTool::new(&config.make);

    check_ports_tree(&config)?;
    let tree = scan(&config, &tool)?;
    print_ports(&tree.ports);

    println!(
        "\n{:>12} {} ports scanned, {} affected",
        "Finished".green().bold(),
        tree.visited,
        tree.ports.len()
    );

    Ok(())
}

/// Walks the tree, reporting already migrated ports.
pub fn scan(config: &ScanConfig, tool: &dyn BuildTool) -> Result<TreeScan> {
    println!(
        "{:>12} {} for {} ({})",
        "Scanning".green().bold(),
        config.ports_root.display(),
        config.target_origin,
        config.tokens
    );

    let tree = walk_ports(config, tool)?;

    for origin in &tree.migrated {
        println!(
            "{:>12} {} (already uses {})",
            "Skipped".yellow().bold(),
            origin,
            config.tokens.new_token()
        );
    }

    Ok(tree)
}

/// Prints one line per port: origin, revision change and soname rewrite.
pub fn print_ports(ports: &[Port]) {
    if ports.is_empty() {
        println!("\n{}", "No dependent ports found".yellow());
        return;
    }

    let width = ports.iter().map(|p| p.origin.len()).max().unwrap_or(0);

    println!();
    for port in ports {
        let revision = match port.next_revision() {
            Ok(next) if port.needs_bump => format!("PORTREVISION {} → {}", port.revision, next)
                .green()
                .to_string(),
            _ => format!("PORTREVISION {}", port.revision).dimmed().to_string(),
        };

        let soname = if port.has_embedded_soname {
            "soname".cyan().to_string()
        } else {
            String::new()
        };

        println!("   {:<width$}  {}  {}", port.origin, revision, soname, width = width);
    }
}
