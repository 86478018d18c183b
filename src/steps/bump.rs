//! Orchestration logic for library bumps.
//!
//! All Makefile modifications go through a `Transaction` so a failed run can
//! be rolled back.

use crate::cli::BumpArgs;
use crate::config::BumpConfig;
use crate::error::{BumpError, Result};
use crate::fs::Transaction;
use crate::ports::{BuildTool, MakeTool, Port};
use crate::rewrite::stage_rewrites;
use crate::steps::scan::{print_ports, scan};
use crate::vcs::{Checkout, CvsCheckout};
use crate::verify::{confirm_operation, preflight_checks, print_plan};
use colored::Colorize;

/// Executes `portbump bump`.
///
/// ## Phases
///
/// 1. Build configuration and run pre-flight checks
/// 2. Walk the ports tree and select affected ports
/// 3. User confirmation (unless `--yes`)
/// 4. Check out the selected ports
/// 5. Stage Makefile rewrites in a transaction
/// 6. Commit, rolling back on failure
pub fn execute(args: BumpArgs) -> Result<()> {
    let work_dir = std::env::current_dir()?;
    let config = BumpConfig::from_args(&args, work_dir)?;

    let tool = MakeTool::new(&config.scan.make);
    let cvs = config.checkout.as_ref().map(CvsCheckout::new);

    run(
        &config,
        &tool,
        cvs.as_ref().map(|c| c as &dyn Checkout),
    )
    .map(|_| ())
}

/// Runs a bump with explicit collaborators.
///
/// Returns the ports that were (or, in dry-run, would be) rewritten.
pub fn run(
    config: &BumpConfig,
    tool: &dyn BuildTool,
    checkout: Option<&dyn Checkout>,
) -> Result<Vec<Port>> {
    preflight_checks(config)?;

    let tree = scan(&config.scan, tool)?;
    let ports = tree.ports;

    print_ports(&ports);
    if ports.is_empty() {
        return Ok(ports);
    }

    print_plan(config, &ports);

    if !confirm_operation(config)? {
        println!("\n{}", "Operation cancelled.".yellow());
        return Err(BumpError::Cancelled);
    }

    let origins: Vec<&str> = ports.iter().map(|p| p.origin.as_str()).collect();
    match checkout {
        Some(_) if config.dry_run => {
            log::info!("Would check out {} ports", origins.len());
        }
        Some(checkout) => {
            println!(
                "{:>12} {} ports",
                "Checking out".green().bold(),
                origins.len()
            );
            checkout.checkout(&origins)?;
        }
        None => log::debug!("Checkout skipped"),
    }

    let mut txn = Transaction::new(config.dry_run);

    if let Err(e) = stage_rewrites(&ports, &config.rewrite_root, &config.scan.tokens, &mut txn) {
        return handle_staging_error(e, config);
    }

    if let Err(e) = txn.commit() {
        return handle_commit_error(e, &mut txn);
    }

    if config.discard_backups && !config.dry_run {
        txn.discard_backups()?;
    }

    txn.print_summary(&config.rewrite_root);

    if !config.dry_run {
        println!(
            "\n{} {} in {} ports",
            "✓ Successfully bumped".green().bold(),
            config.scan.tokens.to_string().green().bold(),
            ports.len()
        );
    }

    Ok(ports)
}

fn handle_staging_error(e: BumpError, config: &BumpConfig) -> Result<Vec<Port>> {
    eprintln!("{} {}", "Error during rewrite:".red().bold(), e);

    if !config.dry_run {
        eprintln!("{} No Makefile was modified.", "ℹ".blue().bold());
    }

    Err(e)
}

fn handle_commit_error(e: BumpError, txn: &mut Transaction) -> Result<Vec<Port>> {
    eprintln!("{} {}", "Error during commit:".red().bold(), e);

    if txn.has_partial_changes() {
        eprintln!("{}", "Attempting to rollback changes...".yellow().bold());

        match txn.rollback() {
            Ok(_) => {
                eprintln!("{}", "✓ Rollback successful. Makefiles restored.".green());
            }
            Err(rollback_err) => {
                eprintln!("{} {}", "✗ Rollback failed:".red().bold(), rollback_err);
                eprintln!(
                    "{}",
                    "⚠ Manual intervention may be required.".yellow().bold()
                );
                eprintln!("Hint: look for Makefile.orig files in the rewrite root.");
            }
        }
    }

    Err(e)
}
