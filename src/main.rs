//! Binary entry point for `portbump`.

use colored::Colorize;
use std::process;

fn main() {
    if let Err(e) = portbump::run() {
        if !matches!(e, portbump::BumpError::Cancelled) {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        process::exit(1);
    }
}
