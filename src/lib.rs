#![doc = include_str!("../README.md")]

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod ports;
pub mod rewrite;
pub mod steps;
pub mod vcs;
pub mod verify;

pub use error::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use cli::{Cli, Command};

    let cli = Cli::parse();
    init_logger(cli.command.verbosity());

    match cli.command {
        Command::Scan(args) => steps::scan::execute(args),
        Command::Bump(args) => steps::bump::execute(args),
    }
}

fn init_logger(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    // RUST_LOG still wins when set
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
