use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portbump", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every port affected by a shared library version change.
    Scan(ScanArgs),
    /// Check out and rewrite every port affected by a shared library version change.
    Bump(BumpArgs),
}

impl Command {
    pub fn verbosity(&self) -> u8 {
        match self {
            Command::Scan(args) => args.library.verbose,
            Command::Bump(args) => args.library.verbose,
        }
    }
}

/// How BUILD_DEPENDS and RUN_DEPENDS references decide a revision bump.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependencyRule {
    /// A reference in either list is enough
    #[default]
    Either,
    /// The origin must appear in both lists
    Both,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct LibraryArgs {
    /// Origin of the port holding the library (e.g. devel/libfoo)
    #[arg(long, value_name = "ORIGIN")]
    pub port_origin: String,

    /// Library name as it appears in dependency lines (e.g. libfoo.so)
    #[arg(long, value_name = "NAME")]
    pub lib_name: String,

    /// Library version being replaced
    #[arg(long, value_name = "VERSION")]
    pub lib_old_version: String,

    /// Library version being introduced
    #[arg(long, value_name = "VERSION")]
    pub lib_new_version: String,

    /// Root of the ports tree to scan
    #[arg(long, value_name = "PATH", default_value = "/usr/ports")]
    pub ports_path: PathBuf,

    /// Ports build tool used to query port variables
    #[arg(long, value_name = "PROGRAM", default_value = "make")]
    pub make: PathBuf,

    /// Which build/run dependency references force a revision bump
    #[arg(long, value_enum, default_value_t = DependencyRule::Either)]
    pub dependency_rule: DependencyRule,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub library: LibraryArgs,
}

#[derive(Args, Debug, Clone)]
pub struct BumpArgs {
    #[command(flatten)]
    pub library: LibraryArgs,

    /// User name for the CVS checkout
    #[arg(long, value_name = "USER", env = "USER")]
    pub user_name: Option<String>,

    /// Checkout program
    #[arg(long, value_name = "PROGRAM", default_value = "cvs")]
    pub cvs: PathBuf,

    /// CVS root (defaults to <user>@pcvs.FreeBSD.org:/home/pcvs)
    #[arg(long, value_name = "CVSROOT")]
    pub cvs_root: Option<String>,

    /// Skip the checkout and rewrite the scanned tree in place
    #[arg(long)]
    pub no_checkout: bool,

    /// Directory whose <category>/<port>/Makefile files are rewritten
    ///
    /// Defaults:
    ///   with checkout       ./ports (the checkout destination)
    ///   with --no-checkout  the --ports-path tree
    #[arg(long, value_name = "PATH", verbatim_doc_comment)]
    pub rewrite_root: Option<PathBuf>,

    /// Show what would change without checking out or rewriting anything
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Skip the interactive confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Remove Makefile.orig backups once every rewrite succeeded
    #[arg(long)]
    pub discard_backups: bool,
}
