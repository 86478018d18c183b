//! Orchestration of the `scan` and `bump` subcommands.

pub mod bump;
pub mod scan;
