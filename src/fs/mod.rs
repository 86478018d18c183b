//! File system operations with transaction support.
//!
//! Provides backed-up file rewrites that can be committed or rolled back as
//! a unit.

pub mod transaction;

pub use transaction::{BACKUP_SUFFIX, Operation, Transaction, backup_path};
