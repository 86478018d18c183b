//! Makefile rewrites with explicit backup and rollback.
//!
//! Coordinates every recipe rewrite of a run so a failure can be undone.
//!
//! ## Execution Guarantees
//!
//! - **Backups**: Each Makefile is renamed to `Makefile.orig` before the new
//!   text is written to a freshly created file at the original path
//! - **Validation**: Pre-flight checks before any mutation, including refusing
//!   to clobber a backup left by an earlier run
//! - **Idempotency**: Files with unchanged content are skipped
//!
//! ## Phases
//!
//! 1. **Build**: Stage rewrites via `update_file()`
//! 2. **Validate**: Check paths exist, are writable, have no stale backup
//! 3. **Execute**: Back up and rewrite each file in staging order
//! 4. **Rollback** (on failure): Move backups over rewritten files, LIFO
//!
//! ## Example
//!
//! ```no_run
//! # use portbump::fs::Transaction;
//! # use std::path::PathBuf;
//! # fn example() -> portbump::error::Result<()> {
//! let mut txn = Transaction::new(false);
//!
//! txn.update_file(PathBuf::from("ports/www/bar/Makefile"), "PORTREVISION=\t1\n")?;
//!
//! if let Err(e) = txn.commit() {
//!     txn.rollback()?;
//!     return Err(e);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{BumpError, Result};

use colored::Colorize;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to a rewritten file's backup.
pub const BACKUP_SUFFIX: &str = ".orig";

/// A file rewrite that can be committed or rolled back.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Replace file contents, keeping the old file as a backup.
    UpdateFile {
        path: PathBuf,
        backup: PathBuf,
        new: Vec<u8>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    /// Staging operations.
    Building,
    /// All operations succeeded.
    Committed,
    /// Committed and backups removed; nothing left to roll back to.
    Finalized,
    /// Rolled back after commit or after a failed commit.
    RolledBack,
    /// Validation or execution failed.
    Failed,
}

/// Transaction coordinating every Makefile rewrite of a run.
///
/// Must be explicitly committed. If dropped without committing, logs a warning
/// (nothing was applied).
///
/// ## Dry-Run Mode
///
/// When `dry_run = true`, operations are staged and reported but not executed.
#[must_use = "Transaction must be committed or rolled back"]
pub struct Transaction {
    operations: Vec<Operation>,
    dry_run: bool,
    state: TransactionState,
    executed_indices: Vec<usize>,
}

/// Returns `path` with [`BACKUP_SUFFIX`] appended.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

impl Transaction {
    /// Creates a new transaction.
    pub fn new(dry_run: bool) -> Self {
        Self {
            operations: Vec::new(),
            dry_run,
            state: TransactionState::Building,
            executed_indices: Vec::new(),
        }
    }

    /// Validates all staged operations.
    ///
    /// Checks:
    /// - No duplicate file operations
    /// - Files still exist
    /// - Files are writable
    /// - No backup is already in place
    fn validate(&self) -> Result<()> {
        let mut file_paths = HashSet::new();

        for op in &self.operations {
            let Operation::UpdateFile { path, backup, .. } = op;

            if !file_paths.insert(path.clone()) {
                return Err(BumpError::Other(anyhow::anyhow!(
                    "Duplicate file operation: {}",
                    path.display()
                )));
            }

            if !path.exists() {
                return Err(BumpError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File no longer exists: {}", path.display()),
                )));
            }

            if let Ok(metadata) = fs::metadata(path) {
                if metadata.permissions().readonly() {
                    return Err(BumpError::Io(std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        format!("File is read-only: {}", path.display()),
                    )));
                }
            }

            if backup.exists() {
                return Err(BumpError::BackupExists(backup.clone()));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns true if successfully committed.
    pub fn is_committed(&self) -> bool {
        matches!(
            self.state,
            TransactionState::Committed | TransactionState::Finalized
        )
    }

    /// Returns true if some operation was applied before a failure.
    pub fn has_partial_changes(&self) -> bool {
        self.state == TransactionState::Failed && !self.executed_indices.is_empty()
    }

    /// Prints the rewritten files to stdout.
    ///
    /// Paths are relative to `root` with forward slashes.
    pub fn print_summary(&self, root: &Path) {
        if self.operations.is_empty() {
            println!("\n{}", "No changes needed".yellow());
            return;
        }

        let display_path = |path: &Path| -> String {
            let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
            relative.to_string_lossy().replace('\\', "/")
        };

        let mut files: Vec<String> = self
            .operations
            .iter()
            .map(|op| {
                let Operation::UpdateFile { path, .. } = op;
                display_path(path)
            })
            .collect();
        files.sort();

        if self.dry_run {
            println!("\n{}", "DRY RUN - No changes will be made".yellow().bold());
        } else {
            println!("\n{}", "Changes applied:".green().bold());
        }

        println!(
            "\n{} Makefiles ({} file{})",
            "📝".bold(),
            files.len(),
            if files.len() == 1 { "" } else { "s" }
        );
        for path in files.iter().take(10) {
            if self.dry_run {
                println!("   • {}", path.dimmed());
            } else {
                println!("   {} {}", "✓".green(), path.dimmed());
            }
        }
        if files.len() > 10 {
            println!(
                "   {} {} more...",
                if self.dry_run {
                    "•".to_string()
                } else {
                    "✓".green().to_string()
                },
                files.len() - 10
            );
        }

        println!();
        let num_ops = self.operations.len();
        if self.dry_run {
            println!(
                "{} {} will be modified. Run without {} to apply.",
                num_ops.to_string().cyan().bold(),
                if num_ops > 1 { "files" } else { "file" },
                "--dry-run".cyan()
            );
        } else if self.state == TransactionState::Finalized {
            println!(
                "{} Successfully rewrote {} files",
                "✓".green().bold(),
                num_ops
            );
        } else {
            println!(
                "{} Successfully rewrote {} files (originals kept as *{})",
                "✓".green().bold(),
                num_ops,
                BACKUP_SUFFIX
            );
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Building && !self.operations.is_empty() && !self.dry_run
        {
            log::warn!("Transaction dropped without commit");
        }
    }
}

impl Transaction {
    /// Stages a file rewrite.
    ///
    /// Reads current content and compares to `new_content`. If identical,
    /// skips (idempotent). Otherwise stages for commit.
    ///
    /// Contents are raw bytes; recipes need not be valid UTF-8.
    pub fn update_file(&mut self, path: PathBuf, new_content: impl Into<Vec<u8>>) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(BumpError::Other(anyhow::anyhow!(
                "Cannot modify transaction after commit/rollback"
            )));
        }

        log::debug!("Staging update for: {}", path.display());

        let new_content = new_content.into();
        let original = fs::read(&path).map_err(|e| {
            log::error!("Failed to read {}: {}", path.display(), e);
            BumpError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;

        if original == new_content {
            log::debug!("Content unchanged, skipping: {}", path.display());
            return Ok(());
        }

        if self.dry_run {
            log::info!("Would update: {}", path.display());
        }

        let backup = backup_path(&path);
        self.operations.push(Operation::UpdateFile {
            path,
            backup,
            new: new_content,
        });

        Ok(())
    }

    /// Commits all staged operations.
    ///
    /// Order:
    /// 1. Validate
    /// 2. For each file: rename to backup, then write the new content
    ///
    /// On failure the transaction is left in a failed state; call
    /// [`rollback`](Self::rollback) to restore what was already rewritten.
    pub fn commit(&mut self) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(BumpError::Other(anyhow::anyhow!(
                "Transaction already committed/rolled back"
            )));
        }

        if self.dry_run {
            self.state = TransactionState::Committed;
            return Ok(());
        }

        if let Err(e) = self.validate() {
            self.state = TransactionState::Failed;
            return Err(e);
        }

        for idx in 0..self.operations.len() {
            if let Err(e) = self.execute(idx) {
                self.state = TransactionState::Failed;
                return Err(e);
            }
        }

        self.state = TransactionState::Committed;
        Ok(())
    }

    fn execute(&mut self, idx: usize) -> Result<()> {
        let Some(Operation::UpdateFile {
            path, backup, new, ..
        }) = self.operations.get(idx)
        else {
            return Ok(());
        };

        fs::rename(path, backup).map_err(|e| {
            BumpError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to back up {}: {}", path.display(), e),
            ))
        })?;
        // From here on rollback has something to restore
        self.executed_indices.push(idx);

        write_fresh(path, new).map_err(|e| {
            BumpError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {}", path.display(), e),
            ))
        })?;

        log::debug!("Updated: {}", path.display());
        Ok(())
    }

    /// Restores every file touched by this transaction from its backup.
    ///
    /// Works after a successful commit or after a failed one. Reverses
    /// operations in LIFO order.
    pub fn rollback(&mut self) -> Result<()> {
        match self.state {
            TransactionState::Building => Ok(()),
            TransactionState::Committed if self.dry_run => Ok(()),
            TransactionState::Committed | TransactionState::Failed => self.rollback_executed(),
            TransactionState::Finalized => Err(BumpError::RollbackFailed(
                "backups were already discarded".to_string(),
            )),
            TransactionState::RolledBack => Err(BumpError::Other(anyhow::anyhow!(
                "Transaction already rolled back"
            ))),
        }
    }

    fn rollback_executed(&mut self) -> Result<()> {
        log::warn!("Rolling back {} files...", self.executed_indices.len());

        let mut errors = Vec::new();

        for &idx in self.executed_indices.iter().rev() {
            if let Some(Operation::UpdateFile { path, backup, .. }) = self.operations.get(idx) {
                if let Err(e) = fs::rename(backup, path) {
                    errors.push(format!("Failed to restore {}: {}", path.display(), e));
                } else {
                    log::debug!("Restored: {}", path.display());
                }
            }
        }

        if errors.is_empty() {
            self.executed_indices.clear();
            self.state = TransactionState::RolledBack;
            log::info!("Rollback completed");
            Ok(())
        } else {
            Err(BumpError::RollbackFailed(errors.join("; ")))
        }
    }

    /// Removes the backups of a committed transaction.
    ///
    /// After this the transaction can no longer be rolled back.
    pub fn discard_backups(&mut self) -> Result<()> {
        if self.state != TransactionState::Committed {
            return Err(BumpError::Other(anyhow::anyhow!(
                "Only a committed transaction can discard its backups"
            )));
        }

        if !self.dry_run {
            for op in &self.operations {
                let Operation::UpdateFile { backup, .. } = op;
                fs::remove_file(backup).map_err(|e| {
                    BumpError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to remove {}: {}", backup.display(), e),
                    ))
                })?;
                log::debug!("Removed backup: {}", backup.display());
            }
        }

        self.state = TransactionState::Finalized;
        Ok(())
    }
}

/// Writes `content` into a newly created file at `path`.
fn write_fresh(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content)?;
    writer.flush()
}
