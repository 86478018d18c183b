use crate::error::{BumpError, Result};
use crate::ports::RECIPE_FILE;
use std::path::{Path, PathBuf};

/// A port that depends on the library being bumped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// `category/name`
    pub origin: String,
    /// Current PORTREVISION (0 when unset).
    pub revision: u32,
    /// Dependency lists reference the library's port.
    pub needs_bump: bool,
    /// Makefile carries the old soname token.
    pub has_embedded_soname: bool,
}

impl Port {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            revision: 0,
            needs_bump: false,
            has_embedded_soname: false,
        }
    }

    /// Returns true if the rewrite phase has anything to do for this port.
    pub fn is_affected(&self) -> bool {
        self.needs_bump || self.has_embedded_soname
    }

    /// Fails when the current revision is already `u32::MAX`.
    pub fn next_revision(&self) -> Result<u32> {
        self.revision
            .checked_add(1)
            .ok_or_else(|| BumpError::InvalidRevision {
                origin: self.origin.clone(),
                value: self.revision.to_string(),
            })
    }

    /// Path of this port's Makefile under `root`.
    pub fn recipe_path(&self, root: &Path) -> PathBuf {
        recipe_path(root, &self.origin)
    }
}

/// Path of the Makefile for `origin` under `root`.
pub fn recipe_path(root: &Path, origin: &str) -> PathBuf {
    root.join(origin).join(RECIPE_FILE)
}
