//! Textual scan of a port's Makefile.
//!
//! Only lines mentioning the target origin are considered. Nothing is parsed;
//! a line either contains the origin substring or it doesn't.

use crate::error::{BumpError, Result};
use crate::ports::SonameTokens;
use regex::bytes::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// What a Makefile says about the target port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeScan {
    /// Some line mentions the target origin.
    pub references_target: bool,
    /// A line mentioning the target origin also carries the old soname.
    pub contains_old_token: bool,
    /// A line mentioning the target origin already carries the new soname.
    pub contains_new_token: bool,
}

impl RecipeScan {
    /// Returns true if the recipe points at the new soname only.
    pub fn is_already_migrated(&self) -> bool {
        self.contains_new_token && !self.contains_old_token
    }
}

/// Scans Makefiles for references to one target origin.
///
/// Lines are raw bytes; a Makefile with Latin-1 or EUC-JP comments scans like
/// any other.
pub struct RecipeScanner<'a> {
    origin: Regex,
    tokens: &'a SonameTokens,
}

impl<'a> RecipeScanner<'a> {
    pub fn new(target_origin: &str, tokens: &'a SonameTokens) -> Result<Self> {
        Ok(Self {
            origin: Regex::new(&regex::escape(target_origin))?,
            tokens,
        })
    }

    /// Scans the Makefile at `path`.
    ///
    /// Any read failure aborts the scan; there is no partial result.
    pub fn scan(&self, path: &Path) -> Result<RecipeScan> {
        let file = File::open(path).map_err(|e| {
            BumpError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open {}: {}", path.display(), e),
            ))
        })?;

        let mut scan = RecipeScan::default();

        for line in BufReader::new(file).split(b'\n') {
            let line = line.map_err(|e| {
                BumpError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read {}: {}", path.display(), e),
                ))
            })?;

            if !self.origin.is_match(&line) {
                continue;
            }

            scan.references_target = true;
            if self.tokens.has_old(&line) {
                scan.contains_old_token = true;
            }
            if self.tokens.has_new(&line) {
                scan.contains_new_token = true;
            }
        }

        Ok(scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tokens() -> SonameTokens {
        SonameTokens::new("libfoo.so", "3", "4").unwrap()
    }

    fn scan_text(text: impl AsRef<[u8]>) -> RecipeScan {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Makefile");
        fs::write(&path, text).unwrap();

        let tokens = tokens();
        RecipeScanner::new("devel/libfoo", &tokens)
            .unwrap()
            .scan(&path)
            .unwrap()
    }

    #[test]
    fn test_no_reference() {
        let scan = scan_text("PORTNAME=\tbar\nPORTVERSION=\t1.0\n");
        assert_eq!(scan, RecipeScan::default());
    }

    #[test]
    fn test_reference_without_old_token() {
        let scan = scan_text("LIB_DEPENDS=\tlibfoo.so:devel/libfoo\n");
        assert!(scan.references_target);
        assert!(!scan.contains_old_token);
    }

    #[test]
    fn test_reference_with_old_token() {
        let scan = scan_text("LIB_DEPENDS=\tlibfoo.so.3:devel/libfoo\n");
        assert!(scan.references_target);
        assert!(scan.contains_old_token);
        assert!(!scan.is_already_migrated());
    }

    #[test]
    fn test_old_token_on_unrelated_line_is_ignored() {
        let scan = scan_text("# links libfoo.so.3\nBUILD_DEPENDS=\tfoo:devel/libfoo\n");
        assert!(scan.references_target);
        assert!(!scan.contains_old_token);
    }

    #[test]
    fn test_already_migrated() {
        let scan = scan_text("LIB_DEPENDS=\tlibfoo.so.4:devel/libfoo\n");
        assert!(scan.is_already_migrated());
    }

    #[test]
    fn test_last_line_without_newline() {
        let scan = scan_text("PORTNAME=\tbar\nLIB_DEPENDS=\tlibfoo.so.3:devel/libfoo");
        assert!(scan.contains_old_token);
    }

    #[test]
    fn test_latin1_makefile() {
        let scan = scan_text(b"# Maintainer: Ren\xe9\nLIB_DEPENDS=\tlibfoo.so.3:devel/libfoo\n");
        assert!(scan.references_target);
        assert!(scan.contains_old_token);
    }

    #[test]
    fn test_non_utf8_on_matching_line() {
        let scan = scan_text(b"LIB_DEPENDS=\tlibfoo.so.3:devel/libfoo # \xa4\xb3\n");
        assert!(scan.contains_old_token);
    }

    #[test]
    fn test_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let tokens = tokens();
        let scanner = RecipeScanner::new("devel/libfoo", &tokens).unwrap();

        let result = scanner.scan(&temp.path().join("Makefile"));
        assert!(matches!(result, Err(BumpError::Io(_))));
    }
}
