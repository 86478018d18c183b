//! Line-oriented Makefile rewriting.
//!
//! Each port's Makefile is rewritten line by line, preserving everything that
//! isn't touched:
//!
//! ```text
//! PORTNAME=       bar                     PORTNAME=       bar
//! PORTVERSION=    1.0                     PORTVERSION=    1.0
//! PORTREVISION=   2               →       PORTREVISION=	3
//! LIB_DEPENDS=    libfoo.so.3:...         LIB_DEPENDS=    libfoo.so.4:...
//! ```
//!
//! The old PORTREVISION line is dropped wherever it is and a fresh one is
//! emitted right after each PORTVERSION/DISTVERSION assignment.

use crate::error::{BumpError, Result};
use crate::fs::Transaction;
use crate::ports::{Port, SonameTokens};
use regex::bytes::Regex;
use std::fs;
use std::path::Path;

/// Keyword of the revision marker line.
pub const REVISION_KEYWORD: &str = "PORTREVISION";

/// Keywords that declare a port's upstream version.
pub const VERSION_KEYWORDS: [&str; 2] = ["PORTVERSION", "DISTVERSION"];

/// Compiled keyword patterns.
///
/// Keywords only count at column 0 and when followed by an assignment, so
/// `DISTVERSIONPREFIX=` is left alone.
pub struct RecipeRewriter {
    revision_line: Regex,
    version_line: Regex,
}

impl RecipeRewriter {
    pub fn new() -> Result<Self> {
        let assignment = r"[ \t]*[?:+!]?=";

        Ok(Self {
            revision_line: Regex::new(&format!(
                "^{}{}",
                regex::escape(REVISION_KEYWORD),
                assignment
            ))?,
            version_line: Regex::new(&format!(
                "^(?:{}){}",
                VERSION_KEYWORDS.join("|"),
                assignment
            ))?,
        })
    }

    /// Returns the rewritten Makefile bytes for `port`.
    pub fn rewrite(&self, content: &[u8], port: &Port, tokens: &SonameTokens) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(content.len() + 32);
        let marker = if port.needs_bump {
            revision_line(port.next_revision()?)
        } else {
            String::new()
        };

        for line in content.split_inclusive(|&b| b == b'\n') {
            if port.needs_bump && self.revision_line.is_match(line) {
                continue;
            }

            if port.has_embedded_soname {
                out.extend_from_slice(&tokens.substitute(line));
            } else {
                out.extend_from_slice(line);
            }

            if port.needs_bump && self.version_line.is_match(line) {
                if !line.ends_with(b"\n") {
                    out.push(b'\n');
                }
                out.extend_from_slice(marker.as_bytes());
            }
        }

        Ok(out)
    }

    /// Returns true if bumping `port` would leave it without a PORTREVISION.
    ///
    /// Slave ports inherit their version from MASTERDIR and carry no
    /// version line of their own.
    pub fn loses_revision(&self, content: &[u8], port: &Port) -> bool {
        port.needs_bump
            && !content
                .split(|&b| b == b'\n')
                .any(|line| self.version_line.is_match(line))
    }

    /// Reads `port`'s Makefile under `root` and stages its rewrite.
    pub fn stage(
        &self,
        port: &Port,
        root: &Path,
        tokens: &SonameTokens,
        txn: &mut Transaction,
    ) -> Result<()> {
        let path = port.recipe_path(root);

        let content = fs::read(&path).map_err(|e| {
            BumpError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;

        if self.loses_revision(&content, port) {
            log::warn!(
                "{}: no {} line, {} not emitted",
                port.origin,
                VERSION_KEYWORDS.join("/"),
                REVISION_KEYWORD
            );
        }

        let new_content = self.rewrite(&content, port, tokens)?;
        if new_content == content {
            log::warn!("{}: nothing to rewrite", port.origin);
        }

        txn.update_file(path, new_content)
    }
}

/// `PORTREVISION=\t<n>\n`
pub fn revision_line(revision: u32) -> String {
    format!("{}=\t{}\n", REVISION_KEYWORD, revision)
}

/// Stages the rewrite of every selected port under `root`.
pub fn stage_rewrites(
    ports: &[Port],
    root: &Path,
    tokens: &SonameTokens,
    txn: &mut Transaction,
) -> Result<()> {
    let rewriter = RecipeRewriter::new()?;

    for port in ports {
        log::debug!(
            "Staging {} (bump={}, soname={})",
            port.origin,
            port.needs_bump,
            port.has_embedded_soname
        );
        rewriter.stage(port, root, tokens, txn)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens() -> SonameTokens {
        SonameTokens::new("libfoo", "3", "4").unwrap()
    }

    fn port(revision: u32, needs_bump: bool, has_embedded_soname: bool) -> Port {
        Port {
            origin: "www/bar".into(),
            revision,
            needs_bump,
            has_embedded_soname,
        }
    }

    fn rewrite(content: &str, port: &Port) -> String {
        let out = RecipeRewriter::new()
            .unwrap()
            .rewrite(content.as_bytes(), port, &tokens())
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn count_revision_lines(text: &str) -> usize {
        text.lines().filter(|l| l.starts_with("PORTREVISION")).count()
    }

    #[test]
    fn test_bump_and_substitute() {
        let input = "PORTNAME=\tbar\nPORTVERSION=\t1.0\nCATEGORIES=\twww\n\nLIB_DEPENDS=\tlibfoo.3:devel/libfoo\n";
        let output = rewrite(input, &port(0, true, true));

        assert_eq!(
            output,
            "PORTNAME=\tbar\nPORTVERSION=\t1.0\nPORTREVISION=\t1\nCATEGORIES=\twww\n\nLIB_DEPENDS=\tlibfoo.4:devel/libfoo\n"
        );
    }

    #[test]
    fn test_existing_marker_is_replaced() {
        let input = "PORTNAME=\tbar\nPORTVERSION=\t1.0\nPORTREVISION=\t2\nLIB_DEPENDS=\tlibfoo.3:devel/libfoo\n";
        let output = rewrite(input, &port(2, true, false));

        assert_eq!(count_revision_lines(&output), 1);
        assert!(output.contains("PORTVERSION=\t1.0\nPORTREVISION=\t3\n"));
        assert!(!output.contains("PORTREVISION=\t2"));
        // Soname untouched without has_embedded_soname
        assert!(output.contains("libfoo.3"));
        assert_eq!(output.lines().count(), input.lines().count());
    }

    #[test]
    fn test_marker_far_from_version_is_moved() {
        let input = "PORTVERSION=\t1.0\nCATEGORIES=\twww\nPORTREVISION=\t5\n";
        let output = rewrite(input, &port(5, true, false));

        assert_eq!(output, "PORTVERSION=\t1.0\nPORTREVISION=\t6\nCATEGORIES=\twww\n");
    }

    #[test]
    fn test_distversion_gets_marker() {
        let input = "DISTVERSION=\t2.3-rc1\nDISTVERSIONPREFIX=\tv\n";
        let output = rewrite(input, &port(0, true, false));

        assert_eq!(
            output,
            "DISTVERSION=\t2.3-rc1\nPORTREVISION=\t1\nDISTVERSIONPREFIX=\tv\n"
        );
    }

    #[test]
    fn test_line_count_delta() {
        let input = "PORTVERSION=\t1.0\nPORTREVISION=\t1\n.if ${ARCH} == i386\nPORTVERSION=\t0.9\n.endif\n";
        let output = rewrite(input, &port(1, true, false));

        // one marker removed, one added per version line
        assert_eq!(output.lines().count(), input.lines().count() - 1 + 2);
    }

    #[test]
    fn test_soname_only_keeps_revision() {
        let input = "PORTVERSION=\t1.0\nPORTREVISION=\t4\nPLIST_SUB=\tLIB=libfoo.3\n";
        let output = rewrite(input, &port(4, false, true));

        assert_eq!(
            output,
            "PORTVERSION=\t1.0\nPORTREVISION=\t4\nPLIST_SUB=\tLIB=libfoo.4\n"
        );
    }

    #[test]
    fn test_revision_assignment_variants_are_dropped() {
        let input = "PORTVERSION=\t1.0\nPORTREVISION?=\t3\n";
        let output = rewrite(input, &port(3, true, false));

        assert_eq!(output, "PORTVERSION=\t1.0\nPORTREVISION=\t4\n");
    }

    #[test]
    fn test_similar_keywords_are_kept() {
        let input = "PORTVERSION=\t1.0\nPORTREVISION_FOO=\tx\n# PORTREVISION=\t9\n";
        let output = rewrite(input, &port(0, true, false));

        assert!(output.contains("PORTREVISION_FOO=\tx\n"));
        assert!(output.contains("# PORTREVISION=\t9\n"));
    }

    #[test]
    fn test_version_on_last_line_without_newline() {
        let output = rewrite("PORTNAME=\tbar\nPORTVERSION=\t1.0", &port(0, true, false));
        assert_eq!(output, "PORTNAME=\tbar\nPORTVERSION=\t1.0\nPORTREVISION=\t1\n");
    }

    #[test]
    fn test_missing_trailing_newline_preserved_otherwise() {
        let output = rewrite("PORTNAME=\tbar\nUSES=\tlibfoo.3", &port(0, false, true));
        assert_eq!(output, "PORTNAME=\tbar\nUSES=\tlibfoo.4");
    }

    #[test]
    fn test_latin1_recipe_is_rewritten() {
        let input = b"# Maintainer: Ren\xe9\nPORTVERSION=\t1.0\nLIB_DEPENDS=\tlibfoo.3:devel/libfoo\n";
        let output = RecipeRewriter::new()
            .unwrap()
            .rewrite(input, &port(0, true, true), &tokens())
            .unwrap();

        assert_eq!(
            output,
            b"# Maintainer: Ren\xe9\nPORTVERSION=\t1.0\nPORTREVISION=\t1\nLIB_DEPENDS=\tlibfoo.4:devel/libfoo\n"
        );
    }

    #[test]
    fn test_revision_overflow_fails() {
        let result = RecipeRewriter::new().unwrap().rewrite(
            b"PORTVERSION=\t1.0\n",
            &port(u32::MAX, true, false),
            &tokens(),
        );
        assert!(matches!(result, Err(BumpError::InvalidRevision { .. })));
    }

    #[test]
    fn test_slave_port_loses_revision() {
        let rewriter = RecipeRewriter::new().unwrap();
        let slave = b"PORTREVISION=\t2\nMASTERDIR=\t${.CURDIR}/../bar\n";

        assert!(rewriter.loses_revision(slave, &port(2, true, false)));
        assert!(!rewriter.loses_revision(slave, &port(2, false, true)));
        assert!(!rewriter.loses_revision(b"DISTVERSION=\t1\n", &port(0, true, false)));
    }

    #[test]
    fn test_revision_line_format() {
        assert_eq!(revision_line(12), "PORTREVISION=\t12\n");
    }

    #[test]
    fn test_stage_reads_from_root() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("www/bar");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Makefile"), "PORTVERSION=\t1.0\n").unwrap();

        let mut txn = Transaction::new(true);
        stage_rewrites(&[port(0, true, false)], temp.path(), &tokens(), &mut txn).unwrap();

        assert_eq!(txn.len(), 1);
    }

    #[test]
    fn test_stage_latin1_recipe() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("www/bar");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Makefile"), b"# Ren\xe9\nPORTVERSION=\t1.0\n").unwrap();

        let mut txn = Transaction::new(false);
        stage_rewrites(&[port(0, true, false)], temp.path(), &tokens(), &mut txn).unwrap();
        txn.commit().unwrap();

        assert_eq!(
            std::fs::read(dir.join("Makefile")).unwrap(),
            b"# Ren\xe9\nPORTVERSION=\t1.0\nPORTREVISION=\t1\n"
        );
    }

    #[test]
    fn test_stage_missing_recipe_fails() {
        let temp = TempDir::new().unwrap();
        let mut txn = Transaction::new(true);

        let result = stage_rewrites(&[port(0, true, false)], temp.path(), &tokens(), &mut txn);
        assert!(matches!(result, Err(BumpError::Io(_))));
    }
}
