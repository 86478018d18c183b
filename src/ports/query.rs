//! Dependency query through the ports build tool.
//!
//! Runs `make -C <port> -V LIB_DEPENDS -V BUILD_DEPENDS -V RUN_DEPENDS -V PORTREVISION`
//! and classifies the port from the four printed lines.

use crate::cli::DependencyRule;
use crate::error::{BumpError, Result};
use crate::ports::Port;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Variables requested from the build tool, in output order.
pub const QUERY_VARIABLES: [&str; 4] = ["LIB_DEPENDS", "BUILD_DEPENDS", "RUN_DEPENDS", "PORTREVISION"];

/// Something that can expand port variables.
pub trait BuildTool {
    /// Returns the tool's standard output: one line per name, in order.
    fn print_variables(&self, port_dir: &Path, names: &[&str]) -> Result<String>;
}

/// `make -C <dir> -V <name>...`
#[derive(Debug, Clone)]
pub struct MakeTool {
    program: PathBuf,
}

impl MakeTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl BuildTool for MakeTool {
    fn print_variables(&self, port_dir: &Path, names: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-C").arg(port_dir);
        for name in names {
            cmd.arg("-V").arg(name);
        }

        log::debug!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| BumpError::ToolFailed {
            port: port_dir.display().to_string(),
            message: format!("could not run {}: {}", self.program.display(), e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BumpError::ToolFailed {
                port: port_dir.display().to_string(),
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| BumpError::ToolFailed {
            port: port_dir.display().to_string(),
            message: "output is not valid UTF-8".to_string(),
        })
    }
}

/// Queries `origin` and classifies whether it must be revision-bumped.
pub fn query_port(
    tool: &dyn BuildTool,
    ports_root: &Path,
    origin: &str,
    target_origin: &str,
    rule: DependencyRule,
) -> Result<Port> {
    let output = tool.print_variables(&ports_root.join(origin), &QUERY_VARIABLES)?;
    classify(origin, target_origin, &output, rule)
}

/// Builds a [`Port`] from the build tool's output.
pub fn classify(origin: &str, target_origin: &str, output: &str, rule: DependencyRule) -> Result<Port> {
    let lines: Vec<&str> = output.lines().collect();
    let [lib_depends, build_depends, run_depends, revision] = lines.as_slice() else {
        return Err(BumpError::MalformedToolOutput {
            origin: origin.to_string(),
            expected: QUERY_VARIABLES.len(),
            actual: lines.len(),
        });
    };

    let in_build = build_depends.contains(target_origin);
    let in_run = run_depends.contains(target_origin);
    let build_or_run = match rule {
        DependencyRule::Either => in_build || in_run,
        DependencyRule::Both => in_build && in_run,
    };

    let mut port = Port::new(origin);
    port.needs_bump = lib_depends.contains(target_origin) || build_or_run;
    port.revision = parse_revision(origin, revision)?;

    log::debug!(
        "{}: revision {}, lib={} build={} run={} → bump={}",
        origin,
        port.revision,
        lib_depends.contains(target_origin),
        in_build,
        in_run,
        port.needs_bump
    );

    Ok(port)
}

/// An unset PORTREVISION expands to an empty line and counts as 0.
///
/// A revision that cannot be incremented is rejected here, before anything
/// is checked out.
fn parse_revision(origin: &str, value: &str) -> Result<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    trimmed
        .parse::<u32>()
        .ok()
        .filter(|n| n.checked_add(1).is_some())
        .ok_or_else(|| BumpError::InvalidRevision {
            origin: origin.to_string(),
            value: trimmed.to_string(),
        })
}
