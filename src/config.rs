//! Immutable run configuration.
//!
//! Built once from the parsed command line and handed by reference to every
//! component. Nothing here changes after construction.

use crate::cli::{BumpArgs, DependencyRule, LibraryArgs};
use crate::error::{BumpError, Result};
use crate::ports::SonameTokens;
use crate::verify::rules::{validate_library_name, validate_origin, validate_versions};
use std::path::PathBuf;

/// Host part of the default CVS root.
pub const DEFAULT_CVS_HOST: &str = "pcvs.FreeBSD.org:/home/pcvs";

/// Everything needed to discover affected ports.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub ports_root: PathBuf,
    pub target_origin: String,
    pub tokens: SonameTokens,
    pub dependency_rule: DependencyRule,
    pub make: PathBuf,
}

impl TryFrom<&LibraryArgs> for ScanConfig {
    type Error = BumpError;

    fn try_from(args: &LibraryArgs) -> Result<Self> {
        validate_origin(&args.port_origin)?;
        validate_library_name(&args.lib_name)?;
        validate_versions(&args.lib_old_version, &args.lib_new_version)?;

        Ok(Self {
            ports_root: args.ports_path.clone(),
            target_origin: args.port_origin.clone(),
            tokens: SonameTokens::new(
                &args.lib_name,
                &args.lib_old_version,
                &args.lib_new_version,
            )?,
            dependency_rule: args.dependency_rule,
            make: args.make.clone(),
        })
    }
}

/// How and where the selected ports are checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub program: PathBuf,
    pub root: String,
    pub work_dir: PathBuf,
}

/// Full configuration of a `bump` run.
#[derive(Debug, Clone)]
pub struct BumpConfig {
    pub scan: ScanConfig,
    /// `None` when the checkout is skipped.
    pub checkout: Option<CheckoutConfig>,
    /// Directory holding the `<category>/<port>/Makefile` files to rewrite.
    pub rewrite_root: PathBuf,
    pub dry_run: bool,
    pub assume_yes: bool,
    pub discard_backups: bool,
}

impl BumpConfig {
    /// Builds the configuration relative to `work_dir` (normally the current directory).
    pub fn from_args(args: &BumpArgs, work_dir: PathBuf) -> Result<Self> {
        let scan = ScanConfig::try_from(&args.library)?;

        let checkout = if args.no_checkout {
            None
        } else {
            let root = match (&args.cvs_root, &args.user_name) {
                (Some(root), _) => root.clone(),
                (None, Some(user)) if !user.trim().is_empty() => {
                    format!("{}@{}", user.trim(), DEFAULT_CVS_HOST)
                }
                _ => {
                    return Err(BumpError::InvalidArgument(
                        "user name".to_string(),
                        "not set; pass --user-name, set USER, or use --cvs-root".to_string(),
                    ));
                }
            };

            Some(CheckoutConfig {
                program: args.cvs.clone(),
                root,
                work_dir: work_dir.clone(),
            })
        };

        let rewrite_root = match &args.rewrite_root {
            Some(path) => path.clone(),
            None if checkout.is_some() => work_dir.join("ports"),
            None => scan.ports_root.clone(),
        };

        Ok(Self {
            scan,
            checkout,
            rewrite_root,
            dry_run: args.dry_run,
            assume_yes: args.yes,
            discard_backups: args.discard_backups,
        })
    }
}
