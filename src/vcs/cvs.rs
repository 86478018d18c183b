use crate::config::CheckoutConfig;
use crate::error::{BumpError, Result};
use crate::vcs::Checkout;
use std::ffi::OsString;
use std::process::Command;

/// Module prefix of every path in the ports repository.
pub const PORTS_MODULE: &str = "ports";

/// Always checked out alongside the ports so the bump can be documented.
pub const UPDATING_FILE: &str = "ports/UPDATING";

/// `cvs -d <root> co ports/UPDATING ports/<origin>...`
#[derive(Debug, Clone)]
pub struct CvsCheckout<'a> {
    config: &'a CheckoutConfig,
}

impl<'a> CvsCheckout<'a> {
    pub fn new(config: &'a CheckoutConfig) -> Self {
        Self { config }
    }

    /// Arguments passed to the checkout program.
    pub fn args(&self, origins: &[&str]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-d".into(),
            self.config.root.as_str().into(),
            "co".into(),
            UPDATING_FILE.into(),
        ];
        args.extend(
            origins
                .iter()
                .map(|origin| OsString::from(format!("{}/{}", PORTS_MODULE, origin))),
        );
        args
    }
}

impl Checkout for CvsCheckout<'_> {
    fn checkout(&self, origins: &[&str]) -> Result<()> {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(self.args(origins))
            .current_dir(&self.config.work_dir);

        log::info!(
            "Checking out {} ports into {}",
            origins.len(),
            self.config.work_dir.display()
        );
        log::debug!("Running {:?}", cmd);

        let status = cmd.status().map_err(|e| {
            BumpError::CheckoutFailed(format!(
                "could not run {}: {}",
                self.config.program.display(),
                e
            ))
        })?;

        if !status.success() {
            return Err(BumpError::CheckoutFailed(format!(
                "{} exited with {}",
                self.config.program.display(),
                status
            )));
        }

        Ok(())
    }
}
