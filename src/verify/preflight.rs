//! Pre-flight checks performed before walking the ports tree.
//!
//! Unlike `rules`, these functions touch the file system.

use crate::config::{BumpConfig, ScanConfig};
use crate::error::{BumpError, Result};
use crate::ports::port::recipe_path;

/// Checks that the ports tree and the target port exist.
pub fn check_ports_tree(config: &ScanConfig) -> Result<()> {
    if !config.ports_root.is_dir() {
        return Err(BumpError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "Ports tree not found: {}",
                config.ports_root.display()
            ),
        )));
    }

    let target = recipe_path(&config.ports_root, &config.target_origin);
    if !target.is_file() {
        log::debug!("Missing recipe: {}", target.display());
        return Err(BumpError::PortNotFound(config.target_origin.clone()));
    }

    Ok(())
}

/// Runs every check needed before a bump.
pub fn preflight_checks(config: &BumpConfig) -> Result<()> {
    check_ports_tree(&config.scan)?;

    if let Some(checkout) = &config.checkout {
        if !checkout.work_dir.is_dir() {
            return Err(BumpError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!(
                    "Checkout directory not found: {}",
                    checkout.work_dir.display()
                ),
            )));
        }
    } else if !config.rewrite_root.is_dir() {
        return Err(BumpError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "Rewrite root not found: {}",
                config.rewrite_root.display()
            ),
        )));
    }

    Ok(())
}
