//! Enumeration of `<category>/<port>` directories.
//!
//! Every port directory is scanned; only those referencing the target origin
//! are queried, and only affected ones are kept.

use crate::config::ScanConfig;
use crate::error::Result;
use crate::ports::port::recipe_path;
use crate::ports::{BuildTool, Port, RecipeScanner, query_port};
use ignore::DirEntry;

/// Top-level directories of a ports tree that hold no ports.
pub const NON_CATEGORIES: [&str; 5] = ["Mk", "Templates", "Tools", "distfiles", "packages"];

/// Version-control metadata found at any level of a checkout.
const VCS_DIRS: [&str; 3] = ["CVS", ".svn", ".git"];

/// Returns true if `name` is a port category.
pub fn is_category(name: &str) -> bool {
    !NON_CATEGORIES.contains(&name) && !VCS_DIRS.contains(&name)
}

/// Outcome of a full tree walk.
#[derive(Debug, Default)]
pub struct TreeScan {
    /// Ports to check out and rewrite, in enumeration order.
    pub ports: Vec<Port>,
    /// Number of port directories scanned.
    pub visited: usize,
    /// Ports that already reference the new soname only.
    pub migrated: Vec<String>,
}

/// Walks the tree under `config.ports_root`.
///
/// Stops at the first I/O or build tool error.
pub fn walk_ports(config: &ScanConfig, tool: &dyn BuildTool) -> Result<TreeScan> {
    let walker = ignore::WalkBuilder::new(&config.ports_root)
        .standard_filters(false)
        .max_depth(Some(2))
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(keep_entry)
        .build();

    let scanner = RecipeScanner::new(&config.target_origin, &config.tokens)?;
    let mut tree = TreeScan::default();

    for entry in walker {
        let entry = entry?;
        if entry.depth() != 2 {
            continue;
        }

        let Some(origin) = origin_of(&entry) else {
            log::debug!("Skipping non UTF-8 path: {}", entry.path().display());
            continue;
        };

        tree.visited += 1;
        visit_port(config, tool, &scanner, &origin, &mut tree)?;
    }

    log::info!(
        "Scanned {} ports, {} affected",
        tree.visited,
        tree.ports.len()
    );

    Ok(tree)
}

fn visit_port(
    config: &ScanConfig,
    tool: &dyn BuildTool,
    scanner: &RecipeScanner<'_>,
    origin: &str,
    tree: &mut TreeScan,
) -> Result<()> {
    // A port never depends on itself
    if origin == config.target_origin {
        return Ok(());
    }

    let path = recipe_path(&config.ports_root, origin);
    let scan = scanner.scan(&path)?;

    if !scan.references_target {
        return Ok(());
    }

    if scan.is_already_migrated() {
        log::info!("{} already references {}, skipping", origin, config.tokens.new_token());
        tree.migrated.push(origin.to_string());
        return Ok(());
    }

    let mut port = query_port(
        tool,
        &config.ports_root,
        origin,
        &config.target_origin,
        config.dependency_rule,
    )?;
    port.has_embedded_soname = scan.contains_old_token;

    if port.is_affected() {
        log::debug!("Selected {}", origin);
        tree.ports.push(port);
    } else {
        log::debug!("{} mentions {} but needs no change", origin, config.target_origin);
    }

    Ok(())
}

/// Keeps category directories at depth 1 and port directories at depth 2.
fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }

    let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
    let name = entry.file_name().to_str();

    match (entry.depth(), name) {
        (1, Some(name)) => is_dir && is_category(name),
        (_, Some(name)) => is_dir && !VCS_DIRS.contains(&name),
        (_, None) => false,
    }
}

/// `category/name` for a depth-2 entry.
fn origin_of(entry: &DirEntry) -> Option<String> {
    let port = entry.file_name().to_str()?;
    let category = entry.path().parent()?.file_name()?.to_str()?;
    Some(format!("{}/{}", category, port))
}
