//! Ports tree discovery.
//!
//! Finds every port that depends on the library being bumped:
//!
//! - **`soname`**: Old/new library reference tokens
//! - **`port`**: The per-port record carried from scan to rewrite
//! - **`scan`**: Textual scan of a port's Makefile
//! - **`query`**: Dependency lists and revision from the ports build tool
//! - **`walk`**: Category/port enumeration driving scan and query

pub mod port;
pub mod query;
pub mod scan;
pub mod soname;
pub mod walk;

pub use port::Port;
pub use query::{BuildTool, MakeTool, query_port};
pub use scan::{RecipeScan, RecipeScanner};
pub use soname::SonameTokens;
pub use walk::{is_category, walk_ports};

/// File name of a port's build recipe.
pub const RECIPE_FILE: &str = "Makefile";
