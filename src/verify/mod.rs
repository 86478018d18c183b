//! Validation and verification for scan and bump operations.

pub mod preflight;
pub mod prompt;
pub mod rules;

pub use preflight::{check_ports_tree, preflight_checks};
pub use prompt::{confirm_operation, print_plan};
pub use rules::{validate_library_name, validate_origin, validate_versions};
