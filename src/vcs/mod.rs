//! Version-control checkout of the ports to rewrite.

pub mod cvs;

pub use cvs::CvsCheckout;

use crate::error::Result;

/// Checks out a set of ports before they are rewritten.
pub trait Checkout {
    /// Checks out every origin in `origins` in one invocation.
    fn checkout(&self, origins: &[&str]) -> Result<()>;
}
