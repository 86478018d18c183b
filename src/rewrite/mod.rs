//! Makefile rewriting for library bumps.

pub mod recipe;

pub use recipe::{RecipeRewriter, stage_rewrites};
