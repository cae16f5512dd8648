//! CLI command implementations.

pub mod environments;
pub mod get;
pub mod has;
pub mod show;
