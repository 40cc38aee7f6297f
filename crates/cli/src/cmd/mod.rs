//! CLI command implementations

pub mod config;
pub mod locate;
pub mod rotate;
pub mod run;
