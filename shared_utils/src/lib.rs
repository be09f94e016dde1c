//! Small pieces shared by every crate in the workspace: environment lookups
//! and the TOML-backed application configuration.

pub mod config;
pub mod env;
