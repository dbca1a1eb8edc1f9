//! Course schedule generator CLI library.
//!
//! This crate provides the CLI interface around the `sg-core` expansion engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
