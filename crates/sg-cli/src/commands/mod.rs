//! CLI subcommand implementations.

pub mod check;
pub mod generate;
pub mod util;
