//! CLI subcommands

pub mod export;
pub mod run;
