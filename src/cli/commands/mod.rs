//! CLI subcommands

pub mod baseline;
pub mod train;
