//! CLI subcommands

pub mod feed;
pub mod list;
