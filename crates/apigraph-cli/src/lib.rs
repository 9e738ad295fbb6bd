//! apigraph-cli library
//!
//! Command implementations and argument types behind the `apigraph` binary.

pub mod commands;
pub mod logging;

pub use commands::types::{BatchArgs, Cli, Commands, Neo4jArgs, QueryCommands, ScanArgs};

#[cfg(test)]
mod tests;
