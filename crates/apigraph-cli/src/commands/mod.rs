//! CLI commands

pub mod build;
pub mod extract;
pub mod load;
pub mod query;
pub mod types;

pub use types::QueryCommands;
