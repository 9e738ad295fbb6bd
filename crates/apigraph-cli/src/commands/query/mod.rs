//! Query module: read-only lookups against the graph

mod run;

pub use run::{render, run};
