//! Command line interface for inspecting and editing JSON documents.

pub mod args;
pub mod commands;
pub mod output;

pub use args::*;
pub use commands::*;
pub use output::*;
