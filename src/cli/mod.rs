//! CLI modules for the measeval binary.
//!
//! Argument parsing lives in [`parser`], one module per subcommand in
//! [`commands`], terminal helpers in [`output`].

pub mod commands;
pub mod output;
pub mod parser;

pub use output::*;
pub use parser::*;
