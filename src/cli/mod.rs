//! Command-line interface module.

mod args;
pub mod common;
pub mod map;
pub mod serve;
pub mod url;

pub use args::{BustArgs, Cli, Commands};
