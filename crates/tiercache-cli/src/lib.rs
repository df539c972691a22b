//! Command-line front end for the tiercache hierarchy.
//!
//! Builds a string-keyed [`tiercache::TieredCache`] from configuration and
//! drives it either with the built-in demo scenario or with a command script.

pub mod commands;

pub use commands::{Command, StringCache, execute, replay, run_demo};
