//! Generator driver module
//!
//! Ties together CLI parsing, the two-pass table builder and the module
//! renderer.

pub mod artifact;
pub mod cli;
pub mod generator;
pub mod output;

pub use cli::{Cli, GenerateConfig};
pub use generator::{DriverError, GeneratorDriver};
