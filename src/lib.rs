//! Binding generator for C libraries.
//!
//! Reads scraped `name:declaration` lines, builds a symbol table of types,
//! constants and function signatures in two passes, and renders it as a
//! Python ctypes module.

pub mod diagnostic;
pub mod driver;
pub mod lib_options;
pub mod parser;
pub mod semantic;
pub mod types;
