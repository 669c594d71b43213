//! Symbol table construction.
//!
//! Turns classified declaration lines into a [`SymbolTable`]: type
//! resolution, constant evaluation and the two-pass table builder.

pub mod builder;
pub mod const_eval;
pub mod symbol_table;
pub mod type_resolver;

// Re-export key types for public API
pub use builder::{BuildError, PrototypeTableBuilder};
pub use const_eval::{ConstEvalError, ConstantLookup};
pub use symbol_table::SymbolTable;
pub use type_resolver::TypeResolver;
