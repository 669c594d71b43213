//! Declaration text parsers
//!
//! Scrapers for the loosely formatted declaration lines: line splitting,
//! struct/union member lists, enumerator lists and function prototypes.
//! None of these is a C front end; each recognizes the shapes that occur
//! in documentation-derived prototype listings and reports the rest.

pub mod enum_parsing;
pub mod fields;
pub mod line;
pub mod prototype;
pub mod utils;

pub use fields::FieldParser;
pub use line::{DeclKind, DeclLine};
pub use prototype::PrototypeParser;
