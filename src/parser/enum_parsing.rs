//! Enum body parsing
//!
//! Enumerators are numbered sequentially from 0. An explicit `= expr`
//! value is evaluated against the constants defined so far (including
//! earlier enumerators of the same body) and restarts the sequence.

use log::trace;

use crate::semantic::SymbolTable;
use crate::semantic::const_eval::{self, ConstEvalError};

use super::utils::split_top_level;

/// An enumerator whose explicit value failed to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("enumerator '{name}': {source}")]
pub struct EnumeratorError {
    pub name: String,
    pub source: ConstEvalError,
}

/// Parse an enum body, defining each enumerator as a constant.
///
/// Returns the enumerators in declaration order. Stops at the first value
/// that fails to evaluate.
pub fn parse_enum_body(body: &str, table: &mut SymbolTable) -> Result<Vec<(String, i64)>, EnumeratorError> {
    let mut enumerators = Vec::new();
    let mut next = 0i64;
    for entry in split_top_level(body, ',') {
        let (name, value) = match entry.split_once('=') {
            Some((name, expr)) => {
                let name = name.trim();
                let value = const_eval::evaluate(expr, &*table).map_err(|source| EnumeratorError {
                    name: name.to_string(),
                    source,
                })?;
                (name, value)
            }
            None => (entry.trim(), next),
        };
        if name.is_empty() {
            continue;
        }
        trace!("enumerator {} = {}", name, value);
        table.define_constant(name, value);
        enumerators.push((name.to_string(), value));
        next = value.wrapping_add(1);
    }
    Ok(enumerators)
}
