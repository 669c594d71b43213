//! Function prototype parsing
//!
//! Turns `ret name(params);` text into a [`FunctionSig`]. Parameter types
//! that a binding cannot express precisely (arrays, pointers, callbacks)
//! degrade to the opaque pointer; unresolved scalar types fall back to the
//! opaque pointer as well, and an unresolved return type to `int`.

use log::debug;

use crate::diagnostic::{BindError, DiagnosticEngine};
use crate::semantic::{SymbolTable, TypeResolver};
use crate::types::{CType, FunctionSig};

use super::utils::{is_ident_char, matching_paren, remove_word, split_top_level, strip_nested_groups, trailing_identifier};

/// Why a prototype line was not treated as a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ForeignPrefix,
    Enum,
    Typedef,
    Initializer,
    Preprocessor,
}

/// Whether `body` is a non-function declaration that leaked into the
/// prototype stream.
pub fn non_function_reason(name: &str, body: &str, function_prefix: &str) -> Option<SkipReason> {
    if !name.starts_with(function_prefix) {
        Some(SkipReason::ForeignPrefix)
    } else if body.starts_with("enum") {
        Some(SkipReason::Enum)
    } else if body.starts_with("typedef") {
        Some(SkipReason::Typedef)
    } else if split_top_level(body, '=').len() > 1 {
        Some(SkipReason::Initializer)
    } else if body.starts_with('#') {
        Some(SkipReason::Preprocessor)
    } else {
        None
    }
}

/// First whole-word occurrence of `name` in `text`.
fn find_symbol(text: &str, name: &str) -> Option<usize> {
    text.match_indices(name).map(|(pos, _)| pos).find(|&pos| {
        let before = text[..pos].chars().next_back().is_none_or(|c| !is_ident_char(c));
        let after = text[pos + name.len()..].chars().next().is_none_or(|c| !is_ident_char(c));
        before && after
    })
}

/// Split prototype text into return-type text and the parameter list
/// between its outer parentheses.
pub fn split_prototype<'s>(name: &str, proto: &'s str) -> Option<(&'s str, &'s str)> {
    let start = find_symbol(proto, name)?;
    let ret = proto[..start].trim_end();
    let params = proto[start + name.len()..].trim_matches([' ', ';']);
    if !params.starts_with('(') || matching_paren(params, 0)? != params.len() - 1 {
        return None;
    }
    Some((ret, &params[1..params.len() - 1]))
}

/// Parses function prototypes against a finished symbol table.
pub struct PrototypeParser<'a> {
    table: &'a SymbolTable,
    diagnostics: &'a mut DiagnosticEngine,
    function_prefix: &'a str,
}

impl<'a> PrototypeParser<'a> {
    pub fn new(table: &'a SymbolTable, diagnostics: &'a mut DiagnosticEngine, function_prefix: &'a str) -> Self {
        PrototypeParser {
            table,
            diagnostics,
            function_prefix,
        }
    }

    /// Parse one prototype.
    ///
    /// `Ok(None)` means the line is not a function of this library and was
    /// skipped silently. A parameter list that is not a single balanced
    /// group is an error and no signature is produced.
    pub fn parse(&mut self, name: &str, body: &str, line: Option<usize>) -> Result<Option<FunctionSig>, BindError> {
        let proto = body.trim();
        if let Some(reason) = non_function_reason(name, proto, self.function_prefix) {
            debug!("skipping '{}': {:?}", name, reason);
            return Ok(None);
        }

        let (ret, params) = split_prototype(name, proto).ok_or_else(|| BindError::MalformedParameterList {
            function: name.to_string(),
            text: proto.to_string(),
        })?;

        let params = self.parse_params(name, params, line);
        let ret = self.return_type(ret, line);
        Ok(Some(FunctionSig {
            name: name.to_string(),
            ret,
            params,
        }))
    }

    fn parse_params(&mut self, function: &str, params: &str, line: Option<usize>) -> Vec<CType> {
        let flattened = strip_nested_groups(params);
        let mut list = Vec::new();
        for param in flattened.split(',') {
            let param = remove_word(param, "const");
            let param = param.trim();
            if param.is_empty() || param == "void" || param == "..." {
                continue;
            }
            // Arrays, pointers and callbacks all travel as untyped pointers.
            if param.ends_with(']') || param.ends_with('*') || param.ends_with(')') {
                list.push(CType::OpaquePointer);
                continue;
            }
            let Some(name_pos) = trailing_identifier(param) else {
                self.diagnostics.report(
                    BindError::MalformedParameter {
                        function: function.to_string(),
                        text: param.to_string(),
                    },
                    line,
                );
                continue;
            };
            // A lone identifier is an unnamed parameter's type.
            let type_text = if name_pos == 0 { param } else { &param[..name_pos] };
            match TypeResolver::new(self.table).resolve(type_text) {
                Ok(ty) => list.push(ty),
                Err(err) => {
                    self.diagnostics.report(err, line);
                    list.push(CType::OpaquePointer);
                }
            }
        }
        list
    }

    fn return_type(&mut self, ret: &str, line: Option<usize>) -> Option<CType> {
        if ret.ends_with("void") {
            return None;
        }
        match TypeResolver::new(self.table).resolve(ret) {
            Ok(ty) => Some(ty),
            Err(err) => {
                self.diagnostics.report(err, line);
                Some(CType::INT)
            }
        }
    }
}
