//! Struct and union body parsing
//!
//! A body is split into member statements on top-level `;`, then each
//! statement is classified by the first matching tier:
//!
//! 1. function pointer member `ret (*name)(args)`: opaque pointer
//! 2. pointer member `T *name`: opaque pointer, the target type is dropped
//! 3. array member `T name[len]`, including `T name[a][b]`
//! 4. plain member `T a, b, c`
//!
//! Members that match no tier or whose type does not resolve are reported
//! and left out; the aggregate keeps whatever was recognized.

use log::debug;

use crate::diagnostic::{BindError, DiagnosticEngine};
use crate::semantic::const_eval::{self, ConstEvalError};
use crate::semantic::{SymbolTable, TypeResolver};
use crate::types::{ArrayLen, CType, Field};

use super::utils::{brace_body, is_ident_char, is_identifier, split_top_level, starts_with_keyword, trailing_identifier};

/// Classified shape of one member statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDecl<'s> {
    FunctionPointer { name: &'s str },
    Pointer { name: &'s str },
    Array { base: &'s str, name: &'s str, dims: &'s str },
    Plain { base: &'s str, names: Vec<&'s str> },
}

/// Classify a member statement (without its `;`).
pub fn classify_member(stmt: &str) -> Option<MemberDecl<'_>> {
    let stmt = stmt.trim();
    if let Some(name) = function_pointer_name(stmt) {
        return Some(MemberDecl::FunctionPointer { name });
    }
    if let Some(start) = trailing_identifier(stmt)
        && stmt[..start].trim_end().ends_with('*')
    {
        return Some(MemberDecl::Pointer { name: &stmt[start..] });
    }
    if stmt.ends_with(']') {
        return array_member(stmt);
    }
    plain_member(stmt)
}

/// Name in the first `(*name)` group.
fn function_pointer_name(stmt: &str) -> Option<&str> {
    let mut search = 0;
    while let Some(rel) = stmt[search..].find("(*") {
        let start = search + rel + 2;
        let len = stmt[start..].chars().take_while(|c| is_ident_char(*c)).count();
        if len > 0 && stmt[start + len..].starts_with(')') {
            return Some(&stmt[start..start + len]);
        }
        search = start;
    }
    None
}

/// `base name[dims]` where the name is the last identifier that is preceded
/// by whitespace or `*` and directly followed by `[`.
fn array_member(stmt: &str) -> Option<MemberDecl<'_>> {
    let bytes = stmt.as_bytes();
    let (name_start, bracket) = stmt
        .match_indices('[')
        .filter_map(|(bracket, _)| {
            let start = stmt[..bracket]
                .char_indices()
                .rev()
                .take_while(|(_, c)| is_ident_char(*c))
                .last()
                .map(|(i, _)| i)?;
            let before = bytes[start.checked_sub(1)?] as char;
            (before.is_whitespace() || before == '*').then_some((start, bracket))
        })
        .last()?;
    let base = stmt[..name_start].trim();
    if base.is_empty() {
        return None;
    }
    Some(MemberDecl::Array {
        base,
        name: &stmt[name_start..bracket],
        dims: &stmt[bracket + 1..stmt.len() - 1],
    })
}

fn plain_member(stmt: &str) -> Option<MemberDecl<'_>> {
    let mut vars = split_top_level(stmt, ',').into_iter();
    let first = vars.next()?.trim();
    let start = trailing_identifier(first)?;
    let base = first[..start].trim();
    if base.is_empty() {
        return None;
    }
    let mut names = vec![&first[start..]];
    names.extend(vars.map(str::trim));
    Some(MemberDecl::Plain { base, names })
}

/// Parses member statements of one aggregate.
pub struct FieldParser<'a> {
    table: &'a SymbolTable,
    diagnostics: &'a mut DiagnosticEngine,
    aggregate: &'a str,
    line: Option<usize>,
}

impl<'a> FieldParser<'a> {
    pub fn new(
        table: &'a SymbolTable,
        diagnostics: &'a mut DiagnosticEngine,
        aggregate: &'a str,
        line: Option<usize>,
    ) -> Self {
        FieldParser {
            table,
            diagnostics,
            aggregate,
            line,
        }
    }

    /// Parse the text between an aggregate's outer braces.
    pub fn parse_body(&mut self, body: &str) -> Vec<Field> {
        let mut fields = Vec::new();
        for stmt in split_top_level(body, ';') {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            self.parse_member(stmt, &mut fields);
        }
        fields
    }

    fn parse_member(&mut self, stmt: &str, fields: &mut Vec<Field>) {
        let Some(decl) = classify_member(stmt) else {
            self.report(BindError::MalformedField {
                aggregate: self.aggregate.to_string(),
                text: stmt.to_string(),
            });
            return;
        };

        match decl {
            MemberDecl::FunctionPointer { name } | MemberDecl::Pointer { name } => {
                fields.push(Field::new(name, CType::OpaquePointer));
            }
            MemberDecl::Array { base, name, dims } => {
                let Some(elem) = self.element_type(base) else {
                    return;
                };
                let Some(len) = self.array_len(dims, stmt) else {
                    return;
                };
                fields.push(Field::new(name, CType::array(elem, len)));
            }
            MemberDecl::Plain { base, names } => {
                let ty = match TypeResolver::new(self.table).resolve(base) {
                    Ok(ty) => ty,
                    Err(err) => {
                        self.report(err);
                        return;
                    }
                };
                for name in names {
                    if is_identifier(name) {
                        fields.push(Field::new(name, ty.clone()));
                    } else {
                        self.report(BindError::MalformedField {
                            aggregate: self.aggregate.to_string(),
                            text: stmt.to_string(),
                        });
                    }
                }
            }
        }
    }

    /// Element type of an array member. Pointer elements degrade like
    /// pointer members; inline aggregates are flattened when their body
    /// holds exactly one member.
    fn element_type(&mut self, base: &str) -> Option<CType> {
        if base.ends_with('*') {
            return Some(CType::OpaquePointer);
        }
        let is_inline = (starts_with_keyword(base, "struct") || starts_with_keyword(base, "union"))
            && base.contains('{');
        if !is_inline {
            return match TypeResolver::new(self.table).resolve(base) {
                Ok(ty) => Some(ty),
                Err(err) => {
                    self.report(err);
                    None
                }
            };
        }

        let inner = brace_body(base).unwrap_or_default();
        let members: Vec<&str> = split_top_level(inner, ';')
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if members.len() == 1 {
            let mut nested = FieldParser::new(self.table, self.diagnostics, self.aggregate, self.line);
            if let [field] = nested.parse_body(inner).as_slice() {
                debug!("flattened inline aggregate in '{}' to {}", self.aggregate, field.ty);
                return Some(field.ty.clone());
            }
            return None;
        }
        self.report(BindError::UnparsedAggregate {
            aggregate: self.aggregate.to_string(),
            text: base.to_string(),
        });
        None
    }

    fn array_len(&mut self, dims: &str, stmt: &str) -> Option<ArrayLen> {
        let expr = const_eval::host_expression(dims.trim());
        match const_eval::evaluate(&expr, self.table) {
            Ok(n) => Some(ArrayLen::Fixed(n)),
            Err(ConstEvalError::UnknownConstant(name)) => {
                debug!("array length '{}' depends on '{}', kept symbolic", expr, name);
                Some(ArrayLen::Symbolic(expr))
            }
            Err(err) => {
                debug!("array length '{}' in '{}': {}", expr, self.aggregate, err);
                self.report(BindError::MalformedField {
                    aggregate: self.aggregate.to_string(),
                    text: stmt.to_string(),
                });
                None
            }
        }
    }

    fn report(&mut self, error: BindError) {
        self.diagnostics.report(error, self.line);
    }
}
