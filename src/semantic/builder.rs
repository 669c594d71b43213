//! Prototype table builder
//!
//! Builds the [`SymbolTable`] from declaration lines in two passes:
//!
//! 1. registration: every struct and union becomes a field-less shell, enums
//!    and typedefs become aliases, `#define`s are evaluated; function lines
//!    and aggregate bodies are queued.
//! 2. resolution: struct and enum bodies are parsed, then union bodies, so
//!    member types can name aggregates declared anywhere in the input.
//!
//! Array lengths that named a constant not yet known are folded again once
//! pass 2 is done. Function prototypes are resolved last, against the
//! finished type set.

use log::{debug, info};

use crate::diagnostic::{BindError, DiagnosticEngine};
use crate::lib_options::LibraryProfile;
use crate::parser::enum_parsing::parse_enum_body;
use crate::parser::fields::FieldParser;
use crate::parser::line::{DeclKind, DeclLine, parse_lines};
use crate::parser::prototype::PrototypeParser;
use crate::parser::utils::brace_body;
use crate::types::{ArrayLen, CType, Field, RecordKind};

use super::const_eval::{self, ConstEvalError};
use super::{SymbolTable, TypeResolver};

/// The one unrecoverable error of a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Can't evaluate constant '{name}': {source}")]
pub struct BuildError {
    pub name: String,
    pub line: usize,
    pub source: ConstEvalError,
}

/// A brace body queued for pass 2.
#[derive(Debug, Clone)]
struct PendingBody {
    line: usize,
    name: String,
    kind: DeclKind,
    body: String,
}

pub struct PrototypeTableBuilder<'a> {
    profile: &'a LibraryProfile,
    diagnostics: &'a mut DiagnosticEngine,
    table: SymbolTable,
    bodies: Vec<PendingBody>,
    unions: Vec<PendingBody>,
    functions: Vec<DeclLine>,
}

impl<'a> PrototypeTableBuilder<'a> {
    pub fn new(profile: &'a LibraryProfile, diagnostics: &'a mut DiagnosticEngine) -> Self {
        PrototypeTableBuilder {
            profile,
            diagnostics,
            table: SymbolTable::new(),
            bodies: Vec::new(),
            unions: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Run both passes and the signature parser over a declarations file.
    pub fn build(mut self, source: &str) -> Result<SymbolTable, BuildError> {
        self.register_source(source)?;
        self.resolve_bodies()?;
        self.resolve_functions();
        Ok(self.finish())
    }

    pub fn finish(self) -> SymbolTable {
        self.table
    }

    /// Pass 1 over raw source text.
    pub fn register_source(&mut self, source: &str) -> Result<(), BuildError> {
        let mut lines = Vec::new();
        for (line_no, parsed) in parse_lines(source) {
            match parsed {
                Ok(line) => lines.push(line),
                Err(err) => self.diagnostics.report(err, Some(line_no)),
            }
        }
        self.register(lines)
    }

    /// Pass 1: register every named type and constant.
    pub fn register(&mut self, lines: Vec<DeclLine>) -> Result<(), BuildError> {
        info!("registering {} declaration lines", lines.len());
        for line in lines {
            if line.is_function() {
                self.functions.push(line);
                continue;
            }
            if !self.profile.accepts_type_name(&line.name) {
                debug!("line {}: skipping '{}'", line.line, line.name);
                continue;
            }
            self.register_line(line)?;
        }
        Ok(())
    }

    fn register_line(&mut self, line: DeclLine) -> Result<(), BuildError> {
        let kind = line.kind();
        match kind {
            DeclKind::Union | DeclKind::Struct => {
                if line.name.is_empty() {
                    self.diagnostics
                        .report_note("skipping anonymous aggregate".to_string(), Some(line.line));
                    return Ok(());
                }
                let (record_kind, queue) = if kind == DeclKind::Union {
                    (RecordKind::Union, &mut self.unions)
                } else {
                    (RecordKind::Struct, &mut self.bodies)
                };
                self.table.declare_record(&line.name, record_kind);
                queue.push(PendingBody {
                    line: line.line,
                    name: line.name,
                    kind,
                    body: line.body,
                });
            }
            DeclKind::Enum => {
                if !line.name.is_empty() {
                    self.table.declare_alias(&line.name, CType::INT);
                }
                self.bodies.push(PendingBody {
                    line: line.line,
                    name: line.name,
                    kind,
                    body: line.body,
                });
            }
            DeclKind::Define => {
                if self.profile.accepts_define(&line.name) {
                    self.define_constant(&line)?;
                }
            }
            DeclKind::Typedef => self.register_typedef(&line),
        }
        Ok(())
    }

    /// `#define NAME value`
    fn define_constant(&mut self, line: &DeclLine) -> Result<(), BuildError> {
        let value_text = line
            .body
            .strip_prefix("#define")
            .unwrap_or(&line.body)
            .trim_start()
            .split_once(char::is_whitespace)
            .map(|(_, value)| value.trim())
            .unwrap_or_default();
        let value = const_eval::evaluate(value_text, &self.table).map_err(|source| BuildError {
            name: line.name.clone(),
            line: line.line,
            source,
        })?;
        debug!("constant {} = {}", line.name, value);
        self.table.define_constant(&line.name, value);
        Ok(())
    }

    /// `typedef BASE NAME`; anything not of that shape is taken to be a
    /// function pointer typedef.
    fn register_typedef(&mut self, line: &DeclLine) {
        if line.name.is_empty() {
            return;
        }
        let base = line
            .body
            .strip_prefix("typedef ")
            .and_then(|rest| rest.rfind(&format!(" {}", line.name)).map(|pos| rest[..pos].trim()));
        let ty = match base {
            Some(base) => match TypeResolver::new(&self.table).resolve(base) {
                Ok(ty) => ty,
                Err(err) => {
                    self.diagnostics.report(err, Some(line.line));
                    CType::OpaquePointer
                }
            },
            None => {
                self.diagnostics.report_note(
                    format!("'{}' taken as a function pointer typedef", line.name),
                    Some(line.line),
                );
                CType::OpaquePointer
            }
        };
        self.table.declare_alias(&line.name, ty);
    }

    /// Pass 2: attach fields and enumerators. Unions go last.
    pub fn resolve_bodies(&mut self) -> Result<(), BuildError> {
        let mut pending = std::mem::take(&mut self.bodies);
        pending.append(&mut self.unions);
        info!("resolving {} aggregate bodies", pending.len());

        let mut attached = Vec::new();
        for item in pending {
            let Some(body) = brace_body(&item.body) else {
                continue;
            };

            if item.kind == DeclKind::Enum {
                parse_enum_body(body, &mut self.table).map_err(|err| BuildError {
                    name: err.name,
                    line: item.line,
                    source: err.source,
                })?;
                continue;
            }

            let fields =
                FieldParser::new(&self.table, self.diagnostics, &item.name, Some(item.line)).parse_body(body);
            if self.table.attach_fields(&item.name, fields) {
                attached.push((item.name, item.line));
            } else {
                self.diagnostics
                    .report(BindError::AggregateFinalization { name: item.name }, Some(item.line));
            }
        }

        for (name, line) in attached {
            self.fold_array_lengths(&name, line);
        }
        Ok(())
    }

    /// Fold symbolic array lengths of `name` against the complete constant
    /// set. A field whose length still does not evaluate is dropped.
    fn fold_array_lengths(&mut self, name: &str, line: usize) {
        let Some(fields) = self.table.fields_of(name) else {
            return;
        };
        if !fields.iter().any(|f| has_symbolic_len(&f.ty)) {
            return;
        }

        let mut folded = Vec::with_capacity(fields.len());
        let mut failures = Vec::new();
        for field in fields {
            match fold_len(&field.ty, &self.table) {
                Ok(ty) => folded.push(Field::new(field.name.clone(), ty)),
                Err(err) => failures.push(BindError::UnsizedArray {
                    aggregate: name.to_string(),
                    field: field.name.clone(),
                    reason: err.to_string(),
                }),
            }
        }
        for err in failures {
            self.diagnostics.report(err, Some(line));
        }
        debug!("folded array lengths of '{}'", name);
        self.table.attach_fields(name, folded);
    }

    /// Resolve the queued function prototypes.
    pub fn resolve_functions(&mut self) {
        let lines = std::mem::take(&mut self.functions);
        info!("resolving {} function prototypes", lines.len());

        let mut signatures = Vec::new();
        for line in &lines {
            let parsed = PrototypeParser::new(&self.table, self.diagnostics, &self.profile.function_prefix).parse(
                line.symbol_name(),
                &line.body,
                Some(line.line),
            );
            match parsed {
                Ok(Some(sig)) => signatures.push(sig),
                Ok(None) => {}
                Err(err) => self.diagnostics.report(err, Some(line.line)),
            }
        }
        for sig in signatures {
            self.table.define_function(sig);
        }
    }
}

fn has_symbolic_len(ty: &CType) -> bool {
    match ty {
        CType::Array(_, ArrayLen::Symbolic(_)) => true,
        CType::Array(elem, _) => has_symbolic_len(elem),
        _ => false,
    }
}

fn fold_len(ty: &CType, constants: &SymbolTable) -> Result<CType, ConstEvalError> {
    match ty {
        CType::Array(elem, len) => {
            let elem = fold_len(elem, constants)?;
            let len = match len {
                ArrayLen::Symbolic(expr) => ArrayLen::Fixed(const_eval::evaluate(expr, constants)?),
                fixed => fixed.clone(),
            };
            Ok(CType::array(elem, len))
        }
        other => Ok(other.clone()),
    }
}
