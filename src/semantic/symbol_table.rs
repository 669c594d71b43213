//! Symbol table for one translation run.
//!
//! Three insertion-ordered maps: named types, integer constants and function
//! signatures. The table is filled monotonically by the prototype table
//! builder and handed out read-only afterwards; only crate-internal code can
//! mutate it.

use indexmap::IndexMap;
use serde::Serialize;

use crate::types::{CType, Field, FunctionSig, Record, RecordKind, TypeEntry};

use super::const_eval::ConstantLookup;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    types: IndexMap<String, TypeEntry>,
    constants: IndexMap<String, i64>,
    functions: IndexMap<String, FunctionSig>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn types(&self) -> &IndexMap<String, TypeEntry> {
        &self.types
    }

    pub fn constants(&self) -> &IndexMap<String, i64> {
        &self.constants
    }

    pub fn functions(&self) -> &IndexMap<String, FunctionSig> {
        &self.functions
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeEntry> {
        self.types.get(name)
    }

    pub fn get_record(&self, name: &str) -> Option<&Record> {
        self.types.get(name).and_then(TypeEntry::as_record)
    }

    pub fn get_constant(&self, name: &str) -> Option<i64> {
        self.constants.get(name).copied()
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }

    /// Fields attached to a struct or union, if it has a body.
    pub fn fields_of(&self, name: &str) -> Option<&[Field]> {
        self.get_record(name).and_then(|r| r.fields.as_deref())
    }

    pub(crate) fn declare_record(&mut self, name: &str, kind: RecordKind) {
        self.types
            .insert(name.to_string(), TypeEntry::Record(Record::shell(kind)));
    }

    pub(crate) fn declare_alias(&mut self, name: &str, ty: CType) {
        self.types.insert(name.to_string(), TypeEntry::Alias(ty));
    }

    pub(crate) fn define_constant(&mut self, name: &str, value: i64) {
        self.constants.insert(name.to_string(), value);
    }

    pub(crate) fn define_function(&mut self, sig: FunctionSig) {
        self.functions.insert(sig.name.clone(), sig);
    }

    /// Attach a field list to a shell created in pass 1.
    ///
    /// Returns `false` when `name` is not registered as a struct or union.
    pub(crate) fn attach_fields(&mut self, name: &str, fields: Vec<Field>) -> bool {
        match self.types.get_mut(name) {
            Some(TypeEntry::Record(record)) => {
                record.fields = Some(fields);
                true
            }
            _ => false,
        }
    }
}

impl ConstantLookup for SymbolTable {
    fn constant(&self, name: &str) -> Option<i64> {
        self.get_constant(name)
    }
}
