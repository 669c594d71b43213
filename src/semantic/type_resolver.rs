//! Type resolution
//!
//! Maps a C type string to a [`CType`]. Registered names (structs, unions,
//! enums, typedefs) are looked up first, then the closed table of primitive
//! aliases. Pointers resolve to a typed pointer only when their target is a
//! registered name; everything else degrades to the opaque pointer.

use log::trace;

use crate::diagnostic::BindError;
use crate::parser::utils::normalize_type;
use crate::types::{CType, Primitive, TypeEntry};

use super::SymbolTable;

/// Exact pointer spellings with a fixed host representation.
fn pointer_override(normalized: &str) -> Option<CType> {
    match normalized {
        "char*" => Some(CType::Utf8String),
        _ => None,
    }
}

/// The fixed primitive alias table, keyed by whitespace-free spelling.
pub fn lookup_primitive(normalized: &str) -> Option<CType> {
    use Primitive::*;
    let prim = match normalized {
        "bool" | "_Bool" => Bool,
        "char" => Byte,
        "unsignedchar" => UByte,
        "int" => Int,
        "unsigned" | "unsignedint" => UInt,
        "int16_t" => Int16,
        "int32_t" => Int32,
        "uint32_t" => UInt32,
        "int64_t" => Int64,
        "uint64_t" => UInt64,
        "unsignedlong" => ULong,
        "long" => Long,
        "size_t" => SizeT,
        "off_t" | "time_t" => Int64,
        "float" => Float,
        "double" => Double,
        "GLuint" => UInt,
        "al_fixed" => Int,
        "uintptr_t" | "intptr_t" | "va_list" | "HWND" | "postprocess_callback_t" => {
            return Some(CType::OpaquePointer);
        }
        _ => return None,
    };
    Some(CType::Primitive(prim))
}

/// Resolves type strings against a symbol table.
pub struct TypeResolver<'a> {
    table: &'a SymbolTable,
}

impl<'a> TypeResolver<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        TypeResolver { table }
    }

    /// Resolve `text`, which may still carry qualifiers and whitespace.
    pub fn resolve(&self, text: &str) -> Result<CType, BindError> {
        let normalized = normalize_type(text);
        self.resolve_normalized(&normalized)
            .ok_or_else(|| BindError::unresolved(normalized))
    }

    fn resolve_normalized(&self, normalized: &str) -> Option<CType> {
        if let Some(base) = normalized.strip_suffix('*') {
            if let Some(special) = pointer_override(normalized) {
                return Some(special);
            }
            let resolved = self
                .named(base)
                .map(CType::pointer_to)
                .unwrap_or(CType::OpaquePointer);
            trace!("pointer '{}' resolved to {}", normalized, resolved);
            return Some(resolved);
        }
        self.named(normalized).or_else(|| lookup_primitive(normalized))
    }

    /// A registered name as a descriptor: records by name, aliases by
    /// their target.
    fn named(&self, name: &str) -> Option<CType> {
        match self.table.get_type(name)? {
            TypeEntry::Record(_) => Some(CType::Record(name.to_string())),
            TypeEntry::Alias(ty) => Some(ty.clone()),
        }
    }
}
