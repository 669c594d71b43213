//! Type descriptors for the binding symbol table.
//!
//! Every C type the scraper understands is reduced to a [`CType`]. Named
//! aggregates live in the symbol table as [`TypeEntry`] values and are only
//! referenced by name from here, so a descriptor never owns another
//! aggregate's fields.

use std::fmt;

use serde::Serialize;

/// Host-representable scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Primitive {
    Bool,
    Byte,
    UByte,
    Int,
    UInt,
    Int16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Long,
    ULong,
    SizeT,
    Float,
    Double,
}

impl Primitive {
    /// Name of the matching ctypes scalar.
    pub fn ctypes_name(self) -> &'static str {
        match self {
            Primitive::Bool => "c_bool",
            Primitive::Byte => "c_byte",
            Primitive::UByte => "c_ubyte",
            Primitive::Int => "c_int",
            Primitive::UInt => "c_uint",
            Primitive::Int16 => "c_int16",
            Primitive::Int32 => "c_int32",
            Primitive::UInt32 => "c_uint32",
            Primitive::Int64 => "c_int64",
            Primitive::UInt64 => "c_uint64",
            Primitive::Long => "c_long",
            Primitive::ULong => "c_ulong",
            Primitive::SizeT => "c_size_t",
            Primitive::Float => "c_float",
            Primitive::Double => "c_double",
        }
    }
}

/// Length of an array field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ArrayLen {
    /// Folded at parse time.
    Fixed(i64),
    /// References constants unknown while the field was parsed; kept as a
    /// host-language expression with `//` floor division.
    Symbolic(String),
}

impl fmt::Display for ArrayLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayLen::Fixed(n) => write!(f, "{}", n),
            ArrayLen::Symbolic(expr) => write!(f, "({})", expr),
        }
    }
}

/// A resolved type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CType {
    Primitive(Primitive),
    /// Generic untyped pointer. Every degraded type ends up here.
    OpaquePointer,
    /// `char *` passed as a UTF-8 string by value.
    Utf8String,
    /// A struct or union, by name.
    Record(String),
    /// Pointer to a registered type.
    Pointer(Box<CType>),
    Array(Box<CType>, ArrayLen),
}

impl CType {
    pub const INT: CType = CType::Primitive(Primitive::Int);

    pub fn array(elem: CType, len: ArrayLen) -> Self {
        CType::Array(Box::new(elem), len)
    }

    pub fn pointer_to(target: CType) -> Self {
        CType::Pointer(Box::new(target))
    }

    /// The struct or union this type holds by value, looking through
    /// array element types.
    pub fn embedded_record(&self) -> Option<&str> {
        match self {
            CType::Record(name) => Some(name),
            CType::Array(elem, _) => elem.embedded_record(),
            _ => None,
        }
    }
}

impl fmt::Display for CType {
    /// Formats the descriptor as a ctypes expression.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CType::Primitive(p) => f.write_str(p.ctypes_name()),
            CType::OpaquePointer => f.write_str("c_void_p"),
            CType::Utf8String => f.write_str("_AL_UTF8String"),
            CType::Record(name) => f.write_str(name),
            CType::Pointer(target) => match target.as_ref() {
                CType::Record(name) => write!(f, "LP_{}", name),
                other => write!(f, "POINTER({})", other),
            },
            CType::Array(elem, len) => match elem.as_ref() {
                CType::Array(..) => write!(f, "({}) * {}", elem, len),
                _ => write!(f, "{} * {}", elem, len),
            },
        }
    }
}

/// One member of a struct or union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub ty: CType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: CType) -> Self {
        Field { name: name.into(), ty }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    Struct,
    Union,
}

impl RecordKind {
    /// ctypes base class for the generated class declaration.
    pub fn base_class(self) -> &'static str {
        match self {
            RecordKind::Struct => "Structure",
            RecordKind::Union => "Union",
        }
    }
}

/// A struct or union shell.
///
/// `fields` is `None` until pass 2 attaches a body; shells declared without a
/// brace body (opaque handles) stay that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub kind: RecordKind,
    pub fields: Option<Vec<Field>>,
}

impl Record {
    pub fn shell(kind: RecordKind) -> Self {
        Record { kind, fields: None }
    }
}

/// A named entry of the type registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeEntry {
    Record(Record),
    /// Enums (as `int`) and plain typedefs.
    Alias(CType),
}

impl TypeEntry {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            TypeEntry::Record(record) => Some(record),
            TypeEntry::Alias(_) => None,
        }
    }
}

/// A resolved function prototype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSig {
    pub name: String,
    /// `None` for `void` functions.
    pub ret: Option<CType>,
    pub params: Vec<CType>,
}
