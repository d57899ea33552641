//! Per-type field plans: the analyzer's output and the emitter's input.
//!
//! A plan is constructed once per generator invocation, consumed by the
//! template expander, and discarded; only the emitted source survives.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Lifetime, Type};

/// Integer field widths the generator knows how to narrow to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IntKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

impl IntKind {
    pub(crate) fn from_ident(name: &str) -> Option<Self> {
        Some(match name {
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            _ => return None,
        })
    }

    pub(crate) const fn signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Append expression for a value of this width.
    pub(crate) fn put_expr(self, value: &TokenStream) -> TokenStream {
        match self {
            Self::U64 => quote! { quickcbor::put_uint(buf, #value) },
            Self::U8 | Self::U16 | Self::U32 => {
                quote! { quickcbor::put_uint(buf, u64::from(#value)) }
            }
            Self::I64 => quote! { quickcbor::put_int(buf, #value) },
            Self::I8 | Self::I16 | Self::I32 => {
                quote! { quickcbor::put_int(buf, i64::from(#value)) }
            }
        }
    }

    /// Read expression producing a value of this width with overflow checks.
    pub(crate) fn read_expr(self) -> TokenStream {
        match self {
            Self::U8 => quote! { quickcbor::read_u8_int(data, pos)? },
            Self::U16 => quote! { quickcbor::read_u16_int(data, pos)? },
            Self::U32 => quote! { quickcbor::read_u32_int(data, pos)? },
            Self::U64 => quote! { quickcbor::read_uint(data, pos)? },
            Self::I8 => quote! { quickcbor::read_i8_int(data, pos)? },
            Self::I16 => quote! { quickcbor::read_i16_int(data, pos)? },
            Self::I32 => quote! { quickcbor::read_i32_int(data, pos)? },
            Self::I64 => quote! { quickcbor::read_int(data, pos)? },
        }
    }
}

/// Whether a text or byte field owns its storage or borrows via `Cow`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Storage {
    Owned,
    Cow,
}

/// Whether an owning pointer admits a null sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PtrKind {
    Required,
    Nullable,
}

/// The closed set of field shapes the emitter has plans for.
#[derive(Clone, Debug)]
pub(crate) enum FieldShape {
    Int(IntKind),
    Bool,
    F32,
    F64,
    Text(Storage),
    Bytes(Storage),
    Time,
    Duration,
    /// Another record type held by value.
    Record(Ident),
    /// `Box<T>` or `Option<Box<T>>` to another record.
    RecordPtr(Ident, PtrKind),
    /// `Vec<String>`.
    TextVec,
    /// `Vec<T>` of records by value.
    RecordVec(Ident),
    /// `Vec<Option<Box<T>>>`.
    RecordPtrVec(Ident),
    /// Integer-keyed, integer-valued map.
    IntIntMap(IntKind, IntKind),
    /// Integer-keyed map to owning record pointers.
    IntRecordPtrMap(IntKind, Ident, PtrKind),
    /// `BTreeMap<String, String>` or `HashMap<String, String>`.
    TextTextMap,
    /// A `quickcbor::Value` field: the dynamic walker, unconverted.
    Dynamic,
    /// An unrecognized shape routed to the dynamic fallback helpers;
    /// requires the field type to implement `ToValue`/`FromValue`.
    Fallback,
}

impl FieldShape {
    /// Zero predicate for the omit-empty guard, or `None` when the shape
    /// has no meaningful zero.
    pub(crate) fn zero_predicate(&self, access: &TokenStream) -> Option<TokenStream> {
        match self {
            Self::Int(_) => Some(quote! { #access == 0 }),
            Self::Bool => Some(quote! { !#access }),
            Self::F32 | Self::F64 => Some(quote! { #access == 0.0 }),
            Self::Text(_)
            | Self::Bytes(_)
            | Self::TextVec
            | Self::RecordVec(_)
            | Self::RecordPtrVec(_)
            | Self::IntIntMap(..)
            | Self::IntRecordPtrMap(..)
            | Self::TextTextMap => Some(quote! { #access.is_empty() }),
            Self::Duration => Some(quote! { #access.is_zero() }),
            Self::RecordPtr(_, PtrKind::Nullable) => Some(quote! { #access.is_none() }),
            Self::Time
            | Self::Record(_)
            | Self::RecordPtr(_, PtrKind::Required)
            | Self::Dynamic
            | Self::Fallback => None,
        }
    }

    /// Whether the encode plan is a block that emits its own key.
    pub(crate) const fn is_block(&self) -> bool {
        matches!(
            self,
            Self::RecordVec(_)
                | Self::RecordPtrVec(_)
                | Self::IntIntMap(..)
                | Self::IntRecordPtrMap(..)
                | Self::TextTextMap
        )
    }
}

/// One field of a record, in declaration order.
#[derive(Clone, Debug)]
pub(crate) struct FieldPlan {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    /// Wire key: the `rename` attribute or the field identifier.
    pub(crate) wire_key: String,
    pub(crate) omit_empty: bool,
    /// `None` suppresses the field entirely (`#[cbor(skip)]`); decode then
    /// fills it with `Default::default()`.
    pub(crate) shape: Option<FieldShape>,
}

/// The plan for one exported record type.
#[derive(Clone, Debug)]
pub(crate) struct TypePlan {
    pub(crate) ident: Ident,
    /// The struct's lifetime parameter, when it has exactly one.
    pub(crate) lifetime: Option<Lifetime>,
    pub(crate) fields: Vec<FieldPlan>,
}
