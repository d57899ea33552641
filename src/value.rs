//! Dynamic CBOR values.
//!
//! [`Value`] is the fallback representation for callers without generated
//! routines and for the JSON interop layer. Generated code never references
//! it: every known field shape lowers to direct primitive calls instead.

use crate::append::{
    put_array_header, put_bool, put_bytes, put_f64, put_head, put_map_header, put_null, put_tag,
    put_text, put_undefined,
};
use crate::limits::DecodeOptions;
use crate::read::read_float;
use crate::wire::{
    read_arg, read_exact, read_len, read_u8, split_initial, AI_INDEFINITE, MAJOR_ARRAY,
    MAJOR_BYTES, MAJOR_MAP, MAJOR_NINT, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UINT,
    SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED,
};
use crate::{CborError, ErrorCode};

/// A decoded CBOR item of any kind.
///
/// Maps preserve insertion order and permit non-text keys; nothing here
/// enforces canonical ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Major 0: unsigned integer.
    Uint(u64),
    /// Major 1: negative integer, stored as `n` where the value is `-1 - n`.
    Nint(u64),
    /// Major 2: byte string.
    Bytes(Vec<u8>),
    /// Major 3: text string.
    Text(String),
    /// Major 4: array.
    Array(Vec<Value>),
    /// Major 5: map as ordered key/value pairs.
    Map(Vec<(Value, Value)>),
    /// Major 6: tagged value.
    Tag(u64, Box<Value>),
    /// Simple value 20/21.
    Bool(bool),
    /// Simple value 22.
    Null,
    /// Simple value 23.
    Undefined,
    /// Major 7 float, widened to double.
    Float(f64),
}

impl Value {
    /// Returns the signed integer this value represents, if it fits `i64`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Uint(v) => i64::try_from(*v).ok(),
            Self::Nint(n) => i64::try_from(*n).ok().map(|n| -1 - n),
            _ => None,
        }
    }
}

/// Conversion into the dynamic representation.
///
/// Implemented by callers whose types fall outside the generator's closed
/// shape set; the fallback emit plan goes through [`put_dynamic`].
pub trait ToValue {
    /// Builds the dynamic representation of `self`.
    fn to_value(&self) -> Value;
}

/// Conversion out of the dynamic representation, mirroring [`ToValue`].
pub trait FromValue: Sized {
    /// Rebuilds `Self` from a decoded dynamic value.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` (or a shape-specific code) when `value` does
    /// not have the expected form.
    fn from_value(value: &Value) -> Result<Self, CborError>;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        Ok(value.clone())
    }
}

/// Appends any [`ToValue`] type through the dynamic walker.
///
/// This is the fallback path for field shapes the generator does not
/// specialize; known shapes never go through here.
///
/// # Errors
///
/// Returns `LengthOverflow` if a container exceeds `u32::MAX` entries.
pub fn put_dynamic<T: ToValue>(buf: &mut Vec<u8>, value: &T) -> Result<(), CborError> {
    put_value(buf, &value.to_value())
}

/// Reads any [`FromValue`] type through the dynamic walker, validating as
/// it goes.
///
/// # Errors
///
/// Returns the first structural, depth, UTF-8, or conversion error.
pub fn read_dynamic<T: FromValue>(
    data: &[u8],
    pos: &mut usize,
    opts: &DecodeOptions,
) -> Result<T, CborError> {
    let v = read_value(data, pos, opts)?;
    T::from_value(&v)
}

/// Appends `value` with the same wire choices generated encoders make:
/// definite lengths and minimal-width heads.
///
/// This is the dynamic fallback path; generated code for known shapes does
/// not call it.
///
/// # Errors
///
/// Returns `LengthOverflow` if a container exceeds `u32::MAX` entries.
pub fn put_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), CborError> {
    match value {
        Value::Uint(v) => put_head(buf, MAJOR_UINT, *v),
        Value::Nint(n) => put_head(buf, MAJOR_NINT, *n),
        Value::Bytes(b) => put_bytes(buf, b),
        Value::Text(s) => put_text(buf, s),
        Value::Array(items) => {
            let len = u32::try_from(items.len())
                .map_err(|_| CborError::new(ErrorCode::LengthOverflow, buf.len()))?;
            put_array_header(buf, len);
            for item in items {
                put_value(buf, item)?;
            }
        }
        Value::Map(entries) => {
            let len = u32::try_from(entries.len())
                .map_err(|_| CborError::new(ErrorCode::LengthOverflow, buf.len()))?;
            put_map_header(buf, len);
            for (k, v) in entries {
                put_value(buf, k)?;
                put_value(buf, v)?;
            }
        }
        Value::Tag(tag, inner) => {
            put_tag(buf, *tag);
            put_value(buf, inner)?;
        }
        Value::Bool(v) => put_bool(buf, *v),
        Value::Null => put_null(buf),
        Value::Undefined => put_undefined(buf),
        Value::Float(v) => put_f64(buf, *v),
    }
    Ok(())
}

/// Reads one item of any kind into an owned [`Value`], validating UTF-8.
///
/// Indefinite-length strings are concatenated; indefinite containers are
/// collected until their break marker.
///
/// # Errors
///
/// Returns the first structural, depth, or UTF-8 error.
pub fn read_value(
    data: &[u8],
    pos: &mut usize,
    opts: &DecodeOptions,
) -> Result<Value, CborError> {
    parse_value(data, pos, 0, opts)
}

fn parse_value(
    data: &[u8],
    pos: &mut usize,
    depth: usize,
    opts: &DecodeOptions,
) -> Result<Value, CborError> {
    let off = *pos;
    let ib = read_u8(data, pos)?;
    let (major, ai) = split_initial(ib);

    match major {
        MAJOR_UINT => Ok(Value::Uint(read_arg(data, pos, ai, off)?)),
        MAJOR_NINT => Ok(Value::Nint(read_arg(data, pos, ai, off)?)),
        MAJOR_BYTES => {
            if ai == AI_INDEFINITE {
                let mut out = Vec::new();
                collect_chunks(data, pos, MAJOR_BYTES, &mut out)?;
                Ok(Value::Bytes(out))
            } else {
                let len = read_len(data, pos, ai, off)?;
                Ok(Value::Bytes(read_exact(data, pos, len)?.to_vec()))
            }
        }
        MAJOR_TEXT => {
            let bytes = if ai == AI_INDEFINITE {
                let mut out = Vec::new();
                collect_chunks(data, pos, MAJOR_TEXT, &mut out)?;
                out
            } else {
                let len = read_len(data, pos, ai, off)?;
                read_exact(data, pos, len)?.to_vec()
            };
            String::from_utf8(bytes)
                .map(Value::Text)
                .map_err(|_| CborError::new(ErrorCode::Utf8Invalid, off))
        }
        MAJOR_ARRAY => {
            ensure_depth(depth + 1, opts, off)?;
            let mut items = Vec::new();
            if ai == AI_INDEFINITE {
                while !eat_break(data, pos)? {
                    items.push(parse_value(data, pos, depth + 1, opts)?);
                }
            } else {
                let len = read_len(data, pos, ai, off)?;
                items.reserve(len.min(data.len() - *pos));
                for _ in 0..len {
                    items.push(parse_value(data, pos, depth + 1, opts)?);
                }
            }
            Ok(Value::Array(items))
        }
        MAJOR_MAP => {
            ensure_depth(depth + 1, opts, off)?;
            let mut entries = Vec::new();
            if ai == AI_INDEFINITE {
                while !eat_break(data, pos)? {
                    let k = parse_value(data, pos, depth + 1, opts)?;
                    let v = parse_value(data, pos, depth + 1, opts)?;
                    entries.push((k, v));
                }
            } else {
                let len = read_len(data, pos, ai, off)?;
                entries.reserve(len.min(data.len() - *pos));
                for _ in 0..len {
                    let k = parse_value(data, pos, depth + 1, opts)?;
                    let v = parse_value(data, pos, depth + 1, opts)?;
                    entries.push((k, v));
                }
            }
            Ok(Value::Map(entries))
        }
        MAJOR_TAG => {
            if ai == AI_INDEFINITE {
                return Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off));
            }
            ensure_depth(depth + 1, opts, off)?;
            let tag = read_arg(data, pos, ai, off)?;
            let inner = parse_value(data, pos, depth + 1, opts)?;
            Ok(Value::Tag(tag, Box::new(inner)))
        }
        MAJOR_SIMPLE => match ai {
            SIMPLE_FALSE => Ok(Value::Bool(false)),
            SIMPLE_TRUE => Ok(Value::Bool(true)),
            SIMPLE_NULL => Ok(Value::Null),
            SIMPLE_UNDEFINED => Ok(Value::Undefined),
            25 | 26 | 27 => {
                *pos = off;
                read_float(data, pos).map(Value::Float)
            }
            AI_INDEFINITE => Err(CborError::new(ErrorCode::UnexpectedBreak, off)),
            _ => Err(CborError::new(ErrorCode::DisallowedSimple, off)),
        },
        _ => unreachable!("major out of range"),
    }
}

fn collect_chunks(
    data: &[u8],
    pos: &mut usize,
    major: u8,
    out: &mut Vec<u8>,
) -> Result<(), CborError> {
    loop {
        if eat_break(data, pos)? {
            return Ok(());
        }
        let off = *pos;
        let ib = read_u8(data, pos)?;
        let (m, ai) = split_initial(ib);
        if m != major || ai == AI_INDEFINITE {
            return Err(CborError::new(ErrorCode::TypeMismatch, off));
        }
        let len = read_len(data, pos, ai, off)?;
        out.extend_from_slice(read_exact(data, pos, len)?);
    }
}

fn eat_break(data: &[u8], pos: &mut usize) -> Result<bool, CborError> {
    let off = *pos;
    let b = *data
        .get(off)
        .ok_or(CborError::new(ErrorCode::NonTerminatedIndefinite, off))?;
    let (m, ai) = split_initial(b);
    if m == MAJOR_SIMPLE && ai == AI_INDEFINITE {
        *pos += 1;
        return Ok(true);
    }
    Ok(false)
}

const fn ensure_depth(next: usize, opts: &DecodeOptions, off: usize) -> Result<(), CborError> {
    if next > opts.max_depth {
        return Err(CborError::new(ErrorCode::DepthExceeded, off));
    }
    Ok(())
}
