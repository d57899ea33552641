//! L1 helpers composing the primitive codec into common composite shapes.
//!
//! Generated encoders call the append helpers; the read mirrors exist in a
//! checked variant (input already passed [`crate::well_formed`]) and a safe
//! variant (validates as it goes).

use std::collections::BTreeMap;

use crate::append::{put_array_header, put_map_header, put_text};
use crate::read::{read_array_header, read_map_header, read_text_safe, read_text_trusted};
use crate::{CborError, ErrorCode};

fn header_len(len: usize, off: usize) -> Result<u32, CborError> {
    u32::try_from(len).map_err(|_| CborError::new(ErrorCode::LengthOverflow, off))
}

/// Appends an array of text strings.
///
/// # Errors
///
/// Returns `LengthOverflow` if the slice has more than `u32::MAX` items.
pub fn put_text_array<S: AsRef<str>>(buf: &mut Vec<u8>, items: &[S]) -> Result<(), CborError> {
    put_array_header(buf, header_len(items.len(), buf.len())?);
    for item in items {
        put_text(buf, item.as_ref());
    }
    Ok(())
}

/// Appends a string-to-string map in iteration order.
///
/// # Errors
///
/// Returns `LengthOverflow` if the map has more than `u32::MAX` entries.
pub fn put_text_map<K, V>(buf: &mut Vec<u8>, entries: &BTreeMap<K, V>) -> Result<(), CborError>
where
    K: AsRef<str> + Ord,
    V: AsRef<str>,
{
    put_map_header(buf, header_len(entries.len(), buf.len())?);
    for (k, v) in entries {
        put_text(buf, k.as_ref());
        put_text(buf, v.as_ref());
    }
    Ok(())
}

/// Reads an array of text strings without re-validating UTF-8.
///
/// The input must satisfy the [`crate::utf8::trusted`] contract.
///
/// # Errors
///
/// Returns the first header or truncation error.
pub fn read_text_array(data: &[u8], pos: &mut usize) -> Result<Vec<String>, CborError> {
    let len = read_array_header(data, pos)?;
    let mut out = Vec::with_capacity(len.min(data.len()));
    for _ in 0..len {
        out.push(read_text_trusted(data, pos)?.to_owned());
    }
    Ok(out)
}

/// Reads an array of text strings, validating the UTF-8 of each element.
///
/// # Errors
///
/// Returns the first header, truncation, or UTF-8 error.
pub fn read_text_array_safe(data: &[u8], pos: &mut usize) -> Result<Vec<String>, CborError> {
    let len = read_array_header(data, pos)?;
    let mut out = Vec::with_capacity(len.min(data.len()));
    for _ in 0..len {
        out.push(read_text_safe(data, pos)?);
    }
    Ok(out)
}

/// Reads a string-to-string map without re-validating UTF-8.
///
/// Duplicate keys take last-wins semantics. The input must satisfy the
/// [`crate::utf8::trusted`] contract.
///
/// # Errors
///
/// Returns the first header or truncation error.
pub fn read_text_map(
    data: &[u8],
    pos: &mut usize,
) -> Result<BTreeMap<String, String>, CborError> {
    let len = read_map_header(data, pos)?;
    let mut out = BTreeMap::new();
    for _ in 0..len {
        let k = read_text_trusted(data, pos)?.to_owned();
        let v = read_text_trusted(data, pos)?.to_owned();
        out.insert(k, v);
    }
    Ok(out)
}

/// Reads a string-to-string map, validating the UTF-8 of keys and values.
///
/// Duplicate keys take last-wins semantics.
///
/// # Errors
///
/// Returns the first header, truncation, or UTF-8 error.
pub fn read_text_map_safe(
    data: &[u8],
    pos: &mut usize,
) -> Result<BTreeMap<String, String>, CborError> {
    let len = read_map_header(data, pos)?;
    let mut out = BTreeMap::new();
    for _ in 0..len {
        let k = read_text_safe(data, pos)?;
        let v = read_text_safe(data, pos)?;
        out.insert(k, v);
    }
    Ok(out)
}
