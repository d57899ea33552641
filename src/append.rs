//! L0 append primitives over a caller-owned growable byte buffer.
//!
//! Every operation emits the shortest legal head encoding and only
//! definite-length items. The hot path never allocates beyond the growth
//! of `buf` itself.

use half::f16;

use crate::wire::{
    MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NINT, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT,
    MAJOR_UINT, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED,
};

/// Appends an item head: `major` with argument `value` in minimal width.
///
/// Width selection: value < 24 inline, < 2^8 one byte, < 2^16 two bytes,
/// < 2^32 four bytes, else eight bytes.
pub fn put_head(buf: &mut Vec<u8>, major: u8, value: u64) {
    debug_assert!(major <= 7);
    if value < 24 {
        #[allow(clippy::cast_possible_truncation)]
        buf.push((major << 5) | value as u8);
    } else if value <= 0xff {
        buf.push((major << 5) | 24);
        #[allow(clippy::cast_possible_truncation)]
        buf.push(value as u8);
    } else if value <= 0xffff {
        buf.push((major << 5) | 25);
        #[allow(clippy::cast_possible_truncation)]
        buf.extend_from_slice(&(value as u16).to_be_bytes());
    } else if value <= 0xffff_ffff {
        buf.push((major << 5) | 26);
        #[allow(clippy::cast_possible_truncation)]
        buf.extend_from_slice(&(value as u32).to_be_bytes());
    } else {
        buf.push((major << 5) | 27);
        buf.extend_from_slice(&value.to_be_bytes());
    }
}

/// Appends an unsigned integer (major 0).
pub fn put_uint(buf: &mut Vec<u8>, value: u64) {
    put_head(buf, MAJOR_UINT, value);
}

/// Appends the negative integer `-1 - n` (major 1).
pub fn put_nint(buf: &mut Vec<u8>, n: u64) {
    put_head(buf, MAJOR_NINT, n);
}

/// Appends a signed integer, choosing major 0 or 1 by sign.
pub fn put_int(buf: &mut Vec<u8>, value: i64) {
    if value >= 0 {
        #[allow(clippy::cast_sign_loss)]
        put_head(buf, MAJOR_UINT, value as u64);
    } else {
        // -1 - value never overflows: value is in [i64::MIN, -1].
        #[allow(clippy::cast_sign_loss)]
        put_head(buf, MAJOR_NINT, !(value as u64));
    }
}

/// Appends a definite-length byte string (major 2).
pub fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    put_head(buf, MAJOR_BYTES, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Appends a definite-length text string (major 3).
pub fn put_text(buf: &mut Vec<u8>, s: &str) {
    let b = s.as_bytes();
    put_head(buf, MAJOR_TEXT, b.len() as u64);
    buf.extend_from_slice(b);
}

/// Appends a definite array header for `len` items (major 4).
pub fn put_array_header(buf: &mut Vec<u8>, len: u32) {
    put_head(buf, MAJOR_ARRAY, u64::from(len));
}

/// Appends a definite map header for `len` key/value pairs (major 5).
pub fn put_map_header(buf: &mut Vec<u8>, len: u32) {
    put_head(buf, MAJOR_MAP, u64::from(len));
}

/// Appends a tag head (major 6). The caller must follow with the tagged item.
pub fn put_tag(buf: &mut Vec<u8>, tag: u64) {
    put_head(buf, MAJOR_TAG, tag);
}

/// Appends a boolean (simple value 20/21).
pub fn put_bool(buf: &mut Vec<u8>, value: bool) {
    buf.push((MAJOR_SIMPLE << 5) | if value { SIMPLE_TRUE } else { SIMPLE_FALSE });
}

/// Appends null (simple value 22).
pub fn put_null(buf: &mut Vec<u8>) {
    buf.push((MAJOR_SIMPLE << 5) | SIMPLE_NULL);
}

/// Appends undefined (simple value 23).
pub fn put_undefined(buf: &mut Vec<u8>) {
    buf.push((MAJOR_SIMPLE << 5) | SIMPLE_UNDEFINED);
}

/// Appends a half-precision float from raw bits (major 7, ai 25).
pub fn put_f16(buf: &mut Vec<u8>, bits: u16) {
    buf.push((MAJOR_SIMPLE << 5) | 25);
    buf.extend_from_slice(&bits.to_be_bytes());
}

/// Appends a single-precision float (major 7, ai 26).
pub fn put_f32(buf: &mut Vec<u8>, value: f32) {
    buf.push((MAJOR_SIMPLE << 5) | 26);
    buf.extend_from_slice(&value.to_bits().to_be_bytes());
}

/// Appends a double-precision float (major 7, ai 27).
pub fn put_f64(buf: &mut Vec<u8>, value: f64) {
    buf.push((MAJOR_SIMPLE << 5) | 27);
    buf.extend_from_slice(&value.to_bits().to_be_bytes());
}

/// Appends `value` in the smallest float width that preserves it exactly.
///
/// NaN payloads other than the canonical quiet NaN are not preserved across
/// shortening; NaN always shortens to the half-width quiet NaN.
pub fn put_float_shortest(buf: &mut Vec<u8>, value: f64) {
    if value.is_nan() {
        put_f16(buf, 0x7e00);
        return;
    }
    #[allow(clippy::cast_possible_truncation)]
    let narrow = value as f32;
    if f64::from(narrow) == value {
        let half = f16::from_f32(narrow);
        if half.to_f32() == narrow {
            put_f16(buf, half.to_bits());
        } else {
            put_f32(buf, narrow);
        }
    } else {
        put_f64(buf, value);
    }
}
