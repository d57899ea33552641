//! L0 typed reads over a byte cursor.
//!
//! Safe variants copy into owned values; trusted variants borrow from the
//! input and defer UTF-8 validation to [`crate::utf8::trusted`]. Both
//! accept non-minimal head widths.

use half::f16;

use crate::limits::DecodeOptions;
use crate::wire::{
    read_arg, read_exact, read_len, read_u8, split_initial, AI_INDEFINITE, MAJOR_ARRAY,
    MAJOR_BYTES, MAJOR_MAP, MAJOR_NINT, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UINT,
    SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED,
};
use crate::{utf8, CborError, ErrorCode};

fn expect_major(
    data: &[u8],
    pos: &mut usize,
    major: u8,
) -> Result<(u8, usize), CborError> {
    let off = *pos;
    let ib = read_u8(data, pos)?;
    let (m, ai) = split_initial(ib);
    if m != major {
        *pos = off;
        return Err(CborError::new(ErrorCode::TypeMismatch, off));
    }
    Ok((ai, off))
}

/// Reads an unsigned integer (major 0).
pub fn read_uint(data: &[u8], pos: &mut usize) -> Result<u64, CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_UINT)?;
    read_arg(data, pos, ai, off)
}

/// Reads a negative integer (major 1) and returns its argument `n` (`-1 - n`).
pub fn read_nint(data: &[u8], pos: &mut usize) -> Result<u64, CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_NINT)?;
    read_arg(data, pos, ai, off)
}

/// Reads a signed integer from major 0 or 1, rejecting values outside `i64`.
pub fn read_int(data: &[u8], pos: &mut usize) -> Result<i64, CborError> {
    let off = *pos;
    let ib = read_u8(data, pos)?;
    let (major, ai) = split_initial(ib);
    match major {
        MAJOR_UINT => {
            let v = read_arg(data, pos, ai, off)?;
            i64::try_from(v).map_err(|_| CborError::new(ErrorCode::IntOverflow, off))
        }
        MAJOR_NINT => {
            let n = read_arg(data, pos, ai, off)?;
            let n = i64::try_from(n).map_err(|_| CborError::new(ErrorCode::IntOverflow, off))?;
            Ok(-1 - n)
        }
        _ => {
            *pos = off;
            Err(CborError::new(ErrorCode::TypeMismatch, off))
        }
    }
}

macro_rules! narrow_uint {
    ($($(#[$doc:meta])* $name:ident => $ty:ty),* $(,)?) => {$(
        $(#[$doc])*
        pub fn $name(data: &[u8], pos: &mut usize) -> Result<$ty, CborError> {
            let off = *pos;
            let v = read_uint(data, pos)?;
            <$ty>::try_from(v).map_err(|_| CborError::new(ErrorCode::IntOverflow, off))
        }
    )*};
}

macro_rules! narrow_int {
    ($($(#[$doc:meta])* $name:ident => $ty:ty),* $(,)?) => {$(
        $(#[$doc])*
        pub fn $name(data: &[u8], pos: &mut usize) -> Result<$ty, CborError> {
            let off = *pos;
            let v = read_int(data, pos)?;
            <$ty>::try_from(v).map_err(|_| CborError::new(ErrorCode::IntOverflow, off))
        }
    )*};
}

narrow_uint! {
    /// Reads an unsigned integer that must fit in `u8`.
    read_u8_int => u8,
    /// Reads an unsigned integer that must fit in `u16`.
    read_u16_int => u16,
    /// Reads an unsigned integer that must fit in `u32`.
    read_u32_int => u32,
}

narrow_int! {
    /// Reads a signed integer that must fit in `i8`.
    read_i8_int => i8,
    /// Reads a signed integer that must fit in `i16`.
    read_i16_int => i16,
    /// Reads a signed integer that must fit in `i32`.
    read_i32_int => i32,
}

/// Reads a boolean (simple value 20/21).
pub fn read_bool(data: &[u8], pos: &mut usize) -> Result<bool, CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_SIMPLE)?;
    match ai {
        SIMPLE_FALSE => Ok(false),
        SIMPLE_TRUE => Ok(true),
        _ => {
            *pos = off;
            Err(CborError::new(ErrorCode::TypeMismatch, off))
        }
    }
}

/// Reads a null (simple value 22).
pub fn read_null(data: &[u8], pos: &mut usize) -> Result<(), CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_SIMPLE)?;
    if ai == SIMPLE_NULL {
        Ok(())
    } else {
        *pos = off;
        Err(CborError::new(ErrorCode::TypeMismatch, off))
    }
}

/// Consumes a null or undefined item if one is next; returns whether it did.
pub fn try_read_null(data: &[u8], pos: &mut usize) -> Result<bool, CborError> {
    let off = *pos;
    let b = *data
        .get(off)
        .ok_or(CborError::new(ErrorCode::Truncated, off))?;
    let (major, ai) = split_initial(b);
    if major == MAJOR_SIMPLE && (ai == SIMPLE_NULL || ai == SIMPLE_UNDEFINED) {
        *pos += 1;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Reads a definite byte string, borrowing from the input.
pub fn read_bytes_trusted<'a>(data: &'a [u8], pos: &mut usize) -> Result<&'a [u8], CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_BYTES)?;
    let len = read_len(data, pos, ai, off)?;
    read_exact(data, pos, len)
}

/// Reads a definite byte string into an owned vector.
pub fn read_bytes_safe(data: &[u8], pos: &mut usize) -> Result<Vec<u8>, CborError> {
    read_bytes_trusted(data, pos).map(<[u8]>::to_vec)
}

/// Reads a definite text string, borrowing from the input.
///
/// UTF-8 is not validated; per the [`utf8::trusted`] contract the bytes
/// must have been validated by [`crate::well_formed`] or come from a
/// conforming encoder.
pub fn read_text_trusted<'a>(data: &'a [u8], pos: &mut usize) -> Result<&'a str, CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_TEXT)?;
    let len = read_len(data, pos, ai, off)?;
    let bytes = read_exact(data, pos, len)?;
    utf8::trusted(bytes).map_err(|()| CborError::new(ErrorCode::Utf8Invalid, off))
}

/// Reads a definite text string into a fresh owned `String`, validating UTF-8.
pub fn read_text_safe(data: &[u8], pos: &mut usize) -> Result<String, CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_TEXT)?;
    let len = read_len(data, pos, ai, off)?;
    let bytes = read_exact(data, pos, len)?;
    utf8::validate(bytes)
        .map(str::to_owned)
        .map_err(|()| CborError::new(ErrorCode::Utf8Invalid, off))
}

/// Reads a definite array header and returns the declared item count.
pub fn read_array_header(data: &[u8], pos: &mut usize) -> Result<usize, CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_ARRAY)?;
    read_len(data, pos, ai, off)
}

/// Reads a definite map header and returns the declared entry count.
pub fn read_map_header(data: &[u8], pos: &mut usize) -> Result<usize, CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_MAP)?;
    read_len(data, pos, ai, off)
}

/// Reads a tag head (major 6) and returns the tag number.
pub fn read_tag(data: &[u8], pos: &mut usize) -> Result<u64, CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_TAG)?;
    read_arg(data, pos, ai, off)
}

/// Reads a float of any width (ai 25/26/27) and widens it to `f64`.
pub fn read_float(data: &[u8], pos: &mut usize) -> Result<f64, CborError> {
    let (ai, off) = expect_major(data, pos, MAJOR_SIMPLE)?;
    match ai {
        25 => {
            let bits = crate::wire::read_be_u16(data, pos)?;
            Ok(f16::from_bits(bits).to_f64())
        }
        26 => {
            let bits = crate::wire::read_be_u32(data, pos)?;
            Ok(f64::from(f32::from_bits(bits)))
        }
        27 => {
            let bits = crate::wire::read_be_u64(data, pos)?;
            Ok(f64::from_bits(bits))
        }
        _ => {
            *pos = off;
            Err(CborError::new(ErrorCode::TypeMismatch, off))
        }
    }
}

/// Skips exactly one well-formed item, including indefinite-length items.
///
/// Uses an explicit pending-count stack; a break marker pops the enclosing
/// indefinite level and is rejected anywhere else.
pub fn skip_value(data: &[u8], pos: &mut usize, opts: &DecodeOptions) -> Result<(), CborError> {
    // Pending item counts per nesting level; usize::MAX marks indefinite.
    let mut stack: Vec<usize> = Vec::new();
    let mut remaining: usize = 1;

    loop {
        while remaining == 0 {
            match stack.pop() {
                Some(r) => remaining = r,
                None => return Ok(()),
            }
        }

        let off = *pos;
        let ib = read_u8(data, pos)?;
        let (major, ai) = split_initial(ib);

        if major == MAJOR_SIMPLE && ai == AI_INDEFINITE {
            if remaining == usize::MAX {
                remaining = 0;
                continue;
            }
            return Err(CborError::new(ErrorCode::UnexpectedBreak, off));
        }

        if remaining != usize::MAX {
            remaining -= 1;
        }

        let enter = |stack: &mut Vec<usize>, remaining: &mut usize, next: usize| {
            if stack.len() + 1 > opts.max_depth {
                return Err(CborError::new(ErrorCode::DepthExceeded, off));
            }
            stack.push(*remaining);
            *remaining = next;
            Ok(())
        };

        match major {
            MAJOR_UINT | MAJOR_NINT => {
                let _ = read_arg(data, pos, ai, off)?;
            }
            MAJOR_BYTES | MAJOR_TEXT => {
                if ai == AI_INDEFINITE {
                    // Chunks must be definite strings of the same major type.
                    loop {
                        let chunk_off = *pos;
                        let chunk = read_u8(data, pos)?;
                        let (m, chunk_ai) = split_initial(chunk);
                        if m == MAJOR_SIMPLE && chunk_ai == AI_INDEFINITE {
                            break;
                        }
                        if m != major || chunk_ai == AI_INDEFINITE {
                            return Err(CborError::new(ErrorCode::TypeMismatch, chunk_off));
                        }
                        let len = read_len(data, pos, chunk_ai, chunk_off)?;
                        let _ = read_exact(data, pos, len)?;
                    }
                } else {
                    let len = read_len(data, pos, ai, off)?;
                    let _ = read_exact(data, pos, len)?;
                }
            }
            MAJOR_ARRAY => {
                if ai == AI_INDEFINITE {
                    enter(&mut stack, &mut remaining, usize::MAX)?;
                } else {
                    let len = read_len(data, pos, ai, off)?;
                    enter(&mut stack, &mut remaining, len)?;
                }
            }
            MAJOR_MAP => {
                if ai == AI_INDEFINITE {
                    enter(&mut stack, &mut remaining, usize::MAX)?;
                } else {
                    let len = read_len(data, pos, ai, off)?;
                    let items = len
                        .checked_mul(2)
                        .ok_or(CborError::new(ErrorCode::LengthOverflow, off))?;
                    enter(&mut stack, &mut remaining, items)?;
                }
            }
            MAJOR_TAG => {
                let _ = read_arg(data, pos, ai, off)?;
                enter(&mut stack, &mut remaining, 1)?;
            }
            MAJOR_SIMPLE => match ai {
                SIMPLE_FALSE | SIMPLE_TRUE | SIMPLE_NULL | SIMPLE_UNDEFINED => {}
                24 => {
                    let _ = read_u8(data, pos)?;
                }
                25 => {
                    let _ = read_exact(data, pos, 2)?;
                }
                26 => {
                    let _ = read_exact(data, pos, 4)?;
                }
                27 => {
                    let _ = read_exact(data, pos, 8)?;
                }
                _ => return Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off)),
            },
            _ => unreachable!("major out of range"),
        }
    }
}
