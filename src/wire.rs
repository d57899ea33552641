//! Low-level byte-cursor reads shared by every decoder layer.
//!
//! All functions operate on `(data, &mut pos)`; on error the cursor is left
//! at a well-defined boundary (the failing item's start offset is carried
//! in the error).

use crate::{CborError, ErrorCode};

/// Major type 0: unsigned integer.
pub(crate) const MAJOR_UINT: u8 = 0;
/// Major type 1: negative integer.
pub(crate) const MAJOR_NINT: u8 = 1;
/// Major type 2: byte string.
pub(crate) const MAJOR_BYTES: u8 = 2;
/// Major type 3: text string.
pub(crate) const MAJOR_TEXT: u8 = 3;
/// Major type 4: array.
pub(crate) const MAJOR_ARRAY: u8 = 4;
/// Major type 5: map.
pub(crate) const MAJOR_MAP: u8 = 5;
/// Major type 6: tag.
pub(crate) const MAJOR_TAG: u8 = 6;
/// Major type 7: simple values and floats.
pub(crate) const MAJOR_SIMPLE: u8 = 7;

pub(crate) const SIMPLE_FALSE: u8 = 20;
pub(crate) const SIMPLE_TRUE: u8 = 21;
pub(crate) const SIMPLE_NULL: u8 = 22;
pub(crate) const SIMPLE_UNDEFINED: u8 = 23;

/// Additional-info value marking indefinite lengths and the break marker.
pub(crate) const AI_INDEFINITE: u8 = 31;

#[inline]
pub(crate) const fn split_initial(ib: u8) -> (u8, u8) {
    (ib >> 5, ib & 0x1f)
}

pub(crate) fn read_u8(data: &[u8], pos: &mut usize) -> Result<u8, CborError> {
    let off = *pos;
    let b = *data
        .get(*pos)
        .ok_or(CborError::new(ErrorCode::Truncated, off))?;
    *pos += 1;
    Ok(b)
}

pub(crate) fn read_exact<'a>(
    data: &'a [u8],
    pos: &mut usize,
    n: usize,
) -> Result<&'a [u8], CborError> {
    let off = *pos;
    let end = pos
        .checked_add(n)
        .ok_or(CborError::new(ErrorCode::LengthOverflow, off))?;
    if end > data.len() {
        return Err(CborError::new(ErrorCode::Truncated, off));
    }
    let s = &data[*pos..end];
    *pos = end;
    Ok(s)
}

pub(crate) fn read_be_u16(data: &[u8], pos: &mut usize) -> Result<u16, CborError> {
    let s = read_exact(data, pos, 2)?;
    Ok(u16::from_be_bytes([s[0], s[1]]))
}

pub(crate) fn read_be_u32(data: &[u8], pos: &mut usize) -> Result<u32, CborError> {
    let s = read_exact(data, pos, 4)?;
    Ok(u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
}

pub(crate) fn read_be_u64(data: &[u8], pos: &mut usize) -> Result<u64, CborError> {
    let s = read_exact(data, pos, 8)?;
    Ok(u64::from_be_bytes([
        s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7],
    ]))
}

/// Reads the argument for additional-info `ai`. Accepts non-minimal widths.
pub(crate) fn read_arg(
    data: &[u8],
    pos: &mut usize,
    ai: u8,
    off: usize,
) -> Result<u64, CborError> {
    match ai {
        0..=23 => Ok(u64::from(ai)),
        24 => Ok(u64::from(read_u8(data, pos)?)),
        25 => Ok(u64::from(read_be_u16(data, pos)?)),
        26 => Ok(u64::from(read_be_u32(data, pos)?)),
        27 => Ok(read_be_u64(data, pos)?),
        _ => Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off)),
    }
}

/// Reads a definite length argument; rejects the indefinite marker.
pub(crate) fn read_len(
    data: &[u8],
    pos: &mut usize,
    ai: u8,
    off: usize,
) -> Result<usize, CborError> {
    if ai == AI_INDEFINITE {
        return Err(CborError::new(ErrorCode::IndefiniteLength, off));
    }
    let len = read_arg(data, pos, ai, off)?;
    usize::try_from(len).map_err(|_| CborError::new(ErrorCode::LengthOverflow, off))
}
