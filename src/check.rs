//! One-pass well-formedness checking.
//!
//! The checker recognizes every major type, follows nested lengths,
//! validates the UTF-8 of every text string, and never materializes a
//! value. Safe decoders run it exactly once over their input and then
//! re-parse structurally without re-validating UTF-8.

use crate::limits::DecodeOptions;
use crate::wire::{
    read_arg, read_exact, read_len, read_u8, split_initial, AI_INDEFINITE, MAJOR_ARRAY,
    MAJOR_BYTES, MAJOR_MAP, MAJOR_NINT, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UINT,
    SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED,
};
use crate::{utf8, CborError, ErrorCode};

/// Checks that `data` begins with one complete well-formed CBOR item and
/// returns that item's byte length.
///
/// Trailing bytes after the first item are not an error; the caller decides
/// what the remainder means.
///
/// # Errors
///
/// Returns the first truncation, ill-formedness, depth, or UTF-8 error
/// encountered, with the offending byte offset.
pub fn well_formed(data: &[u8], opts: &DecodeOptions) -> Result<usize, CborError> {
    let mut pos = 0usize;
    check_item(data, &mut pos, 0, opts)?;
    Ok(pos)
}

/// Checks one item starting at `pos`, advancing past it.
fn check_item(
    data: &[u8],
    pos: &mut usize,
    depth: usize,
    opts: &DecodeOptions,
) -> Result<(), CborError> {
    let off = *pos;
    let ib = read_u8(data, pos)?;
    let (major, ai) = split_initial(ib);

    if ai == AI_INDEFINITE {
        return check_indefinite(data, pos, major, depth, opts, off);
    }

    match major {
        MAJOR_UINT | MAJOR_NINT => {
            let _ = read_arg(data, pos, ai, off)?;
            Ok(())
        }
        MAJOR_BYTES => {
            let len = read_len(data, pos, ai, off)?;
            let _ = read_exact(data, pos, len)?;
            Ok(())
        }
        MAJOR_TEXT => {
            let len = read_len(data, pos, ai, off)?;
            let bytes = read_exact(data, pos, len)?;
            utf8::validate(bytes).map_err(|()| CborError::new(ErrorCode::Utf8Invalid, off))?;
            Ok(())
        }
        MAJOR_ARRAY => {
            let len = read_len(data, pos, ai, off)?;
            ensure_depth(depth + 1, opts, off)?;
            for _ in 0..len {
                check_item(data, pos, depth + 1, opts)?;
            }
            Ok(())
        }
        MAJOR_MAP => {
            let len = read_len(data, pos, ai, off)?;
            ensure_depth(depth + 1, opts, off)?;
            for _ in 0..len {
                check_item(data, pos, depth + 1, opts)?;
                check_item(data, pos, depth + 1, opts)?;
            }
            Ok(())
        }
        MAJOR_TAG => {
            let _ = read_arg(data, pos, ai, off)?;
            ensure_depth(depth + 1, opts, off)?;
            check_item(data, pos, depth + 1, opts)
        }
        MAJOR_SIMPLE => match ai {
            SIMPLE_FALSE | SIMPLE_TRUE | SIMPLE_NULL | SIMPLE_UNDEFINED => Ok(()),
            24 => {
                // Two-byte simple; values < 32 are reserved, others disallowed
                // by this codec's data model.
                let _ = read_u8(data, pos)?;
                Err(CborError::new(ErrorCode::DisallowedSimple, off))
            }
            25 => {
                let _ = read_exact(data, pos, 2)?;
                Ok(())
            }
            26 => {
                let _ = read_exact(data, pos, 4)?;
                Ok(())
            }
            27 => {
                let _ = read_exact(data, pos, 8)?;
                Ok(())
            }
            0..=19 => Err(CborError::new(ErrorCode::DisallowedSimple, off)),
            _ => Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off)),
        },
        _ => unreachable!("major out of range"),
    }
}

/// Checks an indefinite-length item whose head was already consumed.
fn check_indefinite(
    data: &[u8],
    pos: &mut usize,
    major: u8,
    depth: usize,
    opts: &DecodeOptions,
    off: usize,
) -> Result<(), CborError> {
    match major {
        MAJOR_BYTES | MAJOR_TEXT => loop {
            let chunk_off = *pos;
            let ib = read_u8(data, pos).map_err(|_| non_terminated(chunk_off))?;
            let (m, ai) = split_initial(ib);
            if m == MAJOR_SIMPLE && ai == AI_INDEFINITE {
                return Ok(());
            }
            // Chunks must be definite strings of the same major type.
            if m != major || ai == AI_INDEFINITE {
                return Err(CborError::new(ErrorCode::TypeMismatch, chunk_off));
            }
            let len = read_len(data, pos, ai, chunk_off)?;
            let bytes = read_exact(data, pos, len)?;
            if major == MAJOR_TEXT {
                utf8::validate(bytes)
                    .map_err(|()| CborError::new(ErrorCode::Utf8Invalid, chunk_off))?;
            }
        },
        MAJOR_ARRAY => {
            ensure_depth(depth + 1, opts, off)?;
            loop {
                if eat_break(data, pos)? {
                    return Ok(());
                }
                check_item(data, pos, depth + 1, opts)?;
            }
        }
        MAJOR_MAP => {
            ensure_depth(depth + 1, opts, off)?;
            loop {
                if eat_break(data, pos)? {
                    return Ok(());
                }
                check_item(data, pos, depth + 1, opts)?;
                // A break in the value slot leaves the final pair unfinished.
                if eat_break(data, pos)? {
                    return Err(CborError::new(ErrorCode::UnexpectedBreak, *pos - 1));
                }
                check_item(data, pos, depth + 1, opts)?;
            }
        }
        // Major 0, 1, and 6 have no indefinite form; major 7 with ai 31 is
        // the break marker itself.
        MAJOR_UINT | MAJOR_NINT | MAJOR_TAG => {
            Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off))
        }
        MAJOR_SIMPLE => Err(CborError::new(ErrorCode::UnexpectedBreak, off)),
        _ => unreachable!("major out of range"),
    }
}

fn eat_break(data: &[u8], pos: &mut usize) -> Result<bool, CborError> {
    let off = *pos;
    let b = *data.get(off).ok_or_else(|| non_terminated(off))?;
    let (m, ai) = split_initial(b);
    if m == MAJOR_SIMPLE && ai == AI_INDEFINITE {
        *pos += 1;
        return Ok(true);
    }
    Ok(false)
}

const fn non_terminated(off: usize) -> CborError {
    CborError::new(ErrorCode::NonTerminatedIndefinite, off)
}

const fn ensure_depth(next: usize, opts: &DecodeOptions, off: usize) -> Result<(), CborError> {
    if next > opts.max_depth {
        return Err(CborError::new(ErrorCode::DepthExceeded, off));
    }
    Ok(())
}
