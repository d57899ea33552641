//! UTF-8 validation and the trusted non-validating conversion.

/// Validates UTF-8 bytes and returns a borrowed `&str` on success.
#[inline]
pub fn validate(bytes: &[u8]) -> Result<&str, ()> {
    core::str::from_utf8(bytes).map_err(|_| ())
}

/// Returns a `&str` from bytes the caller vouches for, without validating.
///
/// Callers accept the trusted contract: the bytes were either already
/// validated by the well-formedness checker or come from a conforming
/// encoder. Feeding untrusted bytes through this path hands the caller a
/// `&str` that may violate the UTF-8 invariant.
#[inline]
#[allow(unsafe_code)]
#[allow(clippy::unnecessary_wraps)]
pub fn trusted(bytes: &[u8]) -> Result<&str, ()> {
    // Safety: callers only use this for checker-validated or trusted bytes.
    Ok(unsafe { core::str::from_utf8_unchecked(bytes) })
}
