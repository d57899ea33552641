//! Tagged time and duration items.
//!
//! Time uses the tag 0 (RFC 3339 text) and tag 1 (epoch) conventions;
//! durations are carried under tag 1000 as unsigned integer nanoseconds.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::append::{put_tag, put_text, put_uint};
use crate::read::{read_float, read_int, read_tag, read_text_trusted, read_uint};
use crate::tags::{TAG_DURATION, TAG_TIME_EPOCH, TAG_TIME_TEXT};
use crate::wire::{split_initial, MAJOR_NINT, MAJOR_SIMPLE, MAJOR_UINT};
use crate::{CborError, ErrorCode};

/// Appends a timestamp as tag 0 with RFC 3339 text at nanosecond precision.
pub fn put_time_text(buf: &mut Vec<u8>, t: &DateTime<Utc>) {
    put_tag(buf, TAG_TIME_TEXT);
    put_text(buf, &t.to_rfc3339_opts(SecondsFormat::AutoSi, true));
}

/// Appends a timestamp as tag 1 with integer epoch seconds.
///
/// Sub-second precision is discarded; use [`put_time_text`] to keep it.
pub fn put_time_epoch(buf: &mut Vec<u8>, t: &DateTime<Utc>) {
    put_tag(buf, TAG_TIME_EPOCH);
    crate::append::put_int(buf, t.timestamp());
}

/// Reads a timestamp in either the tag 0 or tag 1 convention.
///
/// Tag 1 accepts integer and float epoch values. The text form follows the
/// [`crate::utf8::trusted`] contract (tag 0 payloads are ASCII when well
/// formed, and RFC 3339 parsing rejects anything else).
///
/// # Errors
///
/// Returns `TypeMismatch` for other tags, `InvalidTime` for unparseable or
/// out-of-range values.
pub fn read_time(data: &[u8], pos: &mut usize) -> Result<DateTime<Utc>, CborError> {
    let off = *pos;
    match read_tag(data, pos)? {
        TAG_TIME_TEXT => {
            let s = read_text_trusted(data, pos)?;
            DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| CborError::new(ErrorCode::InvalidTime, off))
        }
        TAG_TIME_EPOCH => read_epoch(data, pos, off),
        _ => {
            *pos = off;
            Err(CborError::new(ErrorCode::TypeMismatch, off))
        }
    }
}

fn read_epoch(data: &[u8], pos: &mut usize, off: usize) -> Result<DateTime<Utc>, CborError> {
    let head = *data
        .get(*pos)
        .ok_or(CborError::new(ErrorCode::Truncated, *pos))?;
    let (major, _) = split_initial(head);
    match major {
        MAJOR_UINT | MAJOR_NINT => {
            let secs = read_int(data, pos)?;
            DateTime::from_timestamp(secs, 0).ok_or(CborError::new(ErrorCode::InvalidTime, off))
        }
        MAJOR_SIMPLE => {
            let secs = read_float(data, pos)?;
            if !secs.is_finite() {
                return Err(CborError::new(ErrorCode::InvalidTime, off));
            }
            let millis = secs * 1000.0;
            if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
                return Err(CborError::new(ErrorCode::InvalidTime, off));
            }
            #[allow(clippy::cast_possible_truncation)]
            DateTime::from_timestamp_millis(millis as i64)
                .ok_or(CborError::new(ErrorCode::InvalidTime, off))
        }
        _ => Err(CborError::new(ErrorCode::TypeMismatch, *pos)),
    }
}

/// Appends a duration as tag 1000 with unsigned integer nanoseconds.
///
/// # Errors
///
/// Returns `IntOverflow` if the duration exceeds `u64::MAX` nanoseconds.
pub fn put_duration(buf: &mut Vec<u8>, d: Duration) -> Result<(), CborError> {
    let nanos =
        u64::try_from(d.as_nanos()).map_err(|_| CborError::new(ErrorCode::IntOverflow, buf.len()))?;
    put_tag(buf, TAG_DURATION);
    put_uint(buf, nanos);
    Ok(())
}

/// Reads a tag 1000 duration.
///
/// # Errors
///
/// Returns `TypeMismatch` for other tags or non-integer payloads.
pub fn read_duration(data: &[u8], pos: &mut usize) -> Result<Duration, CborError> {
    let off = *pos;
    let tag = read_tag(data, pos)?;
    if tag != TAG_DURATION {
        *pos = off;
        return Err(CborError::new(ErrorCode::TypeMismatch, off));
    }
    let nanos = read_uint(data, pos)?;
    Ok(Duration::from_nanos(nanos))
}
