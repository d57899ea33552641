//! Tagged time and duration vectors.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use quickcbor::{
    put_duration, put_time_epoch, put_time_text, put_uint, read_duration, read_time, ErrorCode,
};

#[test]
fn time_text_roundtrips_with_nanoseconds() {
    let t: DateTime<Utc> = Utc.timestamp_opt(1_715_938_200, 123_456_789).unwrap();
    let mut buf = Vec::new();
    put_time_text(&mut buf, &t);
    assert_eq!(buf[0], 0xc0);

    let mut pos = 0;
    assert_eq!(read_time(&buf, &mut pos).unwrap(), t);
    assert_eq!(pos, buf.len());
}

#[test]
fn time_epoch_roundtrips_at_second_precision() {
    let t: DateTime<Utc> = Utc.with_ymd_and_hms(2001, 9, 9, 1, 46, 40).unwrap();
    let mut buf = Vec::new();
    put_time_epoch(&mut buf, &t);
    // Tag 1 + uint 1000000000.
    assert_eq!(buf, [0xc1, 0x1a, 0x3b, 0x9a, 0xca, 0x00]);

    let mut pos = 0;
    assert_eq!(read_time(&buf, &mut pos).unwrap(), t);
}

#[test]
fn pre_epoch_times_encode_as_negative_seconds() {
    let t: DateTime<Utc> = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
    let mut buf = Vec::new();
    put_time_epoch(&mut buf, &t);
    assert_eq!(buf[1] >> 5, 1);

    let mut pos = 0;
    assert_eq!(read_time(&buf, &mut pos).unwrap(), t);
}

#[test]
fn tag_1_accepts_float_epoch() {
    let mut buf = vec![0xc1];
    quickcbor::put_f64(&mut buf, 1.5);
    let mut pos = 0;
    let t = read_time(&buf, &mut pos).unwrap();
    assert_eq!(t.timestamp_millis(), 1500);
}

#[test]
fn wrong_tag_is_a_type_mismatch() {
    let mut buf = Vec::new();
    quickcbor::put_tag(&mut buf, 32);
    quickcbor::put_uint(&mut buf, 1);
    let mut pos = 0;
    assert_eq!(
        read_time(&buf, &mut pos).unwrap_err().code,
        ErrorCode::TypeMismatch
    );
    assert_eq!(pos, 0);

    // Untagged values are not times either.
    let mut buf = Vec::new();
    put_uint(&mut buf, 5);
    let mut pos = 0;
    assert_eq!(
        read_time(&buf, &mut pos).unwrap_err().code,
        ErrorCode::TypeMismatch
    );
}

#[test]
fn unparseable_rfc3339_text_is_invalid_time() {
    let mut buf = vec![0xc0];
    quickcbor::put_text(&mut buf, "not a timestamp");
    let mut pos = 0;
    assert_eq!(
        read_time(&buf, &mut pos).unwrap_err().code,
        ErrorCode::InvalidTime
    );
}

#[test]
fn duration_roundtrips_under_tag_1000() {
    let d = Duration::new(2, 500_000_000);
    let mut buf = Vec::new();
    put_duration(&mut buf, d).unwrap();
    // Tag 1000 + uint 2_500_000_000 ns.
    assert_eq!(&buf[..3], &[0xd9, 0x03, 0xe8]);

    let mut pos = 0;
    assert_eq!(read_duration(&buf, &mut pos).unwrap(), d);
}

#[test]
fn zero_duration_is_one_byte_payload() {
    let mut buf = Vec::new();
    put_duration(&mut buf, Duration::ZERO).unwrap();
    assert_eq!(buf, [0xd9, 0x03, 0xe8, 0x00]);
}

#[test]
fn oversized_duration_is_an_overflow() {
    let d = Duration::from_secs(u64::MAX);
    let mut buf = Vec::new();
    assert_eq!(
        put_duration(&mut buf, d).unwrap_err().code,
        ErrorCode::IntOverflow
    );
    assert!(buf.is_empty());
}
