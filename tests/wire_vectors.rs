//! Byte-exact vectors for the primitive codec.

use std::collections::BTreeMap;

use quickcbor::{
    put_array_header, put_bool, put_bytes, put_f16, put_f32, put_f64, put_float_shortest,
    put_int, put_map_header, put_nint, put_null, put_tag, put_text, put_text_array,
    put_text_map, put_uint, put_undefined, read_bool, read_bytes_trusted, read_float,
    read_int, read_nint, read_null, read_tag, read_text_array_safe, read_text_map_safe,
    read_text_trusted, read_uint, ErrorCode,
};

fn enc(f: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
    let mut buf = Vec::new();
    f(&mut buf);
    buf
}

#[test]
fn uint_minimal_width_boundaries() {
    assert_eq!(enc(|b| put_uint(b, 0)), [0x00]);
    assert_eq!(enc(|b| put_uint(b, 10)), [0x0a]);
    assert_eq!(enc(|b| put_uint(b, 23)), [0x17]);
    assert_eq!(enc(|b| put_uint(b, 24)), [0x18, 0x18]);
    assert_eq!(enc(|b| put_uint(b, 255)), [0x18, 0xff]);
    assert_eq!(enc(|b| put_uint(b, 256)), [0x19, 0x01, 0x00]);
    assert_eq!(enc(|b| put_uint(b, 1000)), [0x19, 0x03, 0xe8]);
    assert_eq!(enc(|b| put_uint(b, 65_535)), [0x19, 0xff, 0xff]);
    assert_eq!(enc(|b| put_uint(b, 65_536)), [0x1a, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(
        enc(|b| put_uint(b, u64::from(u32::MAX) + 1)),
        [0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn small_uint_roundtrip_with_empty_remainder() {
    let buf = enc(|b| put_uint(b, 10));
    assert_eq!(buf, [0x0a]);
    let mut pos = 0;
    assert_eq!(read_uint(&buf, &mut pos).unwrap(), 10);
    assert_eq!(&buf[pos..], &[] as &[u8]);
}

#[test]
fn two_byte_uint_roundtrip() {
    let buf = enc(|b| put_uint(b, 1000));
    assert_eq!(buf, [0x19, 0x03, 0xe8]);
    let mut pos = 0;
    assert_eq!(read_uint(&buf, &mut pos).unwrap(), 1000);
}

#[test]
fn negative_one_is_single_byte() {
    let buf = enc(|b| put_int(b, -1));
    assert_eq!(buf, [0x20]);
    let mut pos = 0;
    assert_eq!(read_int(&buf, &mut pos).unwrap(), -1);
}

#[test]
fn int_sign_selection() {
    assert_eq!(enc(|b| put_int(b, 0)), [0x00]);
    assert_eq!(enc(|b| put_int(b, -24)), [0x37]);
    assert_eq!(enc(|b| put_int(b, -25)), [0x38, 0x18]);
    assert_eq!(enc(|b| put_int(b, -256)), [0x38, 0xff]);
    assert_eq!(enc(|b| put_int(b, -257)), [0x39, 0x01, 0x00]);
    assert_eq!(
        enc(|b| put_int(b, i64::MIN)),
        [0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );

    let buf = enc(|b| put_int(b, i64::MIN));
    let mut pos = 0;
    assert_eq!(read_int(&buf, &mut pos).unwrap(), i64::MIN);
}

#[test]
fn nint_beyond_i64_reads_as_raw_argument() {
    let buf = enc(|b| put_nint(b, u64::MAX));
    let mut pos = 0;
    assert_eq!(read_nint(&buf, &mut pos).unwrap(), u64::MAX);

    // ... but overflows a signed read.
    let mut pos = 0;
    let err = read_int(&buf, &mut pos).unwrap_err();
    assert_eq!(err.code, ErrorCode::IntOverflow);
}

#[test]
fn non_minimal_widths_accepted_on_read() {
    // 10 encoded in every wider-than-necessary form.
    for bytes in [
        vec![0x18, 0x0a],
        vec![0x19, 0x00, 0x0a],
        vec![0x1a, 0x00, 0x00, 0x00, 0x0a],
        vec![0x1b, 0, 0, 0, 0, 0, 0, 0, 0x0a],
    ] {
        let mut pos = 0;
        assert_eq!(read_uint(&bytes, &mut pos).unwrap(), 10);
        assert_eq!(pos, bytes.len());
    }
}

#[test]
fn text_and_bytes_headers() {
    assert_eq!(enc(|b| put_text(b, "x")), [0x61, 0x78]);
    assert_eq!(enc(|b| put_text(b, "")), [0x60]);
    assert_eq!(enc(|b| put_bytes(b, &[1, 2, 3])), [0x43, 1, 2, 3]);

    let long = "a".repeat(24);
    let buf = enc(|b| put_text(b, &long));
    assert_eq!(&buf[..2], &[0x78, 24]);

    let mut pos = 0;
    assert_eq!(read_text_trusted(&buf, &mut pos).unwrap(), long);
}

#[test]
fn container_headers_and_tag() {
    assert_eq!(enc(|b| put_array_header(b, 0)), [0x80]);
    assert_eq!(enc(|b| put_map_header(b, 2)), [0xa2]);
    assert_eq!(enc(|b| put_tag(b, 55799)), [0xd9, 0xd9, 0xf7]);

    let buf = enc(|b| put_tag(b, 1000));
    let mut pos = 0;
    assert_eq!(read_tag(&buf, &mut pos).unwrap(), 1000);
}

#[test]
fn simple_values() {
    assert_eq!(enc(put_null), [0xf6]);
    assert_eq!(enc(put_undefined), [0xf7]);
    assert_eq!(enc(|b| put_bool(b, false)), [0xf4]);
    assert_eq!(enc(|b| put_bool(b, true)), [0xf5]);

    let buf = enc(|b| put_bool(b, true));
    let mut pos = 0;
    assert!(read_bool(&buf, &mut pos).unwrap());

    let buf = enc(put_null);
    let mut pos = 0;
    read_null(&buf, &mut pos).unwrap();
}

#[test]
fn floats_widen_to_double_on_read() {
    let buf = enc(|b| put_f16(b, 0x3c00)); // 1.0
    assert_eq!(buf, [0xf9, 0x3c, 0x00]);
    let mut pos = 0;
    assert_eq!(read_float(&buf, &mut pos).unwrap(), 1.0);

    let buf = enc(|b| put_f32(b, 1.5));
    assert_eq!(buf[0], 0xfa);
    let mut pos = 0;
    assert_eq!(read_float(&buf, &mut pos).unwrap(), 1.5);

    let buf = enc(|b| put_f64(b, 1.1));
    assert_eq!(buf[0], 0xfb);
    let mut pos = 0;
    assert_eq!(read_float(&buf, &mut pos).unwrap(), 1.1);
}

#[test]
fn float_shortening_is_lossless() {
    // 1.0 fits a half.
    assert_eq!(enc(|b| put_float_shortest(b, 1.0)), [0xf9, 0x3c, 0x00]);
    // 1.1 does not shorten at all.
    assert_eq!(enc(|b| put_float_shortest(b, 1.1))[0], 0xfb);
    // f32-exact but not f16-exact.
    let v = f64::from(1.000_000_1_f32);
    assert_eq!(enc(|b| put_float_shortest(b, v))[0], 0xfa);

    for v in [0.0, -2.5, 65504.0, 1.0e300, f64::INFINITY] {
        let buf = enc(|b| put_float_shortest(b, v));
        let mut pos = 0;
        assert_eq!(read_float(&buf, &mut pos).unwrap(), v);
    }

    let buf = enc(|b| put_float_shortest(b, f64::NAN));
    let mut pos = 0;
    assert!(read_float(&buf, &mut pos).unwrap().is_nan());
}

#[test]
fn narrowing_reads_enforce_field_ranges() {
    let mut buf = Vec::new();
    put_uint(&mut buf, 300);
    let mut pos = 0;
    assert_eq!(
        quickcbor::read_u8_int(&buf, &mut pos).unwrap_err().code,
        ErrorCode::IntOverflow
    );
    let mut pos = 0;
    assert_eq!(quickcbor::read_u16_int(&buf, &mut pos).unwrap(), 300);

    let mut buf = Vec::new();
    put_int(&mut buf, -40_000);
    let mut pos = 0;
    assert_eq!(
        quickcbor::read_i16_int(&buf, &mut pos).unwrap_err().code,
        ErrorCode::IntOverflow
    );
    let mut pos = 0;
    assert_eq!(quickcbor::read_i32_int(&buf, &mut pos).unwrap(), -40_000);

    let mut buf = Vec::new();
    put_int(&mut buf, -1);
    let mut pos = 0;
    assert_eq!(quickcbor::read_i8_int(&buf, &mut pos).unwrap(), -1);
    // Unsigned readers reject negative integers outright.
    let mut pos = 0;
    assert_eq!(
        quickcbor::read_u32_int(&buf, &mut pos).unwrap_err().code,
        ErrorCode::TypeMismatch
    );
}

#[test]
fn truncated_reads_fail() {
    let mut pos = 0;
    assert_eq!(
        read_uint(&[0x19, 0x01], &mut pos).unwrap_err().code,
        ErrorCode::Truncated
    );
    let mut pos = 0;
    assert_eq!(
        read_bytes_trusted(&[0x43, 1, 2], &mut pos).unwrap_err().code,
        ErrorCode::Truncated
    );
}

#[test]
fn type_mismatch_leaves_cursor_at_item_start() {
    let buf = enc(|b| put_text(b, "x"));
    let mut pos = 0;
    let err = read_uint(&buf, &mut pos).unwrap_err();
    assert_eq!(err.code, ErrorCode::TypeMismatch);
    assert_eq!(pos, 0);

    // The same cursor can then take the correct read.
    assert_eq!(read_text_trusted(&buf, &mut pos).unwrap(), "x");
}

#[test]
fn text_array_helper_roundtrips() {
    let items = vec!["a".to_owned(), String::new(), "ccc".to_owned()];
    let mut buf = Vec::new();
    put_text_array(&mut buf, &items).unwrap();
    assert_eq!(buf[0], 0x83);

    let mut pos = 0;
    assert_eq!(read_text_array_safe(&buf, &mut pos).unwrap(), items);
    assert_eq!(pos, buf.len());
}

#[test]
fn text_map_helper_roundtrips() {
    let entries = BTreeMap::from([
        ("a".to_owned(), "1".to_owned()),
        ("b".to_owned(), "2".to_owned()),
    ]);
    let mut buf = Vec::new();
    put_text_map(&mut buf, &entries).unwrap();
    assert_eq!(buf[0], 0xa2);

    let mut pos = 0;
    assert_eq!(read_text_map_safe(&buf, &mut pos).unwrap(), entries);
    assert_eq!(pos, buf.len());

    // Duplicate keys on the wire resolve last-wins.
    let mut buf = Vec::new();
    put_map_header(&mut buf, 2);
    put_text(&mut buf, "k");
    put_text(&mut buf, "old");
    put_text(&mut buf, "k");
    put_text(&mut buf, "new");
    let mut pos = 0;
    let out = read_text_map_safe(&buf, &mut pos).unwrap();
    assert_eq!(out.get("k").map(String::as_str), Some("new"));
}

#[test]
fn remainder_identity_for_concatenations() {
    let mut buf = Vec::new();
    put_uint(&mut buf, 1000);
    let suffix = [0xde, 0xad, 0xbe, 0xef];
    buf.extend_from_slice(&suffix);

    let mut pos = 0;
    assert_eq!(read_uint(&buf, &mut pos).unwrap(), 1000);
    assert_eq!(&buf[pos..], &suffix);
}
