//! Tag numbers used by this codec and the JSON interop wrapper contract.
//!
//! The interop layer round-trips tagged CBOR through JSON wrapper objects;
//! the table here is the shared vocabulary: each wrapper key names the tag
//! its value carries.

/// Tag 0: RFC 3339 text time.
pub const TAG_TIME_TEXT: u64 = 0;
/// Tag 1: epoch seconds (integer or float).
pub const TAG_TIME_EPOCH: u64 = 1;
/// Tag 4: decimal fraction `[exp, mant]`.
pub const TAG_DECIMAL: u64 = 4;
/// Tag 5: bigfloat `[exp, mant]`.
pub const TAG_BIGFLOAT: u64 = 5;
/// Tag 21: expected base64url encoding of a byte string.
pub const TAG_BASE64URL: u64 = 21;
/// Tag 22: expected base64 encoding of a byte string.
pub const TAG_BASE64: u64 = 22;
/// Tag 23: expected base16 encoding of a byte string.
pub const TAG_BASE16: u64 = 23;
/// Tag 24: embedded CBOR byte string.
pub const TAG_EMBEDDED_CBOR: u64 = 24;
/// Tag 32: URI text string.
pub const TAG_URI: u64 = 32;
/// Tag 33: base64url text string.
pub const TAG_BASE64URL_STR: u64 = 33;
/// Tag 34: base64 text string.
pub const TAG_BASE64_STR: u64 = 34;
/// Tag 35: regular expression text string.
pub const TAG_REGEX: u64 = 35;
/// Tag 36: MIME message text string.
pub const TAG_MIME: u64 = 36;
/// Tag 37: binary UUID.
pub const TAG_UUID: u64 = 37;
/// Tag 1000: duration in unsigned integer nanoseconds.
pub const TAG_DURATION: u64 = 1000;
/// Tag 55799: self-described CBOR.
pub const TAG_SELF_DESCRIBE: u64 = 55799;

/// JSON wrapper key for arbitrary tag numbers (paired with [`WRAPPER_VALUE`]).
pub const WRAPPER_TAG: &str = "$tag";
/// JSON wrapper key for the value of an arbitrary tagged item.
pub const WRAPPER_VALUE: &str = "$";

const WRAPPERS: &[(&str, u64)] = &[
    ("$rfc3339", TAG_TIME_TEXT),
    ("$epoch", TAG_TIME_EPOCH),
    ("$decimal", TAG_DECIMAL),
    ("$bigfloat", TAG_BIGFLOAT),
    ("$base64url", TAG_BASE64URL),
    ("$base64", TAG_BASE64),
    ("$base16", TAG_BASE16),
    ("$cbor", TAG_EMBEDDED_CBOR),
    ("$uri", TAG_URI),
    ("$base64urlstr", TAG_BASE64URL_STR),
    ("$base64str", TAG_BASE64_STR),
    ("$regex", TAG_REGEX),
    ("$mime", TAG_MIME),
    ("$uuid", TAG_UUID),
    ("$selfdescribe", TAG_SELF_DESCRIBE),
];

/// Returns the JSON wrapper key for `tag`, if it has a dedicated one.
///
/// Tags without a dedicated key round-trip through the generic
/// `{"$tag": N, "$": value}` form.
#[must_use]
pub fn wrapper_key(tag: u64) -> Option<&'static str> {
    WRAPPERS.iter().find(|(_, t)| *t == tag).map(|(k, _)| *k)
}

/// Returns the tag number a dedicated JSON wrapper key stands for.
#[must_use]
pub fn wrapper_tag(key: &str) -> Option<u64> {
    WRAPPERS.iter().find(|(k, _)| *k == key).map(|(_, t)| *t)
}
