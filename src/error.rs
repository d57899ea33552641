use core::fmt;

/// A structured error code identifying why a CBOR item was rejected.
///
/// The enum is intentionally string-free so that errors stay cheap on the
/// decode hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Unexpected end of input inside an item header or payload.
    Truncated,
    /// Arithmetic overflow while computing a length or offset.
    LengthOverflow,
    /// Reserved additional-info value (28..=30) was used.
    ReservedAdditionalInfo,
    /// A break marker (0xff) appeared outside an indefinite-length item.
    UnexpectedBreak,
    /// An indefinite-length item was never terminated by a break marker.
    NonTerminatedIndefinite,
    /// An indefinite-length item was found where a definite header is required.
    IndefiniteLength,
    /// Item's major type is incompatible with the decoder's expectation.
    TypeMismatch,
    /// Text string failed UTF-8 validation.
    Utf8Invalid,
    /// Integer value exceeds the target field's range.
    IntOverflow,
    /// Nesting depth exceeded the configured limit.
    DepthExceeded,
    /// A simple value outside the supported set (false/true/null/undefined).
    DisallowedSimple,
    /// A tag 0 text timestamp failed to parse, or a tag 1 epoch value was
    /// out of the representable range.
    InvalidTime,
}

/// A codec error with a stable code and the byte offset where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborError {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset into the input (or output buffer) at detection time.
    pub offset: usize,
}

impl CborError {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::Truncated => "unexpected end of input",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::ReservedAdditionalInfo => "reserved additional info value",
            ErrorCode::UnexpectedBreak => "unexpected break marker",
            ErrorCode::NonTerminatedIndefinite => "indefinite-length item not terminated",
            ErrorCode::IndefiniteLength => "indefinite length where definite required",
            ErrorCode::TypeMismatch => "major type does not match expectation",
            ErrorCode::Utf8Invalid => "text must be valid UTF-8",
            ErrorCode::IntOverflow => "integer exceeds target range",
            ErrorCode::DepthExceeded => "nesting depth limit exceeded",
            ErrorCode::DisallowedSimple => "unsupported simple value",
            ErrorCode::InvalidTime => "invalid time or duration value",
        };
        write!(f, "cbor error at {}: {msg}", self.offset)
    }
}

impl std::error::Error for CborError {}
