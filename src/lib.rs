//! # quickcbor
//!
//! A compact RFC 8949 CBOR runtime built for **generated code**: the
//! companion `quickcbor-gen` tool analyzes user record types and emits
//! type-specialized marshal/decode routines that call only the primitive
//! and helper surface exported here.
//!
//! ## Design principles
//!
//! - **Append, don't build.** Encoders append to a caller-owned growable
//!   buffer; the hot path allocates only through that buffer's growth and
//!   never widens values into a dynamic representation.
//! - **Safety modes are code paths, not switches.** Safe decoding runs the
//!   [`well_formed`] checker once and then re-parses without re-validating
//!   UTF-8, copying text into fresh owned strings. Trusted decoding skips
//!   the checker and may alias text straight into the input buffer.
//! - **The dynamic path is a fallback.** [`Value`] and its walker exist for
//!   callers without generated routines and for the JSON interop layer;
//!   generated code never references them.
//!
//! ## Trusted aliasing contract
//!
//! Trusted-mode text borrows from the input and is never UTF-8 validated.
//! The caller must keep the input buffer immutable and alive for as long as
//! any decoded record, and must only feed trusted reads input produced by a
//! conforming encoder (or already accepted by [`well_formed`]) — the
//! trusted path hands back `&str` without checking the UTF-8 invariant.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod append;
mod check;
mod error;
mod helpers;
mod limits;
mod read;
pub mod tags;
mod time;
pub mod utf8;
mod value;
mod wire;

pub use crate::append::{
    put_array_header, put_bool, put_bytes, put_f16, put_f32, put_f64, put_float_shortest,
    put_head, put_int, put_map_header, put_nint, put_null, put_tag, put_text, put_uint,
    put_undefined,
};
pub use crate::check::well_formed;
pub use crate::error::{CborError, ErrorCode};
pub use crate::helpers::{
    put_text_array, put_text_map, read_text_array, read_text_array_safe, read_text_map,
    read_text_map_safe,
};
pub use crate::limits::{DecodeOptions, DEFAULT_MAX_DEPTH};
pub use crate::read::{
    read_array_header, read_bool, read_bytes_safe, read_bytes_trusted, read_float, read_i16_int,
    read_i32_int, read_i8_int, read_int, read_map_header, read_nint, read_null, read_tag,
    read_text_safe, read_text_trusted, read_u16_int, read_u32_int, read_u8_int, read_uint,
    skip_value, try_read_null,
};
pub use crate::time::{
    put_duration, put_time_epoch, put_time_text, read_duration, read_time,
};
pub use crate::value::{
    put_dynamic, put_value, read_dynamic, read_value, FromValue, ToValue, Value,
};
