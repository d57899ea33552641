//! Emitter tests: structural properties of the generated source, CLI path
//! rules, and the strict-mode analysis errors.

use quickcbor_gen::{generate_file, generate_source, run, GenError};

const SNAPSHOT_SRC: &str = r#"
use std::collections::BTreeMap;

pub struct Pending {
    pub sequence: u64,
    pub ts: i64,
}

pub struct ConsumerState {
    pub name: String,
    pub delivered: u64,
    #[cbor(rename = "ack_floor")]
    pub ack: u64,
    #[cbor(omit_empty)]
    pub peers: Vec<String>,
    pub pending: BTreeMap<u64, Option<Box<Pending>>>,
    #[cbor(skip)]
    pub scratch: u64,
}
"#;

fn generate(src: &str) -> String {
    generate_source(src, "types", false)
        .expect("generation succeeds")
        .expect("eligible types present")
}

#[test]
fn emitted_source_parses_as_rust() {
    let out = generate(SNAPSHOT_SRC);
    syn::parse_file(&out).expect("emitted source parses");
}

#[test]
fn emits_all_entry_points_per_type() {
    let out = generate(SNAPSHOT_SRC);
    for needle in [
        "impl Pending {",
        "impl ConsumerState {",
        "pub fn marshal_cbor(",
        "pub fn decode_safe(",
        "pub fn decode_trusted(",
        "pub fn read_safe(",
        "pub fn read_trusted(",
        "quickcbor::well_formed(",
    ] {
        assert!(out.contains(needle), "missing `{needle}` in:\n{out}");
    }
}

#[test]
fn known_shapes_never_reference_the_dynamic_fallback() {
    // The map<u64, Option<Box<Pending>>> field must lower to inline loops,
    // not the Value walker.
    let out = generate(SNAPSHOT_SRC);
    assert!(!out.contains("Value"), "dynamic fallback referenced:\n{out}");
    assert!(!out.contains("put_value"));
    assert!(!out.contains("read_value"));
    assert!(!out.contains("put_dynamic"));
    assert!(!out.contains("read_dynamic"));
}

#[test]
fn record_ptr_map_lowers_to_inline_loop() {
    let out = generate(SNAPSHOT_SRC);
    assert!(out.contains("quickcbor::put_map_header(buf, len)"));
    assert!(out.contains("Pending::read_safe(data, pos)"));
    assert!(out.contains("quickcbor::try_read_null(data, pos)"));
}

#[test]
fn rename_and_skip_attributes_are_honored() {
    let out = generate(SNAPSHOT_SRC);
    assert!(out.contains("\"ack_floor\""));
    assert!(!out.contains("\"ack\""));
    // Skipped fields never hit the wire but are zero-filled on decode.
    assert!(!out.contains("\"scratch\""));
    assert!(out.contains("scratch: Default::default()"));
}

#[test]
fn omit_empty_guards_and_precount() {
    let out = generate(SNAPSHOT_SRC);
    assert!(out.contains("let mut count: u32 ="));
    assert!(out.contains("if !(self.peers.is_empty())"));
    // Pending has no omit-empty fields: constant count, no first pass.
    assert!(out.contains("let count: u32 = 2"));
}

#[test]
fn unknown_keys_are_skipped_not_errored() {
    let out = generate(SNAPSHOT_SRC);
    assert!(out.contains("quickcbor::skip_value("));
}

#[test]
fn value_fields_use_the_fallback_and_nothing_else_does() {
    let src = r"
pub struct Envelope {
    pub kind: u64,
    pub body: Value,
}
";
    let out = generate(src);
    assert!(out.contains("quickcbor::put_value(buf, &self.body)"));
    assert!(out.contains("quickcbor::read_value("));
}

#[test]
fn lifetime_structs_borrow_in_trusted_mode_only() {
    let src = r"
pub struct EventRef<'a> {
    pub name: Cow<'a, str>,
    pub payload: Cow<'a, [u8]>,
}
";
    let out = generate(src);
    assert!(out.contains("impl<'a> EventRef<'a>"));
    assert!(out.contains("bytes: &'a [u8]"));
    assert!(out.contains("Cow::Borrowed("));
    assert!(out.contains("Cow::Owned("));
    assert!(out.contains("quickcbor::read_bytes_trusted("));
}

#[test]
fn time_fields_import_chrono_and_use_tag_helpers() {
    let src = r"
pub struct Stamped {
    pub created: DateTime<Utc>,
    pub rtt: Duration,
}
";
    let out = generate(src);
    assert!(out.contains("use chrono::{DateTime, Utc};"));
    assert!(out.contains("quickcbor::put_time_text(buf, &self.created)"));
    assert!(out.contains("quickcbor::put_duration(buf, self.rtt)?"));
    assert!(out.contains("quickcbor::read_time("));
    assert!(out.contains("quickcbor::read_duration("));

    // No time fields, no chrono import.
    let out = generate("pub struct P { pub a: u64 }");
    assert!(!out.contains("use chrono"));
}

#[test]
fn unsupported_shapes_fail_strictly() {
    let err = generate_source("pub struct Odd { pub x: usize }", "types", false).unwrap_err();
    match err {
        GenError::UnknownFieldShape {
            type_name, field, ..
        } => {
            assert_eq!(type_name, "Odd");
            assert_eq!(field, "x");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err =
        generate_source("pub struct Odd { pub x: Option<u64> }", "types", false).unwrap_err();
    assert!(matches!(err, GenError::UnknownFieldShape { .. }));
}

#[test]
fn allow_dynamic_routes_unrecognized_shapes_to_the_fallback() {
    let src = r"
pub struct Odd {
    pub known: u64,
    pub x: usize,
}
";
    let out = generate_source(src, "types", true)
        .expect("fallback generation succeeds")
        .expect("eligible types present");
    syn::parse_file(&out).expect("emitted source parses");
    assert!(out.contains("quickcbor::put_dynamic(buf, &self.x)"));
    assert!(out.contains("quickcbor::read_dynamic("));
    // Known shapes in the same record still lower to direct primitives.
    assert!(out.contains("quickcbor::put_uint(buf, self.known)"));
}

#[test]
fn omit_empty_requires_a_zero_predicate() {
    let src = r"
pub struct Odd {
    #[cbor(omit_empty)]
    pub created: DateTime<Utc>,
}
";
    let err = generate_source(src, "types", false).unwrap_err();
    assert!(matches!(err, GenError::UnsupportedOmitEmpty { .. }));
}

#[test]
fn non_record_files_produce_no_output() {
    assert!(generate_source("fn main() {}", "types", false).unwrap().is_none());
    // Non-pub and tuple structs are not records.
    assert!(generate_source("struct P { a: u64 }", "types", false)
        .unwrap()
        .is_none());
    assert!(generate_source("pub struct P(u64);", "types", false)
        .unwrap()
        .is_none());
}

#[test]
fn parse_errors_are_surfaced() {
    assert!(matches!(
        generate_source("pub struct {", "types", false).unwrap_err(),
        GenError::Parse { .. }
    ));
}

#[test]
fn duplicate_attribute_flags_are_rejected() {
    let src = r"
pub struct P {
    #[cbor(skip, skip)]
    pub a: u64,
}
";
    assert!(matches!(
        generate_source(src, "types", false).unwrap_err(),
        GenError::Attr { .. }
    ));
}

#[test]
fn file_mode_defaults_to_cbor_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("types.rs");
    std::fs::write(&input, "pub struct P { pub a: u64 }").unwrap();

    let out = generate_file(&input, None, false).unwrap().unwrap();
    assert_eq!(out, dir.path().join("types_cbor.rs"));
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("// @generated by cborgen. Do not edit."));
    assert!(text.contains("use super::types::*;"));
}

#[test]
fn directory_mode_rejects_explicit_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.rs");
    let err = run(dir.path(), Some(out.as_path()), false).unwrap_err();
    assert!(matches!(err, GenError::OutputWithDirInput));
}

#[test]
fn directory_mode_skips_tests_and_previous_outputs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.rs"), "pub struct A { pub x: u64 }").unwrap();
    std::fs::write(dir.path().join("a_cbor.rs"), "pub struct Stale { pub x: u64 }").unwrap();
    std::fs::write(dir.path().join("b_test.rs"), "pub struct T { pub x: u64 }").unwrap();
    std::fs::write(dir.path().join("tests.rs"), "pub struct T2 { pub x: u64 }").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not rust").unwrap();

    let written = run(dir.path(), None, false).unwrap();
    assert_eq!(written, vec![dir.path().join("a_cbor.rs")]);

    let text = std::fs::read_to_string(dir.path().join("a_cbor.rs")).unwrap();
    assert!(text.contains("impl A {"));
    assert!(!text.contains("Stale"));
}

#[test]
fn failed_analysis_writes_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.rs");
    std::fs::write(&input, "pub struct Odd { pub x: usize }").unwrap();

    assert!(generate_file(&input, None, false).is_err());
    assert!(!dir.path().join("bad_cbor.rs").exists());
}
