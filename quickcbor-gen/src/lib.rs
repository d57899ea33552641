//! Source-level CBOR codec generation for `quickcbor`.
//!
//! The generator parses user source files, derives a field plan per
//! exported record struct, and emits a sibling `<stem>_cbor.rs` module with
//! type-specialized `marshal_cbor`, `decode_safe`, and `decode_trusted`
//! routines that call only the runtime's primitive and helper surface.
//!
//! The generator is a single-shot batch process: it reads inputs, writes
//! outputs, and exits. No partial outputs are written for a failed type.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

mod analyze;
mod emit;
mod emit_decode;
mod plan;

use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use thiserror::Error;
use tracing::{debug, info};

use crate::emit_decode::Mode;
use crate::plan::TypePlan;

/// Generator failures. All are terminal; nothing is retried or recovered.
#[derive(Debug, Error)]
pub enum GenError {
    /// An input or output file could not be read or written.
    #[error("i/o on {}: {source}", path.display())]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The input is not valid Rust source.
    #[error("parse {}: {source}", path.display())]
    Parse {
        /// The offending path.
        path: PathBuf,
        /// The underlying syn error.
        source: syn::Error,
    },
    /// A malformed `#[cbor(...)]` attribute.
    #[error("invalid cbor attribute: {source}")]
    Attr {
        /// The underlying syn error.
        source: syn::Error,
    },
    /// `--output` was combined with a directory input.
    #[error("--output is not permitted when the input is a directory")]
    OutputWithDirInput,
    /// A field's type is outside the closed shape set (strict mode).
    #[error("{type_name}.{field}: unsupported field shape `{ty}` (use --allow-dynamic to route it through the dynamic helpers)")]
    UnknownFieldShape {
        /// The record type.
        type_name: String,
        /// The field identifier.
        field: String,
        /// The field's source type.
        ty: String,
    },
    /// `omit_empty` on a shape without a zero predicate.
    #[error("{type_name}.{field}: omit_empty is not supported for this field shape")]
    UnsupportedOmitEmpty {
        /// The record type.
        type_name: String,
        /// The field identifier.
        field: String,
    },
}

/// Runs the generator over a file or directory.
///
/// In directory mode every non-test `.rs` file that is not itself a
/// generator output is processed and `output` must be `None`. In file mode
/// the output defaults to the input path with a `_cbor` suffix before the
/// extension. With `allow_dynamic`, unrecognized field shapes fall back to
/// the dynamic helpers instead of failing.
///
/// Returns the paths written.
///
/// # Errors
///
/// Any I/O, parse, or analysis error aborts the whole run; see [`GenError`].
pub fn run(
    input: &Path,
    output: Option<&Path>,
    allow_dynamic: bool,
) -> Result<Vec<PathBuf>, GenError> {
    if input.is_dir() {
        if output.is_some() {
            return Err(GenError::OutputWithDirInput);
        }
        let mut entries: Vec<PathBuf> = fs::read_dir(input)
            .map_err(|source| GenError::Io {
                path: input.to_path_buf(),
                source,
            })?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| is_candidate(p))
            .collect();
        entries.sort();

        let mut written = Vec::new();
        for path in entries {
            if let Some(out) = generate_file(&path, None, allow_dynamic)? {
                written.push(out);
            }
        }
        Ok(written)
    } else {
        Ok(generate_file(input, output, allow_dynamic)?
            .into_iter()
            .collect())
    }
}

/// Source files eligible in directory mode: `.rs`, not a test file, not a
/// previous generator output.
fn is_candidate(path: &Path) -> bool {
    if path.extension().and_then(|e| e.to_str()) != Some("rs") {
        return false;
    }
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    !(stem.ends_with("_cbor") || stem.ends_with("_test") || stem == "tests")
}

/// Generates codecs for one source file.
///
/// Returns `None` when the file declares no eligible record types.
///
/// # Errors
///
/// See [`GenError`].
pub fn generate_file(
    input: &Path,
    output: Option<&Path>,
    allow_dynamic: bool,
) -> Result<Option<PathBuf>, GenError> {
    let src = fs::read_to_string(input).map_err(|source| GenError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("types");

    let Some(text) = generate_source(&src, stem, allow_dynamic).map_err(|err| match err {
        GenError::Parse { source, .. } => GenError::Parse {
            path: input.to_path_buf(),
            source,
        },
        other => other,
    })?
    else {
        debug!(input = %input.display(), "no eligible record types, skipping");
        return Ok(None);
    };

    let out_path = output.map_or_else(|| default_output(input), Path::to_path_buf);
    fs::write(&out_path, text).map_err(|source| GenError::Io {
        path: out_path.clone(),
        source,
    })?;
    info!(input = %input.display(), output = %out_path.display(), "generated codecs");
    Ok(Some(out_path))
}

/// `types.rs` becomes `types_cbor.rs` alongside the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("types");
    input.with_file_name(format!("{stem}_cbor.rs"))
}

/// Generates the output module text for `src`, a source file whose module
/// name is `module` (used for the `use super::{module}::*` import). With
/// `allow_dynamic`, unrecognized field shapes fall back to the dynamic
/// helpers instead of failing.
///
/// Returns `None` when no eligible record types are declared.
///
/// # Errors
///
/// See [`GenError`].
pub fn generate_source(
    src: &str,
    module: &str,
    allow_dynamic: bool,
) -> Result<Option<String>, GenError> {
    let file = syn::parse_file(src).map_err(|source| GenError::Parse {
        path: PathBuf::from(module),
        source,
    })?;
    let plans = analyze::analyze_file(&file, module, allow_dynamic)?;
    if plans.is_empty() {
        return Ok(None);
    }

    let module_ident = format_ident!("{module}");
    let prelude = prelude(&plans);
    let impls: Vec<TokenStream> = plans.iter().map(type_impl).collect();
    let tokens = quote! {
        #prelude
        use super::#module_ident::*;

        #(#impls)*
    };

    let file: syn::File = syn::parse2(tokens).expect("emitted tokens parse as a file");
    let mut out = String::from(HEADER);
    out.push_str(&prettyplease::unparse(&file));
    Ok(Some(out))
}

const HEADER: &str = "\
// @generated by cborgen. Do not edit.
#![allow(clippy::all, clippy::pedantic)]
#![allow(unused_imports)]

";

/// Imports that let verbatim field types resolve inside the output module.
///
/// std imports are unconditional (shadowed names are the user's problem);
/// crate imports are emitted only when a shape actually needs them, so the
/// output never forces a dependency the input did not already have.
fn prelude(plans: &[TypePlan]) -> TokenStream {
    let mut out = quote! {
        use std::borrow::Cow;
        use std::collections::{BTreeMap, HashMap};
        use std::time::Duration;
    };
    if plans.iter().any(plan_uses_time) {
        out.extend(quote! { use chrono::{DateTime, Utc}; });
    }
    if plans.iter().any(plan_uses_dynamic) {
        out.extend(quote! { use quickcbor::Value; });
    }
    out
}

fn plan_uses_time(plan: &TypePlan) -> bool {
    plan.fields
        .iter()
        .any(|f| matches!(f.shape, Some(plan::FieldShape::Time)))
}

fn plan_uses_dynamic(plan: &TypePlan) -> bool {
    plan.fields
        .iter()
        .any(|f| matches!(f.shape, Some(plan::FieldShape::Dynamic)))
}

fn type_impl(plan: &TypePlan) -> TokenStream {
    let ident = &plan.ident;
    let marshal = emit::marshal_fn(plan);
    let aliasing = emit::borrows_input(plan);
    let entries = emit_decode::decode_entry_fns(plan, aliasing);
    let read_safe = emit_decode::reader_fn(plan, Mode::Safe);
    let read_trusted = emit_decode::reader_fn(plan, Mode::Trusted);

    match &plan.lifetime {
        Some(lt) => quote! {
            impl<#lt> #ident<#lt> {
                #marshal
                #entries
                #read_safe
                #read_trusted
            }
        },
        None => quote! {
            impl #ident {
                #marshal
                #entries
                #read_safe
                #read_trusted
            }
        },
    }
}
