//! Decode emission: the safe and trusted code paths.
//!
//! Both paths are fully generated — there is no runtime mode switch. The
//! safe path runs the well-formedness check once and then parses without
//! re-validating UTF-8, copying text into owned storage. The trusted path
//! skips the check and may alias text into the input buffer.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::plan::{FieldShape, PtrKind, Storage, TypePlan};

/// Decode safety mode; selects the per-field decode plan.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Safe,
    Trusted,
}

impl Mode {
    const fn reader_name(self) -> &'static str {
        match self {
            Self::Safe => "read_safe",
            Self::Trusted => "read_trusted",
        }
    }
}

/// Text materialization differs between the modes: safe copies into owned
/// storage, trusted borrows where the field allows it.
fn text_expr(storage: Storage, mode: Mode) -> TokenStream {
    match (storage, mode) {
        (Storage::Owned, _) => quote! { quickcbor::read_text_trusted(data, pos)?.to_owned() },
        (Storage::Cow, Mode::Safe) => quote! {
            std::borrow::Cow::Owned(quickcbor::read_text_trusted(data, pos)?.to_owned())
        },
        (Storage::Cow, Mode::Trusted) => quote! {
            std::borrow::Cow::Borrowed(quickcbor::read_text_trusted(data, pos)?)
        },
    }
}

fn bytes_expr(storage: Storage, mode: Mode) -> TokenStream {
    match (storage, mode) {
        (Storage::Owned, _) => quote! { quickcbor::read_bytes_safe(data, pos)? },
        (Storage::Cow, Mode::Safe) => quote! {
            std::borrow::Cow::Owned(quickcbor::read_bytes_trusted(data, pos)?.to_vec())
        },
        (Storage::Cow, Mode::Trusted) => quote! {
            std::borrow::Cow::Borrowed(quickcbor::read_bytes_trusted(data, pos)?)
        },
    }
}

/// The statement(s) executed when a field's wire key matches.
fn decode_arm(shape: &FieldShape, var: &syn::Ident, mode: Mode) -> TokenStream {
    let reader = format_ident!("{}", mode.reader_name());
    match shape {
        FieldShape::Int(kind) => {
            let read = kind.read_expr();
            quote! { #var = #read; }
        }
        FieldShape::Bool => quote! { #var = quickcbor::read_bool(data, pos)?; },
        FieldShape::F32 => quote! {
            #var = quickcbor::read_float(data, pos)? as f32;
        },
        FieldShape::F64 => quote! { #var = quickcbor::read_float(data, pos)?; },
        FieldShape::Text(storage) => {
            let expr = text_expr(*storage, mode);
            quote! { #var = #expr; }
        }
        FieldShape::Bytes(storage) => {
            let expr = bytes_expr(*storage, mode);
            quote! { #var = #expr; }
        }
        FieldShape::Time => quote! { #var = quickcbor::read_time(data, pos)?; },
        FieldShape::Duration => quote! { #var = quickcbor::read_duration(data, pos)?; },
        FieldShape::Record(elem) => quote! { #var = #elem::#reader(data, pos)?; },
        FieldShape::RecordPtr(elem, PtrKind::Required) => quote! {
            #var = Box::new(#elem::#reader(data, pos)?);
        },
        FieldShape::RecordPtr(elem, PtrKind::Nullable) => quote! {
            #var = if quickcbor::try_read_null(data, pos)? {
                None
            } else {
                Some(Box::new(#elem::#reader(data, pos)?))
            };
        },
        FieldShape::TextVec => quote! {
            #var = quickcbor::read_text_array(data, pos)?;
        },
        FieldShape::RecordVec(elem) => quote! {
            let n = quickcbor::read_array_header(data, pos)?;
            let mut items = Vec::with_capacity(n.min(data.len() - *pos));
            for _ in 0..n {
                items.push(#elem::#reader(data, pos)?);
            }
            #var = items;
        },
        FieldShape::RecordPtrVec(elem) => quote! {
            let n = quickcbor::read_array_header(data, pos)?;
            let mut items = Vec::with_capacity(n.min(data.len() - *pos));
            for _ in 0..n {
                items.push(if quickcbor::try_read_null(data, pos)? {
                    None
                } else {
                    Some(Box::new(#elem::#reader(data, pos)?))
                });
            }
            #var = items;
        },
        FieldShape::IntIntMap(key_kind, value_kind) => {
            let read_key = key_kind.read_expr();
            let read_value = value_kind.read_expr();
            quote! {
                let n = quickcbor::read_map_header(data, pos)?;
                #var.clear();
                for _ in 0..n {
                    let k = #read_key;
                    let v = #read_value;
                    #var.insert(k, v);
                }
            }
        }
        FieldShape::IntRecordPtrMap(key_kind, elem, ptr) => {
            let read_key = key_kind.read_expr();
            let read_value = match ptr {
                PtrKind::Required => quote! { Box::new(#elem::#reader(data, pos)?) },
                PtrKind::Nullable => quote! {
                    if quickcbor::try_read_null(data, pos)? {
                        None
                    } else {
                        Some(Box::new(#elem::#reader(data, pos)?))
                    }
                },
            };
            quote! {
                let n = quickcbor::read_map_header(data, pos)?;
                #var.clear();
                for _ in 0..n {
                    let k = #read_key;
                    let v = #read_value;
                    #var.insert(k, v);
                }
            }
        }
        FieldShape::TextTextMap => quote! {
            let n = quickcbor::read_map_header(data, pos)?;
            #var.clear();
            for _ in 0..n {
                let k = quickcbor::read_text_trusted(data, pos)?.to_owned();
                let v = quickcbor::read_text_trusted(data, pos)?.to_owned();
                #var.insert(k, v);
            }
        },
        FieldShape::Dynamic => quote! {
            #var = quickcbor::read_value(data, pos, &quickcbor::DecodeOptions::default())?;
        },
        FieldShape::Fallback => quote! {
            #var = quickcbor::read_dynamic(data, pos, &quickcbor::DecodeOptions::default())?;
        },
    }
}

/// Emits the field-loop reader for one mode.
pub(crate) fn reader_fn(plan: &TypePlan, mode: Mode) -> TokenStream {
    let name = format_ident!("{}", mode.reader_name());
    let mut locals = Vec::new();
    let mut arms = Vec::new();
    let mut finals = Vec::new();

    for field in &plan.fields {
        let ident = &field.ident;
        let ty = &field.ty;
        let var = format_ident!("f_{ident}");

        let Some(shape) = &field.shape else {
            finals.push(quote! { #ident: Default::default(), });
            continue;
        };

        locals.push(quote! { let mut #var: #ty = Default::default(); });
        let key = field.wire_key.as_str();
        let arm = decode_arm(shape, &var, mode);
        arms.push(quote! {
            #key => {
                #arm
            }
        });
        finals.push(quote! { #ident: #var, });
    }

    let doc = match mode {
        Mode::Safe => {
            "Field loop of [`Self::decode_safe`]; `data` must already have \
             passed [`quickcbor::well_formed`]."
        }
        Mode::Trusted => "Field loop of [`Self::decode_trusted`].",
    };

    let sig = match &plan.lifetime {
        Some(lt) => quote! {
            pub fn #name(data: &#lt [u8], pos: &mut usize) -> Result<Self, quickcbor::CborError>
        },
        None => quote! {
            pub fn #name(data: &[u8], pos: &mut usize) -> Result<Self, quickcbor::CborError>
        },
    };

    quote! {
        #[doc = #doc]
        #sig {
            #(#locals)*
            let n = quickcbor::read_map_header(data, pos)?;
            for _ in 0..n {
                match quickcbor::read_text_trusted(data, pos)? {
                    #(#arms)*
                    _ => quickcbor::skip_value(data, pos, &quickcbor::DecodeOptions::default())?,
                }
            }
            Ok(Self { #(#finals)* })
        }
    }
}

/// Emits the two public decode entry points.
pub(crate) fn decode_entry_fns(plan: &TypePlan, aliasing: bool) -> TokenStream {
    let trusted_doc = if aliasing {
        "Decodes without validation; borrowed fields alias `bytes`, which \
         must outlive the record (trusted mode)."
    } else {
        "Decodes without validation (trusted mode)."
    };

    let (bytes_ty, rem_ty) = match &plan.lifetime {
        Some(lt) => (quote! { &#lt [u8] }, quote! { &#lt [u8] }),
        None => (quote! { &[u8] }, quote! { &[u8] }),
    };

    quote! {
        /// Decodes one record after a full well-formedness check of the
        /// first item; text is copied into owned storage (safe mode).
        pub fn decode_safe(bytes: #bytes_ty) -> Result<(Self, #rem_ty), quickcbor::CborError> {
            quickcbor::well_formed(bytes, &quickcbor::DecodeOptions::default())?;
            let mut pos = 0usize;
            let v = Self::read_safe(bytes, &mut pos)?;
            Ok((v, &bytes[pos..]))
        }

        #[doc = #trusted_doc]
        pub fn decode_trusted(bytes: #bytes_ty) -> Result<(Self, #rem_ty), quickcbor::CborError> {
            let mut pos = 0usize;
            let v = Self::read_trusted(bytes, &mut pos)?;
            Ok((v, &bytes[pos..]))
        }
    }
}
