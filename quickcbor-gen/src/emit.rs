//! Encode emission: one `marshal_cbor` routine per planned type.
//!
//! Every field lowers to either a single expression (the scaffold writes the
//! wire key, the expression writes the value) or a block that is responsible
//! for its own key. Omit-empty fields are wrapped in a zero-predicate guard
//! and counted in a first pass before the map header is written.

use proc_macro2::TokenStream;
use quote::quote;

use crate::plan::{FieldShape, PtrKind, Storage, TypePlan};

/// Expression plan for a field whose scaffold writes the key.
fn encode_expr(shape: &FieldShape, access: &TokenStream) -> TokenStream {
    match shape {
        FieldShape::Int(kind) => {
            let put = kind.put_expr(access);
            quote! { #put; }
        }
        FieldShape::Bool => quote! { quickcbor::put_bool(buf, #access); },
        FieldShape::F32 => quote! { quickcbor::put_f32(buf, #access); },
        FieldShape::F64 => quote! { quickcbor::put_f64(buf, #access); },
        FieldShape::Text(_) => quote! { quickcbor::put_text(buf, &#access); },
        FieldShape::Bytes(_) => quote! { quickcbor::put_bytes(buf, &#access); },
        FieldShape::Time => quote! { quickcbor::put_time_text(buf, &#access); },
        FieldShape::Duration => quote! { quickcbor::put_duration(buf, #access)?; },
        FieldShape::TextVec => quote! { quickcbor::put_text_array(buf, &#access)?; },
        FieldShape::Record(_) => quote! { #access.marshal_cbor(buf)?; },
        FieldShape::RecordPtr(_, PtrKind::Required) => quote! { #access.marshal_cbor(buf)?; },
        FieldShape::RecordPtr(_, PtrKind::Nullable) => quote! {
            match &#access {
                Some(item) => item.marshal_cbor(buf)?,
                None => quickcbor::put_null(buf),
            }
        },
        FieldShape::Dynamic => quote! { quickcbor::put_value(buf, &#access)?; },
        FieldShape::Fallback => quote! { quickcbor::put_dynamic(buf, &#access)?; },
        _ => unreachable!("block shapes have no expression plan"),
    }
}

/// Block plan: writes its own key, then a typed inline loop.
fn encode_block(shape: &FieldShape, key: &str, access: &TokenStream) -> TokenStream {
    let header = quote! {
        quickcbor::put_text(buf, #key);
        let len = u32::try_from(#access.len()).map_err(|_| {
            quickcbor::CborError::new(quickcbor::ErrorCode::LengthOverflow, buf.len())
        })?;
    };
    match shape {
        FieldShape::RecordVec(_) => quote! {
            #header
            quickcbor::put_array_header(buf, len);
            for item in &#access {
                item.marshal_cbor(buf)?;
            }
        },
        FieldShape::RecordPtrVec(_) => quote! {
            #header
            quickcbor::put_array_header(buf, len);
            for item in &#access {
                match item {
                    Some(item) => item.marshal_cbor(buf)?,
                    None => quickcbor::put_null(buf),
                }
            }
        },
        FieldShape::IntIntMap(key_kind, value_kind) => {
            let put_key = key_kind.put_expr(&quote!(*k));
            let put_value = value_kind.put_expr(&quote!(*v));
            quote! {
                #header
                quickcbor::put_map_header(buf, len);
                for (k, v) in &#access {
                    #put_key;
                    #put_value;
                }
            }
        }
        FieldShape::IntRecordPtrMap(key_kind, _, ptr) => {
            let put_key = key_kind.put_expr(&quote!(*k));
            let put_value = match ptr {
                PtrKind::Required => quote! { v.marshal_cbor(buf)?; },
                PtrKind::Nullable => quote! {
                    match v {
                        Some(item) => item.marshal_cbor(buf)?,
                        None => quickcbor::put_null(buf),
                    }
                },
            };
            quote! {
                #header
                quickcbor::put_map_header(buf, len);
                for (k, v) in &#access {
                    #put_key;
                    #put_value
                }
            }
        }
        FieldShape::TextTextMap => quote! {
            #header
            quickcbor::put_map_header(buf, len);
            for (k, v) in &#access {
                quickcbor::put_text(buf, k);
                quickcbor::put_text(buf, v);
            }
        },
        _ => unreachable!("expression shapes have no block plan"),
    }
}

/// Emits the `marshal_cbor` routine body for `plan`.
pub(crate) fn marshal_fn(plan: &TypePlan) -> TokenStream {
    let mut base: u32 = 0;
    let mut count_guards = Vec::new();
    let mut body = Vec::new();

    for field in &plan.fields {
        let Some(shape) = &field.shape else { continue };
        let ident = &field.ident;
        let access = quote!(self.#ident);
        let key = field.wire_key.as_str();

        let payload = if shape.is_block() {
            encode_block(shape, key, &access)
        } else {
            let expr = encode_expr(shape, &access);
            quote! {
                quickcbor::put_text(buf, #key);
                #expr
            }
        };

        if field.omit_empty {
            let pred = shape
                .zero_predicate(&access)
                .expect("analysis rejects omit_empty without a zero predicate");
            count_guards.push(quote! {
                if !(#pred) {
                    count += 1;
                }
            });
            body.push(quote! {
                if !(#pred) {
                    #payload
                }
            });
        } else {
            base += 1;
            body.push(payload);
        }
    }

    let count_init = if count_guards.is_empty() {
        quote! { let count: u32 = #base; }
    } else {
        quote! {
            let mut count: u32 = #base;
            #(#count_guards)*
        }
    };

    quote! {
        /// Appends this record as a CBOR map to `buf`.
        pub fn marshal_cbor(&self, buf: &mut Vec<u8>) -> Result<(), quickcbor::CborError> {
            #count_init
            quickcbor::put_map_header(buf, count);
            #(#body)*
            Ok(())
        }
    }
}

/// Returns whether any field's storage borrows (affects doc comments only).
pub(crate) fn borrows_input(plan: &TypePlan) -> bool {
    plan.fields.iter().any(|f| {
        matches!(
            f.shape,
            Some(FieldShape::Text(Storage::Cow) | FieldShape::Bytes(Storage::Cow))
        )
    })
}
