//! Static analysis: from a parsed source file to per-type field plans.
//!
//! Exported record structs with named fields are enumerated in declaration
//! order; each field's nominal type is resolved to one of the closed shape
//! set, and `#[cbor(...)]` attributes supply the wire key, omit-empty, and
//! skip flags.

use syn::{
    Attribute, Fields, File, GenericArgument, GenericParam, Item, ItemStruct, LitStr,
    PathArguments, Type, Visibility,
};
use tracing::{debug, warn};

use crate::plan::{FieldPlan, FieldShape, IntKind, PtrKind, Storage, TypePlan};
use crate::GenError;

#[derive(Default)]
struct CborFieldAttr {
    rename: Option<LitStr>,
    omit_empty: bool,
    skip: bool,
}

fn parse_cbor_field_attrs(attrs: &[Attribute]) -> syn::Result<CborFieldAttr> {
    let mut out = CborFieldAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("cbor") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                if out.skip {
                    return Err(meta.error("duplicate `cbor(skip)`"));
                }
                out.skip = true;
                return Ok(());
            }
            if meta.path.is_ident("omit_empty") {
                if out.omit_empty {
                    return Err(meta.error("duplicate `cbor(omit_empty)`"));
                }
                out.omit_empty = true;
                return Ok(());
            }
            if meta.path.is_ident("rename") {
                if out.rename.is_some() {
                    return Err(meta.error("duplicate `cbor(rename=...)`"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit);
                return Ok(());
            }
            Err(meta.error(
                "unsupported `cbor(...)` field attribute (allowed: rename, omit_empty, skip)",
            ))
        })?;
    }
    Ok(out)
}

/// Analyzes `file`, returning a plan per eligible type in declaration order.
///
/// With `allow_dynamic`, unrecognized field shapes fall back to the dynamic
/// helpers instead of failing; the default is strict.
pub(crate) fn analyze_file(
    file: &File,
    file_name: &str,
    allow_dynamic: bool,
) -> Result<Vec<TypePlan>, GenError> {
    let mut plans = Vec::new();
    for item in &file.items {
        let Item::Struct(s) = item else { continue };
        if !matches!(s.vis, Visibility::Public(_)) {
            debug!(name = %s.ident, "skipping non-exported struct");
            continue;
        }
        let Fields::Named(fields) = &s.fields else {
            debug!(name = %s.ident, "skipping struct without named fields");
            continue;
        };
        let lifetime = match struct_lifetime(s) {
            Ok(lt) => lt,
            Err(()) => {
                warn!(name = %s.ident, "skipping generic struct (only one lifetime parameter is supported)");
                continue;
            }
        };

        let mut field_plans = Vec::new();
        for field in &fields.named {
            let attr = parse_cbor_field_attrs(&field.attrs)
                .map_err(|source| GenError::Attr { source })?;
            let ident = field.ident.clone().expect("named field");

            if attr.skip {
                field_plans.push(FieldPlan {
                    ident,
                    ty: field.ty.clone(),
                    wire_key: String::new(),
                    omit_empty: false,
                    shape: None,
                });
                continue;
            }

            let wire_key = attr
                .rename
                .as_ref()
                .map_or_else(|| ident.to_string(), LitStr::value);

            let shape = match resolve_shape(&field.ty) {
                Some(shape) => shape,
                None if allow_dynamic => {
                    warn!(
                        type_name = %s.ident,
                        field = %ident,
                        file = file_name,
                        ty = %type_to_string(&field.ty),
                        "unrecognized shape, falling back to the dynamic helpers \
                         (type must implement ToValue/FromValue)"
                    );
                    FieldShape::Fallback
                }
                None => {
                    return Err(GenError::UnknownFieldShape {
                        type_name: s.ident.to_string(),
                        field: ident.to_string(),
                        ty: type_to_string(&field.ty),
                    })
                }
            };

            if matches!(shape, FieldShape::Dynamic) {
                warn!(
                    type_name = %s.ident,
                    field = %ident,
                    file = file_name,
                    "field uses the dynamic value fallback path"
                );
            }

            if attr.omit_empty && shape.zero_predicate(&quote::quote!(x)).is_none() {
                return Err(GenError::UnsupportedOmitEmpty {
                    type_name: s.ident.to_string(),
                    field: ident.to_string(),
                });
            }

            field_plans.push(FieldPlan {
                ident,
                ty: field.ty.clone(),
                wire_key,
                omit_empty: attr.omit_empty,
                shape: Some(shape),
            });
        }

        plans.push(TypePlan {
            ident: s.ident.clone(),
            lifetime,
            fields: field_plans,
        });
    }
    Ok(plans)
}

/// Returns the struct's single lifetime, `None` for no generics, or `Err`
/// when the generics are anything the emitter cannot handle.
fn struct_lifetime(s: &ItemStruct) -> Result<Option<syn::Lifetime>, ()> {
    let mut lifetime = None;
    for param in &s.generics.params {
        match param {
            GenericParam::Lifetime(lt) if lifetime.is_none() => {
                lifetime = Some(lt.lifetime.clone());
            }
            _ => return Err(()),
        }
    }
    Ok(lifetime)
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(tp) if tp.qself.is_none() => tp.path.segments.last(),
        Type::Group(tg) => last_segment(&tg.elem),
        Type::Paren(tp) => last_segment(&tp.elem),
        _ => None,
    }
}

fn single_type_arg(seg: &syn::PathSegment) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    let mut tys = args.args.iter().filter_map(|a| match a {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    });
    let first = tys.next()?;
    if tys.next().is_some() {
        return None;
    }
    Some(first)
}

fn two_type_args(seg: &syn::PathSegment) -> Option<(&Type, &Type)> {
    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    let mut tys = args.args.iter().filter_map(|a| match a {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    });
    let k = tys.next()?;
    let v = tys.next()?;
    if tys.next().is_some() {
        return None;
    }
    Some((k, v))
}

fn is_ident(ty: &Type, name: &str) -> bool {
    last_segment(ty).is_some_and(|seg| seg.ident == name && seg.arguments.is_none())
}

/// `Box<T>` where `T` is a bare record identifier.
fn boxed_record(ty: &Type) -> Option<syn::Ident> {
    let seg = last_segment(ty)?;
    if seg.ident != "Box" {
        return None;
    }
    record_ident(single_type_arg(seg)?)
}

/// A bare path with no arguments that is not a recognized builtin: treated
/// as a record type, resolved by identifier at compile time of the output.
fn record_ident(ty: &Type) -> Option<syn::Ident> {
    let seg = last_segment(ty)?;
    if !seg.arguments.is_none() {
        return None;
    }
    let name = seg.ident.to_string();
    let builtin = matches!(
        name.as_str(),
        "bool"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "f32"
            | "f64"
            | "char"
            | "str"
            | "String"
            | "Duration"
            | "Value"
    );
    if builtin {
        return None;
    }
    Some(seg.ident.clone())
}

/// Maps a field's nominal type onto the closed shape set.
#[allow(clippy::too_many_lines)]
fn resolve_shape(ty: &Type) -> Option<FieldShape> {
    let seg = last_segment(ty)?;
    let name = seg.ident.to_string();

    if let Some(kind) = IntKind::from_ident(&name) {
        return Some(FieldShape::Int(kind));
    }

    match name.as_str() {
        "bool" => Some(FieldShape::Bool),
        "f32" => Some(FieldShape::F32),
        "f64" => Some(FieldShape::F64),
        "String" => Some(FieldShape::Text(Storage::Owned)),
        "Duration" => Some(FieldShape::Duration),
        "DateTime" => Some(FieldShape::Time),
        "Value" => Some(FieldShape::Dynamic),
        "Cow" => {
            let inner = single_type_arg(seg)?;
            if is_ident(inner, "str") {
                Some(FieldShape::Text(Storage::Cow))
            } else if matches!(inner, Type::Slice(s) if is_ident(&s.elem, "u8")) {
                Some(FieldShape::Bytes(Storage::Cow))
            } else {
                None
            }
        }
        "Vec" => {
            let elem = single_type_arg(seg)?;
            if is_ident(elem, "u8") {
                return Some(FieldShape::Bytes(Storage::Owned));
            }
            if is_ident(elem, "String") {
                return Some(FieldShape::TextVec);
            }
            if let Some(elem_seg) = last_segment(elem) {
                if elem_seg.ident == "Option" {
                    let inner = single_type_arg(elem_seg)?;
                    return boxed_record(inner).map(FieldShape::RecordPtrVec);
                }
            }
            record_ident(elem).map(FieldShape::RecordVec)
        }
        "Box" => boxed_record(ty).map(|ident| FieldShape::RecordPtr(ident, PtrKind::Required)),
        "Option" => {
            let inner = single_type_arg(seg)?;
            boxed_record(inner).map(|ident| FieldShape::RecordPtr(ident, PtrKind::Nullable))
        }
        "BTreeMap" | "HashMap" => {
            let (k, v) = two_type_args(seg)?;
            if is_ident(k, "String") && is_ident(v, "String") {
                return Some(FieldShape::TextTextMap);
            }
            let key_seg = last_segment(k)?;
            let key = IntKind::from_ident(&key_seg.ident.to_string())?;
            if let Some(val_seg) = last_segment(v) {
                if let Some(value) = IntKind::from_ident(&val_seg.ident.to_string()) {
                    return Some(FieldShape::IntIntMap(key, value));
                }
                if val_seg.ident == "Option" {
                    let inner = single_type_arg(val_seg)?;
                    return boxed_record(inner)
                        .map(|ident| FieldShape::IntRecordPtrMap(key, ident, PtrKind::Nullable));
                }
                if val_seg.ident == "Box" {
                    return boxed_record(v)
                        .map(|ident| FieldShape::IntRecordPtrMap(key, ident, PtrKind::Required));
                }
            }
            None
        }
        _ => record_ident(ty).map(FieldShape::Record),
    }
}

fn type_to_string(ty: &Type) -> String {
    quote::quote!(#ty).to_string()
}
