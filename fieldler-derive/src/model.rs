//! Analysis shared by the `FieldData` and `FieldComparator` derives.
//!
//! Turns a `DeriveInput` into the list of compared fields, reading the
//! `#[fieldler(...)]` field attributes:
//!
//! - `skip`: leave the field out of the generated identifiers.
//! - `accessor = "method"`: compare `a.method() == b.method()`.
//! - `with = "path::to::function"`: compare with `function(&a.field, &b.field)`.

use std::collections::HashMap;

use quote::format_ident;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Generics, Ident, LitStr, Path, Type, Visibility};

use crate::case::{constant_case, pascal_case};

const ATTRIBUTE: &str = "fieldler";

/// How the generated equality test reaches a field's value.
pub enum Access {
    /// `a.field == b.field`
    Direct,
    /// `a.method() == b.method()`
    Accessor(Ident),
    /// `path(&a.field, &b.field)`
    With(Path),
}

/// One field that takes part in comparisons.
pub struct ComparedField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub name: String,
    pub constant_name: String,
    pub variant: Ident,
    pub access: Access,
}

/// A struct prepared for code generation.
pub struct ComparedStruct<'a> {
    pub name: &'a Ident,
    pub visibility: &'a Visibility,
    pub generics: &'a Generics,
    pub enum_name: Ident,
    pub fields: Vec<ComparedField<'a>>,
}

#[derive(Default)]
struct FieldOptions {
    skip: bool,
    accessor: Option<Ident>,
    with: Option<Path>,
}

/// Validates the input and collects its compared fields.
pub fn analyze<'a>(input: &'a DeriveInput, derive_name: &str) -> syn::Result<ComparedStruct<'a>> {
    let named_fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(named_fields) => named_fields,
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    format!(
                        "{derive_name} can only be derived for structs with named fields, not tuple structs."
                    ),
                ));
            }
            Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    format!("{derive_name} cannot be derived for unit structs."),
                ));
            }
        },
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("{derive_name} can only be derived for structs, not enums."),
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("{derive_name} cannot be derived for unions."),
            ));
        }
    };

    let mut fields = Vec::with_capacity(named_fields.named.len());
    let mut seen_constants: HashMap<String, &Ident> = HashMap::new();
    let mut seen_variants: HashMap<String, &Ident> = HashMap::new();

    for field in &named_fields.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_options(field)?;
        if options.skip {
            continue;
        }

        let name = ident.unraw().to_string();
        let constant_name = constant_case(&name);
        if let Some(previous) = seen_constants.insert(constant_name.clone(), ident) {
            return Err(collision(
                ident,
                previous,
                format!("field `{name}` maps to the same identifier `{constant_name}` as `{previous}`"),
            ));
        }

        let variant = variant_ident(&constant_name, ident)?;
        if let Some(previous) = seen_variants.insert(variant.to_string(), ident) {
            return Err(collision(
                ident,
                previous,
                format!("field `{name}` maps to the same variant `{variant}` as `{previous}`"),
            ));
        }

        let access = match (options.accessor, options.with) {
            (Some(accessor), None) => Access::Accessor(accessor),
            (None, Some(path)) => Access::With(path),
            (None, None) => Access::Direct,
            (Some(_), Some(_)) => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "`accessor` and `with` cannot be combined on the same field",
                ));
            }
        };

        fields.push(ComparedField {
            ident,
            ty: &field.ty,
            name,
            constant_name,
            variant,
            access,
        });
    }

    Ok(ComparedStruct {
        name: &input.ident,
        visibility: &input.vis,
        generics: &input.generics,
        enum_name: format_ident!("{}Field", input.ident),
        fields,
    })
}

fn parse_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attribute in &field.attrs {
        if !attribute.path().is_ident(ATTRIBUTE) {
            continue;
        }
        attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("accessor") {
                let literal: LitStr = meta.value()?.parse()?;
                options.accessor = Some(literal.parse()?);
                Ok(())
            } else if meta.path.is_ident("with") {
                let literal: LitStr = meta.value()?.parse()?;
                options.with = Some(literal.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported fieldler attribute, expected `skip`, `accessor` or `with`"))
            }
        })?;
    }
    Ok(options)
}

fn collision(field: &Ident, previous: &Ident, message: String) -> syn::Error {
    let mut error = syn::Error::new_spanned(field, message);
    error.combine(syn::Error::new_spanned(
        previous,
        "first field with this identifier",
    ));
    error
}

fn variant_ident(constant_name: &str, field: &Ident) -> syn::Result<Ident> {
    let variant = pascal_case(constant_name);
    syn::parse_str::<Ident>(&variant)
        .map(|ident| Ident::new(&ident.to_string(), field.span()))
        .map_err(|_| {
            syn::Error::new_spanned(
                field,
                format!("cannot build an identifier variant from field `{field}` (got `{variant}`)"),
            )
        })
}
