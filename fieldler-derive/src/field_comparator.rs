//! Implementation of the `#[derive(FieldComparator)]` macro.
//!
//! Generates the identifier enum (as `FieldData` does) plus a
//! `fieldler::FieldComparator` implementation registering one equality test
//! per compared field.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, GenericParam, WherePredicate, parse_macro_input, parse_quote};

use crate::field_data::generate_field_enum;
use crate::model::{Access, ComparedField, ComparedStruct, analyze};

/// Main implementation of the `FieldComparator` derive macro.
pub fn derive_field_comparator_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let expanded = analyze(&input, "FieldComparator")
        .map(|compared| {
            let field_enum = generate_field_enum(&compared);
            let comparator = generate_comparator(&compared);
            quote! {
                #field_enum
                #comparator
            }
        })
        .unwrap_or_else(syn::Error::into_compile_error);
    TokenStream::from(expanded)
}

/// Generates the `FieldComparator` implementation.
fn generate_comparator(compared: &ComparedStruct<'_>) -> TokenStream2 {
    let name = compared.name;
    let enum_name = &compared.enum_name;
    let capacity = compared.fields.len();

    let registrations = compared.fields.iter().map(|field| {
        let variant = &field.variant;
        let predicate = generate_predicate(field);
        quote! {
            equality_tests.insert(#enum_name::#variant, #predicate);
        }
    });

    let mut generics = compared.generics.clone();
    if !compared.generics.params.is_empty() {
        let where_clause = generics.make_where_clause();
        for param in &compared.generics.params {
            let static_bound: Option<WherePredicate> = match param {
                GenericParam::Type(type_param) => {
                    let ident = &type_param.ident;
                    Some(parse_quote!(#ident: 'static))
                }
                GenericParam::Lifetime(lifetime_param) => {
                    let lifetime = &lifetime_param.lifetime;
                    Some(parse_quote!(#lifetime: 'static))
                }
                GenericParam::Const(_) => None,
            };
            where_clause.predicates.extend(static_bound);
        }
        for field in &compared.fields {
            if matches!(field.access, Access::Direct) {
                let ty = field.ty;
                where_clause
                    .predicates
                    .push(parse_quote!(#ty: ::core::cmp::PartialEq));
            }
        }
    }
    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics ::fieldler::FieldComparator for #name #type_generics #where_clause {
            type Field = #enum_name;

            fn equality_tests() -> ::fieldler::EqualityTests<Self, Self::Field> {
                let mut equality_tests = ::fieldler::EqualityTests::with_capacity(#capacity);
                #(#registrations)*
                equality_tests
            }
        }
    }
}

/// Generates the equality test closure for one field.
fn generate_predicate(field: &ComparedField<'_>) -> TokenStream2 {
    let ident = field.ident;
    match &field.access {
        Access::Direct => quote! {
            |object_a: &Self, object_b: &Self| object_a.#ident == object_b.#ident
        },
        Access::Accessor(method) => quote! {
            |object_a: &Self, object_b: &Self| object_a.#method() == object_b.#method()
        },
        Access::With(path) => quote! {
            |object_a: &Self, object_b: &Self| #path(&object_a.#ident, &object_b.#ident)
        },
    }
}
