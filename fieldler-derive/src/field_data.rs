//! Implementation of the `#[derive(FieldData)]` macro.
//!
//! Generates the `<Struct>Field` identifier enum and its
//! `fieldler::FieldIdentifier` implementation.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use crate::model::{ComparedStruct, analyze};

/// Main implementation of the `FieldData` derive macro.
pub fn derive_field_data_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let expanded = analyze(&input, "FieldData")
        .map(|compared| generate_field_enum(&compared))
        .unwrap_or_else(syn::Error::into_compile_error);
    TokenStream::from(expanded)
}

/// Generates the identifier enum for an analyzed struct.
pub fn generate_field_enum(compared: &ComparedStruct<'_>) -> TokenStream2 {
    let struct_name = compared.name;
    let visibility = compared.visibility;
    let enum_name = &compared.enum_name;
    let variants: Vec<_> = compared.fields.iter().map(|field| &field.variant).collect();
    let names: Vec<_> = compared.fields.iter().map(|field| field.name.as_str()).collect();
    let constant_names: Vec<_> = compared
        .fields
        .iter()
        .map(|field| field.constant_name.as_str())
        .collect();

    let enum_doc = format!("Compared fields of [`{struct_name}`].");
    let variant_docs: Vec<_> = names
        .iter()
        .map(|name| format!("The `{name}` field."))
        .collect();

    quote! {
        #[doc = #enum_doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #visibility enum #enum_name {
            #(
                #[doc = #variant_docs]
                #variants,
            )*
        }

        impl ::fieldler::FieldIdentifier for #enum_name {
            const ALL: &'static [Self] = &[#(Self::#variants),*];

            fn name(self) -> &'static str {
                match self {
                    #(Self::#variants => #names,)*
                }
            }

            fn constant_name(self) -> &'static str {
                match self {
                    #(Self::#variants => #constant_names,)*
                }
            }
        }

        impl ::core::fmt::Display for #enum_name {
            fn fmt(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                formatter.write_str(::fieldler::FieldIdentifier::name(*self))
            }
        }
    }
}
