//! `#[derive(EnuMap)]` for fieldless enums.
//!
//! For `enum Lesson { NounsDeclination, BitiConjugation }` this generates a
//! `LessonMap<T>` struct with one field per variant (`nouns_declination`,
//! `biti_conjugation`), so every variant is guaranteed to have a value, and a
//! `Lesson::VARIANTS` array listing the variants in declaration order.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

#[proc_macro_derive(EnuMap)]
pub fn derive_enumap(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let vis = &input.vis;
    let enum_name = &input.ident;
    let map_name = syn::Ident::new(&format!("{enum_name}Map"), enum_name.span());

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "EnuMap can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let mut variant_names = Vec::new();
    let mut field_names = Vec::new();
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(
                variant,
                "EnuMap only supports unit variants (variants without fields)",
            )
            .to_compile_error()
            .into();
        }
        variant_names.push(&variant.ident);
        field_names.push(syn::Ident::new(
            &to_snake_case(&variant.ident.to_string()),
            variant.ident.span(),
        ));
    }
    let count = variant_names.len();

    let expanded = quote! {
        impl #enum_name {
            /// Every variant, in declaration order.
            pub const VARIANTS: [#enum_name; #count] = [#(#enum_name::#variant_names),*];
        }

        #[derive(Debug, Clone)]
        #vis struct #map_name<T> {
            #(pub #field_names: T),*
        }

        impl<T> #map_name<T> {
            pub fn from_fn(mut f: impl FnMut(#enum_name) -> T) -> Self {
                Self {
                    #(#field_names: f(#enum_name::#variant_names)),*
                }
            }

            pub fn try_from_fn<E>(
                mut f: impl FnMut(#enum_name) -> ::core::result::Result<T, E>,
            ) -> ::core::result::Result<Self, E> {
                ::core::result::Result::Ok(Self {
                    #(#field_names: f(#enum_name::#variant_names)?),*
                })
            }

            pub fn get(&self, key: &#enum_name) -> &T {
                match key {
                    #(#enum_name::#variant_names => &self.#field_names),*
                }
            }

            pub fn get_mut(&mut self, key: &#enum_name) -> &mut T {
                match key {
                    #(#enum_name::#variant_names => &mut self.#field_names),*
                }
            }

            pub fn iter(&self) -> impl Iterator<Item = (#enum_name, &T)> + '_ {
                [#((#enum_name::#variant_names, &self.#field_names)),*].into_iter()
            }
        }
    };

    TokenStream::from(expanded)
}
