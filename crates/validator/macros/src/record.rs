use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, GenericParam, parse_macro_input, parse_quote};

use crate::support::{attrs, diag};

const ATTR: &str = "record";

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(ts) => ts.into(),
        Err(e) => diag::to_compile_error(e),
    }
}

/// How one struct field is described.
enum Described {
    Leaf,
    Nested,
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = input.ident.clone();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.clone(),
            _ => {
                return Err(syn::Error::new(
                    struct_name.span(),
                    "Record derive requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Record derive can only be used on structs",
            ));
        }
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(diag::error_spanned(
            lifetime,
            "Record derive does not support borrowed fields",
        ));
    }

    // Records are reached through `dyn Any`.
    for param in &mut input.generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!('static));
        }
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut decls = Vec::with_capacity(fields.len());
    for field in &fields {
        let args = attrs::parse_attrs(&field.attrs, ATTR)?;
        if args.has_flag("skip") {
            continue;
        }

        let mut described = None;
        for flag in args.flags() {
            match flag.to_string().as_str() {
                "nested" => described = Some(Described::Nested),
                "skip" => {}
                other => {
                    return Err(diag::error_spanned(
                        flag,
                        format!("unknown flag `{other}`, expected `nested` or `skip`"),
                    ));
                }
            }
        }

        let mut seen: Vec<String> = Vec::new();
        let mut tags = Vec::new();
        for (key, value) in args.pairs() {
            let key_str = key.to_string();
            if seen.contains(&key_str) {
                return Err(diag::error_spanned(
                    key,
                    format!("duplicate `{key_str}` tag"),
                ));
            }
            seen.push(key_str.clone());
            tags.push(quote!((#key_str, #value)));
        }

        let described = match described {
            Some(Described::Nested) if !tags.is_empty() => {
                return Err(diag::error_spanned(
                    field,
                    "`nested` fields cannot carry `key = \"value\"` tags",
                ));
            }
            Some(described) => described,
            None if tags.is_empty() => continue,
            None => Described::Leaf,
        };

        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| diag::error_spanned(field, "expected a named field"))?;
        let name = ident.unraw().to_string();
        let ty = &field.ty;

        let decl = match described {
            Described::Leaf => quote! {
                ::sieve_validator::FieldDecl::leaf::<#ty>(
                    #name,
                    &[#(#tags),*],
                    |record| {
                        record
                            .downcast_mut::<Self>()
                            .map(|r| &mut r.#ident as &mut dyn ::sieve_validator::Slot)
                    },
                )
            },
            Described::Nested => quote! {
                ::sieve_validator::FieldDecl::nested::<#ty>(
                    #name,
                    &[],
                    |record| {
                        record
                            .downcast_mut::<Self>()
                            .map(|r| &mut r.#ident as &mut (dyn ::std::any::Any + 'static))
                    },
                )
            },
        };
        decls.push(decl);
    }

    Ok(quote! {
        impl #impl_generics ::sieve_validator::Record for #struct_name #ty_generics #where_clause {
            fn shape() -> ::sieve_validator::RecordShape {
                ::sieve_validator::RecordShape::of::<Self>()
                    #(.field(#decls))*
            }
        }
    })
}
