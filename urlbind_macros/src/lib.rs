//! `#[derive(Route)]` for urlbind.
//!
//! ```rust,ignore
//! #[derive(Default, Route)]
//! #[route(name = "post", pattern = "/posts/{id}", group = "blog")]
//! struct Post {
//!     #[url_path]
//!     id: Option<u64>,
//!     #[url_query("q")]
//!     search: Option<String>,
//!     #[url_query(kind = "boolean")]
//!     preview: bool,
//!     #[url_query(with = "target_param")]
//!     target: Option<Target>,
//! }
//! ```
//!
//! Field attributes, for both `#[url_path]` and `#[url_query]`:
//!
//! - bare: plain field keyed by the field name
//! - `("key")` or `(key = "key")`: plain field with an external key
//! - `(kind = "boolean")`: presence-only encoding
//! - `(with = "module")`: serde pair `module::serialize` / `module::deserialize`
//! - `(serialize = "path::to_fn", deserialize = "path::from_fn")`: explicit pair
//!
//! Serde pairs on an `Option<T>` field operate on `T`; `None` is never
//! passed to the serializer.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, LitStr, Result as SynResult,
    Token, Type,
};

#[derive(Default)]
struct RouteArgs {
    name: Option<LitStr>,
    pattern: Option<LitStr>,
    group: Option<LitStr>,
}

impl Parse for RouteArgs {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let mut args = RouteArgs::default();
        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: LitStr = input.parse()?;
            match ident.to_string().as_str() {
                "name" => args.name = Some(value),
                "pattern" => args.pattern = Some(value),
                "group" => args.group = Some(value),
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unexpected route argument `{other}`"),
                    ))
                }
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(args)
    }
}

#[derive(Default)]
struct FieldArgs {
    key: Option<LitStr>,
    kind: Option<LitStr>,
    with: Option<LitStr>,
    serialize: Option<LitStr>,
    deserialize: Option<LitStr>,
}

impl Parse for FieldArgs {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let mut args = FieldArgs::default();
        if input.peek(LitStr) {
            args.key = Some(input.parse()?);
            if !input.is_empty() {
                return Err(input.error("a bare key takes no further arguments"));
            }
            return Ok(args);
        }
        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: LitStr = input.parse()?;
            let slot = match ident.to_string().as_str() {
                "key" => &mut args.key,
                "kind" => &mut args.kind,
                "with" => &mut args.with,
                "serialize" => &mut args.serialize,
                "deserialize" => &mut args.deserialize,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unexpected field argument `{other}`"),
                    ))
                }
            };
            if slot.replace(value).is_some() {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("duplicate argument `{ident}`"),
                ));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(args)
    }
}

#[derive(Clone, Copy)]
enum Location {
    Path,
    Query,
}

fn is_option(ty: &Type) -> bool {
    if let Type::Path(p) = ty {
        if let Some(seg) = p.path.segments.last() {
            return seg.ident == "Option";
        }
    }
    false
}

type Annotated<'a> = (Location, FieldArgs, &'a Attribute);

fn field_annotation(attrs: &[Attribute]) -> SynResult<Option<Annotated<'_>>> {
    let mut found: Option<Annotated<'_>> = None;
    for attr in attrs {
        let location = if attr.path().is_ident("url_path") {
            Location::Path
        } else if attr.path().is_ident("url_query") {
            Location::Query
        } else {
            continue;
        };
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a field takes at most one #[url_path] or #[url_query] annotation",
            ));
        }
        let args = match &attr.meta {
            syn::Meta::Path(_) => FieldArgs::default(),
            _ => attr.parse_args::<FieldArgs>()?,
        };
        found = Some((location, args, attr));
    }
    Ok(found)
}

fn field_tokens(
    ident: &Ident,
    ty: &Type,
    location: Location,
    args: FieldArgs,
    attr: &Attribute,
) -> SynResult<TokenStream2> {
    let name = ident.to_string();
    let serde_pair = match (&args.with, &args.serialize, &args.deserialize) {
        (None, None, None) => None,
        (Some(module), None, None) => {
            let module: syn::Path = module.parse()?;
            Some((quote! { #module::serialize }, quote! { #module::deserialize }))
        }
        (None, Some(ser), Some(de)) => {
            let ser: syn::Path = ser.parse()?;
            let de: syn::Path = de.parse()?;
            Some((quote! { #ser }, quote! { #de }))
        }
        _ => {
            return Err(syn::Error::new_spanned(
                attr,
                "use either `with = \"module\"` or both `serialize` and `deserialize`",
            ))
        }
    };

    if let Some((ser, de)) = serde_pair {
        if args.key.is_some() || args.kind.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a serialize/deserialize pair takes no `key` or `kind`",
            ));
        }
        let constructor = match location {
            Location::Path => quote! { path_serde },
            Location::Query => quote! { query_serde },
        };
        let (get, set) = if is_option(ty) {
            (
                quote! { |r: &Self| r.#ident.as_ref() },
                quote! { |r: &mut Self, v| r.#ident = ::std::option::Option::Some(v) },
            )
        } else {
            (
                quote! { |r: &Self| ::std::option::Option::Some(&r.#ident) },
                quote! { |r: &mut Self, v: #ty| r.#ident = v },
            )
        };
        return Ok(quote! {
            ::urlbind::Field::#constructor(#name, #get, #set, #ser, #de)
        });
    }

    let constructor = match location {
        Location::Path => quote! { path },
        Location::Query => quote! { query },
    };
    let mut tokens = quote! {
        ::urlbind::Field::#constructor(
            #name,
            |r: &Self| &r.#ident,
            |r: &mut Self, v: #ty| r.#ident = v,
        )
    };
    if let Some(key) = &args.key {
        tokens = quote! { #tokens.key(#key) };
    }
    if let Some(kind) = &args.kind {
        let kind = match kind.value().as_str() {
            "boolean" => quote! { ::urlbind::ValueKind::Boolean },
            "text" => quote! { ::urlbind::ValueKind::Text },
            other => {
                return Err(syn::Error::new(
                    kind.span(),
                    format!("unknown kind `{other}`, expected \"boolean\" or \"text\""),
                ))
            }
        };
        tokens = quote! { #tokens.kind(#kind) };
    }
    Ok(tokens)
}

fn expand(input: DeriveInput) -> SynResult<TokenStream2> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "#[derive(Route)] requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "#[derive(Route)] only supports structs",
            ))
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        if let Some((location, args, attr)) = field_annotation(&field.attrs)? {
            entries.push(field_tokens(field_ident, &field.ty, location, args, attr)?);
        }
    }

    let mut declaration = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("route")) {
        if declaration.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a route type takes at most one #[route] attribute",
            ));
        }
        let args = attr.parse_args::<RouteArgs>()?;
        let (Some(name), Some(pattern)) = (&args.name, &args.pattern) else {
            return Err(syn::Error::new_spanned(
                attr,
                "#[route] requires both `name` and `pattern`",
            ));
        };
        let group = match &args.group {
            Some(group) => quote! { ::std::option::Option::Some(#group) },
            None => quote! { ::std::option::Option::None },
        };
        declaration = Some(quote! {
            fn declaration() -> ::std::option::Option<::urlbind::RouteDeclaration> {
                ::std::option::Option::Some(::urlbind::RouteDeclaration {
                    name: #name,
                    pattern: #pattern,
                    group: #group,
                })
            }
        });
    }

    Ok(quote! {
        impl #impl_generics ::urlbind::Route for #ident #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::urlbind::Field<Self>> {
                ::std::vec![#(#entries),*]
            }

            #declaration
        }
    })
}

/// Derive `urlbind::Route` from `#[route]`, `#[url_path]` and `#[url_query]`
/// attributes. See the crate documentation for the accepted forms.
#[proc_macro_derive(Route, attributes(route, url_path, url_query))]
pub fn derive_route(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
