use crate::utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[field_enum] 宏实现
/// - 仅支持只含单元变体的枚举
/// - 合并/追加派生：Clone, Copy, (Debug 可控), Serialize, Deserialize, PartialEq, Eq, Hash
/// - 提供 `VARIANTS`、`as_str`、Display、FromStr，并实现 `FieldValue`
/// - 参数：`#[field_enum(debug = true|false)]`，默认 true
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as FieldEnumAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut en = match input {
        Item::Enum(en) => en,
        other => {
            return syn::Error::new(other.span(), "#[field_enum] only supports enum")
                .to_compile_error()
                .into();
        }
    };

    if let Some(variant) = en
        .variants
        .iter()
        .find(|v| !matches!(v.fields, syn::Fields::Unit))
    {
        return syn::Error::new(variant.span(), "#[field_enum] supports only unit variants")
            .to_compile_error()
            .into();
    }

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Copy),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut en.attrs, required, &[]);

    let ident = &en.ident;
    let name = ident.to_string();
    let variants: Vec<&syn::Ident> = en.variants.iter().map(|v| &v.ident).collect();
    let labels: Vec<String> = variants.iter().map(|v| v.to_string()).collect();

    let out = quote! {
        #en

        impl #ident {
            pub const VARIANTS: &'static [&'static str] = &[#(#labels),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#variants => #labels,)*
                }
            }
        }

        impl ::std::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for #ident {
            type Err = ::isshub_domain::field::UnknownVariant;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    #(#labels => ::std::result::Result::Ok(Self::#variants),)*
                    other => ::std::result::Result::Err(
                        ::isshub_domain::field::UnknownVariant::new(#name, other),
                    ),
                }
            }
        }

        impl ::isshub_domain::field::FieldValue for #ident {
            const FIELD_TYPE: ::isshub_domain::field::FieldType =
                ::isshub_domain::field::FieldType::Enum { name: #name, variants: Self::VARIANTS };

            fn to_value(&self) -> ::isshub_domain::field::Value {
                ::isshub_domain::field::Value::Variant { enumeration: #name, name: self.as_str() }
            }

            fn from_value(value: &::isshub_domain::field::Value) -> ::core::option::Option<Self> {
                match value {
                    ::isshub_domain::field::Value::Variant { enumeration, name } if *enumeration == #name => {
                        name.parse().ok()
                    }
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::core::convert::From<#ident> for ::isshub_domain::field::Value {
            fn from(value: #ident) -> Self {
                ::isshub_domain::field::FieldValue::to_value(&value)
            }
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

struct FieldEnumAttrConfig {
    derive_debug: Option<bool>,
}

impl Parse for FieldEnumAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self { derive_debug: None });
        }

        let mut derive_debug: Option<bool> = None;
        let pairs: Punctuated<FieldEnumAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;

        for elem in pairs {
            match elem {
                FieldEnumAttrElem::Debug(b) => {
                    if derive_debug.is_some() {
                        return Err(syn::Error::new(
                            proc_macro2::Span::call_site(),
                            "duplicate key 'debug' in attribute",
                        ));
                    }
                    derive_debug = Some(b);
                }
            }
        }
        Ok(Self { derive_debug })
    }
}

enum FieldEnumAttrElem {
    Debug(bool),
}

impl Parse for FieldEnumAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "debug" {
            let _eq: Token![=] = input.parse()?;
            let expr: syn::Expr = input.parse()?;
            match expr {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => Ok(Self::Debug(b.value())),
                other => Err(syn::Error::new(
                    other.span(),
                    "expected boolean literal for 'debug'",
                )),
            }
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'debug'",
            ))
        }
    }
}
