use crate::utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, LitStr, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[entity_id] 宏实现
/// 仅支持包装 `Uuid` 的单字段 tuple struct，并为包装类型：
/// - 合并/追加派生：Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord
/// - 提供 new(value)、Display、FromStr、AsRef、From 等便捷实现
/// - 实现 `Identifier`（随机 v4 生成）与 `FieldValue`（作为指向实体的引用字段）
/// - 参数：`#[entity_id(entity = "Namespace")]`，缺省时取类型名去掉 `Id` 后缀
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityIdAttrConfig);
    let input = parse_macro_input!(item as Item);

    let st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity_id] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let inner_ty = match &st.fields {
        syn::Fields::Unnamed(f) if f.unnamed.len() == 1 => &f.unnamed[0].ty,
        syn::Fields::Unnamed(f) => {
            return syn::Error::new(
                f.span(),
                "#[entity_id] requires a tuple struct with exactly one field",
            )
            .to_compile_error()
            .into();
        }
        _ => {
            return syn::Error::new(
                st.span(),
                "#[entity_id] supports only tuple struct, e.g., struct X(Uuid);",
            )
            .to_compile_error()
            .into();
        }
    };
    if !st.generics.params.is_empty() {
        return syn::Error::new(st.generics.span(), "#[entity_id] does not support generics")
            .to_compile_error()
            .into();
    }

    let ident = &st.ident;
    let entity = cfg.entity.map(|lit| lit.value()).unwrap_or_else(|| {
        let name = ident.to_string();
        name.strip_suffix("Id").unwrap_or(&name).to_string()
    });

    // 合并/规范 derive
    let mut st_out = st.clone();
    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Copy),
        syn::parse_quote!(Debug),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
        syn::parse_quote!(PartialOrd),
        syn::parse_quote!(Ord),
    ];
    apply_derives(&mut st_out.attrs, required, &["Default"]);

    let out = quote! {
        #st_out

        impl #ident {
            pub fn new(value: #inner_ty) -> Self { Self(value) }
        }

        impl ::isshub_domain::entity::Identifier for #ident {
            const ENTITY: &'static str = #entity;

            fn from_uuid(uuid: ::isshub_domain::uuid::Uuid) -> Self { Self(uuid) }

            fn as_uuid(&self) -> ::isshub_domain::uuid::Uuid { self.0 }
        }

        impl ::isshub_domain::field::FieldValue for #ident {
            const FIELD_TYPE: ::isshub_domain::field::FieldType =
                ::isshub_domain::field::FieldType::Reference { entity: #entity };

            fn to_value(&self) -> ::isshub_domain::field::Value {
                ::isshub_domain::field::Value::Reference { entity: #entity, identifier: self.0 }
            }

            fn from_value(value: &::isshub_domain::field::Value) -> ::core::option::Option<Self> {
                match value {
                    ::isshub_domain::field::Value::Reference { entity, identifier } if *entity == #entity => {
                        ::core::option::Option::Some(Self(*identifier))
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

        impl ::std::str::FromStr for #ident {
            type Err = <#inner_ty as ::std::str::FromStr>::Err;
            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let inner: #inner_ty = s.parse()?;
                ::std::result::Result::Ok(Self(inner))
            }
        }

        impl ::std::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::core::convert::AsRef<#inner_ty> for #ident {
            fn as_ref(&self) -> &#inner_ty { &self.0 }
        }

        impl ::core::convert::From<#ident> for #inner_ty {
            fn from(value: #ident) -> Self { value.0 }
        }

        impl ::core::convert::From<#inner_ty> for #ident {
            fn from(value: #inner_ty) -> Self { Self(value) }
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

struct EntityIdAttrConfig {
    entity: Option<LitStr>,
}

impl Parse for EntityIdAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self { entity: None });
        }
        let key: syn::Ident = input.parse()?;
        if key != "entity" {
            return Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'entity'",
            ));
        }
        let _eq: Token![=] = input.parse()?;
        let entity: LitStr = input.parse()?;
        let _trailing: Option<Token![,]> = input.parse()?;
        Ok(Self {
            entity: Some(entity),
        })
    }
}
