use crate::utils::{apply_derives, ensure_leading_field, option_inner, snake_case};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Field, Item, ItemStruct, LitStr, Result, Token, Type, Visibility, parse::Parse,
    parse::ParseStream, parse_macro_input,
};

/// #[entity] 宏实现
/// - `#[entity(id = IdType)]`：在字段最前插入冻结的 `identifier: IdType`，
///   并实现 `Identifiable` 以及基于 `(类型, identifier)` 的 `PartialEq/Eq/Hash`
/// - 为每个字段登记 `FieldDescriptor`（`Option<T>` 视为可选字段），
///   实现 `::isshub_domain::entity::Entity`
/// - 字段属性 `#[field(frozen, relation = "...", validate = path)]`
/// - 派生 bon::Builder，`build()` 返回经过校验的实体
/// - 只派生 Serialize；Deserialize 会绕过构造时的校验，即使显式声明也会被剔除
/// - `debug = false` 时不派生 Debug
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    match expand_struct(cfg, st) {
        Ok(out) => TokenStream::from(out),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_struct(cfg: EntityAttrConfig, mut st: ItemStruct) -> Result<TokenStream2> {
    if !st.generics.params.is_empty() {
        return Err(syn::Error::new(
            st.generics.span(),
            "#[entity] does not support generic structs",
        ));
    }

    let st_span = st.span();
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => return Err(syn::Error::new(st_span, "only supports named-field struct")),
    };

    // identifier 始终位于最前，便于按声明顺序校验
    let identifier = format_ident!("identifier");
    if let Some(id_ty) = &cfg.id_ty {
        ensure_leading_field(fields_named, &identifier, id_ty);
    }

    let mut specs = Vec::with_capacity(fields_named.named.len());
    for (index, field) in fields_named.named.iter_mut().enumerate() {
        let mut spec = FieldSpec::take(field)?;
        if let (0, Some(id_ty)) = (index, &cfg.id_ty) {
            spec.identifier = true;
            spec.frozen = true;
            field.attrs.push(syn::parse_quote! {
                #[builder(default = <#id_ty as ::isshub_domain::entity::Identifier>::generate())]
            });
        }
        if spec.frozen {
            field.vis = Visibility::Inherited;
        }
        specs.push(spec);
    }

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(bon::Builder),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required, forbidden_derives(cfg.id_ty.is_some()));
    st.attrs.push(syn::parse_quote! {
        #[builder(finish_fn(name = build_unvalidated, vis = ""))]
    });

    let ident = &st.ident;
    let name = ident.to_string();
    let builder_ident = format_ident!("{}Builder", ident);
    let state_mod = format_ident!("{}_builder", snake_case(&name));

    let descriptors = specs.iter().map(FieldSpec::descriptor);
    let checks = specs.iter().map(FieldSpec::check);
    let getters = specs.iter().map(FieldSpec::get_arm);
    let setters = specs.iter().map(FieldSpec::set_arm);
    let slot_decls = specs.iter().map(|s| {
        let slot = s.slot();
        quote! { let mut #slot: ::core::option::Option<::isshub_domain::field::Value> = ::core::option::Option::None; }
    });
    let slot_arms = specs.iter().map(|s| {
        let slot = s.slot();
        let field_name = s.name();
        quote! { #field_name => #slot = ::core::option::Option::Some(value), }
    });
    let inits = specs.iter().map(FieldSpec::init);
    let accessors = specs.iter().filter(|s| s.frozen).map(FieldSpec::accessor);
    let uses_lookup = specs.iter().any(|s| s.validator.is_some());
    let ignore_lookup = (!uses_lookup).then(|| quote! { let _ = lookup; });

    let identity = cfg.id_ty.as_ref().map(|id_ty| {
        quote! {
            impl ::isshub_domain::entity::Identifiable for #ident {
                type Id = #id_ty;

                fn identifier(&self) -> &Self::Id { &self.identifier }
            }

            impl ::core::cmp::PartialEq for #ident {
                fn eq(&self, other: &Self) -> bool { self.identifier == other.identifier }
            }

            impl ::core::cmp::Eq for #ident {}

            impl ::core::hash::Hash for #ident {
                fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                    ::core::hash::Hash::hash(<Self as ::isshub_domain::entity::Entity>::NAME, state);
                    ::core::hash::Hash::hash(&self.identifier, state);
                }
            }
        }
    });

    let expanded = quote! {
        #st

        impl #ident {
            #(#accessors)*
        }

        impl<S: #state_mod::IsComplete> #builder_ident<S> {
            /// 构建实体并立即校验
            pub fn build(self) -> ::isshub_domain::error::ValidationResult<#ident> {
                let entity = self.build_unvalidated();
                ::isshub_domain::entity::Entity::validate(&entity)?;
                ::core::result::Result::Ok(entity)
            }
        }

        impl ::isshub_domain::entity::Entity for #ident {
            const NAME: &'static str = #name;

            fn fields() -> &'static [::isshub_domain::field::FieldDescriptor] {
                const FIELDS: &[::isshub_domain::field::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }

            fn validate_in(
                &self,
                lookup: &dyn ::isshub_domain::entity::Lookup<Self>,
            ) -> ::isshub_domain::error::ValidationResult<()> {
                #ignore_lookup
                #(#checks)*
                ::core::result::Result::Ok(())
            }

            fn get_attr(&self, name: &str) -> ::isshub_domain::error::ValidationResult<::isshub_domain::field::Value> {
                match name {
                    #(#getters)*
                    other => ::core::result::Result::Err(
                        ::isshub_domain::error::ValidationError::unknown_field(Self::NAME, other),
                    ),
                }
            }

            fn set_attr(
                &mut self,
                name: &str,
                value: ::isshub_domain::field::Value,
            ) -> ::isshub_domain::error::ValidationResult<()> {
                let _ = &value;
                match name {
                    #(#setters)*
                    other => ::core::result::Result::Err(
                        ::isshub_domain::error::ValidationError::unknown_field(Self::NAME, other),
                    ),
                }
            }

            fn from_attrs<I, K>(attrs: I) -> ::isshub_domain::error::ValidationResult<Self>
            where
                I: ::core::iter::IntoIterator<Item = (K, ::isshub_domain::field::Value)>,
                K: ::core::convert::AsRef<str>,
            {
                #(#slot_decls)*
                for (key, value) in attrs {
                    match key.as_ref() {
                        #(#slot_arms)*
                        other => {
                            return ::core::result::Result::Err(
                                ::isshub_domain::error::ValidationError::unknown_field(Self::NAME, other),
                            );
                        }
                    }
                }
                let entity = Self {
                    #(#inits),*
                };
                ::isshub_domain::entity::Entity::validate(&entity)?;
                ::core::result::Result::Ok(entity)
            }
        }

        #identity
    };

    Ok(expanded)
}

// 实体只能经由校验的构造路径产生；带标识时身份语义由宏生成，禁止按字段比较
fn forbidden_derives(identified: bool) -> &'static [&'static str] {
    if identified {
        &["serde::Deserialize", "PartialEq", "Eq", "Hash"]
    } else {
        &["serde::Deserialize"]
    }
}

// -------- fields --------

struct FieldSpec {
    ident: syn::Ident,
    ty: Type,
    inner: Type,
    optional: bool,
    frozen: bool,
    identifier: bool,
    relation: Option<LitStr>,
    validator: Option<syn::Path>,
}

impl FieldSpec {
    /// 解析并移除字段上的 #[field(...)] 属性
    fn take(field: &mut Field) -> Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "expected named field"))?;
        let (optional, inner) = match option_inner(&field.ty) {
            Some(inner) => (true, inner.clone()),
            None => (false, field.ty.clone()),
        };

        let mut spec = Self {
            ident,
            ty: field.ty.clone(),
            inner,
            optional,
            frozen: false,
            identifier: false,
            relation: None,
            validator: None,
        };

        let mut retained = Vec::with_capacity(field.attrs.len());
        for attr in std::mem::take(&mut field.attrs) {
            if !attr.path().is_ident("field") {
                retained.push(attr);
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("frozen") {
                    spec.frozen = true;
                    Ok(())
                } else if meta.path.is_ident("relation") {
                    spec.relation = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("validate") {
                    spec.validator = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error(
                        "unknown key in #[field]; expected 'frozen', 'relation' or 'validate'",
                    ))
                }
            })?;
        }
        field.attrs = retained;

        Ok(spec)
    }

    fn name(&self) -> String {
        self.ident.to_string()
    }

    fn slot(&self) -> syn::Ident {
        format_ident!("__{}", self.ident)
    }

    fn descriptor(&self) -> TokenStream2 {
        let name = self.name();
        let inner = &self.inner;
        let ty = if self.identifier {
            quote! { ::isshub_domain::field::FieldType::Uuid }
        } else {
            quote! { <#inner as ::isshub_domain::field::FieldValue>::FIELD_TYPE }
        };
        let ctor = if self.optional {
            format_ident!("optional")
        } else {
            format_ident!("required")
        };
        let mut out = quote! { ::isshub_domain::field::FieldDescriptor::#ctor(#name, #ty) };
        if self.frozen {
            out = quote! { #out.frozen() };
        }
        if let Some(label) = &self.relation {
            out = quote! { #out.with_relation(#label) };
        }
        out
    }

    fn check(&self) -> TokenStream2 {
        let ident = &self.ident;
        let name = self.name();
        let builtin = if self.identifier {
            quote! { ::isshub_domain::field::check_identifier(Self::NAME, #name, &self.#ident)?; }
        } else if self.optional {
            quote! {
                if let ::core::option::Option::Some(value) = &self.#ident {
                    ::isshub_domain::field::FieldValue::check(value, Self::NAME, #name)?;
                }
            }
        } else {
            quote! { ::isshub_domain::field::FieldValue::check(&self.#ident, Self::NAME, #name)?; }
        };
        let custom = self
            .validator
            .as_ref()
            .map(|path| quote! { #path(self, &self.#ident, lookup)?; });
        quote! { #builtin #custom }
    }

    fn get_arm(&self) -> TokenStream2 {
        let ident = &self.ident;
        let name = self.name();
        let value = if self.identifier {
            quote! {
                ::isshub_domain::field::Value::Uuid(
                    ::isshub_domain::entity::Identifier::as_uuid(&self.#ident),
                )
            }
        } else if self.optional {
            quote! {
                self.#ident
                    .as_ref()
                    .map_or(::isshub_domain::field::Value::Null, ::isshub_domain::field::FieldValue::to_value)
            }
        } else {
            quote! { ::isshub_domain::field::FieldValue::to_value(&self.#ident) }
        };
        quote! { #name => ::core::result::Result::Ok(#value), }
    }

    fn set_arm(&self) -> TokenStream2 {
        let ident = &self.ident;
        let name = self.name();
        let inner = &self.inner;
        if self.frozen {
            return quote! {
                #name => ::core::result::Result::Err(
                    ::isshub_domain::error::ValidationError::frozen(Self::NAME, #name),
                ),
            };
        }
        let coerce = if self.optional {
            format_ident!("coerce_optional")
        } else {
            format_ident!("coerce_required")
        };
        quote! {
            #name => {
                self.#ident = ::isshub_domain::field::#coerce::<#inner>(Self::NAME, #name, value)?;
                ::core::result::Result::Ok(())
            }
        }
    }

    fn init(&self) -> TokenStream2 {
        let ident = &self.ident;
        let name = self.name();
        let slot = self.slot();
        let ty = &self.ty;
        let inner = &self.inner;
        if self.identifier {
            return quote! {
                #ident: match #slot {
                    ::core::option::Option::Some(value) => {
                        ::isshub_domain::field::coerce_identifier::<#ty>(Self::NAME, #name, value)?
                    }
                    ::core::option::Option::None => {
                        <#ty as ::isshub_domain::entity::Identifier>::generate()
                    }
                }
            };
        }
        let coerce = if self.optional {
            format_ident!("coerce_optional")
        } else {
            format_ident!("coerce_required")
        };
        quote! {
            #ident: ::isshub_domain::field::#coerce::<#inner>(
                Self::NAME,
                #name,
                #slot.unwrap_or(::isshub_domain::field::Value::Null),
            )?
        }
    }

    fn accessor(&self) -> TokenStream2 {
        let ident = &self.ident;
        let ty = &self.ty;
        quote! {
            pub fn #ident(&self) -> &#ty { &self.#ident }
        }
    }
}

// -------- parsing --------

struct EntityAttrConfig {
    id_ty: Option<Type>,
    derive_debug: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut id_ty: Option<Type> = None;
        let mut derive_debug: Option<bool> = None;

        if input.is_empty() {
            return Ok(Self {
                id_ty,
                derive_debug,
            });
        }

        let elems: Punctuated<EntityAttrElem, Token![,]> =
            Punctuated::<EntityAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                EntityAttrElem::Id(ty) => {
                    if id_ty.is_some() {
                        return Err(syn::Error::new(
                            ty.span(),
                            "duplicate key 'id' in attribute",
                        ));
                    }
                    id_ty = Some(*ty);
                }
                EntityAttrElem::Debug(b) => {
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

        Ok(Self {
            id_ty,
            derive_debug,
        })
    }
}

enum EntityAttrElem {
    Id(Box<Type>),
    Debug(bool),
}

impl Parse for EntityAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "id" {
            let _eq: Token![=] = input.parse()?;
            let ty: Type = input.parse()?;
            Ok(EntityAttrElem::Id(Box::new(ty)))
        } else if key == "debug" {
            let _eq: Token![=] = input.parse()?;
            let expr: syn::Expr = input.parse()?;
            match expr {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => Ok(EntityAttrElem::Debug(b.value())),
                other => Err(syn::Error::new(
                    other.span(),
                    "expected boolean literal for 'debug'",
                )),
            }
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'id' or 'debug'",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::split_derives;
    use syn::Attribute;

    fn derives_of(attrs: &[Attribute]) -> Vec<String> {
        let (_, derives) = split_derives(attrs);
        derives
            .iter()
            .map(|p| quote!(#p).to_string().replace(' ', ""))
            .collect()
    }

    // 测试显式声明的 Deserialize 被剔除，Serialize 保留
    #[test]
    fn test_deserialize_is_never_derived() {
        for identified in [true, false] {
            let mut attrs: Vec<Attribute> =
                vec![syn::parse_quote!(#[derive(serde::Deserialize, Default)])];
            let required = vec![syn::parse_quote!(Clone), syn::parse_quote!(serde::Serialize)];
            apply_derives(&mut attrs, required, forbidden_derives(identified));
            let derives = derives_of(&attrs);
            assert!(derives.contains(&"serde::Serialize".to_string()));
            assert!(derives.contains(&"Default".to_string()));
            assert!(!derives.iter().any(|d| d.ends_with("Deserialize")));
        }
    }

    // 测试带标识的实体不派生按字段比较
    #[test]
    fn test_identified_forbids_field_equality() {
        assert!(forbidden_derives(true).contains(&"PartialEq"));
        assert!(!forbidden_derives(false).contains(&"PartialEq"));
    }
}
