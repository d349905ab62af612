use quote::ToTokens;
use syn::{
    Attribute, Field, FieldsNamed, GenericArgument, PathArguments, Token, Type,
    punctuated::Punctuated,
};

// 提取非 derive 属性与已有 derive 列表
pub(crate) fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs.iter() {
        if attr.path().is_ident("derive") {
            if let Ok(list) =
                attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
            {
                existing.extend(list);
            }
        } else {
            retained.push(attr.clone());
        }
    }
    (retained, existing)
}

// 合并默认与已有 derive（去重，优先保留 required），并剔除 forbidden 中的派生
pub(crate) fn merge_derives(
    existing: Vec<syn::Path>,
    required: Vec<syn::Path>,
    forbidden: &[&str],
) -> Attribute {
    let mut seen = std::collections::HashSet::<String>::new();
    let mut final_list: Vec<syn::Path> = Vec::new();
    let mut push_unique = |p: syn::Path| {
        let key = derive_key(&p);
        if forbidden.contains(&key.as_str()) {
            return;
        }
        if seen.insert(key) {
            final_list.push(p);
        }
    };
    for p in required {
        push_unique(p);
    }
    for p in existing {
        push_unique(p);
    }
    syn::parse_quote!(#[derive(#(#final_list),*)])
}

// 归一化 derive 的 key，避免 Serialize/serde::Serialize、Builder/bon::Builder 重复
pub(crate) fn derive_key(p: &syn::Path) -> String {
    if let Some(last) = p.segments.last() {
        let last_ident = last.ident.to_string();
        match last_ident.as_str() {
            "Serialize" | "Deserialize" => format!("serde::{}", last_ident),
            "Builder" => "bon::Builder".to_string(),
            _ => last_ident,
        }
    } else {
        p.to_token_stream().to_string()
    }
}

// 直接在 attrs 上应用默认派生合并
pub(crate) fn apply_derives(
    attrs: &mut Vec<Attribute>,
    required: Vec<syn::Path>,
    forbidden: &[&str],
) {
    let (retained, existing) = split_derives(attrs);
    let merged = merge_derives(existing, required, forbidden);
    *attrs = std::iter::once(merged).chain(retained).collect();
}

/// 确保具名字段结构体的首个字段为 `name: ty`
/// - 若已存在同名字段，则复用原定义并移至最前
/// - 否则按给定类型新建（私有可见性）
pub(crate) fn ensure_leading_field(fields_named: &mut FieldsNamed, name: &syn::Ident, ty: &Type) {
    let old_named = std::mem::take(&mut fields_named.named);
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    let (existing, others): (Vec<Field>, Vec<Field>) = old_named
        .into_iter()
        .partition(|f| f.ident.as_ref().map(|i| i == name).unwrap_or(false));

    match existing.into_iter().next() {
        Some(field) => new_named.push(field),
        None => new_named.push(syn::parse_quote! { #name: #ty }),
    }
    for f in others {
        new_named.push(f);
    }

    fields_named.named = new_named;
}

/// 若类型形如 `Option<T>`（含 `std::option::Option<T>`），返回 `T`
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let last = type_path.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// `NamespaceKind` -> `namespace_kind`（与 bon 生成的 typestate 模块命名一致）
pub(crate) fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
