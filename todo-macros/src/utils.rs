use quote::ToTokens;
use syn::{Attribute, Field, FieldsNamed, Token, Type, punctuated::Punctuated};

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

// 合并默认与已有 derive（去重，required 在前）
pub(crate) fn merge_derives(existing: Vec<syn::Path>, required: Vec<syn::Path>) -> Attribute {
    let mut seen = std::collections::HashSet::<String>::new();
    let mut final_list: Vec<syn::Path> = Vec::new();
    for p in required.into_iter().chain(existing) {
        if seen.insert(derive_key(&p)) {
            final_list.push(p);
        }
    }
    syn::parse_quote!(#[derive(#(#final_list),*)])
}

// 归一化 derive 的 key，避免 Serialize/serde::Serialize 重复
pub(crate) fn derive_key(p: &syn::Path) -> String {
    match p.segments.last() {
        Some(last) => {
            let last_ident = last.ident.to_string();
            match last_ident.as_str() {
                "Serialize" | "Deserialize" => format!("serde::{last_ident}"),
                _ => last_ident,
            }
        }
        None => p.to_token_stream().to_string(),
    }
}

/// 在 attrs 上合并默认派生，derive 属性置于最前（保证 `#[serde(..)]` 等辅助属性可被识别）
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let (retained, existing) = split_derives(attrs);
    let merged = merge_derives(existing, required);
    *attrs = std::iter::once(merged).chain(retained).collect();
}

/// 确保具名字段包含所需字段；缺失时以 `pub` 可见性插入到最前，已存在则保持原位
pub(crate) fn ensure_leading_fields(
    fields_named: &mut FieldsNamed,
    required: &[(&str, &Type)],
    public: bool,
) {
    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    for (name, ty) in required.iter() {
        if has_field_named(&old_named, name) {
            continue;
        }
        let ident = syn::Ident::new(name, proc_macro2::Span::call_site());
        let field: Field = if public {
            syn::parse_quote! { pub #ident: #ty }
        } else {
            syn::parse_quote! { #ident: #ty }
        };
        new_named.push(field);
    }
    new_named.extend(old_named);

    fields_named.named = new_named;
}

pub(crate) fn has_field_named(named: &Punctuated<Field, Token![,]>, name: &str) -> bool {
    named
        .iter()
        .any(|f| f.ident.as_ref().map(|i| i == name).unwrap_or(false))
}

/// 解析 `key = true|false`
pub(crate) fn parse_bool(expr: syn::Expr, key: &str) -> syn::Result<bool> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Bool(b),
            ..
        }) => Ok(b.value()),
        other => Err(syn::Error::new_spanned(
            other,
            format!("expected boolean literal for '{key}'"),
        )),
    }
}
