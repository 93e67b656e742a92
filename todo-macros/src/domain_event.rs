use crate::utils::{apply_derives, ensure_leading_fields};
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use std::collections::HashMap;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Expr, Ident, Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input,
};

/// #[domain_event] 宏实现
/// - 仅支持具名字段变体：`Variant { .. }`
/// - 确保每个变体具备事件标识字段 `id: IdType`（默认 `String`）
/// - 生成 `::todo_domain::domain_event::DomainEvent` 实现（event_id/event_type/event_version）
/// - 生成 `EVENT_TYPES` 常量，便于订阅方按类型注册
/// - 支持：`#[domain_event(id = IdType, version = N)]`（枚举级默认值）
/// - 变体可覆写：`#[event(event_type = "...", event_version = N)]`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let enum_item = match &mut input {
        Item::Enum(e) => e,
        other => {
            return syn::Error::new(
                other.span(),
                "#[domain_event] can only be used on enum types",
            )
            .to_compile_error()
            .into();
        }
    };

    let id_type = cfg.id_ty.unwrap_or_else(|| syn::parse_quote! { String });
    let version_lit = cfg.version.unwrap_or_else(|| syn::parse_quote! { 1 });

    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    apply_derives(&mut enum_item.attrs, required);

    let mut variant_types: HashMap<String, syn::LitStr> = HashMap::new();
    let mut variant_versions: HashMap<String, syn::LitInt> = HashMap::new();

    for v in &mut enum_item.variants {
        let variant_span = v.span();
        let syn::Fields::Named(fields_named) = &mut v.fields else {
            return syn::Error::new(
                variant_span,
                "#[domain_event] supports only named-field enum variants, e.g., Variant { x: T }",
            )
            .to_compile_error()
            .into();
        };
        ensure_leading_fields(fields_named, &[("id", &id_type)], false);

        let mut retained_attrs = Vec::new();
        for attr in v.attrs.iter() {
            if !attr.path().is_ident("event") {
                retained_attrs.push(attr.clone());
                continue;
            }
            let vc = match parse_variant_event_attr(attr) {
                Ok(vc) => vc,
                Err(err) => return err.to_compile_error().into(),
            };
            let key = v.ident.to_string();
            if let Some(lit) = vc.ty {
                if variant_types.insert(key.clone(), lit).is_some() {
                    return syn::Error::new(
                        attr.span(),
                        "duplicate 'event_type' specified for this variant",
                    )
                    .to_compile_error()
                    .into();
                }
            }
            if let Some(lit) = vc.version {
                if variant_versions.insert(key, lit).is_some() {
                    return syn::Error::new(
                        attr.span(),
                        "duplicate 'event_version' specified for this variant",
                    )
                    .to_compile_error()
                    .into();
                }
            }
        }
        v.attrs = retained_attrs;
    }

    let enum_ident = &enum_item.ident;
    let enum_name = enum_ident.to_string();

    // 变体级覆盖或默认：EnumName.Variant
    let type_lits: Vec<syn::LitStr> = enum_item
        .variants
        .iter()
        .map(|v| {
            variant_types.get(&v.ident.to_string()).cloned().unwrap_or_else(|| {
                syn::LitStr::new(&format!("{enum_name}.{}", v.ident), v.ident.span())
            })
        })
        .collect();

    let type_match_arms = enum_item.variants.iter().zip(&type_lits).map(|(v, lit)| {
        let v_ident = &v.ident;
        quote! { Self::#v_ident { .. } => #lit }
    });

    let id_match_arms = enum_item.variants.iter().map(|v| {
        let v_ident = &v.ident;
        quote! { Self::#v_ident { id, .. } => ::core::convert::AsRef::<str>::as_ref(id) }
    });

    let ver_match_arms = enum_item.variants.iter().map(|v| {
        let v_ident = &v.ident;
        match variant_versions.get(&v.ident.to_string()) {
            Some(lit) => quote! { Self::#v_ident { .. } => #lit },
            None => quote! { Self::#v_ident { .. } => #version_lit },
        }
    });

    let (impl_generics, ty_generics, where_clause) = enum_item.generics.split_for_impl();

    let out = quote! {
        #enum_item

        impl #impl_generics #enum_ident #ty_generics #where_clause {
            /// 该事件枚举可能产生的全部事件类型
            pub const EVENT_TYPES: &'static [&'static str] = &[ #( #type_lits ),* ];
        }

        impl #impl_generics ::todo_domain::domain_event::DomainEvent for #enum_ident #ty_generics #where_clause {
            fn event_id(&self) -> &str { match self { #( #id_match_arms, )* } }
            fn event_type(&self) -> &str { match self { #( #type_match_arms, )* } }
            fn event_version(&self) -> usize { match self { #( #ver_match_arms, )* } }
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

struct VariantEventAttrConfig {
    ty: Option<syn::LitStr>,
    version: Option<syn::LitInt>,
}

fn parse_variant_event_attr(attr: &syn::Attribute) -> Result<VariantEventAttrConfig> {
    let syn::Meta::List(_) = &attr.meta else {
        return Err(syn::Error::new(attr.span(), "expected #[event(...)]"));
    };

    let mut ty: Option<syn::LitStr> = None;
    let mut version: Option<syn::LitInt> = None;
    let pairs = attr.parse_args_with(Punctuated::<VariantEventAttrKv, Token![,]>::parse_terminated)?;

    for kv in pairs {
        match kv.key.to_string().as_str() {
            "event_type" => {
                if ty.is_some() {
                    return Err(syn::Error::new(
                        kv.key.span(),
                        "duplicate key 'event_type' in attribute",
                    ));
                }
                match kv.value {
                    Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(lit),
                        ..
                    }) => ty = Some(lit),
                    other => {
                        return Err(syn::Error::new(
                            other.span(),
                            "expected string literal for 'event_type'",
                        ));
                    }
                }
            }
            "event_version" => {
                if version.is_some() {
                    return Err(syn::Error::new(
                        kv.key.span(),
                        "duplicate key 'event_version' in attribute",
                    ));
                }
                match kv.value {
                    Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Int(lit),
                        ..
                    }) => version = Some(lit),
                    other => {
                        return Err(syn::Error::new(
                            other.span(),
                            "expected integer literal for 'event_version'",
                        ));
                    }
                }
            }
            _ => {
                return Err(syn::Error::new(
                    kv.key.span(),
                    "unknown key; expected 'event_type' | 'event_version'",
                ));
            }
        }
    }

    Ok(VariantEventAttrConfig { ty, version })
}

struct VariantEventAttrKv {
    key: Ident,
    value: Expr,
}

impl Parse for VariantEventAttrKv {
    fn parse(input: ParseStream) -> Result<Self> {
        let key = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        Ok(Self {
            key,
            value: input.parse()?,
        })
    }
}

// 枚举级配置：id 类型、默认版本号
struct EventAttrConfig {
    id_ty: Option<Type>,
    version: Option<syn::LitInt>,
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut id_ty: Option<Type> = None;
        let mut version: Option<syn::LitInt> = None;

        let pairs: Punctuated<syn::ExprAssign, Token![,]> = Punctuated::parse_terminated(input)?;

        for assign in pairs {
            let key_ident = match *assign.left {
                syn::Expr::Path(p) if p.path.segments.len() == 1 => p.path.segments[0].ident.clone(),
                other => return Err(syn::Error::new(other.span(), "invalid attribute key")),
            };
            match key_ident.to_string().as_str() {
                "id" => {
                    if id_ty.is_some() {
                        return Err(syn::Error::new(
                            key_ident.span(),
                            "duplicate key 'id' in attribute",
                        ));
                    }
                    id_ty = Some(syn::parse2(assign.right.to_token_stream())?);
                }
                "version" => {
                    if version.is_some() {
                        return Err(syn::Error::new(
                            key_ident.span(),
                            "duplicate key 'version' in attribute",
                        ));
                    }
                    version = Some(syn::parse2(assign.right.to_token_stream())?);
                }
                _ => {
                    return Err(syn::Error::new(
                        key_ident.span(),
                        "unknown key; expected 'id' | 'version'",
                    ));
                }
            }
        }

        Ok(Self { id_ty, version })
    }
}
