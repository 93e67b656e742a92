use crate::utils::{apply_derives, parse_bool};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq
/// - 参数：`#[value_object(debug = bool, default = bool)]`，均默认 true；
///   需要自定义 `Default`（例如带业务默认值）时传 `default = false`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
    ];
    if cfg.derive_default.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Default));
    }
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }

    match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            TokenStream::from(quote! { #st })
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            TokenStream::from(quote! { #en })
        }
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}

// -------- parsing --------

struct ValueObjectAttrConfig {
    derive_debug: Option<bool>,
    derive_default: Option<bool>,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut derive_debug: Option<bool> = None;
        let mut derive_default: Option<bool> = None;

        let pairs: Punctuated<syn::ExprAssign, Token![,]> = Punctuated::parse_terminated(input)?;

        for assign in pairs {
            let key = match *assign.left {
                syn::Expr::Path(p) if p.path.segments.len() == 1 => p.path.segments[0].ident.clone(),
                other => return Err(syn::Error::new(other.span(), "invalid attribute key")),
            };
            let slot = if key == "debug" {
                &mut derive_debug
            } else if key == "default" {
                &mut derive_default
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown key in attribute; expected 'debug' | 'default'",
                ));
            };
            if slot.is_some() {
                return Err(syn::Error::new(
                    key.span(),
                    format!("duplicate key '{key}' in attribute"),
                ));
            }
            *slot = Some(parse_bool(*assign.right, &key.to_string())?);
        }

        Ok(Self {
            derive_debug,
            derive_default,
        })
    }
}
