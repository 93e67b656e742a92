use crate::utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[request] 宏实现
/// - 支持结构体与枚举，合并派生：Debug, Clone
/// - 实现 `::todo_application::request::Request`：
///   - `NAME` 默认取类型名，可由 `name = "..."` 覆写
///   - `Response` 由 `response = Type` 指定，缺省为 `()`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as RequestAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let required: Vec<syn::Path> = vec![syn::parse_quote!(Debug), syn::parse_quote!(Clone)];

    let (ident, generics) = match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            (st.ident.clone(), st.generics.clone())
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            (en.ident.clone(), en.generics.clone())
        }
        other => {
            return syn::Error::new(other.span(), "#[request] only supports struct or enum")
                .to_compile_error()
                .into();
        }
    };

    let name = cfg
        .name
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));
    let response = cfg.response.unwrap_or_else(|| syn::parse_quote! { () });
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let out = quote! {
        #input

        impl #impl_generics ::todo_application::request::Request for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            type Response = #response;
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

struct RequestAttrConfig {
    name: Option<syn::LitStr>,
    response: Option<Type>,
}

impl Parse for RequestAttrConfig {
    // 手工解析键值：`response` 的值是类型（如 `Vec<T>`），不能按表达式解析
    fn parse(input: ParseStream) -> Result<Self> {
        let mut name: Option<syn::LitStr> = None;
        let mut response: Option<Type> = None;

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            let _eq: Token![=] = input.parse()?;
            if key == "name" {
                if name.is_some() {
                    return Err(syn::Error::new(key.span(), "duplicate key 'name' in attribute"));
                }
                name = Some(input.parse()?);
            } else if key == "response" {
                if response.is_some() {
                    return Err(syn::Error::new(
                        key.span(),
                        "duplicate key 'response' in attribute",
                    ));
                }
                response = Some(input.parse()?);
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown key; expected 'name' | 'response'",
                ));
            }

            if input.is_empty() {
                break;
            }
            let _comma: Token![,] = input.parse()?;
        }

        Ok(Self { name, response })
    }
}
