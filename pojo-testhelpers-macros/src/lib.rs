use proc_macro2::{Delimiter, TokenStream, TokenTree};

/// Test attribute macro that sets up tracing before running the test.
///
/// # Usage
///
/// Basic usage (uses `#[test]`):
/// ```ignore
/// #[pojo_testhelpers::test]
/// fn my_test() {
///     // tracing is set up automatically
/// }
/// ```
///
/// With a custom test attribute:
/// ```ignore
/// #[pojo_testhelpers::test(tokio::test)]
/// async fn my_async_test() {
///     // tracing is set up automatically
/// }
/// ```
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    expand(attr.into(), item.into()).into()
}

fn not_a_function() -> TokenStream {
    quote::quote! {
        ::core::compile_error!("#[pojo_testhelpers::test] expects a function with a body");
    }
}

fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut signature: Vec<TokenTree> = item.into_iter().collect();

    // The body is the trailing brace group; everything before it is the signature.
    let body = match signature.pop() {
        Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Brace => group.stream(),
        _ => return not_a_function(),
    };
    let is_fn = signature
        .iter()
        .any(|token| matches!(token, TokenTree::Ident(ident) if ident == "fn"));
    if !is_fn {
        return not_a_function();
    }

    // If an attribute argument is provided, use it as the test attribute
    // e.g., #[pojo_testhelpers::test(tokio::test)] -> #[tokio::test]
    let test_attr = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        quote::quote! { #[#attr] }
    };

    quote::quote! {
        #test_attr
        #(#signature)* {
            ::pojo_testhelpers::setup();

            #body
        }
    }
}
