use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, LitStr, parse_macro_input};

/// Registers a reset target under a device-tree style compatible string.
///
/// ```rust,ignore
/// #[controller(compatible = "portenta,x8h7rst")]
/// pub struct PortentaX8h7 {}
/// ```
///
/// expands to the struct plus `PortentaX8h7::COMPATIBLE` and
/// `PortentaX8h7::register_controller()`, which inserts `PortentaX8h7::new()` into the
/// target registry. The annotated type must provide `fn new() -> Self` and implement
/// `ResetTarget`.
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut compatible: Option<LitStr> = None;
    let compat_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("compatible") {
            compatible = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported controller property, expected `compatible`"))
        }
    });
    parse_macro_input!(attr with compat_parser);
    let input = parse_macro_input!(item as ItemStruct);

    let Some(compatible) = compatible else {
        return syn::Error::new_spanned(
            &input.ident,
            "#[controller] requires a `compatible = \"vendor,device\"` argument",
        )
        .to_compile_error()
        .into();
    };
    if compatible.value().trim().is_empty() {
        return syn::Error::new_spanned(&compatible, "compatible string must not be empty")
            .to_compile_error()
            .into();
    }

    let ident = &input.ident;
    quote! {
        #input

        impl #ident {
            pub const COMPATIBLE: &'static str = #compatible;

            pub fn register_controller() {
                crate::targets::target::register_controller(#compatible, || {
                    ::std::boxed::Box::new(#ident::new())
                });
            }
        }
    }
    .into()
}
