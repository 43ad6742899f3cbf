use darling::FromDeriveInput;
use proc_macro::TokenStream;
use quote::quote;
use uniforms::Uniforms;

mod uniforms;

#[proc_macro_derive(Uniforms, attributes(uniforms))]
pub fn uniforms_derive(input: TokenStream) -> TokenStream {
    let input = syn::parse2(input.into()).unwrap();
    let uniforms = match Uniforms::from_derive_input(&input) {
        Ok(uniforms) => uniforms,
        Err(e) => return e.write_errors().into(),
    };
    quote!(#uniforms).into()
}
