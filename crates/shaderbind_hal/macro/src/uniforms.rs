use darling::{ast, util, FromDeriveInput, FromField};
use quote::{quote, ToTokens};

#[derive(Debug, FromField)]
#[darling(attributes(uniforms))]
struct UniformsField {
    ident: Option<syn::Ident>,
    ty: syn::Type,

    #[darling(default)]
    name: Option<String>,
    #[darling(default)]
    ignore: bool,
}

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named))]
pub struct Uniforms {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<util::Ignored, UniformsField>,
}

impl ToTokens for Uniforms {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        let Uniforms {
            ref ident,
            ref generics,
            ref data,
        } = *self;

        let (imp, ty, wher) = generics.split_for_impl();

        let fields = data.as_ref().take_struct().unwrap().fields;

        let slots = fields
            .iter()
            .filter(|field| !field.ignore)
            .filter_map(|field| {
                let field_ident = field.ident.as_ref().unwrap();
                let field_ty = &field.ty;

                // Slot name is taken from #[uniforms(name = "...")] if present,
                // otherwise from the field name.
                let name = match &field.name {
                    Some(name) => quote!(#name),
                    None => {
                        let name = format!("{}", field_ident);
                        // Padding fields have names starting with __
                        if name.starts_with("__") {
                            return None;
                        }
                        quote!(#name)
                    }
                };

                Some(quote! {
                    shaderbind_hal::uniforms::UniformSlot::constant(
                        #name,
                        <#field_ty as shaderbind_hal::uniforms::UniformField>::KIND,
                        <#field_ty as shaderbind_hal::uniforms::UniformField>::COUNT,
                        core::mem::offset_of!(#ident #ty, #field_ident),
                    )
                })
            });

        tokens.extend(quote! {
            impl #imp shaderbind_hal::uniforms::Uniforms for #ident #ty #wher {
                const LAYOUT: &'static [shaderbind_hal::uniforms::UniformSlot<'static>] = &[
                    #(#slots,)*
                ];
            }
        });
    }
}
