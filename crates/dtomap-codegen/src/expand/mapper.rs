use super::Expand;
use crate::schema::{PropertyKind, Root};
use proc_macro2::{Span, TokenStream};
use quote::quote;

impl Expand<'_> {
    /// The trait a caller implements to supply extension properties; one
    /// trait per DTO that declares any, taking that DTO's domain type.
    pub(super) fn extension_trait(&self) -> TokenStream {
        let Some(trait_ident) = &self.dto.extension_trait else {
            return TokenStream::new();
        };

        let domain = &self.dto.domain_path;
        let mut methods = TokenStream::new();

        for p in self
            .dto
            .properties
            .iter()
            .filter(|p| p.kind == PropertyKind::Extension)
        {
            let name = &p.ident;
            let ty = self.field_ty(p);

            methods.extend(quote! {
                fn #name(&self, mapper: &Mapper, domain: &#domain) -> #ty;
            });

            if !p.read_only {
                let setter = syn::Ident::new(&format!("set_{}", p.name), Span::call_site());
                methods.extend(quote! {
                    fn #setter(&self, mapper: &Mapper, domain: &mut #domain, value: #ty);
                });
            }
        }

        quote! {
            pub trait #trait_ident {
                #methods
            }
        }
    }
}

/// The mapper itself: the lookup plus one field per value type and per
/// extension trait, all wired through the constructor.
pub(super) fn mapper_struct(root: &Root, runtime: &TokenStream) -> TokenStream {
    let value_fields: Vec<_> = root
        .value_types
        .iter()
        .map(|vt| {
            let field = &vt.mapper_field;
            let domain = &vt.domain_path;
            let dto = &vt.dto_ty;
            quote!(#field: std::rc::Rc<dyn #runtime::ValueTypeMapper<#domain, #dto>>)
        })
        .collect();
    let value_names: Vec<_> = root.value_types.iter().map(|vt| &vt.mapper_field).collect();

    let extension_fields: Vec<_> = root
        .dtos
        .iter()
        .filter(|dto| !dto.manual)
        .filter_map(|dto| {
            let field = dto.mapper_field.as_ref()?;
            let trait_ident = dto.extension_trait.as_ref()?;
            Some(quote!(#field: std::rc::Rc<dyn #trait_ident>))
        })
        .collect();
    let extension_names: Vec<_> = root
        .dtos
        .iter()
        .filter(|dto| !dto.manual)
        .filter_map(|dto| dto.mapper_field.as_ref())
        .collect();

    quote! {
        pub struct Mapper {
            pub lookup: std::rc::Rc<dyn #runtime::DomainObjectLookup>,
            #( pub #value_fields, )*
            #( pub #extension_fields, )*
        }

        impl Mapper {
            pub fn new(
                lookup: std::rc::Rc<dyn #runtime::DomainObjectLookup>,
                #( #value_fields, )*
                #( #extension_fields, )*
            ) -> Mapper {
                Mapper {
                    lookup,
                    #( #value_names, )*
                    #( #extension_names, )*
                }
            }
        }
    }
}
