use super::Expand;
use crate::schema::{DtoKind, DtoProperty, PropertyKind};
use proc_macro2::{Span, TokenStream};
use quote::quote;

impl Expand<'_> {
    pub(super) fn forward_methods(&self) -> TokenStream {
        match &self.dto.kind {
            DtoKind::Enum { values } => self.enum_conversions(values),
            DtoKind::Entity if self.dto.is_abstract => self.forward_dispatch(),
            DtoKind::Entity => self.forward_plan(),
        }
    }

    fn enum_conversions(&self, values: &[String]) -> TokenStream {
        let ident = &self.dto.ident;
        let domain = &self.dto.domain_path;
        let to = &self.dto.to_method;
        let from = &self.dto.from_method;

        let variants: Vec<syn::Ident> = values
            .iter()
            .map(|value| syn::Ident::new(value, Span::call_site()))
            .collect();

        let (to_body, from_body) = if variants.is_empty() {
            (quote!(match *v {}), quote!(match *v {}))
        } else {
            (
                quote! {
                    match v {
                        #( #domain::#variants => #ident::#variants, )*
                    }
                },
                quote! {
                    match v {
                        #( #ident::#variants => #domain::#variants, )*
                    }
                },
            )
        };

        quote! {
            pub fn #to(&self, v: &#domain) -> #ident {
                #to_body
            }

            pub fn #from(&self, v: &#ident) -> #domain {
                #from_body
            }
        }
    }

    /// Domain-side dispatch keeps a catch-all arm so a subclass added to
    /// the domain without a configured DTO fails at runtime instead of
    /// converting as something else.
    fn forward_dispatch(&self) -> TokenStream {
        let ident = &self.dto.ident;
        let domain = &self.dto.domain_path;
        let domain_name = &self.dto.domain_name;
        let to = &self.dto.to_method;
        let runtime = &self.runtime;

        let arms = self.variants_of(self.dto).map(|sub| {
            let variant = syn::Ident::new(&sub.domain_name, Span::call_site());
            let sub_to = &sub.to_method;
            quote!(#domain::#variant(v) => Ok(self.#sub_to(Some(v))?.map(#ident::#variant)))
        });

        quote! {
            #[allow(unreachable_patterns)]
            pub fn #to(&self, o: Option<&#domain>) -> Result<Option<#ident>, #runtime::MapError> {
                let Some(o) = o else { return Ok(None) };
                match o {
                    #( #arms, )*
                    _ => Err(#runtime::MapError::NoMatchingSubclass { ty: #domain_name }),
                }
            }
        }
    }

    fn forward_plan(&self) -> TokenStream {
        let ident = &self.dto.ident;
        let domain = &self.dto.domain_path;
        let to = &self.dto.to_method;
        let runtime = &self.runtime;

        let args = self.dto.properties.iter().map(|p| self.forward_expr(p));
        let helpers = self
            .dto
            .properties
            .iter()
            .filter_map(|p| self.forward_helper_fn(p));

        quote! {
            pub fn #to(
                &self,
                o: Option<&std::rc::Rc<std::cell::RefCell<#domain>>>,
            ) -> Result<Option<std::rc::Rc<std::cell::RefCell<#ident>>>, #runtime::MapError> {
                let Some(o) = o else { return Ok(None) };
                let o = o.borrow();
                Ok(Some(std::rc::Rc::new(std::cell::RefCell::new(#ident::new(
                    #( #args ),*
                )))))
            }

            #( #helpers )*
        }
    }

    fn forward_expr(&self, property: &DtoProperty) -> TokenStream {
        if property.kind == PropertyKind::Extension {
            let field = self.extension_field();
            let name = &property.ident;
            return quote!(self.#field.#name(self, &*o));
        }

        let Some(getter) = &property.getter else {
            // Write-only domain property; the DTO carries its default.
            return quote!(Default::default());
        };

        match property.kind {
            PropertyKind::Plain | PropertyKind::ListOfDtos | PropertyKind::SetOfDtos => {
                quote!(o.#getter().clone())
            }
            PropertyKind::Enum => {
                let to_enum = &self.target_of(property).to_method;
                if property.optional {
                    quote!(o.#getter().as_ref().map(|v| self.#to_enum(v)))
                } else {
                    quote!(self.#to_enum(o.#getter()))
                }
            }
            PropertyKind::ValueType => {
                let field = self.value_field(property);
                if property.optional {
                    quote!(o.#getter().as_ref().map(|v| self.#field.to_dto(v)))
                } else {
                    quote!(self.#field.to_dto(o.#getter()))
                }
            }
            PropertyKind::Entity | PropertyKind::GenericType => {
                let target_to = &self.target_of(property).to_method;
                quote!(self.#target_to(o.#getter().as_ref())?)
            }
            PropertyKind::ChainedId => {
                let target = self.target_of(property);
                let id_getter = target
                    .id_property()
                    .and_then(|id| id.getter.clone())
                    .unwrap_or_else(|| syn::Ident::new("id", Span::call_site()));
                quote!(o.#getter().as_ref().and_then(|v| v.borrow().#id_getter().clone()))
            }
            PropertyKind::ListOfEntities | PropertyKind::SetOfEntities => {
                let helper = self.forward_helper(property);
                quote!(self.#helper(o.#getter().as_ref())?)
            }
            PropertyKind::Extension => unreachable!(),
        }
    }

    fn forward_helper_fn(&self, property: &DtoProperty) -> Option<TokenStream> {
        let target = self.target_of_collection(property)?;
        let helper = self.forward_helper(property);
        let elem_domain = self.domain_handle(target);
        let elem_dto = self.dto_handle(target);
        let elem_to = &target.to_method;
        let runtime = &self.runtime;

        match property.kind {
            PropertyKind::ListOfEntities => Some(quote! {
                fn #helper(
                    &self,
                    os: Option<&Vec<#elem_domain>>,
                ) -> Result<Option<Vec<#elem_dto>>, #runtime::MapError> {
                    let Some(os) = os else { return Ok(None) };
                    let mut dtos = Vec::new();
                    for o in os {
                        if let Some(dto) = self.#elem_to(Some(o))? {
                            dtos.push(dto);
                        }
                    }
                    Ok(Some(dtos))
                }
            }),
            PropertyKind::SetOfEntities => Some(quote! {
                fn #helper(
                    &self,
                    os: Option<&std::collections::HashSet<#runtime::ByAddress<#elem_domain>>>,
                ) -> Result<Option<std::collections::HashSet<#runtime::ByAddress<#elem_dto>>>, #runtime::MapError> {
                    let Some(os) = os else { return Ok(None) };
                    let mut dtos = std::collections::HashSet::new();
                    for o in os {
                        if let Some(dto) = self.#elem_to(Some(&**o))? {
                            dtos.insert(#runtime::ByAddress(dto));
                        }
                    }
                    Ok(Some(dtos))
                }
            }),
            _ => None,
        }
    }

    pub(super) fn to_dto_impl(&self) -> TokenStream {
        let runtime = &self.runtime;
        let to = &self.dto.to_method;
        let domain = self.domain_handle(self.dto);
        let dto = self.dto_handle(self.dto);

        quote! {
            impl #runtime::ToDto<#domain> for Mapper {
                type Dto = #dto;

                fn to_dto(&self, domain: Option<&#domain>) -> Result<Option<Self::Dto>, #runtime::MapError> {
                    self.#to(domain)
                }
            }
        }
    }
}
