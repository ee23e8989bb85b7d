use super::Expand;
use crate::schema::{DtoKind, DtoProperty, PropertyKind};
use proc_macro2::{Span, TokenStream};
use quote::quote;

impl Expand<'_> {
    pub(super) fn dto_type(&self) -> TokenStream {
        match &self.dto.kind {
            DtoKind::Enum { values } => self.enum_type(values),
            DtoKind::Entity if self.dto.is_abstract => self.dispatch_enum(),
            DtoKind::Entity => self.struct_type(),
        }
    }

    fn enum_type(&self, values: &[String]) -> TokenStream {
        let ident = &self.dto.ident;
        let variants = values
            .iter()
            .map(|value| syn::Ident::new(value, Span::call_site()));

        quote! {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
            pub enum #ident {
                #( #variants, )*
            }
        }
    }

    /// An abstract DTO is a closed enum over the configured concrete
    /// subclasses, each variant named after the subclass domain type.
    fn dispatch_enum(&self) -> TokenStream {
        let ident = &self.dto.ident;

        let variants = self.variants_of(self.dto).map(|sub| {
            let variant = syn::Ident::new(&sub.domain_name, Span::call_site());
            let handle = self.dto_handle(sub);
            quote!(#variant(#handle))
        });

        let copy_arms: Vec<_> = self
            .variants_of(self.dto)
            .map(|sub| {
                let variant = syn::Ident::new(&sub.domain_name, Span::call_site());
                let sub_ident = &sub.ident;
                quote! {
                    #ident::#variant(d) => #ident::#variant(std::rc::Rc::new(
                        std::cell::RefCell::new(#sub_ident::copy_of(&d.borrow())),
                    ))
                }
            })
            .collect();

        let copy_of = if copy_arms.is_empty() {
            quote!(match *other {})
        } else {
            quote! {
                match other {
                    #( #copy_arms, )*
                }
            }
        };

        quote! {
            #[derive(Clone)]
            pub enum #ident {
                #( #variants, )*
            }

            impl #ident {
                pub fn copy_of(other: &#ident) -> #ident {
                    #copy_of
                }

                pub fn copy(&self) -> #ident {
                    #ident::copy_of(self)
                }
            }
        }
    }

    fn struct_type(&self) -> TokenStream {
        let ident = &self.dto.ident;

        let fields: Vec<_> = self
            .dto
            .properties
            .iter()
            .map(|p| {
                let name = &p.ident;
                let ty = self.field_ty(p);
                quote!(#name: #ty)
            })
            .collect();

        let names = self.dto.properties.iter().map(|p| &p.ident);
        let copies = self.dto.properties.iter().map(|p| self.copy_expr(p));

        quote! {
            pub struct #ident {
                #( pub #fields, )*
            }

            impl #ident {
                pub fn new(#( #fields ),*) -> #ident {
                    #ident {
                        #( #names, )*
                    }
                }

                pub fn copy_of(other: &#ident) -> #ident {
                    #ident::new(#( #copies ),*)
                }

                pub fn copy(&self) -> #ident {
                    #ident::copy_of(self)
                }
            }
        }
    }

    /// Deep copy crosses entity and DTO-collection boundaries; everything
    /// else is carried by value.
    fn copy_expr(&self, property: &DtoProperty) -> TokenStream {
        let name = &property.ident;

        match property.kind {
            PropertyKind::Entity | PropertyKind::GenericType => {
                let target = self.target_of(property);
                let target_ident = &target.ident;

                if target.is_abstract {
                    quote!(other.#name.as_ref().map(#target_ident::copy_of))
                } else {
                    quote! {
                        other.#name.as_ref().map(|d| std::rc::Rc::new(
                            std::cell::RefCell::new(#target_ident::copy_of(&d.borrow())),
                        ))
                    }
                }
            }
            PropertyKind::ListOfDtos | PropertyKind::ListOfEntities => {
                let target = self.target_of(property);
                let target_ident = &target.ident;

                if matches!(target.kind, DtoKind::Enum { .. }) {
                    quote!(other.#name.clone())
                } else if target.is_abstract {
                    quote! {
                        other.#name.as_ref().map(|ds| {
                            ds.iter().map(#target_ident::copy_of).collect()
                        })
                    }
                } else {
                    quote! {
                        other.#name.as_ref().map(|ds| {
                            ds.iter()
                                .map(|d| std::rc::Rc::new(std::cell::RefCell::new(
                                    #target_ident::copy_of(&d.borrow()),
                                )))
                                .collect()
                        })
                    }
                }
            }
            PropertyKind::SetOfDtos | PropertyKind::SetOfEntities => {
                let target = self.target_of(property);

                if matches!(target.kind, DtoKind::Enum { .. }) {
                    quote!(other.#name.clone())
                } else {
                    let target_ident = &target.ident;
                    let runtime = &self.runtime;
                    quote! {
                        other.#name.as_ref().map(|ds| {
                            ds.iter()
                                .map(|d| #runtime::ByAddress(std::rc::Rc::new(
                                    std::cell::RefCell::new(#target_ident::copy_of(&d.borrow())),
                                )))
                                .collect()
                        })
                    }
                }
            }
            _ => quote!(other.#name.clone()),
        }
    }

    /// Equality, hashing and debug output over the configured property
    /// subset; nothing is derived when no subset is configured.
    pub(super) fn equality_impls(&self) -> TokenStream {
        let Some(equality) = &self.dto.equality else {
            return TokenStream::new();
        };

        if self.dto.is_abstract || !matches!(self.dto.kind, DtoKind::Entity) {
            return TokenStream::new();
        }

        let ident = &self.dto.ident;
        let name = &self.dto.name;
        let fields: Vec<syn::Ident> = equality
            .iter()
            .map(|f| syn::Ident::new(f, Span::call_site()))
            .collect();
        let labels: Vec<&String> = equality.iter().collect();

        let eq = if fields.is_empty() {
            quote!(true)
        } else {
            quote!(#( self.#fields == other.#fields )&&*)
        };

        quote! {
            impl PartialEq for #ident {
                fn eq(&self, other: &#ident) -> bool {
                    #eq
                }
            }

            impl Eq for #ident {}

            impl std::hash::Hash for #ident {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    #( std::hash::Hash::hash(&self.#fields, state); )*
                }
            }

            impl std::fmt::Debug for #ident {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_struct(#name)
                        #( .field(#labels, &self.#fields) )*
                        .finish()
                }
            }
        }
    }
}
