use super::Expand;
use crate::schema::{DtoKind, DtoProperty, PropertyKind};
use proc_macro2::{Span, TokenStream};
use quote::quote;

impl Expand<'_> {
    pub(super) fn reverse_methods(&self) -> TokenStream {
        match &self.dto.kind {
            // Enum conversion is symmetric and lives with the forward
            // methods.
            DtoKind::Enum { .. } => TokenStream::new(),
            DtoKind::Entity if self.dto.is_abstract => self.reverse_dispatch(),
            DtoKind::Entity => self.reverse_plan(),
        }
    }

    /// The dispatch opens the identity frame itself, so one frame spans
    /// the whole reconstructed graph no matter which variant starts it.
    fn reverse_dispatch(&self) -> TokenStream {
        let ident = &self.dto.ident;
        let domain = &self.dto.domain_path;
        let resolve = &self.dto.resolve_method;
        let runtime = &self.runtime;

        let arms: Vec<_> = self
            .variants_of(self.dto)
            .map(|sub| {
                let variant = syn::Ident::new(&sub.domain_name, Span::call_site());
                let sub_resolve = &sub.resolve_method;
                quote!(#ident::#variant(d) => Ok(self.#sub_resolve(Some(d))?.map(#domain::#variant)))
            })
            .collect();

        let body = if arms.is_empty() {
            quote!(match *dto {})
        } else {
            quote! {
                match dto {
                    #( #arms, )*
                }
            }
        };

        quote! {
            pub fn #resolve(&self, dto: Option<&#ident>) -> Result<Option<#domain>, #runtime::MapError> {
                let _scope = #runtime::IdentityContext::enter();
                let Some(dto) = dto else { return Ok(None) };
                #body
            }
        }
    }

    fn reverse_plan(&self) -> TokenStream {
        let mut out = self.resolve_method();
        out.extend(self.populate_method());
        out.extend(
            self.dto
                .properties
                .iter()
                .filter_map(|p| self.reverse_helper_fn(p)),
        );
        out
    }

    /// Identity first, then the id lookup, then a fresh instance; the new
    /// pairing is registered before populating so cycles land on it.
    fn resolve_method(&self) -> TokenStream {
        let ident = &self.dto.ident;
        let domain = &self.dto.domain_path;
        let resolve = &self.dto.resolve_method;
        let from = &self.dto.from_method;
        let runtime = &self.runtime;

        let make = match self.dto.id_property() {
            Some(id) => {
                let id_field = &id.ident;
                quote! {
                    let o = if let Some(id) = dto.borrow().#id_field.as_ref() {
                        #runtime::lookup_as::<#domain>(&*self.lookup, id)?
                    } else {
                        std::rc::Rc::new(std::cell::RefCell::new(<#domain as Default>::default()))
                    };
                }
            }
            None => quote! {
                let o = std::rc::Rc::new(std::cell::RefCell::new(<#domain as Default>::default()));
            },
        };

        quote! {
            pub fn #resolve(
                &self,
                dto: Option<&std::rc::Rc<std::cell::RefCell<#ident>>>,
            ) -> Result<Option<std::rc::Rc<std::cell::RefCell<#domain>>>, #runtime::MapError> {
                let scope = #runtime::IdentityContext::enter();
                let Some(dto) = dto else { return Ok(None) };
                if let Some(o) = scope.get::<#ident, #domain>(dto) {
                    return Ok(Some(o));
                }
                #make
                scope.store(dto, &o);
                self.#from(&o, dto)?;
                Ok(Some(o))
            }
        }
    }

    /// The domain borrow is scoped per statement: a nested resolve may
    /// reach this same instance again through a shared identifier while
    /// it is being populated.
    fn populate_method(&self) -> TokenStream {
        let ident = &self.dto.ident;
        let domain = &self.dto.domain_path;
        let from = &self.dto.from_method;
        let runtime = &self.runtime;

        let stmts: Vec<_> = self
            .dto
            .properties
            .iter()
            .filter_map(|p| self.populate_stmt(p))
            .collect();

        let body = if stmts.is_empty() {
            TokenStream::new()
        } else {
            quote! {
                let dto = dto.borrow();
                #( #stmts )*
            }
        };

        quote! {
            pub fn #from(
                &self,
                o: &std::rc::Rc<std::cell::RefCell<#domain>>,
                dto: &std::rc::Rc<std::cell::RefCell<#ident>>,
            ) -> Result<(), #runtime::MapError> {
                let scope = #runtime::IdentityContext::enter();
                scope.store(dto, o);
                #body
                Ok(())
            }
        }
    }

    fn populate_stmt(&self, property: &DtoProperty) -> Option<TokenStream> {
        if !property.settable() {
            return None;
        }

        let name = &property.ident;
        let runtime = &self.runtime;

        if property.kind == PropertyKind::Extension {
            let field = self.extension_field();
            let setter = syn::Ident::new(&format!("set_{}", property.name), Span::call_site());
            return Some(quote! {
                self.#field.#setter(self, &mut *o.borrow_mut(), dto.#name.clone());
            });
        }

        let setter = property.setter.as_ref()?;

        // Anything that can recurse back into the mapper computes its
        // value before the mutable borrow is taken.
        let stmt = match property.kind {
            PropertyKind::Plain | PropertyKind::ListOfDtos | PropertyKind::SetOfDtos => {
                quote!(o.borrow_mut().#setter(dto.#name.clone());)
            }
            PropertyKind::Enum => {
                let from_enum = &self.target_of(property).from_method;
                if property.optional {
                    quote!(o.borrow_mut().#setter(dto.#name.as_ref().map(|v| self.#from_enum(v)));)
                } else {
                    quote!(o.borrow_mut().#setter(self.#from_enum(&dto.#name));)
                }
            }
            PropertyKind::ValueType => {
                let field = self.value_field(property);
                if property.optional {
                    quote!(o.borrow_mut().#setter(dto.#name.as_ref().map(|v| self.#field.from_dto(v)));)
                } else {
                    quote!(o.borrow_mut().#setter(self.#field.from_dto(&dto.#name));)
                }
            }
            PropertyKind::Entity | PropertyKind::GenericType => {
                let target_resolve = &self.target_of(property).resolve_method;
                quote! {
                    let value = self.#target_resolve(dto.#name.as_ref())?;
                    o.borrow_mut().#setter(value);
                }
            }
            PropertyKind::ChainedId => {
                let target_domain = &self.target_of(property).domain_path;
                quote! {
                    let value = match dto.#name.as_ref() {
                        Some(id) => Some(#runtime::lookup_as::<#target_domain>(&*self.lookup, id)?),
                        None => None,
                    };
                    o.borrow_mut().#setter(value);
                }
            }
            PropertyKind::ListOfEntities | PropertyKind::SetOfEntities => {
                let helper = self.reverse_helper(property);
                quote! {
                    let value = self.#helper(dto.#name.as_ref())?;
                    o.borrow_mut().#setter(value);
                }
            }
            PropertyKind::Extension => unreachable!(),
        };

        Some(stmt)
    }

    fn reverse_helper_fn(&self, property: &DtoProperty) -> Option<TokenStream> {
        let target = self.target_of_collection(property)?;
        let helper = self.reverse_helper(property);
        let elem_domain = self.domain_handle(target);
        let elem_dto = self.dto_handle(target);
        let elem_resolve = &target.resolve_method;
        let runtime = &self.runtime;

        match property.kind {
            PropertyKind::ListOfEntities => Some(quote! {
                fn #helper(
                    &self,
                    dtos: Option<&Vec<#elem_dto>>,
                ) -> Result<Option<Vec<#elem_domain>>, #runtime::MapError> {
                    let Some(dtos) = dtos else { return Ok(None) };
                    let mut os = Vec::new();
                    for dto in dtos {
                        if let Some(o) = self.#elem_resolve(Some(dto))? {
                            os.push(o);
                        }
                    }
                    Ok(Some(os))
                }
            }),
            PropertyKind::SetOfEntities => Some(quote! {
                fn #helper(
                    &self,
                    dtos: Option<&std::collections::HashSet<#runtime::ByAddress<#elem_dto>>>,
                ) -> Result<Option<std::collections::HashSet<#runtime::ByAddress<#elem_domain>>>, #runtime::MapError> {
                    let Some(dtos) = dtos else { return Ok(None) };
                    let mut os = std::collections::HashSet::new();
                    for dto in dtos {
                        if let Some(o) = self.#elem_resolve(Some(&**dto))? {
                            os.insert(#runtime::ByAddress(o));
                        }
                    }
                    Ok(Some(os))
                }
            }),
            _ => None,
        }
    }
}
