use super::Expand;
use crate::schema::{Dto, DtoProperty, PropertyKind};
use heck::ToSnakeCase;
use proc_macro2::{Span, TokenStream};
use quote::quote;

impl Expand<'_> {
    /// Per-DTO collection helper, e.g. `employees_for_employer_dto`.
    pub(super) fn forward_helper(&self, property: &DtoProperty) -> syn::Ident {
        syn::Ident::new(
            &format!("{}_for_{}", property.name, self.dto.name.to_snake_case()),
            Span::call_site(),
        )
    }

    pub(super) fn reverse_helper(&self, property: &DtoProperty) -> syn::Ident {
        syn::Ident::new(
            &format!("{}_from_{}", property.name, self.dto.name.to_snake_case()),
            Span::call_site(),
        )
    }

    pub(super) fn extension_field(&self) -> &syn::Ident {
        self.dto
            .mapper_field
            .as_ref()
            .expect("extension property without a mapper field")
    }

    /// The element DTO of an entity-typed collection property.
    pub(super) fn target_of_collection(&self, property: &DtoProperty) -> Option<&Dto> {
        match property.kind {
            PropertyKind::ListOfEntities | PropertyKind::SetOfEntities => {
                Some(self.target_of(property))
            }
            _ => None,
        }
    }

    pub(super) fn target_of(&self, property: &DtoProperty) -> &Dto {
        self.root
            .get(property.target.expect("classified without a target"))
    }

    pub(super) fn value_field(&self, property: &DtoProperty) -> &syn::Ident {
        let index = property.value_type.expect("value type without an index");

        &self.root.value_types[index].mapper_field
    }

    /// The concrete subclasses an abstract DTO dispatches over.
    pub(super) fn variants_of<'a>(&'a self, dto: &'a Dto) -> impl Iterator<Item = &'a Dto> {
        dto.subclasses
            .iter()
            .map(|&sub| self.root.get(sub))
            .filter(|sub| !sub.is_abstract && !sub.manual)
    }

    /// How generated code holds an instance of a DTO: shared and mutable
    /// for structs, by value for dispatch enums.
    pub(super) fn dto_handle(&self, dto: &Dto) -> TokenStream {
        let ident = &dto.ident;

        if dto.is_abstract {
            quote!(#ident)
        } else {
            quote!(std::rc::Rc<std::cell::RefCell<#ident>>)
        }
    }

    /// The domain-side counterpart of `dto_handle`.
    pub(super) fn domain_handle(&self, dto: &Dto) -> TokenStream {
        let domain = &dto.domain_path;

        if dto.is_abstract {
            quote!(#domain)
        } else {
            quote!(std::rc::Rc<std::cell::RefCell<#domain>>)
        }
    }

    /// DTO-side field type of one property.
    pub(super) fn field_ty(&self, property: &DtoProperty) -> TokenStream {
        match property.kind {
            PropertyKind::Plain
            | PropertyKind::Extension
            | PropertyKind::ListOfDtos
            | PropertyKind::SetOfDtos => {
                let ty = self.declared_ty(property);
                quote!(#ty)
            }
            PropertyKind::ValueType => {
                let ty = self.declared_ty(property);
                if property.optional {
                    quote!(Option<#ty>)
                } else {
                    quote!(#ty)
                }
            }
            // Chained ids are optional either way, so an unsaved target
            // simply carries no id.
            PropertyKind::ChainedId => {
                let ty = self.declared_ty(property);
                quote!(Option<#ty>)
            }
            PropertyKind::Enum => {
                let target = &self.target_of(property).ident;
                if property.optional {
                    quote!(Option<#target>)
                } else {
                    quote!(#target)
                }
            }
            PropertyKind::Entity | PropertyKind::GenericType => {
                let handle = self.dto_handle(self.target_of(property));
                quote!(Option<#handle>)
            }
            PropertyKind::ListOfEntities => {
                let handle = self.dto_handle(self.target_of(property));
                quote!(Option<Vec<#handle>>)
            }
            PropertyKind::SetOfEntities => {
                let handle = self.dto_handle(self.target_of(property));
                let runtime = &self.runtime;
                quote!(Option<std::collections::HashSet<#runtime::ByAddress<#handle>>>)
            }
        }
    }

    fn declared_ty<'a>(&self, property: &'a DtoProperty) -> &'a syn::Type {
        property.ty.as_ref().expect("kind carries no declared type")
    }
}
