mod dto;
mod from_dto;
mod mapper;
mod to_dto;
mod util;

use crate::schema::{Dto, Root};
use proc_macro2::TokenStream;
use quote::quote;

/// Expansion state for one DTO. Everything here borrows the resolved
/// graph; expansion itself cannot fail.
pub(crate) struct Expand<'a> {
    pub(crate) root: &'a Root,
    pub(crate) dto: &'a Dto,
    /// Path prefix of the runtime crate in generated code.
    pub(crate) runtime: TokenStream,
}

pub(crate) fn root(root: &Root) -> TokenStream {
    let runtime = quote!(dtomap);
    let mut out = TokenStream::new();

    for dto in generated(root) {
        let expand = Expand {
            root,
            dto,
            runtime: runtime.clone(),
        };

        out.extend(expand.dto_type());
        out.extend(expand.equality_impls());
        out.extend(expand.extension_trait());
    }

    out.extend(mapper::mapper_struct(root, &runtime));

    let mut methods = TokenStream::new();
    for dto in generated(root) {
        let expand = Expand {
            root,
            dto,
            runtime: runtime.clone(),
        };

        methods.extend(expand.forward_methods());
        methods.extend(expand.reverse_methods());
    }

    out.extend(quote! {
        impl Mapper {
            #methods
        }
    });

    for dto in generated(root).filter(|dto| dto.to_dto_winner) {
        let expand = Expand {
            root,
            dto,
            runtime: runtime.clone(),
        };

        out.extend(expand.to_dto_impl());
    }

    out
}

fn generated(root: &Root) -> impl Iterator<Item = &Dto> {
    root.dtos.iter().filter(|dto| !dto.manual)
}
