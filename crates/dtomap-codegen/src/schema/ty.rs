//! Shape analysis over declared domain types. All matching is on the last
//! path segment, so `std::rc::Rc<..>` and `Rc<..>` read the same.

use super::Error;

pub(crate) fn parse(source: &str) -> Result<syn::Type, Error> {
    syn::parse_str(source).map_err(|_| Error::InvalidType {
        ty: source.to_string(),
    })
}

/// The single generic argument of a path type whose last segment is
/// `name`, e.g. the `T` of `Option<T>`.
fn single_arg<'a>(ty: &'a syn::Type, name: &str) -> Option<&'a syn::Type> {
    let syn::Type::Path(path) = ty else {
        return None;
    };

    let segment = path.path.segments.last()?;

    if segment.ident != name {
        return None;
    }

    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };

    if args.args.len() != 1 {
        return None;
    }

    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

pub(crate) fn option_elem(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(ty, "Option")
}

pub(crate) fn vec_elem(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(ty, "Vec")
}

pub(crate) fn set_elem(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(ty, "HashSet")
}

pub(crate) fn identity_elem(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(ty, "ByAddress")
}

/// The `T` of `Rc<RefCell<T>>`.
pub(crate) fn shared_elem(ty: &syn::Type) -> Option<&syn::Type> {
    single_arg(single_arg(ty, "Rc")?, "RefCell")
}

/// The unqualified name of a bare path type, with no generic arguments.
pub(crate) fn leaf_name(ty: &syn::Type) -> Option<String> {
    let syn::Type::Path(path) = ty else {
        return None;
    };

    let segment = path.path.segments.last()?;

    if !segment.arguments.is_empty() {
        return None;
    }

    Some(segment.ident.to_string())
}
