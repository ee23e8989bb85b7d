use super::DtoProperty;

#[derive(Debug)]
pub(crate) enum DtoKind {
    /// A struct DTO, or a dispatch enum when the type is abstract.
    Entity,
    /// A fieldless enum mirrored variant-for-variant.
    Enum { values: Vec<String> },
}

/// A fully resolved DTO: classification done, inheritance flattened,
/// every related type linked by index into `Root::dtos`.
#[derive(Debug)]
pub(crate) struct Dto {
    pub(crate) name: String,
    pub(crate) ident: syn::Ident,
    pub(crate) domain_name: String,
    pub(crate) domain_path: syn::Path,
    pub(crate) kind: DtoKind,
    pub(crate) is_abstract: bool,
    pub(crate) manual: bool,
    pub(crate) base: Option<usize>,
    /// Direct subclasses, in configuration order.
    pub(crate) subclasses: Vec<usize>,
    /// Base properties first, then own; `inherited` counts the prefix.
    pub(crate) properties: Vec<DtoProperty>,
    pub(crate) inherited: usize,
    pub(crate) equality: Option<Vec<String>>,
    /// Whether this DTO wins the unqualified conversion for its domain
    /// type.
    pub(crate) to_dto_winner: bool,
    pub(crate) to_method: syn::Ident,
    pub(crate) from_method: syn::Ident,
    pub(crate) resolve_method: syn::Ident,
    /// Present when any own property is an extension.
    pub(crate) extension_trait: Option<syn::Ident>,
    pub(crate) mapper_field: Option<syn::Ident>,
}

impl Dto {
    pub(crate) fn id_property(&self) -> Option<&DtoProperty> {
        self.properties.iter().find(|p| p.name == "id")
    }
}
