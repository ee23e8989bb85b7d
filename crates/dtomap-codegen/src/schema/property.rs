/// How a property is mapped. Exactly one kind per property, decided once
/// during resolution; the expansion phase only ever matches on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PropertyKind {
    /// Copied as-is in both directions.
    Plain,
    /// A fieldless enum with a configured DTO enum; converted by name.
    Enum,
    /// Converted through the caller's `ValueTypeMapper`.
    ValueType,
    /// A mapped domain type; nested as its DTO.
    Entity,
    /// An entity-typed property flattened to the entity's id.
    ChainedId,
    ListOfEntities,
    SetOfEntities,
    /// A collection already holding DTO-typed elements; carried across
    /// unchanged, copied element-wise.
    ListOfDtos,
    SetOfDtos,
    /// Declared with a bound type parameter; mapped as the bound's DTO.
    GenericType,
    /// Not on the domain type at all; read and written through a generated
    /// mapper trait.
    Extension,
}

#[derive(Clone, Debug)]
pub(crate) struct DtoProperty {
    pub(crate) name: String,
    pub(crate) ident: syn::Ident,
    pub(crate) kind: PropertyKind,
    /// Plain: the declared domain type. Extension: the configured DTO-side
    /// type. ValueType: the value's DTO type. ChainedId: the target's id
    /// type. `None` for every kind whose DTO-side type is derived from the
    /// target DTO.
    pub(crate) ty: Option<syn::Type>,
    /// Whether the domain declared an outer `Option`.
    pub(crate) optional: bool,
    /// Index into `Root::dtos` for kinds with a related DTO.
    pub(crate) target: Option<usize>,
    /// Index into `Root::value_types` for `ValueType` properties.
    pub(crate) value_type: Option<usize>,
    pub(crate) read_only: bool,
    pub(crate) getter: Option<syn::Ident>,
    pub(crate) setter: Option<syn::Ident>,
}

impl DtoProperty {
    /// The id property never flows back into the domain object, and
    /// neither does anything marked read-only.
    pub(crate) fn settable(&self) -> bool {
        !self.read_only && self.name != "id"
    }
}
