use crate::MapError;

/// Bidirectional converter for an independently configured value type, e.g.
/// a money or amount type that has its own DTO representation.
///
/// The generated `Mapper` holds one implementation per configured value
/// type and delegates to it wherever a property is classified as a value
/// type.
pub trait ValueTypeMapper<D, V> {
    fn to_dto(&self, value: &D) -> V;
    fn from_dto(&self, value: &V) -> D;
}

/// Unqualified forward conversion, one implementation per distinct domain
/// type.
///
/// When several DTOs are configured for the same domain type, the first one
/// configured wins the unqualified conversion; the rest remain reachable
/// only through their named `to_xxx_dto` methods. The tie-break is
/// deliberately order-dependent on the configuration, since downstream code
/// may depend on the specific winner.
pub trait ToDto<D> {
    type Dto;

    fn to_dto(&self, domain: Option<&D>) -> Result<Option<Self::Dto>, MapError>;
}
