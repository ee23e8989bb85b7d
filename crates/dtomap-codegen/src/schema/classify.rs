use super::PropertyKind;

/// Everything classification looks at, reduced to booleans so the
/// precedence order below is the whole story.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PropertyFacts {
    pub(crate) extension: bool,
    pub(crate) value_type: bool,
    pub(crate) is_enum: bool,
    pub(crate) chained_id: bool,
    pub(crate) entity: bool,
    pub(crate) list_of_entities: bool,
    pub(crate) set_of_entities: bool,
    pub(crate) list_of_dtos: bool,
    pub(crate) set_of_dtos: bool,
    pub(crate) generic_param: bool,
}

/// The classification precedence. An extension override beats everything;
/// a chained-id override only applies to what would otherwise be an
/// entity; anything unrecognized is carried as-is.
pub(crate) fn classify(facts: PropertyFacts) -> PropertyKind {
    if facts.extension {
        PropertyKind::Extension
    } else if facts.value_type {
        PropertyKind::ValueType
    } else if facts.is_enum {
        PropertyKind::Enum
    } else if facts.entity && facts.chained_id {
        PropertyKind::ChainedId
    } else if facts.entity {
        PropertyKind::Entity
    } else if facts.list_of_entities {
        PropertyKind::ListOfEntities
    } else if facts.set_of_entities {
        PropertyKind::SetOfEntities
    } else if facts.list_of_dtos {
        PropertyKind::ListOfDtos
    } else if facts.set_of_dtos {
        PropertyKind::SetOfDtos
    } else if facts.generic_param {
        PropertyKind::GenericType
    } else {
        PropertyKind::Plain
    }
}
