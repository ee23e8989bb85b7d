/// The whole declarative input: every DTO to generate plus the value types
/// shared across them. Declaration order matters twice, for field order
/// within generated types and for the first-configured-wins tie-break when
/// several DTOs map the same domain type.
#[derive(Clone, Debug, Default)]
pub struct RootConfig {
    pub dtos: Vec<DtoTypeConfig>,
    pub value_types: Vec<ValueTypeConfig>,
}

impl RootConfig {
    pub fn new() -> RootConfig {
        RootConfig::default()
    }

    pub fn dto(mut self, dto: DtoTypeConfig) -> RootConfig {
        self.dtos.push(dto);
        self
    }

    pub fn value_type(mut self, value_type: ValueTypeConfig) -> RootConfig {
        self.value_types.push(value_type);
        self
    }
}

/// Configuration of one generated DTO type.
///
/// `properties` is the selection mini-language: `None` keeps every domain
/// property, a comma-separated list of names keeps only those, and a list
/// of `-name` entries keeps everything but those. Mixing the two forms is a
/// configuration error.
#[derive(Clone, Debug)]
pub struct DtoTypeConfig {
    pub dto: String,
    pub domain: String,
    pub base: Option<String>,
    pub properties: Option<String>,
    pub overrides: Vec<PropertyOverride>,
    /// When set, equality and hashing of the DTO are defined over exactly
    /// these properties instead of being left ungenerated.
    pub equality: Option<Vec<String>>,
    pub is_abstract: bool,
    /// A manually written DTO: it participates in classification as a
    /// collection element but nothing is generated for it.
    pub manual: bool,
    pub type_params: Vec<TypeParamConfig>,
}

impl DtoTypeConfig {
    pub fn new(dto: impl Into<String>, domain: impl Into<String>) -> DtoTypeConfig {
        DtoTypeConfig {
            dto: dto.into(),
            domain: domain.into(),
            base: None,
            properties: None,
            overrides: vec![],
            equality: None,
            is_abstract: false,
            manual: false,
            type_params: vec![],
        }
    }
}

/// Per-property adjustment layered on top of what the oracle reports.
#[derive(Clone, Debug, Default)]
pub struct PropertyOverride {
    pub name: String,
    /// The property does not exist on the domain type; the caller supplies
    /// it through a generated mapper trait.
    pub extension: bool,
    /// Map an entity-typed property to its id instead of nesting its DTO.
    pub chained_id: bool,
    /// Never write the property back into the domain object.
    pub read_only: bool,
    /// DTO-side type, as source text. Required for extensions.
    pub ty: Option<String>,
}

impl PropertyOverride {
    pub fn extension(name: impl Into<String>, ty: impl Into<String>) -> PropertyOverride {
        PropertyOverride {
            name: name.into(),
            extension: true,
            ty: Some(ty.into()),
            ..PropertyOverride::default()
        }
    }

    pub fn chained_id(name: impl Into<String>) -> PropertyOverride {
        PropertyOverride {
            name: name.into(),
            chained_id: true,
            ..PropertyOverride::default()
        }
    }

    pub fn read_only(name: impl Into<String>) -> PropertyOverride {
        PropertyOverride {
            name: name.into(),
            read_only: true,
            ..PropertyOverride::default()
        }
    }
}

/// A domain type with its own hand-written DTO representation, converted
/// through a `ValueTypeMapper` the caller wires into the generated
/// `Mapper` constructor.
#[derive(Clone, Debug)]
pub struct ValueTypeConfig {
    pub domain: String,
    pub dto: String,
}

impl ValueTypeConfig {
    pub fn new(domain: impl Into<String>, dto: impl Into<String>) -> ValueTypeConfig {
        ValueTypeConfig {
            domain: domain.into(),
            dto: dto.into(),
        }
    }
}

/// Binds a type parameter of a generic domain type to the DTO generated
/// for its bound; properties declared with the parameter are mapped as if
/// declared with the bound itself.
#[derive(Clone, Debug)]
pub struct TypeParamConfig {
    pub param: String,
    pub bound: String,
}

impl TypeParamConfig {
    pub fn new(param: impl Into<String>, bound: impl Into<String>) -> TypeParamConfig {
        TypeParamConfig {
            param: param.into(),
            bound: bound.into(),
        }
    }
}
