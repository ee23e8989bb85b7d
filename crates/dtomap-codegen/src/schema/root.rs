use heck::ToSnakeCase;
use indexmap::IndexMap;
use proc_macro2::Span;

use super::{classify, ty, Dto, DtoKind, DtoProperty, Error, PropertyFacts, PropertyKind, Selection};
use crate::config::{DtoTypeConfig, RootConfig};
use crate::oracle::{PropertyDescriptor, TypeOracle};

/// A hand-mapped value type, shared across every DTO that uses it.
#[derive(Debug)]
pub(crate) struct ValueType {
    pub(crate) domain_name: String,
    pub(crate) domain_path: syn::Path,
    pub(crate) dto_ty: syn::Type,
    pub(crate) mapper_field: syn::Ident,
}

/// The resolved configuration graph. Every cross-type relation is an
/// index into `dtos`, so expansion never has to look anything up by name.
#[derive(Debug)]
pub(crate) struct Root {
    pub(crate) dtos: Vec<Dto>,
    pub(crate) value_types: Vec<ValueType>,
}

impl Root {
    pub(crate) fn resolve(config: &RootConfig, oracle: &dyn TypeOracle) -> Result<Root, Error> {
        Resolver::new(config, oracle)?.resolve()
    }

    pub(crate) fn get(&self, index: usize) -> &Dto {
        &self.dtos[index]
    }
}

struct Resolver<'a> {
    config: &'a RootConfig,
    oracle: &'a dyn TypeOracle,
    value_types: Vec<ValueType>,
    /// DTO name to configuration index.
    by_dto_name: IndexMap<String, usize>,
    /// Domain simple name to the first generated entity DTO for it; what
    /// an entity-typed property maps to, and the `ToDto` winner.
    entity_for: IndexMap<String, usize>,
    /// Domain simple name to the first enum DTO for it.
    enum_for: IndexMap<String, usize>,
    dtos: Vec<Option<Dto>>,
    visiting: Vec<bool>,
}

impl<'a> Resolver<'a> {
    fn new(config: &'a RootConfig, oracle: &'a dyn TypeOracle) -> Result<Resolver<'a>, Error> {
        let mut by_dto_name = IndexMap::new();
        let mut entity_for = IndexMap::new();
        let mut enum_for = IndexMap::new();

        for (index, dto) in config.dtos.iter().enumerate() {
            if by_dto_name.insert(dto.dto.clone(), index).is_some() {
                return Err(Error::DuplicateDto {
                    dto: dto.dto.clone(),
                });
            }

            let domain = simple_name(&dto.domain);

            if oracle.is_enum(&domain) {
                enum_for.entry(domain).or_insert(index);
            } else if !dto.manual {
                // Manual DTOs never participate in entity matching; their
                // mapper methods do not exist.
                entity_for.entry(domain).or_insert(index);
            }
        }

        let mut value_types = Vec::new();
        for vt in &config.value_types {
            let domain_path = parse_path(&vt.domain)?;
            let domain_name = simple_name(&vt.domain);

            value_types.push(ValueType {
                mapper_field: ident(&format!("{}_mapper", domain_name.to_snake_case())),
                domain_name,
                domain_path,
                dto_ty: ty::parse(&vt.dto)?,
            });
        }

        let count = config.dtos.len();

        Ok(Resolver {
            config,
            oracle,
            value_types,
            by_dto_name,
            entity_for,
            enum_for,
            dtos: (0..count).map(|_| None).collect(),
            visiting: vec![false; count],
        })
    }

    fn resolve(mut self) -> Result<Root, Error> {
        for index in 0..self.config.dtos.len() {
            self.resolve_dto(index)?;
        }

        let mut dtos: Vec<Dto> = self.dtos.into_iter().flatten().collect();

        // Link direct subclasses, in configuration order.
        for index in 0..dtos.len() {
            if let Some(base) = dtos[index].base {
                dtos[base].subclasses.push(index);
            }
        }

        Ok(Root {
            dtos,
            value_types: self.value_types,
        })
    }

    /// Resolves one DTO, bases first so inherited properties are already
    /// classified when the subclass copies them.
    fn resolve_dto(&mut self, index: usize) -> Result<(), Error> {
        if self.dtos[index].is_some() {
            return Ok(());
        }

        let config = &self.config.dtos[index];

        if self.visiting[index] {
            return Err(Error::CyclicBase {
                dto: config.dto.clone(),
            });
        }
        self.visiting[index] = true;

        let base = match &config.base {
            Some(base) => {
                let base_index =
                    *self
                        .by_dto_name
                        .get(base)
                        .ok_or_else(|| Error::UnresolvedBase {
                            dto: config.dto.clone(),
                            base: base.clone(),
                        })?;
                self.resolve_dto(base_index)?;
                Some(base_index)
            }
            None => None,
        };

        let dto = self.build_dto(index, base)?;
        self.dtos[index] = Some(dto);
        self.visiting[index] = false;

        Ok(())
    }

    fn build_dto(&self, index: usize, base: Option<usize>) -> Result<Dto, Error> {
        let config = &self.config.dtos[index];
        let domain_name = simple_name(&config.domain);
        let domain_path = parse_path(&config.domain)?;
        let snake = config.dto.to_snake_case();

        let is_enum = self.oracle.is_enum(&domain_name);
        let is_abstract = config.is_abstract || self.oracle.is_abstract(&domain_name);

        let (kind, properties, inherited) = if config.manual {
            (DtoKind::Entity, vec![], 0)
        } else if is_enum {
            let values = self.oracle.enum_values(&domain_name);
            (DtoKind::Enum { values }, vec![], 0)
        } else {
            let (properties, inherited) = self.build_properties(config, base)?;
            (DtoKind::Entity, properties, inherited)
        };

        if let Some(equality) = &config.equality {
            for name in equality {
                if !properties.iter().any(|p| &p.name == name) {
                    return Err(Error::UnknownProperty {
                        dto: config.dto.clone(),
                        property: name.clone(),
                    });
                }
            }
        }

        // Inherited extensions included: every DTO with extension
        // properties gets its own trait, taking its own domain type.
        let has_extensions = properties.iter().any(|p| p.kind == PropertyKind::Extension);

        Ok(Dto {
            ident: ident(&config.dto),
            name: config.dto.clone(),
            domain_name: domain_name.clone(),
            domain_path,
            kind,
            is_abstract,
            manual: config.manual,
            base,
            subclasses: vec![],
            properties,
            inherited,
            equality: config.equality.clone(),
            to_dto_winner: self.entity_for.get(&domain_name) == Some(&index),
            to_method: ident(&format!("to_{snake}")),
            from_method: ident(&format!("from_{snake}")),
            resolve_method: ident(&format!("resolve_{snake}")),
            extension_trait: has_extensions.then(|| ident(&format!("{}Mapper", config.dto))),
            mapper_field: has_extensions.then(|| ident(&format!("{snake}_mapper"))),
        })
    }

    fn build_properties(
        &self,
        config: &DtoTypeConfig,
        base: Option<usize>,
    ) -> Result<(Vec<DtoProperty>, usize), Error> {
        let domain_name = simple_name(&config.domain);
        let descriptors =
            self.oracle
                .properties(&domain_name)
                .ok_or_else(|| Error::UnknownType {
                    ty: domain_name.clone(),
                })?;

        for o in &config.overrides {
            if !o.extension && !descriptors.iter().any(|d| d.name == o.name) {
                return Err(Error::UnknownProperty {
                    dto: config.dto.clone(),
                    property: o.name.clone(),
                });
            }
        }

        let selection = Selection::parse(config.properties.as_deref())?;

        // Inherited properties come first and shadow same-named ones.
        let mut properties: Vec<DtoProperty> = match base {
            Some(base) => self.dtos[base]
                .as_ref()
                .map(|b| b.properties.clone())
                .unwrap_or_default(),
            None => vec![],
        };
        let inherited = properties.len();

        for descriptor in &descriptors {
            if !selection.selects(&descriptor.name) {
                continue;
            }
            if properties[..inherited]
                .iter()
                .any(|p| p.name == descriptor.name)
            {
                continue;
            }

            properties.push(self.resolve_property(config, descriptor)?);
        }

        for o in &config.overrides {
            if !o.extension {
                continue;
            }

            let ty = o.ty.as_deref().ok_or_else(|| Error::MissingExtensionType {
                dto: config.dto.clone(),
                property: o.name.clone(),
            })?;

            properties.push(DtoProperty {
                name: o.name.clone(),
                ident: ident(&o.name),
                kind: PropertyKind::Extension,
                ty: Some(ty::parse(ty)?),
                optional: false,
                target: None,
                value_type: None,
                read_only: o.read_only,
                getter: None,
                setter: None,
            });
        }

        Ok((properties, inherited))
    }

    fn resolve_property(
        &self,
        config: &DtoTypeConfig,
        descriptor: &PropertyDescriptor,
    ) -> Result<DtoProperty, Error> {
        let declared = ty::parse(&descriptor.ty)?;
        let (optional, inner) = match ty::option_elem(&declared) {
            Some(inner) => (true, inner),
            None => (false, &declared),
        };

        let mut facts = PropertyFacts::default();
        let mut target = None;
        let mut value_type = None;

        for o in &config.overrides {
            if o.name == descriptor.name {
                facts.chained_id = o.chained_id;
            }
        }

        if let Some(elem) = ty::vec_elem(inner) {
            if let Some((list_target, of_entities)) = self.collection_target(config, elem) {
                facts.list_of_entities = of_entities;
                facts.list_of_dtos = !of_entities;
                target = Some(list_target);
            }
        } else if let Some(elem) = ty::set_elem(inner) {
            let elem = ty::identity_elem(elem).unwrap_or(elem);
            if let Some((set_target, of_entities)) = self.collection_target(config, elem) {
                facts.set_of_entities = of_entities;
                facts.set_of_dtos = !of_entities;
                target = Some(set_target);
            }
        } else {
            let core = ty::shared_elem(inner).unwrap_or(inner);
            if let Some(name) = ty::leaf_name(core) {
                if let Some(vt) = self
                    .value_types
                    .iter()
                    .position(|v| v.domain_name == name)
                {
                    facts.value_type = true;
                    value_type = Some(vt);
                } else if let Some(&enum_target) = self.enum_for.get(&name) {
                    facts.is_enum = true;
                    target = Some(enum_target);
                } else if let Some(&entity_target) = self.entity_for.get(&name) {
                    facts.entity = true;
                    target = Some(entity_target);
                } else if let Some(param) =
                    config.type_params.iter().find(|p| p.param == name)
                {
                    facts.generic_param = true;
                    target = Some(*self.by_dto_name.get(&param.bound).ok_or_else(|| {
                        Error::UnresolvedBound {
                            dto: config.dto.clone(),
                            param: param.param.clone(),
                            bound: param.bound.clone(),
                        }
                    })?);
                }
            }
        }

        let kind = classify(facts);

        let ty = match kind {
            PropertyKind::Plain | PropertyKind::ListOfDtos | PropertyKind::SetOfDtos => {
                Some(declared.clone())
            }
            PropertyKind::ValueType => {
                value_type.map(|vt| self.value_types[vt].dto_ty.clone())
            }
            PropertyKind::ChainedId => Some(self.id_type_of(target)?),
            _ => None,
        };

        Ok(DtoProperty {
            name: descriptor.name.clone(),
            ident: ident(&descriptor.name),
            kind,
            ty,
            optional,
            target,
            value_type,
            read_only: config
                .overrides
                .iter()
                .any(|o| o.name == descriptor.name && o.read_only),
            getter: descriptor.getter.as_deref().map(ident),
            setter: descriptor.setter.as_deref().map(ident),
        })
    }

    /// Classifies a collection element: a mapped domain type, a DTO-typed
    /// element carried as-is, or neither.
    fn collection_target(
        &self,
        config: &DtoTypeConfig,
        elem: &syn::Type,
    ) -> Option<(usize, bool)> {
        let core = ty::shared_elem(elem).unwrap_or(elem);
        let name = ty::leaf_name(core)?;

        if let Some(&entity) = self.entity_for.get(&name) {
            return Some((entity, true));
        }
        if let Some(param) = config.type_params.iter().find(|p| p.param == name) {
            if let Some(&bound) = self.by_dto_name.get(&param.bound) {
                return Some((bound, true));
            }
        }
        if let Some(&dto) = self.by_dto_name.get(&name) {
            return Some((dto, false));
        }

        None
    }

    /// The id type of the chained target, unwrapped from its `Option`.
    fn id_type_of(&self, target: Option<usize>) -> Result<syn::Type, Error> {
        let id = target
            .and_then(|t| {
                let domain = simple_name(&self.config.dtos[t].domain);
                self.oracle.properties(&domain)
            })
            .and_then(|props| props.into_iter().find(|p| p.name == "id"));

        match id {
            Some(id) => {
                let declared = ty::parse(&id.ty)?;
                Ok(ty::option_elem(&declared).unwrap_or(&declared).clone())
            }
            None => Ok(syn::parse_quote!(i64)),
        }
    }
}

fn simple_name(path: &str) -> String {
    path.rsplit("::").next().unwrap_or(path).to_string()
}

fn parse_path(source: &str) -> Result<syn::Path, Error> {
    syn::parse_str(source).map_err(|_| Error::InvalidType {
        ty: source.to_string(),
    })
}

fn ident(name: &str) -> syn::Ident {
    syn::Ident::new(name, Span::call_site())
}
