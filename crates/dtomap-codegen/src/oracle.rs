use indexmap::IndexMap;

/// One property of a domain type, as seen by the oracle.
///
/// `ty` is the declared Rust type as source text, e.g. `Option<String>` or
/// `Option<std::rc::Rc<std::cell::RefCell<Employer>>>`. A property with no
/// getter is write-only; one with no setter is read-only from the mapper's
/// point of view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub ty: String,
    pub getter: Option<String>,
    pub setter: Option<String>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> PropertyDescriptor {
        let name = name.into();
        PropertyDescriptor {
            getter: Some(name.clone()),
            setter: Some(format!("set_{name}")),
            name,
            ty: ty.into(),
        }
    }

    pub fn read_only(name: impl Into<String>, ty: impl Into<String>) -> PropertyDescriptor {
        let name = name.into();
        PropertyDescriptor {
            getter: Some(name.clone()),
            setter: None,
            name,
            ty: ty.into(),
        }
    }
}

/// Answers questions about the domain model.
///
/// The generator never inspects domain source itself; everything it knows
/// about a domain type flows through this trait. Type names are matched on
/// their simple (unqualified) form.
pub trait TypeOracle {
    /// Properties of a domain type, in declaration order, including
    /// inherited ones. `None` when the type is unknown.
    fn properties(&self, ty: &str) -> Option<Vec<PropertyDescriptor>>;

    /// Whether the type is a fieldless enum.
    fn is_enum(&self, ty: &str) -> bool;

    /// Variant names of a fieldless enum, in declaration order.
    fn enum_values(&self, ty: &str) -> Vec<String>;

    /// Whether the type cannot be instantiated directly and is only ever
    /// seen through its subclasses.
    fn is_abstract(&self, ty: &str) -> bool;
}

/// An in-memory oracle, used by tests and by callers that describe their
/// domain model by hand rather than deriving it from source.
#[derive(Default)]
pub struct StubOracle {
    properties: IndexMap<String, Vec<PropertyDescriptor>>,
    enums: IndexMap<String, Vec<String>>,
    abstracts: Vec<String>,
}

impl StubOracle {
    pub fn new() -> StubOracle {
        StubOracle::default()
    }

    pub fn add_property(&mut self, ty: &str, property: PropertyDescriptor) {
        self.properties.entry(ty.to_string()).or_default().push(property);
    }

    pub fn add_enum(&mut self, ty: &str, values: &[&str]) {
        self.enums
            .insert(ty.to_string(), values.iter().map(|v| v.to_string()).collect());
    }

    pub fn set_abstract(&mut self, ty: &str) {
        self.abstracts.push(ty.to_string());
    }
}

impl TypeOracle for StubOracle {
    fn properties(&self, ty: &str) -> Option<Vec<PropertyDescriptor>> {
        if self.enums.contains_key(ty) {
            return Some(vec![]);
        }

        self.properties.get(ty).cloned()
    }

    fn is_enum(&self, ty: &str) -> bool {
        self.enums.contains_key(ty)
    }

    fn enum_values(&self, ty: &str) -> Vec<String> {
        self.enums.get(ty).cloned().unwrap_or_default()
    }

    fn is_abstract(&self, ty: &str) -> bool {
        self.abstracts.iter().any(|t| t == ty)
    }
}
