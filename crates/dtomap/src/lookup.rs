use crate::MapError;

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

/// Resolves existing domain instances by identifier.
///
/// Consumed by generated reverse-conversion code in two places: chained-id
/// properties (the DTO carries only the related object's identifier) and
/// identifier-bearing top-level `resolve` methods. Implementations are
/// expected to be synchronous and fast; `domain` is the `TypeId` of the
/// domain type itself, not of its `RefCell` wrapper.
pub trait DomainObjectLookup {
    fn lookup(&self, domain: TypeId, id: &dyn Any) -> Result<Rc<dyn Any>, MapError>;
}

/// Typed front end to [`DomainObjectLookup`] used by generated code.
pub fn lookup_as<D: Any>(
    lookup: &dyn DomainObjectLookup,
    id: &dyn Any,
) -> Result<Rc<RefCell<D>>, MapError> {
    let found = lookup.lookup(TypeId::of::<D>(), id)?;

    found
        .downcast::<RefCell<D>>()
        .map_err(|_| MapError::TypeMismatch { ty: std::any::type_name::<D>() })
}
