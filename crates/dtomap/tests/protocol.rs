//! Exercises the reverse-conversion protocol with mapper code written in
//! the exact shape `dtomap-codegen` emits: cycle breaking through the
//! identity context, chained-id resolution through the lookup, and the
//! allocate / register / populate ordering.

use dtomap::{lookup_as, DomainObjectLookup, IdentityContext, MapError};
use pretty_assertions::assert_eq;

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

// --- domain model -------------------------------------------------------

#[derive(Default)]
struct Employee {
    id: Option<i64>,
    name: Option<String>,
    employer: Option<Rc<RefCell<Employer>>>,
    mentor: Option<Rc<RefCell<Employee>>>,
}

impl Employee {
    fn id(&self) -> &Option<i64> {
        &self.id
    }

    fn name(&self) -> &Option<String> {
        &self.name
    }

    fn set_name(&mut self, value: Option<String>) {
        self.name = value;
    }

    fn employer(&self) -> &Option<Rc<RefCell<Employer>>> {
        &self.employer
    }

    fn set_employer(&mut self, value: Option<Rc<RefCell<Employer>>>) {
        self.employer = value;
    }

    fn mentor(&self) -> &Option<Rc<RefCell<Employee>>> {
        &self.mentor
    }

    fn set_mentor(&mut self, value: Option<Rc<RefCell<Employee>>>) {
        self.mentor = value;
    }
}

#[derive(Default)]
struct Employer {
    id: Option<i64>,
    name: Option<String>,
    employees: Option<Vec<Rc<RefCell<Employee>>>>,
}

impl Employer {
    fn id(&self) -> &Option<i64> {
        &self.id
    }

    fn name(&self) -> &Option<String> {
        &self.name
    }

    fn set_name(&mut self, value: Option<String>) {
        self.name = value;
    }

    fn employees(&self) -> &Option<Vec<Rc<RefCell<Employee>>>> {
        &self.employees
    }

    fn set_employees(&mut self, value: Option<Vec<Rc<RefCell<Employee>>>>) {
        self.employees = value;
    }
}

// --- DTOs, in the generated shape ---------------------------------------

struct EmployeeDto {
    id: Option<i64>,
    name: Option<String>,
    employer: Option<Rc<RefCell<EmployerDto>>>,
    mentor: Option<i64>,
}

impl EmployeeDto {
    fn new(
        id: Option<i64>,
        name: Option<String>,
        employer: Option<Rc<RefCell<EmployerDto>>>,
        mentor: Option<i64>,
    ) -> Self {
        Self { id, name, employer, mentor }
    }

    fn copy_of(o: &EmployeeDto) -> EmployeeDto {
        EmployeeDto::new(
            o.id.clone(),
            o.name.clone(),
            o.employer
                .as_ref()
                .map(|d| Rc::new(RefCell::new(EmployerDto::copy_of(&d.borrow())))),
            o.mentor.clone(),
        )
    }
}

struct EmployerDto {
    id: Option<i64>,
    name: Option<String>,
    employees: Option<Vec<Rc<RefCell<EmployeeDto>>>>,
}

impl EmployerDto {
    fn new(
        id: Option<i64>,
        name: Option<String>,
        employees: Option<Vec<Rc<RefCell<EmployeeDto>>>>,
    ) -> Self {
        Self { id, name, employees }
    }

    fn copy_of(o: &EmployerDto) -> EmployerDto {
        EmployerDto::new(
            o.id.clone(),
            o.name.clone(),
            o.employees.as_ref().map(|ds| {
                ds.iter()
                    .map(|d| Rc::new(RefCell::new(EmployeeDto::copy_of(&d.borrow()))))
                    .collect()
            }),
        )
    }
}

// --- mapper, in the generated shape -------------------------------------

struct Mapper {
    lookup: Rc<dyn DomainObjectLookup>,
}

impl Mapper {
    fn to_employee_dto(
        &self,
        o: Option<&Rc<RefCell<Employee>>>,
    ) -> Result<Option<Rc<RefCell<EmployeeDto>>>, MapError> {
        let Some(o) = o else { return Ok(None) };
        let o = o.borrow();
        Ok(Some(Rc::new(RefCell::new(EmployeeDto::new(
            o.id().clone(),
            o.name().clone(),
            self.to_employer_dto(o.employer().as_ref())?,
            o.mentor().as_ref().and_then(|v| v.borrow().id().clone()),
        )))))
    }

    fn to_employer_dto(
        &self,
        o: Option<&Rc<RefCell<Employer>>>,
    ) -> Result<Option<Rc<RefCell<EmployerDto>>>, MapError> {
        let Some(o) = o else { return Ok(None) };
        let o = o.borrow();
        Ok(Some(Rc::new(RefCell::new(EmployerDto::new(
            o.id().clone(),
            o.name().clone(),
            self.employees_for_employer_dto(o.employees().as_ref())?,
        )))))
    }

    fn employees_for_employer_dto(
        &self,
        os: Option<&Vec<Rc<RefCell<Employee>>>>,
    ) -> Result<Option<Vec<Rc<RefCell<EmployeeDto>>>>, MapError> {
        let Some(os) = os else { return Ok(None) };
        let mut dtos = Vec::new();
        for o in os {
            if let Some(dto) = self.to_employee_dto(Some(o))? {
                dtos.push(dto);
            }
        }
        Ok(Some(dtos))
    }

    fn from_employee_dto(
        &self,
        o: &Rc<RefCell<Employee>>,
        dto: &Rc<RefCell<EmployeeDto>>,
    ) -> Result<(), MapError> {
        let scope = IdentityContext::enter();
        scope.store(dto, o);
        let dto = dto.borrow();
        o.borrow_mut().set_name(dto.name.clone());
        let value = self.resolve_employer_dto(dto.employer.as_ref())?;
        o.borrow_mut().set_employer(value);
        let value = match dto.mentor.as_ref() {
            Some(id) => Some(lookup_as::<Employee>(&*self.lookup, id)?),
            None => None,
        };
        o.borrow_mut().set_mentor(value);
        Ok(())
    }

    fn resolve_employee_dto(
        &self,
        dto: Option<&Rc<RefCell<EmployeeDto>>>,
    ) -> Result<Option<Rc<RefCell<Employee>>>, MapError> {
        let scope = IdentityContext::enter();
        let Some(dto) = dto else { return Ok(None) };
        if let Some(o) = scope.get::<EmployeeDto, Employee>(dto) {
            return Ok(Some(o));
        }
        let o = if let Some(id) = dto.borrow().id.as_ref() {
            lookup_as::<Employee>(&*self.lookup, id)?
        } else {
            Rc::new(RefCell::new(Employee::default()))
        };
        scope.store(dto, &o);
        self.from_employee_dto(&o, dto)?;
        Ok(Some(o))
    }

    fn from_employer_dto(
        &self,
        o: &Rc<RefCell<Employer>>,
        dto: &Rc<RefCell<EmployerDto>>,
    ) -> Result<(), MapError> {
        let scope = IdentityContext::enter();
        scope.store(dto, o);
        let dto = dto.borrow();
        o.borrow_mut().set_name(dto.name.clone());
        let value = self.employees_from_employer_dto(dto.employees.as_ref())?;
        o.borrow_mut().set_employees(value);
        Ok(())
    }

    fn resolve_employer_dto(
        &self,
        dto: Option<&Rc<RefCell<EmployerDto>>>,
    ) -> Result<Option<Rc<RefCell<Employer>>>, MapError> {
        let scope = IdentityContext::enter();
        let Some(dto) = dto else { return Ok(None) };
        if let Some(o) = scope.get::<EmployerDto, Employer>(dto) {
            return Ok(Some(o));
        }
        let o = if let Some(id) = dto.borrow().id.as_ref() {
            lookup_as::<Employer>(&*self.lookup, id)?
        } else {
            Rc::new(RefCell::new(Employer::default()))
        };
        scope.store(dto, &o);
        self.from_employer_dto(&o, dto)?;
        Ok(Some(o))
    }

    fn employees_from_employer_dto(
        &self,
        dtos: Option<&Vec<Rc<RefCell<EmployeeDto>>>>,
    ) -> Result<Option<Vec<Rc<RefCell<Employee>>>>, MapError> {
        let Some(dtos) = dtos else { return Ok(None) };
        let mut os = Vec::new();
        for dto in dtos {
            if let Some(o) = self.resolve_employee_dto(Some(dto))? {
                os.push(o);
            }
        }
        Ok(Some(os))
    }
}

// --- test fixtures ------------------------------------------------------

#[derive(Default)]
struct StubLookup {
    instances: RefCell<HashMap<(TypeId, i64), Rc<dyn Any>>>,
    calls: Cell<usize>,
}

impl StubLookup {
    fn add_employee(&self, id: i64, employee: &Rc<RefCell<Employee>>) {
        self.instances
            .borrow_mut()
            .insert((TypeId::of::<Employee>(), id), employee.clone() as Rc<dyn Any>);
    }
}

impl DomainObjectLookup for StubLookup {
    fn lookup(&self, domain: TypeId, id: &dyn Any) -> Result<Rc<dyn Any>, MapError> {
        self.calls.set(self.calls.get() + 1);
        let id = *id
            .downcast_ref::<i64>()
            .ok_or(MapError::TypeMismatch { ty: "i64" })?;
        self.instances
            .borrow()
            .get(&(domain, id))
            .cloned()
            .ok_or(MapError::NotFound { ty: "domain", id: id.to_string() })
    }
}

fn mapper_with(lookup: Rc<StubLookup>) -> Mapper {
    Mapper { lookup }
}

// --- tests --------------------------------------------------------------

#[test]
fn forward_conversion_copies_plain_properties() {
    let mapper = mapper_with(Rc::default());

    let ann = Rc::new(RefCell::new(Employee {
        id: Some(1),
        name: Some("Ann".to_string()),
        ..Employee::default()
    }));

    let dto = mapper.to_employee_dto(Some(&ann)).unwrap().unwrap();
    assert_eq!(dto.borrow().id, Some(1));
    assert_eq!(dto.borrow().name, Some("Ann".to_string()));
    assert!(dto.borrow().employer.is_none());

    assert!(mapper.to_employee_dto(None).unwrap().is_none());
}

#[test]
fn resolve_with_identifier_populates_the_existing_instance() {
    let lookup = Rc::new(StubLookup::default());
    let existing = Rc::new(RefCell::new(Employee {
        id: Some(1),
        name: Some("Bob".to_string()),
        ..Employee::default()
    }));
    lookup.add_employee(1, &existing);
    let mapper = mapper_with(lookup);

    let dto = Rc::new(RefCell::new(EmployeeDto::new(
        Some(1),
        Some("Ann".to_string()),
        None,
        None,
    )));

    let resolved = mapper.resolve_employee_dto(Some(&dto)).unwrap().unwrap();
    assert!(Rc::ptr_eq(&resolved, &existing));
    assert_eq!(existing.borrow().name, Some("Ann".to_string()));
}

#[test]
fn resolve_without_identifier_allocates_a_fresh_instance() {
    let mapper = mapper_with(Rc::default());

    let dto = Rc::new(RefCell::new(EmployeeDto::new(
        None,
        Some("Ann".to_string()),
        None,
        None,
    )));

    let resolved = mapper.resolve_employee_dto(Some(&dto)).unwrap().unwrap();
    assert_eq!(resolved.borrow().name, Some("Ann".to_string()));
    assert!(resolved.borrow().id.is_none());
}

#[test]
fn cyclic_graph_resolves_to_a_single_identity() {
    let mapper = mapper_with(Rc::default());

    // employee <-> employer cycle, no identifiers anywhere
    let employee_dto = Rc::new(RefCell::new(EmployeeDto::new(
        None,
        Some("Ann".to_string()),
        None,
        None,
    )));
    let employer_dto = Rc::new(RefCell::new(EmployerDto::new(
        None,
        Some("Bizo".to_string()),
        Some(vec![employee_dto.clone()]),
    )));
    employee_dto.borrow_mut().employer = Some(employer_dto.clone());

    let employee = mapper
        .resolve_employee_dto(Some(&employee_dto))
        .unwrap()
        .unwrap();

    let employer = employee.borrow().employer.clone().unwrap();
    assert_eq!(employer.borrow().name, Some("Bizo".to_string()));

    // the employer's employee list must close the cycle on the same instance
    let employees = employer.borrow().employees.clone().unwrap();
    assert_eq!(employees.len(), 1);
    assert!(Rc::ptr_eq(&employees[0], &employee));
}

#[test]
fn distinct_dtos_with_the_same_identifier_share_one_instance() {
    let lookup = Rc::new(StubLookup::default());
    let existing = Rc::new(RefCell::new(Employee {
        id: Some(1),
        ..Employee::default()
    }));
    lookup.add_employee(1, &existing);
    let mapper = mapper_with(lookup);

    // Two DTO instances carry the same identifier; the second misses the
    // identity map and comes back from the lookup while the first is
    // still being populated.
    let inner = Rc::new(RefCell::new(EmployeeDto::new(
        Some(1),
        Some("Ann".to_string()),
        None,
        None,
    )));
    let employer_dto = Rc::new(RefCell::new(EmployerDto::new(
        None,
        Some("Bizo".to_string()),
        Some(vec![inner]),
    )));
    let outer = Rc::new(RefCell::new(EmployeeDto::new(
        Some(1),
        Some("Ann".to_string()),
        Some(employer_dto),
        None,
    )));

    let resolved = mapper.resolve_employee_dto(Some(&outer)).unwrap().unwrap();
    assert!(Rc::ptr_eq(&resolved, &existing));
    assert_eq!(existing.borrow().name, Some("Ann".to_string()));

    let employer = existing.borrow().employer.clone().unwrap();
    let employees = employer.borrow().employees.clone().unwrap();
    assert!(Rc::ptr_eq(&employees[0], &existing));
}

#[test]
fn identity_frame_is_released_between_top_level_calls() {
    let mapper = mapper_with(Rc::default());

    let dto = Rc::new(RefCell::new(EmployeeDto::new(None, None, None, None)));

    let first = mapper.resolve_employee_dto(Some(&dto)).unwrap().unwrap();
    let second = mapper.resolve_employee_dto(Some(&dto)).unwrap().unwrap();

    // a fresh top-level call must not see the previous call's identity map
    assert!(!Rc::ptr_eq(&first, &second));
}

#[test]
fn chained_id_with_null_identifier_never_invokes_the_lookup() {
    let lookup = Rc::new(StubLookup::default());
    let mapper = mapper_with(lookup.clone());

    let dto = Rc::new(RefCell::new(EmployeeDto::new(
        None,
        Some("Ann".to_string()),
        None,
        None,
    )));

    let resolved = mapper.resolve_employee_dto(Some(&dto)).unwrap().unwrap();
    assert!(resolved.borrow().mentor.is_none());
    assert_eq!(lookup.calls.get(), 0);
}

#[test]
fn chained_id_resolves_through_the_lookup() {
    let lookup = Rc::new(StubLookup::default());
    let mentor = Rc::new(RefCell::new(Employee {
        id: Some(7),
        ..Employee::default()
    }));
    lookup.add_employee(7, &mentor);
    let mapper = mapper_with(lookup);

    let dto = Rc::new(RefCell::new(EmployeeDto::new(None, None, None, Some(7))));

    let resolved = mapper.resolve_employee_dto(Some(&dto)).unwrap().unwrap();
    let linked = resolved.borrow().mentor.clone().unwrap();
    assert!(Rc::ptr_eq(&linked, &mentor));
}

#[test]
fn resolve_surfaces_lookup_failure() {
    let mapper = mapper_with(Rc::default());

    let dto = Rc::new(RefCell::new(EmployeeDto::new(Some(99), None, None, None)));

    let err = mapper
        .resolve_employee_dto(Some(&dto))
        .err()
        .expect("lookup failure must propagate");
    match err {
        MapError::NotFound { id, .. } => assert_eq!(id, "99"),
        other => panic!("expected NotFound, got {other}"),
    }
}

#[test]
fn copy_of_is_reference_distinct_at_entity_boundaries() {
    let employee = EmployeeDto::new(
        Some(1),
        Some("Ann".to_string()),
        Some(Rc::new(RefCell::new(EmployerDto::new(
            Some(2),
            Some("Bizo".to_string()),
            None,
        )))),
        None,
    );

    let once = EmployeeDto::copy_of(&employee);
    let twice = EmployeeDto::copy_of(&once);

    assert_eq!(twice.id, employee.id);
    assert_eq!(twice.name, employee.name);

    let original = employee.employer.clone().unwrap();
    let copied = twice.employer.clone().unwrap();
    assert!(!Rc::ptr_eq(&original, &copied));
    assert_eq!(copied.borrow().name, Some("Bizo".to_string()));
}
