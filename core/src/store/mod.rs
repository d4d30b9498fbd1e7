//! Instance allocation and field storage.
//!
//! Every instance gets its own copy of the exact class's flattened layout.
//! Shadowed fields keep separate slots, so an ancestor's view of an instance
//! still sees its own value.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::trace;

use crate::class::{ClassDescriptor, ClassId, ClassTable};
use crate::error::{EngineError, Result};
use crate::val::{Domain, InstanceId, Value};


/// Runtime object: exact class, domain tag and one value per layout slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: ClassId,
    domain: Domain,
    slots: Vec<Value>,
}

impl Instance {
    pub fn new(class: &ClassDescriptor, domain: Domain) -> Self {
        Self {
            class: class.id(),
            domain,
            slots: class.slots().iter().map(|slot| Value::from(&slot.default)).collect(),
        }
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn slots(&self) -> &[Value] {
        &self.slots
    }

    /// Read through the view of `class`, which must be the exact class or an ancestor.
    pub fn read(&self, class: &ClassDescriptor, field: &str) -> Result<Value> {
        let slot = self.slot_of(class, field)?;
        Ok(self.slots[slot].clone())
    }

    pub fn write(&mut self, class: &ClassDescriptor, field: &str, value: Value) -> Result<()> {
        let slot = self.slot_of(class, field)?;
        self.slots[slot] = value;
        Ok(())
    }

    fn slot_of(&self, class: &ClassDescriptor, field: &str) -> Result<usize> {
        if class.id().table() != self.class.table() {
            return Err(EngineError::UnknownClass {
                class: class.name().clone(),
            });
        }
        class
            .field_slot(field)
            .filter(|slot| *slot < self.slots.len())
            .ok_or_else(|| EngineError::UnknownField {
                class: class.name().clone(),
                field: Arc::from(field),
            })
    }
}

/// Owner of all live instances.
///
/// Allocation is safe from many threads at once. Each instance is meant to be
/// driven by whoever holds its id; concurrent writes to one instance are not
/// ordered.
///
/// There is no reachability tracking. An instance lives until someone calls
/// [`release`](Self::release) with its id, so an instance that a method body
/// allocates and neither returns nor stores in a field stays here for the
/// lifetime of the store. Hosts running such bodies in a loop should use a
/// store per unit of work and drop it afterwards.
///
/// A store may hold instances of several hierarchies at once; reads and writes
/// through a [`ClassTable`] that did not define the instance's class fail with
/// `UnknownClass`.
#[derive(Debug)]
pub struct InstanceStore {
    instances: DashMap<InstanceId, Instance>,
    next_id: AtomicU64,
}

impl Default for InstanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceStore {
    pub fn new() -> Self {
        Self {
            instances: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn allocate(&self, class: &ClassDescriptor, domain: Domain) -> InstanceId {
        let id = InstanceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.instances.insert(id, Instance::new(class, domain));
        trace!(instance = %id, class = %class.name(), %domain, "allocated");
        id
    }

    pub fn allocate_named(&self, classes: &ClassTable, class: &str, domain: Domain) -> Result<InstanceId> {
        Ok(self.allocate(classes.lookup(class)?, domain))
    }

    pub fn class_of(&self, id: InstanceId) -> Result<ClassId> {
        self.with(id, |instance| instance.class)
    }

    pub fn domain_of(&self, id: InstanceId) -> Result<Domain> {
        self.with(id, |instance| instance.domain)
    }

    /// Read a field, nearest declaration from the exact class wins.
    pub fn read(&self, classes: &ClassTable, id: InstanceId, field: &str) -> Result<Value> {
        let instance = self.get(id)?;
        instance.read(classes.get(instance.class)?, field)
    }

    pub fn write(&self, classes: &ClassTable, id: InstanceId, field: &str, value: Value) -> Result<()> {
        let mut instance = self
            .instances
            .get_mut(&id)
            .ok_or(EngineError::UnknownInstance { id })?;
        let class = classes.get(instance.class)?;
        instance.write(class, field, value)
    }

    /// Read the slot `declaring` sees, reaching fields shadowed further down.
    pub fn read_declared(
        &self,
        classes: &ClassTable,
        id: InstanceId,
        declaring: &str,
        field: &str,
    ) -> Result<Value> {
        let view = classes.lookup(declaring)?;
        let instance = self.get(id)?;
        let exact = classes.get(instance.class)?;
        if !classes.is_subclass_of(exact.id(), view.id()) {
            return Err(EngineError::IncompatibleStaticType {
                class: exact.name().clone(),
                static_type: view.name().clone(),
            });
        }
        instance.read(view, field)
    }

    /// Remove an instance; its id is dead afterwards.
    pub fn release(&self, id: InstanceId) -> Result<Instance> {
        let (_, instance) = self
            .instances
            .remove(&id)
            .ok_or(EngineError::UnknownInstance { id })?;
        trace!(instance = %id, "released");
        Ok(instance)
    }

    /// Snapshot of an instance.
    pub fn snapshot(&self, id: InstanceId) -> Result<Instance> {
        self.with(id, Instance::clone)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn get(&self, id: InstanceId) -> Result<dashmap::mapref::one::Ref<'_, InstanceId, Instance>> {
        self.instances.get(&id).ok_or(EngineError::UnknownInstance { id })
    }

    fn with<T>(&self, id: InstanceId, f: impl FnOnce(&Instance) -> T) -> Result<T> {
        self.get(id).map(|instance| f(&instance))
    }
}
