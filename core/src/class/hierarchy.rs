use std::sync::Arc;

use tracing::debug;

use crate::class::{ClassDef, ClassDescriptor, ClassId, ClassTable, DispatchTable, Method, Signature};
use crate::error::{EngineError, Result};

/// Sealed class table plus one dispatch table per class.
///
/// Immutable once built; share it by reference or `Arc` across threads.
#[derive(Debug)]
pub struct Hierarchy {
    classes: ClassTable,
    tables: Vec<DispatchTable>,
}

impl Hierarchy {
    /// Define every class in order and seal the result.
    ///
    /// The first failing definition aborts the whole load.
    pub fn build<I>(defs: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClassDef>,
    {
        let mut classes = ClassTable::new();
        for def in defs {
            classes.define(def)?;
        }
        Ok(Self::seal(classes))
    }

    /// Build dispatch tables for a fully defined class table.
    pub fn seal(classes: ClassTable) -> Self {
        let mut tables: Vec<DispatchTable> = Vec::with_capacity(classes.len());
        // definition order is parent-first, so the parent's table already exists
        for class in classes.iter() {
            let table = DispatchTable::build(class, class.parent().map(|p| &tables[p.index()]));
            tables.push(table);
        }
        debug!(
            classes = classes.len(),
            entries = tables.iter().map(DispatchTable::len).sum::<usize>(),
            "sealed hierarchy"
        );
        Self { classes, tables }
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Result<&ClassDescriptor> {
        self.classes.lookup(name)
    }

    /// # Panics
    /// If `id` belongs to another hierarchy.
    pub fn class_by_id(&self, id: ClassId) -> &ClassDescriptor {
        self.classes.class_by_id(id)
    }

    /// # Panics
    /// If `id` belongs to another hierarchy.
    pub fn dispatch_table(&self, id: ClassId) -> &DispatchTable {
        &self.tables[self.classes.class_by_id(id).id().index()]
    }

    /// Checked form of [`dispatch_table`](Self::dispatch_table).
    pub fn table_of(&self, id: ClassId) -> Result<&DispatchTable> {
        self.classes.get(id).map(|class| &self.tables[class.id().index()])
    }

    /// Implementation that runs for `signature` on an instance of exactly `id`.
    pub fn resolve(&self, id: ClassId, signature: &Signature) -> Result<&Arc<Method>> {
        self.table_of(id)?
            .lookup(signature)
            .ok_or_else(|| EngineError::NoSuchMethod {
                class: self.class_by_id(id).name().clone(),
                signature: signature.clone(),
            })
    }
}
