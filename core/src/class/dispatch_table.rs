use std::sync::Arc;

use crate::class::{ClassDescriptor, Method, Signature};
use crate::util::{FastHashMap, fast_hash_map_with_capacity};

/// Flattened signature -> implementation map for exactly one class.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    entries: FastHashMap<Signature, Arc<Method>>,
}

impl DispatchTable {
    /// Derive a class's table from its parent's already-built table.
    ///
    /// `parent` must be the table of `class.parent()`; roots pass `None`.
    pub fn build(class: &ClassDescriptor, parent: Option<&DispatchTable>) -> Self {
        let mut entries = match parent {
            Some(parent) => parent.entries.clone(),
            None => fast_hash_map_with_capacity(class.declared_methods().len()),
        };
        for method in class.declared_methods() {
            entries.insert(method.signature().clone(), Arc::clone(method));
        }
        Self { entries }
    }

    pub fn lookup(&self, signature: &Signature) -> Option<&Arc<Method>> {
        self.entries.get(signature)
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.entries.contains_key(signature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Signature, &Arc<Method>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
