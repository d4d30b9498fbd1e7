use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::debug;

use crate::class::{ClassDef, ClassDescriptor, ClassId, FieldSlot, Method};
use crate::error::{EngineError, Result};
use crate::util::{FastHashMap, fast_hash_map_new};

static NEXT_TABLE: AtomicU32 = AtomicU32::new(1);

/// Registry of class descriptors, filled strictly parent-first.
#[derive(Debug)]
pub struct ClassTable {
    tag: u32,
    classes: Vec<ClassDescriptor>,
    by_name: FastHashMap<Arc<str>, ClassId>,
}

/// Walks a class and its ancestors, nearest first.
pub struct Ancestors<'a> {
    table: &'a ClassTable,
    next: Option<ClassId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ClassDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let class = self.table.class_by_id(self.next?);
        self.next = class.parent;
        Some(class)
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassTable {
    pub fn new() -> Self {
        Self {
            tag: NEXT_TABLE.fetch_add(1, Ordering::Relaxed),
            classes: Vec::new(),
            by_name: fast_hash_map_new(),
        }
    }

    /// Define a class whose parent (if any) is already present.
    pub fn define(&mut self, def: ClassDef) -> Result<ClassId> {
        let ClassDef {
            name,
            parent,
            fields,
            methods,
        } = def;

        if parent.as_deref() == Some(&*name) {
            return Err(EngineError::CyclicHierarchy { class: name });
        }
        if self.by_name.contains_key(&name) {
            return Err(EngineError::DuplicateClass { class: name });
        }
        let parent = match parent {
            Some(parent_name) => match self.by_name.get(&parent_name) {
                Some(id) => Some(*id),
                None => {
                    return Err(EngineError::UnknownParent {
                        class: name,
                        parent: parent_name,
                    });
                }
            },
            None => None,
        };
        if let Some(parent_id) = parent {
            if self.ancestors(parent_id).any(|a| a.name == name) {
                return Err(EngineError::CyclicHierarchy { class: name });
            }
        }

        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(EngineError::DuplicateMember {
                    class: name,
                    member: field.name.to_string(),
                });
            }
        }
        for (i, method) in methods.iter().enumerate() {
            if methods[..i].iter().any(|m| m.name == method.name && m.arity == method.arity) {
                return Err(EngineError::DuplicateMember {
                    class: name,
                    member: method.signature().to_string(),
                });
            }
        }

        let id = ClassId {
            table: self.tag,
            index: self.classes.len() as u32,
        };
        let (mut slots, mut field_index, depth) = match parent {
            Some(parent_id) => {
                let p = self.class_by_id(parent_id);
                (p.slots.clone(), p.field_index.clone(), p.depth + 1)
            }
            None => (Vec::new(), fast_hash_map_new(), 0),
        };
        for field in &fields {
            field_index.insert(field.name.clone(), slots.len());
            slots.push(FieldSlot {
                name: field.name.clone(),
                declared_by: id,
                default: field.default.clone(),
            });
        }
        let methods: Vec<Arc<Method>> = methods.into_iter().map(|m| Arc::new(Method::new(id, m))).collect();

        debug!(
            class = %name,
            parent = ?parent.map(|p| self.class_by_id(p).name.clone()),
            fields = fields.len(),
            slots = slots.len(),
            methods = methods.len(),
            "defined class"
        );

        self.by_name.insert(name.clone(), id);
        self.classes.push(ClassDescriptor {
            id,
            name,
            parent,
            depth,
            fields,
            methods,
            slots,
            field_index,
        });
        Ok(id)
    }

    pub fn id_of(&self, name: &str) -> Result<ClassId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::UnknownClass { class: Arc::from(name) })
    }

    pub fn lookup(&self, name: &str) -> Result<&ClassDescriptor> {
        self.id_of(name).map(|id| self.class_by_id(id))
    }

    /// Whether `id` was minted by this table.
    pub fn owns(&self, id: ClassId) -> bool {
        id.table == self.tag && id.index() < self.classes.len()
    }

    /// Checked lookup; ids from another table are `UnknownClass`.
    pub fn get(&self, id: ClassId) -> Result<&ClassDescriptor> {
        if self.owns(id) {
            Ok(&self.classes[id.index()])
        } else {
            Err(EngineError::UnknownClass {
                class: Arc::from(id.to_string()),
            })
        }
    }

    /// # Panics
    /// If `id` was not minted by this table; use [`get`](Self::get) for ids from outside.
    pub fn class_by_id(&self, id: ClassId) -> &ClassDescriptor {
        assert!(id.table == self.tag, "{} does not belong to table {}", id, self.tag);
        &self.classes[id.index()]
    }

    pub fn ancestors(&self, id: ClassId) -> Ancestors<'_> {
        Ancestors {
            table: self,
            next: Some(id),
        }
    }

    /// True when `ancestor` is `id` itself or one of its ancestors.
    pub fn is_subclass_of(&self, id: ClassId, ancestor: ClassId) -> bool {
        let target_depth = self.class_by_id(ancestor).depth;
        let depth = self.class_by_id(id).depth;
        depth >= target_depth && self.ancestors(id).nth(depth - target_depth).map(|c| c.id) == Some(ancestor)
    }

    /// Classes in definition order, which is also a valid topological order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
