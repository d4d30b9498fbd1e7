use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::class::{Expr, MethodBody, NativeFn};
use crate::util::FastHashMap;
use crate::val::Literal;

/// Method key: name plus arity. Argument types never take part in resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    name: Arc<str>,
    arity: usize,
}

impl Signature {
    pub fn new(name: impl Into<Arc<str>>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Handle of a class: the tag of the table that defined it plus its index there.
///
/// Ids minted by one [`ClassTable`](crate::class::ClassTable) are never valid in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId {
    pub(crate) table: u32,
    pub(crate) index: u32,
}

impl ClassId {
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn table(self) -> u32 {
        self.table
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class #{} of table {}", self.index, self.table)
    }
}

/// Field declaration with its per-instance default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: Arc<str>,
    #[serde(default)]
    pub default: Literal,
}

impl FieldDef {
    pub fn new(name: impl Into<Arc<str>>, default: impl Into<Literal>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
        }
    }
}

/// Method declaration as supplied by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: Arc<str>,
    #[serde(default)]
    pub arity: usize,
    pub body: MethodBody,
}

impl MethodDef {
    pub fn expr(name: impl Into<Arc<str>>, arity: usize, body: Expr) -> Self {
        Self {
            name: name.into(),
            arity,
            body: MethodBody::Expr(body),
        }
    }

    pub fn native(name: impl Into<Arc<str>>, arity: usize, body: NativeFn) -> Self {
        Self {
            name: name.into(),
            arity,
            body: MethodBody::Native(body),
        }
    }

    pub fn signature(&self) -> Signature {
        Signature::new(self.name.clone(), self.arity)
    }
}

/// One entry of a hierarchy description. Parents must be defined before children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: Arc<str>,
    #[serde(default)]
    pub parent: Option<Arc<str>>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: impl Into<Arc<str>>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn field(mut self, name: impl Into<Arc<str>>, default: impl Into<Literal>) -> Self {
        self.fields.push(FieldDef::new(name, default));
        self
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }
}

/// Implementation owned by the class that declared it.
#[derive(Debug)]
pub struct Method {
    owner: ClassId,
    signature: Signature,
    body: MethodBody,
}

impl Method {
    pub(crate) fn new(owner: ClassId, def: MethodDef) -> Self {
        Self {
            owner,
            signature: def.signature(),
            body: def.body,
        }
    }

    pub fn owner(&self) -> ClassId {
        self.owner
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn body(&self) -> &MethodBody {
        &self.body
    }
}

/// A slot in the flattened instance layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub name: Arc<str>,
    pub declared_by: ClassId,
    pub default: Literal,
}

/// Immutable class metadata, including the flattened field layout.
///
/// Layouts are prefix-compatible: an ancestor's slots occupy the same indices
/// in every descendant, so an ancestor's field index is valid for its subclasses.
#[derive(Debug)]
pub struct ClassDescriptor {
    pub(crate) id: ClassId,
    pub(crate) name: Arc<str>,
    pub(crate) parent: Option<ClassId>,
    pub(crate) depth: usize,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) methods: Vec<Arc<Method>>,
    pub(crate) slots: Vec<FieldSlot>,
    // nearest declaration wins
    pub(crate) field_index: FastHashMap<Arc<str>, usize>,
}

impl ClassDescriptor {
    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    /// Number of ancestors; roots have depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Fields declared directly by this class, in declaration order.
    pub fn declared_fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Methods declared directly by this class, in declaration order.
    pub fn declared_methods(&self) -> &[Arc<Method>] {
        &self.methods
    }

    /// Full instance layout, root ancestor's fields first.
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    pub fn field_slot(&self, field: &str) -> Option<usize> {
        self.field_index.get(field).copied()
    }

    pub fn declares_method(&self, signature: &Signature) -> bool {
        self.methods.iter().any(|m| m.signature() == signature)
    }
}
