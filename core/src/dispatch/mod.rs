//! Virtual dispatch over a sealed [`Hierarchy`].
//!
//! Resolution always goes through the receiver's exact class. The static type
//! carried by a [`Reference`] only decides whether a call is legal at all, and
//! the domain tag of the receiver never takes part in either step.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::class::{ClassId, Hierarchy, Method, MethodBody, Signature};
use crate::config::EngineOptions;
use crate::error::{EngineError, Result};
use crate::store::InstanceStore;
use crate::val::{Domain, InstanceId, Value};

mod frame;


pub use frame::CallFrame;

/// Handle used by calling code: an instance seen through a static type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference {
    target: InstanceId,
    static_type: ClassId,
}

impl Reference {
    pub fn target(&self) -> InstanceId {
        self.target
    }

    pub fn static_type(&self) -> ClassId {
        self.static_type
    }
}

pub struct Dispatcher<'h> {
    hierarchy: &'h Hierarchy,
    store: &'h InstanceStore,
    options: EngineOptions,
}

impl<'h> Dispatcher<'h> {
    pub fn new(hierarchy: &'h Hierarchy, store: &'h InstanceStore) -> Self {
        Self::with_options(hierarchy, store, EngineOptions::default())
    }

    pub fn with_options(
        hierarchy: &'h Hierarchy,
        store: &'h InstanceStore,
        options: EngineOptions,
    ) -> Self {
        Self {
            hierarchy,
            store,
            options,
        }
    }

    pub fn hierarchy(&self) -> &'h Hierarchy {
        self.hierarchy
    }

    pub fn store(&self) -> &'h InstanceStore {
        self.store
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn allocate(&self, class: &str, domain: Domain) -> Result<InstanceId> {
        self.store.allocate_named(self.hierarchy.classes(), class, domain)
    }

    /// Reference `target` through `static_type`, which must be its exact class or an ancestor.
    pub fn reference(&self, target: InstanceId, static_type: &str) -> Result<Reference> {
        let classes = self.hierarchy.classes();
        let static_id = classes.id_of(static_type)?;
        let exact = self.class_of(target)?;
        if !classes.is_subclass_of(exact, static_id) {
            return Err(EngineError::IncompatibleStaticType {
                class: classes.class_by_id(exact).name().clone(),
                static_type: classes.class_by_id(static_id).name().clone(),
            });
        }
        Ok(Reference {
            target,
            static_type: static_id,
        })
    }

    /// Reference `target` through its own exact class.
    pub fn exact_reference(&self, target: InstanceId) -> Result<Reference> {
        Ok(Reference {
            target,
            static_type: self.class_of(target)?,
        })
    }

    /// Exact class of `target`, which must have been allocated from this hierarchy.
    pub fn class_of(&self, target: InstanceId) -> Result<ClassId> {
        let class = self.store.class_of(target)?;
        self.hierarchy.classes().get(class).map(|class| class.id())
    }

    /// Invoke `signature` on the instance behind `reference`.
    pub fn invoke(&self, reference: &Reference, signature: &Signature, args: &[Value]) -> Result<Value> {
        if !self.hierarchy.table_of(reference.static_type)?.contains(signature) {
            return Err(EngineError::NoSuchMethod {
                class: self.hierarchy.class_by_id(reference.static_type).name().clone(),
                signature: signature.clone(),
            });
        }
        self.dispatch(reference.target, signature, args, 0)
    }

    /// Shorthand for [`invoke`](Self::invoke) with the arity taken from `args`.
    pub fn call(&self, reference: &Reference, method: &str, args: &[Value]) -> Result<Value> {
        self.invoke(reference, &Signature::new(method, args.len()), args)
    }

    pub fn read(&self, target: InstanceId, field: &str) -> Result<Value> {
        self.store.read(self.hierarchy.classes(), target, field)
    }

    pub fn write(&self, target: InstanceId, field: &str, value: Value) -> Result<()> {
        self.store.write(self.hierarchy.classes(), target, field, value)
    }

    pub(crate) fn dispatch(
        &self,
        receiver: InstanceId,
        signature: &Signature,
        args: &[Value],
        depth: usize,
    ) -> Result<Value> {
        let class = self.class_of(receiver)?;
        let method = self.hierarchy.resolve(class, signature)?;
        self.run(receiver, class, method, args, depth)
    }

    pub(crate) fn run(
        &self,
        receiver: InstanceId,
        class: ClassId,
        method: &'h Arc<Method>,
        args: &[Value],
        depth: usize,
    ) -> Result<Value> {
        if depth >= self.options.max_call_depth {
            return Err(EngineError::CallDepthExceeded {
                depth: self.options.max_call_depth,
            });
        }

        let class_name = self.hierarchy.class_by_id(class).name();
        let owner_name = self.hierarchy.class_by_id(method.owner()).name();
        let signature = method.signature();
        if self.options.trace_calls {
            debug!(%receiver, class = %class_name, method = %signature, owner = %owner_name, depth, "dispatch");
        } else {
            trace!(%receiver, class = %class_name, method = %signature, owner = %owner_name, depth, "dispatch");
        }

        let mut frame = CallFrame::new(self, receiver, method, depth);
        match method.body() {
            MethodBody::Expr(expr) => frame.eval(expr, args),
            MethodBody::Native(native) => native(&mut frame, args).map_err(|err| match err.downcast::<EngineError>() {
                Ok(engine) => engine,
                Err(other) => EngineError::Native {
                    class: owner_name.clone(),
                    signature: method.signature().clone(),
                    source: other.into(),
                },
            }),
        }
    }
}
