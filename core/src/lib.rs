//! Virtual method resolution for single-inheritance class hierarchies.
//!
//! A host describes classes as [`ClassDef`]s, seals them into a [`Hierarchy`]
//! (class table plus one flattened dispatch table per class), allocates
//! instances in an [`InstanceStore`] and runs calls through a [`Dispatcher`].

pub mod class;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod store;
pub mod util;
pub mod val;

#[cfg(test)]
pub(crate) mod test_support;

pub use class::{
    ClassDef, ClassDescriptor, ClassId, ClassTable, DispatchTable, Expr, FieldDef, Hierarchy, MethodDef, Signature,
};
pub use config::EngineOptions;
pub use dispatch::{CallFrame, Dispatcher, Reference};
pub use error::{EngineError, Result};
pub use store::{Instance, InstanceStore};
pub use val::{Domain, InstanceId, Literal, Value};
