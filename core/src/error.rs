use std::sync::Arc;

use crate::class::Signature;
use crate::val::InstanceId;

/// Errors raised while building a hierarchy or while running against one.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("class '{class}' is already defined")]
    DuplicateClass { class: Arc<str> },
    #[error("class '{class}' extends unknown class '{parent}'")]
    UnknownParent { class: Arc<str>, parent: Arc<str> },
    #[error("class '{class}' would become its own ancestor")]
    CyclicHierarchy { class: Arc<str> },
    #[error("class '{class}' declares '{member}' more than once")]
    DuplicateMember { class: Arc<str>, member: String },

    #[error("unknown class '{class}'")]
    UnknownClass { class: Arc<str> },
    #[error("class '{class}' has no field '{field}'")]
    UnknownField { class: Arc<str>, field: Arc<str> },
    #[error("class '{class}' has no method '{signature}'")]
    NoSuchMethod { class: Arc<str>, signature: Signature },
    #[error("'{static_type}' is not '{class}' or one of its ancestors")]
    IncompatibleStaticType { class: Arc<str>, static_type: Arc<str> },
    #[error("instance {id} does not exist")]
    UnknownInstance { id: InstanceId },
    #[error("expected an object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("argument {index} is out of range in '{signature}'")]
    ArgumentOutOfRange { index: usize, signature: Signature },
    #[error("call depth limit of {depth} exceeded")]
    CallDepthExceeded { depth: usize },
    #[error("native method '{class}.{signature}' failed: {source}")]
    Native {
        class: Arc<str>,
        signature: Signature,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl EngineError {
    /// Whether the error aborts a hierarchy load rather than a single call.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            EngineError::DuplicateClass { .. }
                | EngineError::UnknownParent { .. }
                | EngineError::CyclicHierarchy { .. }
                | EngineError::DuplicateMember { .. }
        )
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
