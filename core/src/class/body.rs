use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dispatch::CallFrame;
use crate::val::{Domain, Literal, Value};

/// Host-provided method implementation.
///
/// Errors coming back from nested engine calls keep their [`EngineError`](crate::EngineError)
/// kind; any other error is reported as `EngineError::Native`.
pub type NativeFn = fn(&mut CallFrame<'_>, &[Value]) -> anyhow::Result<Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodBody {
    Expr(Expr),
    /// Native bodies only exist in code; they are never (de)serialized
    #[serde(skip)]
    Native(NativeFn),
}

/// Data-only method body evaluated by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Lit(Literal),
    This,
    Arg {
        index: usize,
    },
    /// Allocate an instance; without a domain the receiver's domain is used
    New {
        class: Arc<str>,
        #[serde(default)]
        domain: Option<Domain>,
    },
    Get {
        target: Box<Expr>,
        field: Arc<str>,
    },
    /// Store into a field and yield the stored value
    Set {
        target: Box<Expr>,
        field: Arc<str>,
        value: Box<Expr>,
    },
    /// Virtual call on the target's exact class
    Invoke {
        target: Box<Expr>,
        method: Arc<str>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// Non-virtual call starting at the parent of the declaring class
    Super {
        method: Arc<str>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Seq(Vec<Expr>),
}

impl Expr {
    pub fn lit(value: impl Into<Literal>) -> Self {
        Expr::Lit(value.into())
    }

    pub fn arg(index: usize) -> Self {
        Expr::Arg { index }
    }

    pub fn alloc(class: impl Into<Arc<str>>, domain: Option<Domain>) -> Self {
        Expr::New {
            class: class.into(),
            domain,
        }
    }

    pub fn get(target: Expr, field: impl Into<Arc<str>>) -> Self {
        Expr::Get {
            target: Box::new(target),
            field: field.into(),
        }
    }

    pub fn set(target: Expr, field: impl Into<Arc<str>>, value: Expr) -> Self {
        Expr::Set {
            target: Box::new(target),
            field: field.into(),
            value: Box::new(value),
        }
    }

    pub fn invoke(target: Expr, method: impl Into<Arc<str>>, args: Vec<Expr>) -> Self {
        Expr::Invoke {
            target: Box::new(target),
            method: method.into(),
            args,
        }
    }

    pub fn call_super(method: impl Into<Arc<str>>, args: Vec<Expr>) -> Self {
        Expr::Super {
            method: method.into(),
            args,
        }
    }
}
