use crate::class::{ClassDescriptor, Expr, Method, Signature};
use crate::dispatch::Dispatcher;
use crate::error::{EngineError, Result};
use crate::val::{Domain, InstanceId, Value};

/// Activation of one resolved method.
///
/// Native bodies receive it to reach their receiver, allocate instances and
/// make further calls; expression bodies are evaluated against it.
pub struct CallFrame<'a> {
    dispatcher: &'a Dispatcher<'a>,
    receiver: InstanceId,
    method: &'a Method,
    depth: usize,
}

impl<'a> CallFrame<'a> {
    pub(crate) fn new(
        dispatcher: &'a Dispatcher<'a>,
        receiver: InstanceId,
        method: &'a Method,
        depth: usize,
    ) -> Self {
        Self {
            dispatcher,
            receiver,
            method,
            depth,
        }
    }

    pub fn receiver(&self) -> InstanceId {
        self.receiver
    }

    pub fn signature(&self) -> &Signature {
        self.method.signature()
    }

    /// Class that declared the running method, not necessarily the receiver's class.
    pub fn declaring_class(&self) -> &'a ClassDescriptor {
        self.dispatcher.hierarchy().class_by_id(self.method.owner())
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn domain(&self) -> Result<Domain> {
        self.dispatcher.store().domain_of(self.receiver)
    }

    pub fn read(&self, target: InstanceId, field: &str) -> Result<Value> {
        self.dispatcher.read(target, field)
    }

    pub fn write(&self, target: InstanceId, field: &str, value: Value) -> Result<()> {
        self.dispatcher.write(target, field, value)
    }

    /// Allocate an instance; `None` puts it in the receiver's domain.
    pub fn allocate(&self, class: &str, domain: Option<Domain>) -> Result<InstanceId> {
        let domain = match domain {
            Some(domain) => domain,
            None => self.domain()?,
        };
        self.dispatcher.allocate(class, domain)
    }

    /// Virtual call on `target`, one frame deeper.
    pub fn invoke(&self, target: InstanceId, method: &str, args: &[Value]) -> Result<Value> {
        let signature = Signature::new(method, args.len());
        self.dispatcher.dispatch(target, &signature, args, self.depth + 1)
    }

    /// Call the implementation the declaring class inherits, bypassing its own override.
    pub fn invoke_super(&self, method: &str, args: &[Value]) -> Result<Value> {
        let hierarchy = self.dispatcher.hierarchy();
        let signature = Signature::new(method, args.len());
        let declaring = self.declaring_class();
        let Some(parent) = declaring.parent() else {
            return Err(EngineError::NoSuchMethod {
                class: declaring.name().clone(),
                signature,
            });
        };
        let resolved = hierarchy.resolve(parent, &signature)?;
        let class = self.dispatcher.class_of(self.receiver)?;
        self.dispatcher.run(self.receiver, class, resolved, args, self.depth + 1)
    }

    pub(crate) fn eval(&mut self, expr: &Expr, args: &[Value]) -> Result<Value> {
        match expr {
            Expr::Lit(lit) => Ok(lit.into()),
            Expr::This => Ok(Value::Object(self.receiver)),
            Expr::Arg { index } => args.get(*index).cloned().ok_or_else(|| EngineError::ArgumentOutOfRange {
                index: *index,
                signature: self.signature().clone(),
            }),
            // not released when the frame ends, see `InstanceStore`
            Expr::New { class, domain } => self.allocate(class, *domain).map(Value::Object),
            Expr::Get { target, field } => {
                let target = self.eval_object(target, args)?;
                self.read(target, field)
            }
            Expr::Set { target, field, value } => {
                let target = self.eval_object(target, args)?;
                let value = self.eval(value, args)?;
                self.write(target, field, value.clone())?;
                Ok(value)
            }
            Expr::Invoke {
                target,
                method,
                args: call_args,
            } => {
                let target = self.eval_object(target, args)?;
                let values = self.eval_all(call_args, args)?;
                self.invoke(target, method, &values)
            }
            Expr::Super { method, args: call_args } => {
                let values = self.eval_all(call_args, args)?;
                self.invoke_super(method, &values)
            }
            Expr::Seq(exprs) => {
                let mut last = Value::Nil;
                for expr in exprs {
                    last = self.eval(expr, args)?;
                }
                Ok(last)
            }
        }
    }

    fn eval_object(&mut self, expr: &Expr, args: &[Value]) -> Result<InstanceId> {
        let value = self.eval(expr, args)?;
        value.as_object().ok_or(EngineError::NotAnObject {
            found: value.type_name(),
        })
    }

    fn eval_all(&mut self, exprs: &[Expr], args: &[Value]) -> Result<Vec<Value>> {
        exprs.iter().map(|expr| self.eval(expr, args)).collect()
    }
}

impl std::fmt::Debug for CallFrame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallFrame")
            .field("receiver", &self.receiver)
            .field("method", self.method.signature())
            .field("owner", &self.declaring_class().name())
            .field("depth", &self.depth)
            .finish()
    }
}
