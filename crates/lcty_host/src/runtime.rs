//! The runtime handle and operator evaluation.
//!
//! Scripts never run here: the operator methods on [`Runtime`] are what an
//! evaluator would call for each operator expression. Each follows the same
//! order of attempts:
//!
//! 1. the native rule for primitive operands (with numeral-string coercion
//!    for arithmetic);
//! 2. the handler for the operator in the first operand's metatable, then in
//!    the second operand's;
//! 3. a runtime error naming the offending value kind.

use std::cell::RefCell;
use std::rc::Rc;

use crate::callable::{Args, CallResult, Callable};
use crate::error::{attempt, compare_error, stack_overflow, tostring_not_string, HostError};
use crate::metatable::{MetaEvent, Metatable};
use crate::number::{format_number, parse_numeral};
use crate::table::Table;
use crate::userdata::UserData;
use crate::value::DynValue;

/// Default bound on nested callable invocations.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// Binary arithmetic operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub fn event(self) -> MetaEvent {
        match self {
            ArithOp::Add => MetaEvent::Add,
            ArithOp::Sub => MetaEvent::Sub,
            ArithOp::Mul => MetaEvent::Mul,
            ArithOp::Div => MetaEvent::Div,
            ArithOp::Mod => MetaEvent::Mod,
        }
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
            // Floored modulo: the result takes the sign of the divisor.
            ArithOp::Mod => a - (a / b).floor() * b,
        }
    }
}

struct RuntimeState {
    max_call_depth: usize,
    /// Names of the callables currently executing, innermost last.
    call_stack: RefCell<Vec<Rc<str>>>,
}

/// Handle to one runtime instance.
///
/// Cloning yields another handle to the same instance.
#[derive(Clone)]
pub struct Runtime(Rc<RuntimeState>);

impl Default for Runtime {
    fn default() -> Self {
        RuntimeBuilder::new().build()
    }
}

/// Builder for [`Runtime`] instances.
#[derive(Clone, Debug)]
pub struct RuntimeBuilder {
    max_call_depth: usize,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        RuntimeBuilder::new()
    }
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        RuntimeBuilder {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Bound re-entrant callable invocation. Exceeding it raises a
    /// "stack overflow" error instead of exhausting the native stack.
    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn build(self) -> Runtime {
        Runtime(Rc::new(RuntimeState {
            max_call_depth: self.max_call_depth,
            call_stack: RefCell::new(Vec::new()),
        }))
    }
}

/// Pops the call frame pushed by [`Runtime::call`], even on early return.
struct FrameGuard<'rt> {
    runtime: &'rt Runtime,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.runtime.0.call_stack.borrow_mut().pop();
    }
}

impl Runtime {
    pub fn new() -> Self {
        Runtime::default()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn max_call_depth(&self) -> usize {
        self.0.max_call_depth
    }

    /// Number of callables currently executing.
    pub fn call_depth(&self) -> usize {
        self.0.call_stack.borrow().len()
    }

    pub fn ptr_eq(a: &Runtime, b: &Runtime) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    // Constructors

    pub fn new_table(&self) -> Table {
        Table::new()
    }

    pub fn new_userdata<T: std::any::Any>(
        &self,
        payload: T,
        metatable: Option<Rc<Metatable>>,
    ) -> DynValue {
        DynValue::UserData(UserData::new(payload, metatable))
    }

    pub fn new_function<F>(&self, name: &str, func: F) -> DynValue
    where
        F: Fn(&Runtime, &Args) -> CallResult + 'static,
    {
        DynValue::Function(Callable::new(name, func))
    }

    // Calls

    /// Call `func` with `args`.
    pub fn call(&self, func: &DynValue, args: Vec<DynValue>) -> CallResult {
        let DynValue::Function(callable) = func else {
            return Err(attempt("call", func.kind_name()));
        };
        let args = Args::new(callable, args);
        {
            let mut stack = self.0.call_stack.borrow_mut();
            if stack.len() >= self.0.max_call_depth {
                tracing::debug!(
                    function = callable.name(),
                    depth = stack.len(),
                    "call depth exceeded"
                );
                return Err(stack_overflow(self.0.max_call_depth));
            }
            stack.push(Rc::from(callable.name()));
        }
        let _frame = FrameGuard { runtime: self };
        callable.invoke(self, &args)
    }

    /// Call a handler and keep only its first result.
    fn call_handler(&self, handler: &Callable, args: Vec<DynValue>) -> Result<DynValue, HostError> {
        let results = self.call(&DynValue::Function(handler.clone()), args)?;
        Ok(results.into_iter().next().unwrap_or_default())
    }

    // Operators

    /// `a == b`. Values of different kinds are never equal; the `Eq` handler
    /// is consulted only when both operands are userdata.
    pub fn equals(&self, a: &DynValue, b: &DynValue) -> Result<bool, HostError> {
        if a.raw_equals(b) {
            return Ok(true);
        }
        let (DynValue::UserData(_), DynValue::UserData(_)) = (a, b) else {
            return Ok(false);
        };
        match binary_handler(a, b, MetaEvent::Eq) {
            Some(handler) => Ok(self
                .call_handler(&handler, vec![a.clone(), b.clone()])?
                .is_truthy()),
            None => Ok(false),
        }
    }

    /// `a <op> b` for the arithmetic operators.
    pub fn arith(&self, op: ArithOp, a: &DynValue, b: &DynValue) -> Result<DynValue, HostError> {
        if let (Some(x), Some(y)) = (to_number(a), to_number(b)) {
            return Ok(DynValue::Number(op.apply(x, y)));
        }
        if let Some(handler) = binary_handler(a, b, op.event()) {
            return self.call_handler(&handler, vec![a.clone(), b.clone()]);
        }
        let culprit = if to_number(a).is_none() { a } else { b };
        Err(attempt("perform arithmetic on", culprit.kind_name()))
    }

    /// `-a`. The `Unm` handler receives the operand twice.
    pub fn negate(&self, a: &DynValue) -> Result<DynValue, HostError> {
        if let Some(x) = to_number(a) {
            return Ok(DynValue::Number(-x));
        }
        if let Some(handler) = unary_handler(a, MetaEvent::Unm) {
            return self.call_handler(&handler, vec![a.clone(), a.clone()]);
        }
        Err(attempt("perform arithmetic on", a.kind_name()))
    }

    /// `a .. b`. Strings and numbers concatenate natively.
    pub fn concat(&self, a: &DynValue, b: &DynValue) -> Result<DynValue, HostError> {
        if let (Some(x), Some(y)) = (concat_operand(a), concat_operand(b)) {
            return Ok(DynValue::string(x + &y));
        }
        if let Some(handler) = binary_handler(a, b, MetaEvent::Concat) {
            return self.call_handler(&handler, vec![a.clone(), b.clone()]);
        }
        let culprit = if concat_operand(a).is_none() { a } else { b };
        Err(attempt("concatenate", culprit.kind_name()))
    }

    /// `#a`. String length is in bytes; table length is the array part.
    #[allow(
        clippy::cast_precision_loss,
        reason = "lengths stay far below 2^53"
    )]
    pub fn len(&self, a: &DynValue) -> Result<DynValue, HostError> {
        match a {
            DynValue::String(s) => return Ok(DynValue::Number(s.len() as f64)),
            DynValue::Table(t) => return Ok(DynValue::Number(t.array_len() as f64)),
            _ => {}
        }
        if let Some(handler) = unary_handler(a, MetaEvent::Len) {
            return self.call_handler(&handler, vec![a.clone()]);
        }
        Err(attempt("get length of", a.kind_name()))
    }

    /// `obj[key]`, also used for `obj.name`.
    pub fn index(&self, obj: &DynValue, key: &DynValue) -> Result<DynValue, HostError> {
        if let DynValue::Table(t) = obj {
            return Ok(t.get(key));
        }
        if let Some(handler) = unary_handler(obj, MetaEvent::Index) {
            return self.call_handler(&handler, vec![obj.clone(), key.clone()]);
        }
        Err(attempt("index", obj.kind_name()))
    }

    /// `a < b`.
    pub fn less_than(&self, a: &DynValue, b: &DynValue) -> Result<bool, HostError> {
        self.order(MetaEvent::Lt, a, b)
    }

    /// `a <= b`.
    pub fn less_equal(&self, a: &DynValue, b: &DynValue) -> Result<bool, HostError> {
        self.order(MetaEvent::Le, a, b)
    }

    /// `a > b`, evaluated as `b < a`.
    pub fn greater_than(&self, a: &DynValue, b: &DynValue) -> Result<bool, HostError> {
        self.order(MetaEvent::Lt, b, a)
    }

    /// `a >= b`, evaluated as `b <= a`.
    pub fn greater_equal(&self, a: &DynValue, b: &DynValue) -> Result<bool, HostError> {
        self.order(MetaEvent::Le, b, a)
    }

    fn order(&self, event: MetaEvent, a: &DynValue, b: &DynValue) -> Result<bool, HostError> {
        let strict = event == MetaEvent::Lt;
        match (a, b) {
            (DynValue::Number(x), DynValue::Number(y)) => {
                return Ok(if strict { x < y } else { x <= y });
            }
            (DynValue::String(x), DynValue::String(y)) => {
                return Ok(if strict { x < y } else { x <= y });
            }
            _ => {}
        }
        if let Some(handler) = binary_handler(a, b, event) {
            return Ok(self
                .call_handler(&handler, vec![a.clone(), b.clone()])?
                .is_truthy());
        }
        Err(compare_error(a.kind_name(), b.kind_name()))
    }

    /// Render `v` as `tostring` would, consulting a `ToString` handler.
    pub fn tostring(&self, v: &DynValue) -> Result<String, HostError> {
        if let Some(handler) = unary_handler(v, MetaEvent::ToString) {
            return match self.call_handler(&handler, vec![v.clone()])? {
                DynValue::String(s) => Ok(s.to_string()),
                _ => Err(tostring_not_string()),
            };
        }
        Ok(match v {
            DynValue::Nil => "nil".to_string(),
            DynValue::Bool(b) => b.to_string(),
            DynValue::Number(n) => format_number(*n),
            DynValue::String(s) => s.to_string(),
            DynValue::Table(t) => format!("table: {:#x}", t.addr()),
            DynValue::Function(f) => format!("function: {:#x}", f.addr()),
            DynValue::UserData(u) => format!("userdata: {:#x}", u.addr()),
        })
    }
}

/// Numeric value of an arithmetic operand, coercing numeral strings.
pub fn to_number(v: &DynValue) -> Option<f64> {
    match v {
        DynValue::Number(n) => Some(*n),
        DynValue::String(s) => parse_numeral(s),
        _ => None,
    }
}

fn concat_operand(v: &DynValue) -> Option<String> {
    match v {
        DynValue::String(s) => Some(s.to_string()),
        DynValue::Number(n) => Some(format_number(*n)),
        _ => None,
    }
}

fn unary_handler(v: &DynValue, event: MetaEvent) -> Option<Callable> {
    v.as_userdata()?.metatable()?.get(event).cloned()
}

fn binary_handler(a: &DynValue, b: &DynValue, event: MetaEvent) -> Option<Callable> {
    unary_handler(a, event).or_else(|| unary_handler(b, event))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
