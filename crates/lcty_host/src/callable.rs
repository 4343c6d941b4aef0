//! Native callables and argument marshaling.

use std::fmt;
use std::rc::Rc;

use crate::error::{bad_argument, HostError};
use crate::runtime::Runtime;
use crate::value::DynValue;

/// Result of invoking a callable: its return values.
pub type CallResult = Result<Vec<DynValue>, HostError>;

type NativeFn = dyn Fn(&Runtime, &Args) -> CallResult;

struct CallableInner {
    name: Rc<str>,
    func: Box<NativeFn>,
}

/// A host function implemented natively.
///
/// Returning `Err` raises a runtime error in the calling script.
#[derive(Clone)]
pub struct Callable(Rc<CallableInner>);

impl Callable {
    pub fn new<F>(name: impl Into<Rc<str>>, func: F) -> Self
    where
        F: Fn(&Runtime, &Args) -> CallResult + 'static,
    {
        Callable(Rc::new(CallableInner {
            name: name.into(),
            func: Box::new(func),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn ptr_eq(a: &Callable, b: &Callable) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Run the function body. Call depth is tracked by [`Runtime::call`].
    pub(crate) fn invoke(&self, runtime: &Runtime, args: &Args) -> CallResult {
        (self.0.func)(runtime, args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.0.name)
    }
}

/// Positional arguments passed to a callable.
///
/// Positions are 0-based here; error messages count from 1 as scripts do.
pub struct Args {
    function: Rc<str>,
    values: Vec<DynValue>,
}

impl Args {
    pub fn new(function: &Callable, values: Vec<DynValue>) -> Self {
        Args {
            function: function.0.name.clone(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The argument at `index`, or `nil` when absent.
    pub fn get(&self, index: usize) -> DynValue {
        self.values.get(index).cloned().unwrap_or_default()
    }

    /// The argument at `index`, which must be present (it may be `nil` only if
    /// passed explicitly).
    pub fn check_any(&self, index: usize) -> Result<&DynValue, HostError> {
        self.values
            .get(index)
            .ok_or_else(|| bad_argument(index + 1, &self.function, "value expected"))
    }

    pub fn as_slice(&self) -> &[DynValue] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DynValue> {
        self.values.iter()
    }

    pub fn function_name(&self) -> &str {
        &self.function
    }
}
