//! Typed functions over structural values.
//!
//! A [`Function`] declares its positional parameters, an optional trailing
//! variadic parameter and a return type. [`Function::call`] does the
//! marshaling that every implementation would otherwise repeat: arity checks,
//! argument conversion, null checks and return-type conversion. The body only
//! ever sees arguments already of the declared types.

use std::fmt;
use std::sync::Arc;

use crate::convert::convert;
use crate::errors::{not_enough_arguments, null_argument, too_many_arguments, Result};
use crate::path::Path;
use crate::types::Type;
use crate::value::Value;

/// A declared function parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
    /// Whether a null argument reaches the body instead of being rejected.
    pub allow_null: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Parameter {
            name: name.into(),
            ty,
            allow_null: false,
        }
    }

    #[must_use]
    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }
}

type Body = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A structural function.
///
/// Cloning is cheap: the parameter list and body are shared.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    params: Arc<[Parameter]>,
    variadic: Option<Arc<Parameter>>,
    returns: Type,
    body: Arc<Body>,
}

impl Function {
    /// Create a function with fixed positional parameters.
    pub fn new<F>(name: impl Into<Arc<str>>, params: Vec<Parameter>, returns: Type, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Function {
            name: name.into(),
            params: params.into(),
            variadic: None,
            returns,
            body: Arc::new(body),
        }
    }

    /// Accept any number of extra arguments of `param`'s type.
    #[must_use]
    pub fn with_variadic(mut self, param: Parameter) -> Self {
        self.variadic = Some(Arc::new(param));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn variadic(&self) -> Option<&Parameter> {
        self.variadic.as_deref()
    }

    pub fn return_type(&self) -> &Type {
        &self.returns
    }

    /// The declared parameter that receives the argument at `index`.
    pub fn param_for(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index).or(self.variadic.as_deref())
    }

    /// Call the function.
    ///
    /// Argument errors are located at the argument's position. An unknown
    /// argument makes the whole result unknown without running the body.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        let declared = self.params.len();
        if args.len() < declared {
            return Err(not_enough_arguments(declared, args.len()));
        }
        if args.len() > declared && self.variadic.is_none() {
            return Err(too_many_arguments(declared, args.len()));
        }

        let mut converted = Vec::with_capacity(args.len());
        let mut any_unknown = false;
        for (i, arg) in args.iter().enumerate() {
            let Some(param) = self.param_for(i) else {
                return Err(too_many_arguments(declared, args.len()));
            };
            let at = Path::root().index(i64::try_from(i).unwrap_or(i64::MAX));
            if arg.is_null() && !param.allow_null {
                return Err(null_argument(&param.name).within(&at));
            }
            let value = convert(arg, &param.ty).map_err(|e| e.within(&at))?;
            any_unknown |= !value.is_known();
            converted.push(value);
        }
        if any_unknown {
            return Ok(Value::unknown(self.returns.clone()));
        }

        tracing::trace!(function = %self.name, args = converted.len(), "calling function");
        let result = (self.body)(&converted)?;
        if self.returns.is_dynamic() {
            Ok(result)
        } else {
            convert(&result, &self.returns)
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("variadic", &self.variadic)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
