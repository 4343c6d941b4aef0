//! Exposing structural functions as host callables.

use lcty_host::{bad_argument, runtime_error, Args, CallResult, DynValue};
use lcty_value::{Function, Type};

use crate::converter::Converter;

impl Converter {
    /// Expose `function` to scripts.
    ///
    /// Each argument is converted to its declared parameter type before the
    /// function runs; the trailing variadic parameter, if any, covers the
    /// rest. The result comes back wrapped.
    pub fn wrap_function(&self, function: Function) -> DynValue {
        let converter = self.clone();
        let name = function.name().to_string();
        self.0
            .runtime
            .new_function(&name, move |_runtime, args| converter.invoke(&function, args))
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(function = function.name(), argc = args.len())
    )]
    fn invoke(&self, function: &Function, args: &Args) -> CallResult {
        let undeclared = Type::Dynamic;
        let mut values = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let ty = function.param_for(i).map_or(&undeclared, |param| &param.ty);
            let value = self
                .convert(arg, ty)
                .map_err(|err| bad_argument(i + 1, function.name(), err.to_string()))?;
            values.push(value);
        }

        let result = function.call(&values).map_err(|err| {
            tracing::debug!(error = %err, "structural function failed");
            runtime_error(err.to_string())
        })?;
        Ok(vec![self.wrap(result)])
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
