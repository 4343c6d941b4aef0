//! A small library of ready-made [`Function`]s.

use crate::errors::{not_enough_arguments, type_required, Result};
use crate::function::{Function, Parameter};
use crate::ops;
use crate::types::Type;
use crate::value::Value;

fn string_arg(args: &[Value]) -> Result<&str> {
    args.first()
        .and_then(Value::as_str)
        .ok_or_else(|| type_required(&Type::String))
}

/// `upper(str)`: the string with every letter uppercased.
pub fn upper() -> Function {
    Function::new(
        "upper",
        vec![Parameter::new("str", Type::String)],
        Type::String,
        |args| Ok(Value::string(string_arg(args)?.to_uppercase())),
    )
}

/// `lower(str)`: the string with every letter lowercased.
pub fn lower() -> Function {
    Function::new(
        "lower",
        vec![Parameter::new("str", Type::String)],
        Type::String,
        |args| Ok(Value::string(string_arg(args)?.to_lowercase())),
    )
}

/// `strlen(str)`: number of characters in the string.
pub fn strlen() -> Function {
    Function::new(
        "strlen",
        vec![Parameter::new("str", Type::String)],
        Type::Number,
        string_length,
    )
}

fn string_length(args: &[Value]) -> Result<Value> {
    let arg = args.first().ok_or_else(|| type_required(&Type::String))?;
    ops::length(arg)
}

/// `abs(num)`: absolute value.
pub fn abs() -> Function {
    Function::new(
        "abs",
        vec![Parameter::new("num", Type::Number)],
        Type::Number,
        absolute,
    )
}

fn absolute(args: &[Value]) -> Result<Value> {
    args.first()
        .and_then(Value::as_number)
        .map(|n| Value::number(n.abs()))
        .ok_or_else(|| type_required(&Type::Number))
}

/// `max(numbers...)`: the greatest of at least one number.
pub fn max() -> Function {
    extremum("max", ops::greater_than)
}

/// `min(numbers...)`: the least of at least one number.
pub fn min() -> Function {
    extremum("min", ops::less_than)
}

fn extremum(name: &'static str, better: fn(&Value, &Value) -> Result<Value>) -> Function {
    Function::new(name, Vec::new(), Type::Number, move |args| {
        let Some((first, rest)) = args.split_first() else {
            return Err(not_enough_arguments(1, 0));
        };
        let mut best = first;
        for candidate in rest {
            if better(candidate, best)?.as_bool() == Some(true) {
                best = candidate;
            }
        }
        Ok(best.clone())
    })
    .with_variadic(Parameter::new("numbers", Type::Number))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
