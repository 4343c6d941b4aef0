//! Operator handlers installed on every wrapped value.
//!
//! Handlers receive raw host operands. Either operand may be a wrapped value,
//! a native value, or userdata some other library created, so every handler
//! unwraps with a checked downcast.
//!
//! Equality and indexing never fail. Every other handler raises a host error
//! carrying the structural error's message.

use std::rc::Weak;

use lcty_host::{
    attempt, runtime_error, Args, Callable, DynValue, HostError, MetaEvent, Metatable,
};
use lcty_value::ops::{self, ArithOp};
use lcty_value::{BigDecimal, Type, Value};

use crate::converter::{Converter, ConverterState};
use crate::dynamic::wrapped;

type Handler = fn(&Converter, &Args) -> Result<DynValue, HostError>;

const HANDLERS: &[(MetaEvent, Handler)] = &[
    (MetaEvent::Eq, equals),
    (MetaEvent::Add, add),
    (MetaEvent::Sub, subtract),
    (MetaEvent::Mul, multiply),
    (MetaEvent::Div, divide),
    (MetaEvent::Mod, modulo),
    (MetaEvent::Unm, negate),
    (MetaEvent::Concat, concat),
    (MetaEvent::Len, length),
    (MetaEvent::Index, index),
    (MetaEvent::Lt, less_than),
    (MetaEvent::Le, less_equal),
    (MetaEvent::ToString, tostring),
];

/// Build the delegation table for the converter behind `state`.
///
/// Handlers hold the converter weakly; the converter owns the table.
pub(crate) fn build(state: &Weak<ConverterState>) -> Metatable {
    HANDLERS
        .iter()
        .fold(Metatable::new(), |table, &(event, handler)| {
            table.with(event, delegate(state, event, handler))
        })
}

fn delegate(state: &Weak<ConverterState>, event: MetaEvent, handler: Handler) -> Callable {
    let state = state.clone();
    Callable::new(event.name(), move |_runtime, args| {
        let converter = Converter::from_weak(&state)
            .ok_or_else(|| runtime_error("value outlived its converter"))?;
        match handler(&converter, args) {
            Ok(result) => Ok(vec![result]),
            Err(err) => {
                tracing::debug!(event = %event, error = %err, "delegated operator failed");
                Err(err)
            }
        }
    })
}

fn structural(err: lcty_value::Error) -> HostError {
    runtime_error(err.to_string())
}

fn to_number(converter: &Converter, value: &DynValue) -> Result<Value, HostError> {
    converter.convert(value, &Type::Number).map_err(structural)
}

fn to_string(converter: &Converter, value: &DynValue) -> Result<Value, HostError> {
    converter.convert(value, &Type::String).map_err(structural)
}

fn equals(_: &Converter, args: &Args) -> Result<DynValue, HostError> {
    let (a, b) = (args.get(0), args.get(1));
    let equal = match (wrapped(&a), wrapped(&b)) {
        (Some(x), Some(y)) => x.equals(y).as_bool().unwrap_or(false),
        _ => false,
    };
    Ok(DynValue::Bool(equal))
}

fn arithmetic(converter: &Converter, args: &Args, op: ArithOp) -> Result<DynValue, HostError> {
    let a = to_number(converter, &args.get(0))?;
    let b = to_number(converter, &args.get(1))?;
    let result = ops::arithmetic(op, &a, &b).map_err(structural)?;
    Ok(converter.wrap(result))
}

fn add(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    arithmetic(converter, args, ArithOp::Add)
}

fn subtract(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    arithmetic(converter, args, ArithOp::Sub)
}

fn multiply(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    arithmetic(converter, args, ArithOp::Mul)
}

fn divide(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    arithmetic(converter, args, ArithOp::Div)
}

fn modulo(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    arithmetic(converter, args, ArithOp::Mod)
}

fn negate(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    let a = to_number(converter, &args.get(0))?;
    let result = ops::negate(&a).map_err(structural)?;
    Ok(converter.wrap(result))
}

fn concat(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    let a = to_string(converter, &args.get(0))?;
    let b = to_string(converter, &args.get(1))?;
    let result = ops::concat(&a, &b).map_err(structural)?;
    Ok(converter.wrap(result))
}

fn length(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    let operand = args.get(0);
    let value = wrapped(&operand).ok_or_else(|| attempt("get length of", operand.kind_name()))?;
    let result = ops::length(value).map_err(structural)?;
    Ok(converter.wrap(result))
}

/// `v.name` and `v[key]`. Absent keys, out-of-range positions and null
/// elements all read as nil.
fn index(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    let (operand, key) = (args.get(0), args.get(1));
    let Some(value) = wrapped(&operand) else {
        return Ok(DynValue::Nil);
    };
    let found = match value {
        Value::Object(_) | Value::Map { .. } => converter
            .key_to_string(&key)
            .and_then(|name| value.get(&name)),
        Value::List { .. } | Value::Tuple(_) => {
            position(converter, &key).and_then(|i| value.get_index(i))
        }
        _ => None,
    };
    Ok(match found {
        Some(item) if !item.is_null() => converter.wrap(item.clone()),
        _ => DynValue::Nil,
    })
}

/// The zero-based position a key names, if it is an integer.
fn position(converter: &Converter, key: &DynValue) -> Option<i64> {
    let number = converter.convert(key, &Type::Number).ok()?;
    integral(number.as_number()?)
}

fn integral(n: &BigDecimal) -> Option<i64> {
    if !n.is_integer() {
        return None;
    }
    let (digits, _) = n.with_scale(0).into_bigint_and_exponent();
    i64::try_from(digits).ok()
}

fn less_than(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    order(converter, args, ops::less_than)
}

fn less_equal(converter: &Converter, args: &Args) -> Result<DynValue, HostError> {
    order(converter, args, ops::less_than_or_equal)
}

/// Two strings compare as strings; anything else compares as numbers.
fn order(
    converter: &Converter,
    args: &Args,
    compare: fn(&Value, &Value) -> lcty_value::Result<Value>,
) -> Result<DynValue, HostError> {
    let (a, b) = (args.get(0), args.get(1));
    let ty = if is_string(&a) && is_string(&b) {
        Type::String
    } else {
        Type::Number
    };
    let x = converter.convert(&a, &ty).map_err(structural)?;
    let y = converter.convert(&b, &ty).map_err(structural)?;
    let result = compare(&x, &y).map_err(structural)?;
    Ok(DynValue::Bool(result.as_bool().unwrap_or(false)))
}

fn is_string(value: &DynValue) -> bool {
    match wrapped(value) {
        Some(v) => v.ty() == Type::String,
        None => value.as_str().is_some(),
    }
}

/// Strings render as their text; everything else uses the display form.
fn tostring(_: &Converter, args: &Args) -> Result<DynValue, HostError> {
    let operand = args.get(0);
    let value =
        wrapped(&operand).ok_or_else(|| attempt("convert to string", operand.kind_name()))?;
    Ok(match value.as_str() {
        Some(text) => DynValue::string(text),
        None => DynValue::string(value.to_string()),
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
