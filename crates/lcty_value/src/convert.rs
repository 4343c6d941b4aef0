//! Generic conversion between structural types.
//!
//! [`convert`] turns a structural value into an equivalent value of another
//! structural type where a safe mapping exists:
//!
//! - primitives: number ↔ string, bool ↔ string
//! - sequences: tuple/list/set → list or set, tuple/list → tuple (same length)
//! - string-keyed: object/map → map, object/map → object
//!
//! Null and unknown values convert to null and unknown of the target type.
//! When the target's element type is `Dynamic`, the element type is unified
//! from the source elements first.
//!
//! Errors are located relative to the value being converted; callers that are
//! themselves nested attach their own prefix with `Error::within`.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::errors::{
    attribute_required, inconsistent_element_types, type_required, wrong_length, Result,
};
use crate::path::Path;
use crate::stack::ensure_sufficient_stack;
use crate::types::Type;
use crate::value::{format_number, Value};

/// Convert `value` to type `ty`.
#[tracing::instrument(level = "trace", skip(value), fields(from = value.type_name(), to = %ty))]
pub fn convert(value: &Value, ty: &Type) -> Result<Value> {
    convert_value(value, ty)
}

fn convert_value(value: &Value, ty: &Type) -> Result<Value> {
    ensure_sufficient_stack(|| {
        if ty.is_dynamic() {
            return Ok(value.clone());
        }
        match value {
            Value::Null(_) => return Ok(Value::null(ty.clone())),
            Value::Unknown(_) => return Ok(Value::unknown(ty.clone())),
            _ => {}
        }
        if value.ty() == *ty {
            return Ok(value.clone());
        }

        match ty {
            Type::Bool => to_bool(value),
            Type::Number => to_number(value),
            Type::String => to_string(value),
            Type::List(element) => {
                let items = value.as_sequence().ok_or_else(|| type_required(ty))?;
                let (element, items) = convert_elements(items, element)?;
                Ok(Value::list(element, items))
            }
            Type::Set(element) => {
                let items = value.as_sequence().ok_or_else(|| type_required(ty))?;
                let (element, items) = convert_elements(items, element)?;
                Ok(Value::set(element, items))
            }
            Type::Map(element) => {
                let entries = value.as_entries().ok_or_else(|| type_required(ty))?;
                let from_object = matches!(value, Value::Object(_));
                let (element, entries) = convert_entries(entries, element, from_object)?;
                Ok(Value::map(element, entries))
            }
            Type::Object(attrs) => to_object(value, attrs, ty),
            Type::Tuple(elements) => to_tuple(value, elements, ty),
            Type::Dynamic => Ok(value.clone()),
        }
    })
}

fn to_bool(value: &Value) -> Result<Value> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::String(s) => match s.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(type_required(&Type::Bool)),
        },
        _ => Err(type_required(&Type::Bool)),
    }
}

fn to_number(value: &Value) -> Result<Value> {
    match value {
        Value::Number(n) => Ok(Value::Number(n.clone())),
        Value::String(s) => parse_number(s)
            .map(Value::Number)
            .ok_or_else(|| type_required(&Type::Number)),
        _ => Err(type_required(&Type::Number)),
    }
}

fn to_string(value: &Value) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(s.clone())),
        Value::Number(n) => Ok(Value::string(format_number(n))),
        Value::Bool(b) => Ok(Value::string(b.to_string())),
        _ => Err(type_required(&Type::String)),
    }
}

/// Parse numeral text, accepting plain and scientific notation.
pub fn parse_number(text: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(text).ok().map(|n| n.normalized())
}

/// Find the single type all `types` can share.
///
/// `Dynamic` entries (from nulls of unknown type) place no constraint. Mixed
/// primitive types widen to `String`; any other disagreement is an error.
pub fn unify<'a>(types: impl IntoIterator<Item = &'a Type>) -> Result<Type> {
    let mut unified: Option<&Type> = None;
    let mut widen_to_string = false;
    for ty in types {
        if ty.is_dynamic() {
            continue;
        }
        match unified {
            None => unified = Some(ty),
            Some(current) if current == ty => {}
            Some(current) if current.is_primitive() && ty.is_primitive() => {
                widen_to_string = true;
            }
            Some(_) => return Err(inconsistent_element_types()),
        }
    }
    if widen_to_string {
        return Ok(Type::String);
    }
    Ok(unified.cloned().unwrap_or(Type::Dynamic))
}

fn convert_elements(items: &[Value], element: &Type) -> Result<(Type, Vec<Value>)> {
    let element = if element.is_dynamic() {
        let types: Vec<Type> = items.iter().map(Value::ty).collect();
        unify(&types)?
    } else {
        element.clone()
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let index = i64::try_from(i).unwrap_or(i64::MAX);
        out.push(convert_value(item, &element).map_err(|e| e.within(&Path::root().index(index)))?);
    }
    Ok((element, out))
}

fn convert_entries(
    entries: &BTreeMap<String, Value>,
    element: &Type,
    from_object: bool,
) -> Result<(Type, BTreeMap<String, Value>)> {
    let element = if element.is_dynamic() {
        let types: Vec<Type> = entries.values().map(Value::ty).collect();
        unify(&types)?
    } else {
        element.clone()
    };
    let mut out = BTreeMap::new();
    for (key, item) in entries {
        let step = if from_object {
            Path::root().attr(key.clone())
        } else {
            Path::root().key(key.clone())
        };
        out.insert(
            key.clone(),
            convert_value(item, &element).map_err(|e| e.within(&step))?,
        );
    }
    Ok((element, out))
}

/// Object targets take the declared attributes from the source and drop the
/// rest. Every declared attribute must be present.
fn to_object(value: &Value, attrs: &BTreeMap<String, Type>, ty: &Type) -> Result<Value> {
    let source = value.as_entries().ok_or_else(|| type_required(ty))?;
    let mut out = BTreeMap::new();
    for (name, attr_ty) in attrs {
        let item = source.get(name).ok_or_else(|| attribute_required(name))?;
        let converted =
            convert_value(item, attr_ty).map_err(|e| e.within(&Path::root().attr(name.clone())))?;
        out.insert(name.clone(), converted);
    }
    Ok(Value::object_from_map(out))
}

fn to_tuple(value: &Value, elements: &[Type], ty: &Type) -> Result<Value> {
    let items = match value {
        Value::Tuple(items) | Value::List { items, .. } => items,
        _ => return Err(type_required(ty)),
    };
    if items.len() != elements.len() {
        return Err(wrong_length(elements.len(), items.len()));
    }
    let mut out = Vec::with_capacity(items.len());
    for (i, (item, element)) in items.iter().zip(elements).enumerate() {
        let index = i64::try_from(i).unwrap_or(i64::MAX);
        out.push(convert_value(item, element).map_err(|e| e.within(&Path::root().index(index)))?);
    }
    Ok(Value::tuple(out))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
