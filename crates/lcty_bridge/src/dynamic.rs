//! Classification of host values at the bridge boundary.

use lcty_host::{Callable, DynValue, Table, UserData};
use lcty_value::Value;

/// A host value as the bridge sees it.
///
/// Userdata splits in two: values whose payload is a structural [`Value`]
/// (produced by a converter) and everything else, which the bridge refuses.
#[derive(Clone, Copy, Debug)]
pub enum Dynamic<'a> {
    Nil,
    Bool(bool),
    Number(f64),
    String(&'a str),
    Table(&'a Table),
    Callable(&'a Callable),
    Wrapped(&'a Value),
    Foreign(&'a UserData),
}

impl<'a> Dynamic<'a> {
    pub fn classify(value: &'a DynValue) -> Self {
        match value {
            DynValue::Nil => Dynamic::Nil,
            DynValue::Bool(b) => Dynamic::Bool(*b),
            DynValue::Number(n) => Dynamic::Number(*n),
            DynValue::String(s) => Dynamic::String(s),
            DynValue::Table(t) => Dynamic::Table(t),
            DynValue::Function(f) => Dynamic::Callable(f),
            DynValue::UserData(u) => match u.payload::<Value>() {
                Some(v) => Dynamic::Wrapped(v),
                None => Dynamic::Foreign(u),
            },
        }
    }

    /// The host's name for the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Dynamic::Nil => "nil",
            Dynamic::Bool(_) => "boolean",
            Dynamic::Number(_) => "number",
            Dynamic::String(_) => "string",
            Dynamic::Table(_) => "table",
            Dynamic::Callable(_) => "function",
            Dynamic::Wrapped(_) | Dynamic::Foreign(_) => "userdata",
        }
    }
}

/// The structural value carried by `value`, if it is a wrapped value.
pub fn wrapped(value: &DynValue) -> Option<&Value> {
    value.as_userdata()?.payload::<Value>()
}
