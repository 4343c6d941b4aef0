//! Structural values.
//!
//! # Construction
//!
//! Heap-backed variants can only be built through the factory methods on
//! `Value` because `Heap::new` is private to this module:
//!
//! ```text
//! let s = Value::string("hello");
//! let xs = Value::list(Type::Number, vec![Value::int(1), Value::int(2)]);
//! let obj = Value::object([("name", Value::string("web"))]);
//! ```
//!
//! # Typing
//!
//! Every value has exactly one type, returned by [`Value::ty`]. Object and
//! tuple types are derived from their fields; list, set and map values carry
//! their element type explicitly so that empty collections stay typed.
//!
//! # Null and unknown
//!
//! `Null(T)` is the absence of a value of type `T`. `Unknown(T)` is a value of
//! type `T` that has not been determined yet; operations on unknowns produce
//! unknowns instead of failing.

mod heap;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;

pub use heap::Heap;

use crate::errors::{non_finite_number, Result};
use crate::types::Type;

/// A structural value.
#[derive(Clone)]
pub enum Value {
    /// Absent value of the given type.
    Null(Type),
    /// Not-yet-determined value of the given type.
    Unknown(Type),
    Bool(bool),
    /// Arbitrary-precision decimal.
    Number(BigDecimal),
    String(Heap<String>),
    List {
        element: Type,
        items: Heap<Vec<Value>>,
    },
    /// Unordered; items are unique under raw equality.
    Set {
        element: Type,
        items: Heap<Vec<Value>>,
    },
    Map {
        element: Type,
        entries: Heap<BTreeMap<String, Value>>,
    },
    Object(Heap<BTreeMap<String, Value>>),
    Tuple(Heap<Vec<Value>>),
}

// Factory Methods (the only way to build heap-backed values)

impl Value {
    #[inline]
    pub fn null(ty: Type) -> Self {
        Value::Null(ty)
    }

    #[inline]
    pub fn unknown(ty: Type) -> Self {
        Value::Unknown(ty)
    }

    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Number(BigDecimal::from(n))
    }

    #[inline]
    pub fn number(n: BigDecimal) -> Self {
        Value::Number(n)
    }

    /// Create a number from a host float.
    ///
    /// Goes through the float's shortest round-trip text so that `0.1`
    /// becomes exactly `0.1` rather than its binary expansion. Every finite
    /// float is representable.
    pub fn number_from_f64(n: f64) -> Result<Self> {
        if !n.is_finite() {
            return Err(non_finite_number());
        }
        BigDecimal::from_str(&n.to_string())
            .map(|d| Value::Number(d.normalized()))
            .map_err(|_| non_finite_number())
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Heap::new(s.into()))
    }

    pub fn list(element: Type, items: Vec<Value>) -> Self {
        Value::List {
            element,
            items: Heap::new(items),
        }
    }

    /// Create a set, dropping duplicate items.
    pub fn set(element: Type, items: Vec<Value>) -> Self {
        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set {
            element,
            items: Heap::new(unique),
        }
    }

    pub fn map(element: Type, entries: BTreeMap<String, Value>) -> Self {
        Value::Map {
            element,
            entries: Heap::new(entries),
        }
    }

    /// Create an object from `(name, value)` pairs.
    pub fn object<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object(Heap::new(
            attrs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn object_from_map(attrs: BTreeMap<String, Value>) -> Self {
        Value::Object(Heap::new(attrs))
    }

    pub fn empty_object() -> Self {
        Value::Object(Heap::new(BTreeMap::new()))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    pub fn empty_tuple() -> Self {
        Value::Tuple(Heap::new(Vec::new()))
    }
}

// Value Methods

impl Value {
    /// The structural type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Value::Null(ty) | Value::Unknown(ty) => ty.clone(),
            Value::Bool(_) => Type::Bool,
            Value::Number(_) => Type::Number,
            Value::String(_) => Type::String,
            Value::List { element, .. } => Type::list(element.clone()),
            Value::Set { element, .. } => Type::set(element.clone()),
            Value::Map { element, .. } => Type::map(element.clone()),
            Value::Object(attrs) => {
                Type::Object(attrs.iter().map(|(k, v)| (k.clone(), v.ty())).collect())
            }
            Value::Tuple(items) => Type::Tuple(items.iter().map(Value::ty).collect()),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, Value::Unknown(_))
    }

    /// Whether this value and everything nested inside it is known.
    pub fn is_wholly_known(&self) -> bool {
        match self {
            Value::Unknown(_) => false,
            Value::List { items, .. } | Value::Set { items, .. } | Value::Tuple(items) => {
                items.iter().all(Value::is_wholly_known)
            }
            Value::Map { entries, .. } | Value::Object(entries) => {
                entries.values().all(Value::is_wholly_known)
            }
            _ => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&BigDecimal> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list, set, or tuple.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List { items, .. } | Value::Set { items, .. } | Value::Tuple(items) => {
                Some(items)
            }
            _ => None,
        }
    }

    /// Entries of a map or attributes of an object.
    pub fn as_entries(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map { entries, .. } | Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up an object attribute or a map key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_entries().and_then(|entries| entries.get(key))
    }

    /// Look up a list or tuple element by zero-based position.
    ///
    /// Sets have no positions and always return `None`.
    pub fn get_index(&self, index: i64) -> Option<&Value> {
        match self {
            Value::List { items, .. } | Value::Tuple(items) => {
                usize::try_from(index).ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }

    /// Short lowercase name of the value's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null(_) => "null",
            Value::Unknown(_) => "unknown",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List { .. } => "list",
            Value::Set { .. } => "set",
            Value::Map { .. } => "map",
            Value::Object(_) => "object",
            Value::Tuple(_) => "tuple",
        }
    }

    /// Deep equality in the structural domain.
    ///
    /// Returns `Bool` when the answer is known and `Unknown(Bool)` when an
    /// unknown value anywhere in either operand could change it. Values of
    /// different types are never equal.
    pub fn equals(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Unknown(_), _) | (_, Value::Unknown(_)) => Value::Unknown(Type::Bool),
            (Value::Null(_), Value::Null(_)) => Value::Bool(true),
            (Value::Null(_), _) | (_, Value::Null(_)) => Value::Bool(false),
            (Value::Bool(a), Value::Bool(b)) => Value::Bool(a == b),
            (Value::Number(a), Value::Number(b)) => Value::Bool(a == b),
            (Value::String(a), Value::String(b)) => Value::Bool(a == b),
            (Value::List { items: a, .. }, Value::List { items: b, .. })
            | (Value::Tuple(a), Value::Tuple(b)) => {
                if a.len() != b.len() {
                    return Value::Bool(false);
                }
                all_equal(a.iter().zip(b.iter()))
            }
            (Value::Set { items: a, .. }, Value::Set { items: b, .. }) => {
                if !(self.is_wholly_known() && other.is_wholly_known()) {
                    return Value::Unknown(Type::Bool);
                }
                Value::Bool(a.len() == b.len() && a.iter().all(|x| b.contains(x)))
            }
            (Value::Map { entries: a, .. }, Value::Map { entries: b, .. })
            | (Value::Object(a), Value::Object(b)) => {
                if a.len() != b.len() || !a.keys().eq(b.keys()) {
                    return Value::Bool(false);
                }
                all_equal(a.values().zip(b.values()))
            }
            _ => Value::Bool(false),
        }
    }
}

/// Fold pairwise equality: any definite `false` wins over unknowns.
fn all_equal<'a>(pairs: impl Iterator<Item = (&'a Value, &'a Value)>) -> Value {
    let mut unknown = false;
    for (x, y) in pairs {
        match x.equals(y) {
            Value::Bool(false) => return Value::Bool(false),
            Value::Bool(true) => {}
            _ => unknown = true,
        }
    }
    if unknown {
        Value::Unknown(Type::Bool)
    } else {
        Value::Bool(true)
    }
}

// Trait Implementations

/// Raw equality: same variant, same type, same content.
///
/// Unlike [`Value::equals`] this is a plain Rust comparison: two unknowns of
/// the same type are raw-equal, and `Null(String)` differs from
/// `Null(Number)`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null(a), Value::Null(b)) | (Value::Unknown(a), Value::Unknown(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (
                Value::List {
                    element: ea,
                    items: a,
                },
                Value::List {
                    element: eb,
                    items: b,
                },
            ) => ea == eb && a == b,
            (
                Value::Set {
                    element: ea,
                    items: a,
                },
                Value::Set {
                    element: eb,
                    items: b,
                },
            ) => ea == eb && a.len() == b.len() && a.iter().all(|x| b.contains(x)),
            (
                Value::Map {
                    element: ea,
                    entries: a,
                },
                Value::Map {
                    element: eb,
                    entries: b,
                },
            ) => ea == eb && a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null(ty) => write!(f, "Null({ty})"),
            Value::Unknown(ty) => write!(f, "Unknown({ty})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({})", format_number(n)),
            Value::String(s) => write!(f, "String({:?})", &***s),
            Value::List { element, items } => write!(f, "List<{element}>({:?})", &***items),
            Value::Set { element, items } => write!(f, "Set<{element}>({:?})", &***items),
            Value::Map { element, entries } => {
                write!(f, "Map<{element}>({:?})", &**entries)
            }
            Value::Object(attrs) => write!(f, "Object({:?})", &**attrs),
            Value::Tuple(items) => write!(f, "Tuple({:?})", &***items),
        }
    }
}

/// Canonical text of a number: integers in full, without exponent or
/// trailing zeros; fractions in shortest decimal form.
pub(crate) fn format_number(n: &BigDecimal) -> String {
    let n = n.normalized();
    if n.is_integer() {
        n.with_scale(0).to_string()
    } else {
        n.to_string()
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null(_) => write!(f, "null"),
            Value::Unknown(_) => write!(f, "(unknown)"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(n)),
            Value::String(s) => write!(f, "{:?}", &***s),
            Value::List { items, .. } | Value::Tuple(items) => write_seq(f, items),
            Value::Set { items, .. } => {
                write!(f, "set")?;
                write_seq(f, items)
            }
            Value::Map { entries, .. } | Value::Object(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} = {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
