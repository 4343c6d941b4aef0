//! Structural types.
//!
//! A `Type` is either a primitive tag, a collection descriptor carrying a
//! single element type (`List`, `Set`, `Map`), or a structural descriptor
//! carrying per-field types (`Object`, `Tuple`). `Dynamic` is a placeholder
//! that is only meaningful as a conversion target: it means "pick the
//! concrete type from the input".

use std::collections::BTreeMap;
use std::fmt;

/// A structural type.
///
/// Object attribute types live in a `BTreeMap`, so two object types with the
/// same attribute set compare equal regardless of the order the attributes
/// were declared in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Number,
    String,
    List(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>),
    Object(BTreeMap<String, Type>),
    Tuple(Vec<Type>),
    /// Wildcard conversion target.
    Dynamic,
}

impl Type {
    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn set(element: Type) -> Self {
        Type::Set(Box::new(element))
    }

    pub fn map(element: Type) -> Self {
        Type::Map(Box::new(element))
    }

    /// Create an object type from `(name, type)` pairs.
    ///
    /// A repeated name keeps the last type given for it.
    pub fn object<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        Type::Object(attrs.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }

    /// The object type with no attributes.
    pub fn empty_object() -> Self {
        Type::Object(BTreeMap::new())
    }

    pub fn tuple(elements: Vec<Type>) -> Self {
        Type::Tuple(elements)
    }

    /// The tuple type with no elements.
    pub fn empty_tuple() -> Self {
        Type::Tuple(Vec::new())
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Type::Dynamic)
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Bool | Type::Number | Type::String)
    }

    /// Element type of a `List`, `Set` or `Map`.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(e) | Type::Set(e) | Type::Map(e) => Some(e),
            _ => None,
        }
    }

    /// Whether this type mentions `Dynamic` anywhere.
    ///
    /// Values are never of a type that contains `Dynamic` except for nulls
    /// and unknowns produced from a dynamic target.
    pub fn has_dynamic(&self) -> bool {
        match self {
            Type::Dynamic => true,
            Type::Bool | Type::Number | Type::String => false,
            Type::List(e) | Type::Set(e) | Type::Map(e) => e.has_dynamic(),
            Type::Object(attrs) => attrs.values().any(Type::has_dynamic),
            Type::Tuple(elems) => elems.iter().any(Type::has_dynamic),
        }
    }

    /// Human-readable name for error messages aimed at script authors.
    pub fn friendly_name(&self) -> String {
        match self {
            Type::Bool => "bool".to_string(),
            Type::Number => "number".to_string(),
            Type::String => "string".to_string(),
            Type::List(e) => format!("list of {}", e.friendly_name()),
            Type::Set(e) => format!("set of {}", e.friendly_name()),
            Type::Map(e) => format!("map of {}", e.friendly_name()),
            Type::Object(_) => "object".to_string(),
            Type::Tuple(_) => "tuple".to_string(),
            Type::Dynamic => "any type".to_string(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Number => write!(f, "number"),
            Type::String => write!(f, "string"),
            Type::List(e) => write!(f, "list({e})"),
            Type::Set(e) => write!(f, "set({e})"),
            Type::Map(e) => write!(f, "map({e})"),
            Type::Object(attrs) => {
                write!(f, "object({{")?;
                for (i, (name, ty)) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}={ty}")?;
                }
                write!(f, "}})")
            }
            Type::Tuple(elems) => {
                write!(f, "tuple([")?;
                for (i, ty) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, "])")
            }
            Type::Dynamic => write!(f, "dynamic"),
        }
    }
}
