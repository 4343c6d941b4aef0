//! Host values.

use std::fmt;
use std::rc::Rc;

use crate::callable::Callable;
use crate::table::Table;
use crate::userdata::UserData;

/// The kind of a host value, as scripts name it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Boolean,
    Number,
    String,
    Table,
    Function,
    UserData,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Table => "table",
            Kind::Function => "function",
            Kind::UserData => "userdata",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value as seen by scripts.
///
/// Strings, tables, functions and userdata are reference types: cloning a
/// `DynValue` shares them.
#[derive(Clone, Default)]
pub enum DynValue {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Table(Table),
    Function(Callable),
    UserData(UserData),
}

impl DynValue {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        DynValue::String(s.into())
    }

    pub fn kind(&self) -> Kind {
        match self {
            DynValue::Nil => Kind::Nil,
            DynValue::Bool(_) => Kind::Boolean,
            DynValue::Number(_) => Kind::Number,
            DynValue::String(_) => Kind::String,
            DynValue::Table(_) => Kind::Table,
            DynValue::Function(_) => Kind::Function,
            DynValue::UserData(_) => Kind::UserData,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, DynValue::Nil)
    }

    /// Everything is true except `nil` and `false`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, DynValue::Nil | DynValue::Bool(false))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DynValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DynValue::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_userdata(&self) -> Option<&UserData> {
        match self {
            DynValue::UserData(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Callable> {
        match self {
            DynValue::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Primitive equality by value, reference types by identity. Never
    /// consults metatables.
    #[allow(clippy::float_cmp, reason = "host number equality is IEEE equality")]
    pub fn raw_equals(&self, other: &DynValue) -> bool {
        match (self, other) {
            (DynValue::Nil, DynValue::Nil) => true,
            (DynValue::Bool(a), DynValue::Bool(b)) => a == b,
            (DynValue::Number(a), DynValue::Number(b)) => a == b,
            (DynValue::String(a), DynValue::String(b)) => a == b,
            (DynValue::Table(a), DynValue::Table(b)) => Table::ptr_eq(a, b),
            (DynValue::Function(a), DynValue::Function(b)) => Callable::ptr_eq(a, b),
            (DynValue::UserData(a), DynValue::UserData(b)) => UserData::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Address of the referenced object, for reference types.
    pub(crate) fn addr(&self) -> Option<usize> {
        match self {
            DynValue::Table(t) => Some(t.addr()),
            DynValue::Function(f) => Some(f.addr()),
            DynValue::UserData(u) => Some(u.addr()),
            _ => None,
        }
    }
}

impl fmt::Debug for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynValue::Nil => write!(f, "Nil"),
            DynValue::Bool(b) => write!(f, "Bool({b})"),
            DynValue::Number(n) => write!(f, "Number({n})"),
            DynValue::String(s) => write!(f, "String({s:?})"),
            DynValue::Table(t) => write!(f, "Table({:#x})", t.addr()),
            DynValue::Function(c) => write!(f, "Function({})", c.name()),
            DynValue::UserData(u) => write!(f, "UserData({:#x})", u.addr()),
        }
    }
}

impl From<bool> for DynValue {
    fn from(b: bool) -> Self {
        DynValue::Bool(b)
    }
}

impl From<f64> for DynValue {
    fn from(n: f64) -> Self {
        DynValue::Number(n)
    }
}

impl From<i32> for DynValue {
    fn from(n: i32) -> Self {
        DynValue::Number(f64::from(n))
    }
}

impl From<&str> for DynValue {
    fn from(s: &str) -> Self {
        DynValue::string(s)
    }
}

impl From<String> for DynValue {
    fn from(s: String) -> Self {
        DynValue::string(s)
    }
}

impl From<Table> for DynValue {
    fn from(t: Table) -> Self {
        DynValue::Table(t)
    }
}

impl From<Callable> for DynValue {
    fn from(c: Callable) -> Self {
        DynValue::Function(c)
    }
}

impl From<UserData> for DynValue {
    fn from(u: UserData) -> Self {
        DynValue::UserData(u)
    }
}
