//! Path-qualified conversion and operation errors.
//!
//! `ErrorKind` carries structured data for each failure; the human-readable
//! message is always computed from its `Display` impl. Messages are written
//! for script authors and never mention implementation types.
//!
//! Factory functions (`unexpected_key()`, `division_by_zero()`, ...) are the
//! construction API. They produce errors at the root path; callers that know
//! where the failure happened attach a location with [`Error::within`].

use std::fmt;

use crate::path::Path;
use crate::types::Type;

/// Result of a structural operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`ErrorKind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The input cannot become the requested or inferred type.
    TypeMismatch,
    /// A table or collection does not have the declared shape.
    ShapeMismatch,
    /// The input kind has no structural counterpart.
    UnsupportedKind,
    /// The structural system rejected an operation.
    OperationFailed,
}

/// Typed error category with the data needed to render its message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    // Type mismatch
    /// A value of `expected` type was required.
    TypeRequired { expected: Type },
    /// A non-finite host number.
    NonFiniteNumber,

    // Shape mismatch
    KeysMustBeStrings,
    UnexpectedKey { key: String },
    IndexOutOfRange { index: i64 },
    MissingElement { index: usize },
    AttributeRequired { name: String },
    WrongLength { expected: usize, got: usize },
    InconsistentElementTypes,

    // Unsupported kind
    /// `kind` is the host's own name for the offending value kind.
    NotAllowed { kind: String },

    // Operation failures
    DivisionByZero,
    ModuloByZero,
    NotEnoughArguments { expected: usize, got: usize },
    TooManyArguments { expected: usize, got: usize },
    NullArgument { name: String },
    CannotGetLength { type_name: String },

    /// Catch-all for failures without a structured kind.
    Custom { message: String },
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeRequired { .. } | Self::NonFiniteNumber => ErrorCategory::TypeMismatch,
            Self::KeysMustBeStrings
            | Self::UnexpectedKey { .. }
            | Self::IndexOutOfRange { .. }
            | Self::MissingElement { .. }
            | Self::AttributeRequired { .. }
            | Self::WrongLength { .. }
            | Self::InconsistentElementTypes => ErrorCategory::ShapeMismatch,
            Self::NotAllowed { .. } => ErrorCategory::UnsupportedKind,
            Self::DivisionByZero
            | Self::ModuloByZero
            | Self::NotEnoughArguments { .. }
            | Self::TooManyArguments { .. }
            | Self::NullArgument { .. }
            | Self::CannotGetLength { .. }
            | Self::Custom { .. } => ErrorCategory::OperationFailed,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeRequired { expected } => {
                if expected.is_primitive() {
                    write!(f, "a {} is required", expected.friendly_name())
                } else {
                    write!(f, "{} required", expected.friendly_name())
                }
            }
            Self::NonFiniteNumber => write!(f, "a finite number is required"),

            Self::KeysMustBeStrings => write!(f, "all table keys must be strings"),
            Self::UnexpectedKey { key } => write!(f, "unexpected key {key:?}"),
            Self::IndexOutOfRange { index } => write!(f, "index {index} out of range"),
            Self::MissingElement { index } => write!(f, "missing element at index {index}"),
            Self::AttributeRequired { name } => write!(f, "attribute {name:?} is required"),
            Self::WrongLength { expected, got } => {
                let word = if *expected == 1 { "element" } else { "elements" };
                write!(f, "{expected} {word} required, but got {got}")
            }
            Self::InconsistentElementTypes => write!(f, "all values must be of the same type"),

            Self::NotAllowed { kind } => write!(f, "{kind} values are not allowed"),

            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::NotEnoughArguments { expected, got } => {
                write!(f, "not enough arguments: expected {expected}, got {got}")
            }
            Self::TooManyArguments { expected, got } => {
                write!(f, "too many arguments: expected {expected}, got {got}")
            }
            Self::NullArgument { name } => write!(f, "argument {name:?} must not be null"),
            Self::CannotGetLength { type_name } => {
                write!(f, "cannot get the length of a {type_name} value")
            }

            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// A structural error located at a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    /// Human-readable message, always equal to `kind.to_string()`.
    pub message: String,
    /// Where the failure happened, relative to the value being processed.
    pub path: Path,
}

impl Error {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind; prefer the factory functions.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::Custom {
            message: message.into(),
        })
    }

    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            path: Path::root(),
        }
    }

    /// Relocate this error under `prefix`.
    ///
    /// The error's own path is kept as the suffix, so an error raised three
    /// levels into a nested conversion keeps those levels.
    #[must_use]
    pub fn within(mut self, prefix: &Path) -> Self {
        if !prefix.is_root() {
            self.path = prefix.join(&self.path);
        }
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for Error {}

// Type mismatch

#[cold]
pub fn type_required(expected: &Type) -> Error {
    Error::from_kind(ErrorKind::TypeRequired {
        expected: expected.clone(),
    })
}

#[cold]
pub fn non_finite_number() -> Error {
    Error::from_kind(ErrorKind::NonFiniteNumber)
}

// Shape mismatch

#[cold]
pub fn keys_must_be_strings() -> Error {
    Error::from_kind(ErrorKind::KeysMustBeStrings)
}

#[cold]
pub fn unexpected_key(key: &str) -> Error {
    Error::from_kind(ErrorKind::UnexpectedKey {
        key: key.to_string(),
    })
}

#[cold]
pub fn index_out_of_range(index: i64) -> Error {
    Error::from_kind(ErrorKind::IndexOutOfRange { index })
}

#[cold]
pub fn missing_element(index: usize) -> Error {
    Error::from_kind(ErrorKind::MissingElement { index })
}

#[cold]
pub fn attribute_required(name: &str) -> Error {
    Error::from_kind(ErrorKind::AttributeRequired {
        name: name.to_string(),
    })
}

#[cold]
pub fn wrong_length(expected: usize, got: usize) -> Error {
    Error::from_kind(ErrorKind::WrongLength { expected, got })
}

#[cold]
pub fn inconsistent_element_types() -> Error {
    Error::from_kind(ErrorKind::InconsistentElementTypes)
}

// Unsupported kind

#[cold]
pub fn not_allowed(kind: &str) -> Error {
    Error::from_kind(ErrorKind::NotAllowed {
        kind: kind.to_string(),
    })
}

// Operation failures

#[cold]
pub fn division_by_zero() -> Error {
    Error::from_kind(ErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> Error {
    Error::from_kind(ErrorKind::ModuloByZero)
}

#[cold]
pub fn not_enough_arguments(expected: usize, got: usize) -> Error {
    Error::from_kind(ErrorKind::NotEnoughArguments { expected, got })
}

#[cold]
pub fn too_many_arguments(expected: usize, got: usize) -> Error {
    Error::from_kind(ErrorKind::TooManyArguments { expected, got })
}

#[cold]
pub fn null_argument(name: &str) -> Error {
    Error::from_kind(ErrorKind::NullArgument {
        name: name.to_string(),
    })
}

#[cold]
pub fn cannot_get_length(ty: &Type) -> Error {
    Error::from_kind(ErrorKind::CannotGetLength {
        type_name: ty.friendly_name(),
    })
}
