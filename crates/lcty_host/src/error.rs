//! Host-visible runtime errors.
//!
//! Raising an error from a callable or metamethod is returning `Err` from it;
//! the error aborts the evaluation that triggered the call. Factory functions
//! are the construction API, as with structural errors.

use std::fmt;

/// Typed category of a host runtime error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostErrorKind {
    /// Free-form error raised by a callable.
    Runtime { message: String },
    /// An operator applied to a value kind that does not support it.
    Attempt {
        action: &'static str,
        kind: &'static str,
    },
    /// Ordering between two values that cannot be ordered.
    Compare {
        left: &'static str,
        right: &'static str,
    },
    /// A callable was given an unusable argument (positions count from 1).
    BadArgument {
        position: usize,
        function: String,
        message: String,
    },
    /// A table key that can never be stored.
    InvalidKey { reason: &'static str },
    /// A `ToString` handler returned something other than a string.
    ToStringNotString,
    /// The runtime's maximum call depth was exceeded.
    StackOverflow { max_depth: usize },
}

impl fmt::Display for HostErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime { message } => write!(f, "{message}"),
            Self::Attempt { action, kind } => write!(f, "attempt to {action} a {kind} value"),
            Self::Compare { left, right } if left == right => {
                write!(f, "attempt to compare two {left} values")
            }
            Self::Compare { left, right } => write!(f, "attempt to compare {left} with {right}"),
            Self::BadArgument {
                position,
                function,
                message,
            } => write!(f, "bad argument #{position} to '{function}' ({message})"),
            Self::InvalidKey { reason } => write!(f, "table index is {reason}"),
            Self::ToStringNotString => write!(f, "'__tostring' must return a string"),
            Self::StackOverflow { max_depth } => {
                write!(f, "stack overflow (call depth exceeded {max_depth})")
            }
        }
    }
}

/// A runtime error visible to scripts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostError {
    pub kind: HostErrorKind,
}

impl HostError {
    pub fn new(kind: HostErrorKind) -> Self {
        HostError { kind }
    }

    /// The script-visible message.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for HostError {}

/// Raise an error with a free-form message.
#[cold]
pub fn runtime_error(message: impl Into<String>) -> HostError {
    HostError::new(HostErrorKind::Runtime {
        message: message.into(),
    })
}

#[cold]
pub fn attempt(action: &'static str, kind: &'static str) -> HostError {
    HostError::new(HostErrorKind::Attempt { action, kind })
}

#[cold]
pub fn compare_error(left: &'static str, right: &'static str) -> HostError {
    HostError::new(HostErrorKind::Compare { left, right })
}

#[cold]
pub fn bad_argument(position: usize, function: &str, message: impl Into<String>) -> HostError {
    HostError::new(HostErrorKind::BadArgument {
        position,
        function: function.to_string(),
        message: message.into(),
    })
}

#[cold]
pub fn invalid_key(reason: &'static str) -> HostError {
    HostError::new(HostErrorKind::InvalidKey { reason })
}

#[cold]
pub fn tostring_not_string() -> HostError {
    HostError::new(HostErrorKind::ToStringNotString)
}

#[cold]
pub fn stack_overflow(max_depth: usize) -> HostError {
    HostError::new(HostErrorKind::StackOverflow { max_depth })
}
