//! Embeddable scripting runtime model.
//!
//! This crate provides the host side of the bridge:
//! - Host values (`DynValue`) and their kinds
//! - Shared mutable tables with a 0-based array part (`Table`)
//! - Opaque userdata with per-value metatables (`UserData`, `Metatable`)
//! - Native callables and argument marshaling (`Callable`, `Args`)
//! - Operator evaluation with metatable delegation (`Runtime`)
//!
//! There is no parser or evaluator. Tests and embedders drive the operator
//! methods on [`Runtime`] directly, the way an evaluator would.
//!
//! Everything here is single-threaded: values are `Rc`-shared and `!Send`.

mod callable;
mod error;
mod metatable;
mod number;
mod runtime;
mod table;
mod userdata;
mod value;

pub use callable::{Args, CallResult, Callable};
pub use error::{
    attempt, bad_argument, compare_error, invalid_key, runtime_error, stack_overflow,
    tostring_not_string, HostError, HostErrorKind,
};
pub use metatable::{MetaEvent, Metatable};
pub use number::{format_number, parse_numeral};
pub use runtime::{to_number, ArithOp, Runtime, RuntimeBuilder, DEFAULT_MAX_CALL_DEPTH};
pub use table::Table;
pub use userdata::UserData;
pub use value::{DynValue, Kind};
