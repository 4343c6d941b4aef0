#![allow(
    clippy::result_large_err,
    reason = "lcty_value::Error carries its Path inline"
)]
//! Bidirectional bridge between host script values and structural values.
//!
//! A [`Converter`] is bound to one [`lcty_host::Runtime`] and exposes four
//! operations:
//! - [`Converter::convert`]: host value to structural value of a given type
//! - [`Converter::infer_type`]: the structural type a host value would take
//! - [`Converter::wrap`]: structural value to an opaque host value whose
//!   operators delegate back to the structural system
//! - [`Converter::wrap_function`]: structural function to host callable
//!
//! # Delegation
//!
//! Wrapped values carry a metatable built once per converter. Its handlers
//! accept any host operand, so mixing wrapped and native values works:
//! `wrap(2) + "3"` is a wrapped 5. Handlers that fail raise a host runtime
//! error carrying the structural message. Equality and indexing never fail.
//!
//! # Tracing
//!
//! Conversion entry points and delegated operators emit `tracing` spans and
//! events. Call [`init_tracing`] to print them when `RUST_LOG` is set.

mod convert;
mod converter;
mod delegation;
mod dynamic;
mod function;
mod infer;
mod wrap;

pub use converter::Converter;
pub use dynamic::{wrapped, Dynamic};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset or a subscriber is already
/// installed. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // An embedder may have installed its own subscriber first.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
