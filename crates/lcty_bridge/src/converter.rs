//! The converter handle.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use lcty_host::{Metatable, Runtime};

pub(crate) struct ConverterState {
    pub(crate) runtime: Runtime,
    /// Delegation table shared by every value this converter wraps.
    pub(crate) metatable: OnceCell<Rc<Metatable>>,
}

/// Converts between host values and structural values for one runtime.
///
/// A converter is bound to a single [`Runtime`]. Values it wraps share one
/// delegation table, built on first use and kept for the converter's
/// lifetime. Cloning yields another handle to the same converter.
#[derive(Clone)]
pub struct Converter(pub(crate) Rc<ConverterState>);

impl Converter {
    pub fn new(runtime: &Runtime) -> Self {
        Converter(Rc::new(ConverterState {
            runtime: runtime.clone(),
            metatable: OnceCell::new(),
        }))
    }

    pub fn runtime(&self) -> &Runtime {
        &self.0.runtime
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("delegation_table_built", &self.0.metatable.get().is_some())
            .finish_non_exhaustive()
    }
}
