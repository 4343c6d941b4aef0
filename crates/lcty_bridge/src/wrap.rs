//! Wrapping structural values as host userdata.

use std::rc::{Rc, Weak};

use lcty_host::{DynValue, Metatable};
use lcty_value::Value;

use crate::converter::{Converter, ConverterState};
use crate::delegation;
use crate::dynamic::wrapped;

impl Converter {
    /// Present a structural value to the host as an opaque value whose
    /// operators delegate to the structural system.
    ///
    /// Every value wrapped by one converter shares the same delegation table.
    pub fn wrap(&self, value: Value) -> DynValue {
        self.0
            .runtime
            .new_userdata(value, Some(Rc::clone(self.metatable())))
    }

    /// The structural value inside a wrapped host value.
    ///
    /// Returns `None` for every other host value, including userdata created
    /// by someone else.
    pub fn unwrap(&self, value: &DynValue) -> Option<Value> {
        wrapped(value).cloned()
    }

    /// The delegation table, built on first use.
    pub(crate) fn metatable(&self) -> &Rc<Metatable> {
        self.0.metatable.get_or_init(|| {
            let _span = tracing::debug_span!("build_delegation_table").entered();
            Rc::new(delegation::build(&Rc::downgrade(&self.0)))
        })
    }

    pub(crate) fn from_weak(state: &Weak<ConverterState>) -> Option<Self> {
        state.upgrade().map(Converter)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
