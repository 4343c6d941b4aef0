//! Opaque host values carrying a native payload.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::metatable::Metatable;

struct UserDataInner {
    payload: Box<dyn Any>,
    metatable: Option<Rc<Metatable>>,
}

/// An opaque value with an arbitrary payload and an optional metatable.
///
/// Any library embedded in the runtime can create userdata, so code reading a
/// payload must not assume it created the value: [`UserData::payload`] is a
/// checked downcast.
#[derive(Clone)]
pub struct UserData(Rc<UserDataInner>);

impl UserData {
    pub fn new<T: Any>(payload: T, metatable: Option<Rc<Metatable>>) -> Self {
        UserData(Rc::new(UserDataInner {
            payload: Box::new(payload),
            metatable,
        }))
    }

    /// The payload, if it is a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.0.payload.downcast_ref::<T>()
    }

    pub fn metatable(&self) -> Option<&Rc<Metatable>> {
        self.0.metatable.as_ref()
    }

    pub fn ptr_eq(a: &UserData, b: &UserData) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserData({:#x})", self.addr())
    }
}
