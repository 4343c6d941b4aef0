//! Operator handler tables.
//!
//! A [`Metatable`] maps each [`MetaEvent`] to the callable the runtime invokes
//! when that operator meets a value carrying the table. Handlers receive the
//! raw operands as arguments and return the operator's result as their first
//! return value.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::callable::Callable;

/// An operator that can be delegated to a metatable handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MetaEvent {
    Eq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Unm,
    Concat,
    Len,
    Index,
    Lt,
    Le,
    ToString,
}

impl MetaEvent {
    pub const ALL: [MetaEvent; 13] = [
        MetaEvent::Eq,
        MetaEvent::Add,
        MetaEvent::Sub,
        MetaEvent::Mul,
        MetaEvent::Div,
        MetaEvent::Mod,
        MetaEvent::Unm,
        MetaEvent::Concat,
        MetaEvent::Len,
        MetaEvent::Index,
        MetaEvent::Lt,
        MetaEvent::Le,
        MetaEvent::ToString,
    ];

    /// Conventional script-visible name, e.g. `__add`.
    pub fn name(self) -> &'static str {
        match self {
            MetaEvent::Eq => "__eq",
            MetaEvent::Add => "__add",
            MetaEvent::Sub => "__sub",
            MetaEvent::Mul => "__mul",
            MetaEvent::Div => "__div",
            MetaEvent::Mod => "__mod",
            MetaEvent::Unm => "__unm",
            MetaEvent::Concat => "__concat",
            MetaEvent::Len => "__len",
            MetaEvent::Index => "__index",
            MetaEvent::Lt => "__lt",
            MetaEvent::Le => "__le",
            MetaEvent::ToString => "__tostring",
        }
    }
}

impl fmt::Display for MetaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator handlers keyed by event.
#[derive(Clone, Default)]
pub struct Metatable {
    handlers: FxHashMap<MetaEvent, Callable>,
}

impl Metatable {
    pub fn new() -> Self {
        Metatable::default()
    }

    /// Install `handler` for `event`, replacing any previous handler.
    pub fn set(&mut self, event: MetaEvent, handler: Callable) {
        self.handlers.insert(event, handler);
    }

    #[must_use]
    pub fn with(mut self, event: MetaEvent, handler: Callable) -> Self {
        self.set(event, handler);
        self
    }

    pub fn get(&self, event: MetaEvent) -> Option<&Callable> {
        self.handlers.get(&event)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Metatable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<&'static str> = self.handlers.keys().map(|e| e.name()).collect();
        events.sort_unstable();
        f.debug_struct("Metatable").field("events", &events).finish()
    }
}
