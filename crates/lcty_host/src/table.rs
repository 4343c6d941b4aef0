//! Host tables.
//!
//! A table is an association of non-nil keys to non-nil values, split into an
//! array part holding the consecutive integer keys `0, 1, 2, ...` and a hash
//! part holding everything else. The array part never contains `nil`: storing
//! `nil` inside it moves the tail into the hash part, and filling the slot just
//! past its end pulls any following integer keys back in.
//!
//! Iteration order is deterministic: the array part ascending, then the hash
//! part ordered by key (numbers, booleans, strings, then reference keys by
//! address).

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{invalid_key, HostError};
use crate::value::DynValue;

/// A hash-part key.
#[derive(Clone, Debug)]
enum TableKey {
    Number(f64),
    Bool(bool),
    String(Rc<str>),
    /// Table, function or userdata, identified by address.
    Ref(usize, DynValue),
}

impl TableKey {
    fn from_value(key: &DynValue) -> Result<TableKey, HostError> {
        match key {
            DynValue::Nil => Err(invalid_key("nil")),
            DynValue::Number(n) if n.is_nan() => Err(invalid_key("NaN")),
            // -0.0 and 0.0 are the same key.
            DynValue::Number(n) => Ok(TableKey::Number(*n + 0.0)),
            DynValue::Bool(b) => Ok(TableKey::Bool(*b)),
            DynValue::String(s) => Ok(TableKey::String(s.clone())),
            DynValue::Table(_) | DynValue::Function(_) | DynValue::UserData(_) => {
                let addr = key.addr().unwrap_or_default();
                Ok(TableKey::Ref(addr, key.clone()))
            }
        }
    }

    fn to_value(&self) -> DynValue {
        match self {
            TableKey::Number(n) => DynValue::Number(*n),
            TableKey::Bool(b) => DynValue::Bool(*b),
            TableKey::String(s) => DynValue::String(s.clone()),
            TableKey::Ref(_, v) => v.clone(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            TableKey::Number(_) => 0,
            TableKey::Bool(_) => 1,
            TableKey::String(_) => 2,
            TableKey::Ref(..) => 3,
        }
    }
}

impl Ord for TableKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (TableKey::Number(a), TableKey::Number(b)) => a.total_cmp(b),
            (TableKey::Bool(a), TableKey::Bool(b)) => a.cmp(b),
            (TableKey::String(a), TableKey::String(b)) => a.cmp(b),
            (TableKey::Ref(a, _), TableKey::Ref(b, _)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for TableKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TableKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TableKey {}

/// Array-part position of `key`, if it is a non-negative integer.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "integral and within u32 range"
)]
fn array_index(key: &DynValue) -> Option<usize> {
    let n = key.as_number()?;
    if n >= 0.0 && n.fract() == 0.0 && n < 4_294_967_296.0 {
        Some(n as usize)
    } else {
        None
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "array indices stay far below 2^53"
)]
fn index_to_f64(i: usize) -> f64 {
    i as f64
}

#[derive(Default)]
struct TableData {
    array: Vec<DynValue>,
    hash: BTreeMap<TableKey, DynValue>,
}

impl TableData {
    fn get(&self, key: &DynValue) -> DynValue {
        if let Some(i) = array_index(key) {
            if let Some(v) = self.array.get(i) {
                return v.clone();
            }
        }
        match TableKey::from_value(key) {
            Ok(k) => self.hash.get(&k).cloned().unwrap_or_default(),
            Err(_) => DynValue::Nil,
        }
    }

    fn set(&mut self, key: &DynValue, value: DynValue) -> Result<(), HostError> {
        if let Some(i) = array_index(key) {
            if i < self.array.len() {
                if value.is_nil() {
                    self.split_array_at(i);
                } else {
                    self.array[i] = value;
                }
                return Ok(());
            }
            if i == self.array.len() && !value.is_nil() {
                self.array.push(value);
                self.hash.remove(&TableKey::Number(index_to_f64(i)));
                self.migrate_from_hash();
                return Ok(());
            }
        }
        let k = TableKey::from_value(key)?;
        if value.is_nil() {
            self.hash.remove(&k);
        } else {
            self.hash.insert(k, value);
        }
        Ok(())
    }

    /// Drop position `i` and move everything after it to the hash part.
    fn split_array_at(&mut self, i: usize) {
        let tail = self.array.split_off(i);
        for (offset, v) in tail.into_iter().enumerate().skip(1) {
            self.hash
                .insert(TableKey::Number(index_to_f64(i + offset)), v);
        }
    }

    /// Pull consecutive integer keys following the array part out of the hash.
    fn migrate_from_hash(&mut self) {
        loop {
            let next = TableKey::Number(index_to_f64(self.array.len()));
            match self.hash.remove(&next) {
                Some(v) => self.array.push(v),
                None => break,
            }
        }
    }
}

/// A shared, mutable host table.
///
/// Cloning shares the table; equality between tables is identity.
#[derive(Clone, Default)]
pub struct Table(Rc<RefCell<TableData>>);

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Look up `key`. Absent keys (and keys that can never be stored) are `nil`.
    pub fn get(&self, key: &DynValue) -> DynValue {
        self.0.borrow().get(key)
    }

    /// Store `value` under `key`; storing `nil` removes the entry.
    pub fn set(&self, key: impl Into<DynValue>, value: impl Into<DynValue>) -> Result<(), HostError> {
        self.0.borrow_mut().set(&key.into(), value.into())
    }

    /// Length of the array part: the number of consecutive integer keys
    /// starting at 0.
    pub fn array_len(&self) -> usize {
        self.0.borrow().array.len()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        let data = self.0.borrow();
        data.array.len() + data.hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every entry, in iteration order.
    ///
    /// The snapshot is detached: mutating the table while walking it does not
    /// affect the walk.
    pub fn iter(&self) -> std::vec::IntoIter<(DynValue, DynValue)> {
        let data = self.0.borrow();
        let mut entries = Vec::with_capacity(data.array.len() + data.hash.len());
        entries.extend(
            data.array
                .iter()
                .enumerate()
                .map(|(i, v)| (DynValue::Number(index_to_f64(i)), v.clone())),
        );
        entries.extend(data.hash.iter().map(|(k, v)| (k.to_value(), v.clone())));
        entries.into_iter()
    }

    pub fn ptr_eq(a: &Table, b: &Table) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table({:#x}, {} entries)", self.addr(), self.len())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
