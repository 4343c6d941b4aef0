//! Type inference for host values.
//!
//! Tables always infer to object types, keyed by their stringified keys. List,
//! tuple and map shapes are only reachable through an explicit target type.

use std::collections::BTreeMap;

use lcty_host::DynValue;
use lcty_value::{
    ensure_sufficient_stack, keys_must_be_strings, not_allowed, Path, Result, Type,
};

use crate::converter::Converter;
use crate::dynamic::Dynamic;

impl Converter {
    /// Derive the structural type a host value would convert to when no
    /// target type is given.
    ///
    /// `nil` infers to `Type::Dynamic`; callers must still pick a concrete
    /// type before using the result.
    #[tracing::instrument(level = "trace", skip_all, fields(kind = value.kind_name()))]
    pub fn infer_type(&self, value: &DynValue) -> Result<Type> {
        self.infer_at(value, &Path::root())
    }

    pub(crate) fn infer_at(&self, value: &DynValue, path: &Path) -> Result<Type> {
        ensure_sufficient_stack(|| match Dynamic::classify(value) {
            Dynamic::Nil => Ok(Type::Dynamic),
            Dynamic::Bool(_) => Ok(Type::Bool),
            Dynamic::Number(_) => Ok(Type::Number),
            Dynamic::String(_) => Ok(Type::String),
            Dynamic::Wrapped(v) => Ok(v.ty()),
            Dynamic::Table(table) => {
                let mut attrs = BTreeMap::new();
                for (key, item) in table.iter() {
                    let name = self
                        .key_to_string(&key)
                        .ok_or_else(|| keys_must_be_strings().within(path))?;
                    let ty = self.infer_at(&item, &path.attr(name.clone()))?;
                    attrs.insert(name, ty);
                }
                Ok(Type::Object(attrs))
            }
            other @ (Dynamic::Callable(_) | Dynamic::Foreign(_)) => {
                Err(not_allowed(other.kind_name()).within(path))
            }
        })
    }

    /// Stringify a table key the way a string-typed conversion would.
    pub(crate) fn key_to_string(&self, key: &DynValue) -> Option<String> {
        let converted = self.convert_at(key, &Type::String, &Path::root()).ok()?;
        converted.as_str().map(str::to_string)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
