//! Conversion from host values to structural values.
//!
//! Every error carries the path of the offending element relative to the
//! value passed to [`Converter::convert`], so a message reads like
//! `servers[0].port: a number is required`.

use std::collections::BTreeMap;

use lcty_host::{DynValue, Table};
use lcty_value::{
    ensure_sufficient_stack, inconsistent_element_types, index_out_of_range,
    keys_must_be_strings, missing_element, not_allowed, unexpected_key, unify,
    Path, Result, Type, Value,
};

use crate::converter::Converter;
use crate::dynamic::Dynamic;

impl Converter {
    /// Convert a host value to a structural value of type `ty`.
    ///
    /// With `Type::Dynamic` the target type is inferred from the value first.
    /// `nil` converts to the null value of any type. Table keys match object
    /// attributes by their string form, as inference names them.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(kind = value.kind_name(), ty = %ty)
    )]
    pub fn convert(&self, value: &DynValue, ty: &Type) -> Result<Value> {
        self.convert_at(value, ty, &Path::root())
    }

    pub(crate) fn convert_at(&self, value: &DynValue, ty: &Type, path: &Path) -> Result<Value> {
        ensure_sufficient_stack(|| {
            let dynamic = Dynamic::classify(value);
            if let Dynamic::Nil = dynamic {
                return Ok(Value::null(ty.clone()));
            }

            let inferred;
            let ty = if ty.is_dynamic() {
                inferred = self.infer_at(value, path)?;
                &inferred
            } else {
                ty
            };

            if let Dynamic::Wrapped(v) = dynamic {
                return lcty_value::convert(v, ty).map_err(|e| e.within(path));
            }

            match (ty, dynamic) {
                (Type::Bool, _) => Ok(Value::Bool(value.is_truthy())),
                (Type::Number, Dynamic::Number(n)) => {
                    Value::number_from_f64(n).map_err(|e| e.within(path))
                }
                (Type::String, Dynamic::String(s)) => Ok(Value::string(s)),
                (Type::Number | Type::String, _) => self.convert_via_inference(value, ty, path),
                (Type::Object(attrs), Dynamic::Table(table)) => {
                    self.table_to_object(table, attrs, path)
                }
                (Type::Tuple(elements), Dynamic::Table(table)) => {
                    self.table_to_tuple(table, elements, path)
                }
                (Type::Map(element), Dynamic::Table(table)) => {
                    self.table_to_map(table, element, path)
                }
                (Type::List(element), Dynamic::Table(table)) => {
                    let (element, items) = self.table_to_sequence(table, element, path)?;
                    Ok(Value::list(element, items))
                }
                (Type::Set(element), Dynamic::Table(table)) => {
                    let (element, items) = self.table_to_sequence(table, element, path)?;
                    Ok(Value::set(element, items))
                }
                (_, other) => Err(not_allowed(other.kind_name()).within(path)),
            }
        })
    }

    /// Infer the value's own type, then let the structural system convert it.
    fn convert_via_inference(&self, value: &DynValue, ty: &Type, path: &Path) -> Result<Value> {
        let natural = self.convert_at(value, &Type::Dynamic, path)?;
        lcty_value::convert(&natural, ty).map_err(|e| e.within(path))
    }

    /// Declared attributes come from keys whose string form names them, so
    /// `{[0] = "x"}` fills attribute `"0"`; absent ones are null. Any other
    /// key is rejected. A string key wins over a number with the same text.
    fn table_to_object(
        &self,
        table: &Table,
        attrs: &BTreeMap<String, Type>,
        path: &Path,
    ) -> Result<Value> {
        let mut found: BTreeMap<String, DynValue> = BTreeMap::new();
        let mut undeclared = None;
        for (key, item) in table.iter() {
            match self.key_to_string(&key) {
                Some(name) if attrs.contains_key(&name) => {
                    if key.as_str().is_some() {
                        found.insert(name, item);
                    } else {
                        found.entry(name).or_insert(item);
                    }
                }
                _ => {
                    undeclared.get_or_insert(key);
                }
            }
        }

        let mut out = BTreeMap::new();
        for (name, attr_ty) in attrs {
            let item = found.remove(name).unwrap_or(DynValue::Nil);
            let converted = self.convert_at(&item, attr_ty, &path.attr(name.clone()))?;
            out.insert(name.clone(), converted);
        }
        if let Some(key) = undeclared {
            return Err(self.unexpected(&key).within(path));
        }
        Ok(Value::object_from_map(out))
    }

    /// Positions `0..n` come from integer keys; absent ones are null.
    fn table_to_tuple(&self, table: &Table, elements: &[Type], path: &Path) -> Result<Value> {
        let mut out = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            let item = table.get(&index_key(i));
            out.push(self.convert_at(&item, element, &path.index(to_i64(i)))?);
        }
        for (key, _) in table.iter() {
            match integer_key(&key) {
                Some(i) if usize::try_from(i).is_ok_and(|i| i < elements.len()) => {}
                Some(i) => return Err(index_out_of_range(i).within(path)),
                None => return Err(self.unexpected(&key).within(path)),
            }
        }
        Ok(Value::tuple(out))
    }

    /// Every entry becomes a map entry under its stringified key.
    ///
    /// For a `Dynamic` element type the first entry in table order fixes the
    /// element type by inference, and every later entry is converted to it.
    /// A later entry that cannot be converted makes the element types
    /// inconsistent.
    fn table_to_map(&self, table: &Table, element: &Type, path: &Path) -> Result<Value> {
        let declared = !element.is_dynamic();
        let mut element = element.clone();
        let mut entries = BTreeMap::new();
        for (key, item) in table.iter() {
            let name = self
                .key_to_string(&key)
                .ok_or_else(|| keys_must_be_strings().within(path))?;
            let at = path.key(name.clone());
            let converted = if declared {
                self.convert_at(&item, &element, &at)?
            } else if entries.is_empty() {
                let converted = self.convert_at(&item, &Type::Dynamic, &at)?;
                element = converted.ty();
                converted
            } else {
                self.convert_at(&item, &element, &at)
                    .map_err(|_| inconsistent_element_types().within(path))?
            };
            entries.insert(name, converted);
        }
        Ok(Value::map(element, entries))
    }

    /// Elements come from the array part, which must hold every key.
    fn table_to_sequence(
        &self,
        table: &Table,
        element: &Type,
        path: &Path,
    ) -> Result<(Type, Vec<Value>)> {
        let count = table.array_len();
        if let Some((key, _)) = table.iter().nth(count) {
            return Err(match integer_key(&key) {
                Some(i) if i >= 0 => missing_element(count).within(path),
                _ => self.unexpected(&key).within(path),
            });
        }

        let mut items = Vec::with_capacity(count);
        for i in 0..count {
            let item = table.get(&index_key(i));
            items.push(self.convert_at(&item, element, &path.index(to_i64(i)))?);
        }
        if !element.is_dynamic() {
            return Ok((element.clone(), items));
        }

        let types: Vec<Type> = items.iter().map(Value::ty).collect();
        let element = unify(&types).map_err(|e| e.within(path))?;
        let items = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                lcty_value::convert(item, &element).map_err(|e| e.within(&path.index(to_i64(i))))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((element, items))
    }

    fn unexpected(&self, key: &DynValue) -> lcty_value::Error {
        match self.key_to_string(key) {
            Some(name) => unexpected_key(&name),
            None => keys_must_be_strings(),
        }
    }
}

/// Largest magnitude at which every integer is exactly representable.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// The integer value of a numeric key.
#[allow(
    clippy::cast_possible_truncation,
    reason = "integral and within i64 range"
)]
fn integer_key(key: &DynValue) -> Option<i64> {
    let n = key.as_number()?;
    let integral = n.fract() == 0.0 && (-MAX_EXACT_INTEGER..=MAX_EXACT_INTEGER).contains(&n);
    integral.then(|| n as i64)
}

#[allow(
    clippy::cast_precision_loss,
    reason = "positions stay far below 2^53"
)]
fn index_key(i: usize) -> DynValue {
    DynValue::Number(i as f64)
}

fn to_i64(i: usize) -> i64 {
    i64::try_from(i).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
