//! Ordered field maps for flattened XML elements

use crate::error::{ConvertError, Result};

/// Field name to scalar value mapping that keeps source document order.
///
/// Legacy backup elements are flattened into one of these before a handler
/// sees them. Whatever order the fields had in the input is the order they
/// are written out in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        FieldMap { fields: Vec::new() }
    }

    /// Insert a field. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.fields[idx].1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.fields[idx].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove a field, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.fields.remove(idx).1)
    }

    /// Rename a field in place. Returns false when `from` is absent.
    ///
    /// If `to` already exists it is dropped, so the renamed field wins.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.contains(from);
        }
        let Some(idx) = self.position(from) else {
            return false;
        };
        self.fields[idx].0 = to.to_string();
        if let Some(dup) = self
            .fields
            .iter()
            .enumerate()
            .position(|(i, (k, _))| i != idx && k == to)
        {
            self.fields.remove(dup);
        }
        true
    }

    /// Read a mandatory unsigned integer field of `element`.
    pub fn require_u64(&self, element: &str, field: &str) -> Result<u64> {
        let value = self.get(field).ok_or_else(|| ConvertError::MissingField {
            element: element.to_string(),
            field: field.to_string(),
        })?;
        value
            .trim()
            .parse()
            .map_err(|_| ConvertError::InvalidField {
                element: element.to_string(),
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    /// Read an optional integer field; absent, blank or unparsable values give `None`.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(|v| v.trim().parse().ok())
    }

    /// Unsigned counterpart of [`get_i64`](Self::get_i64)
    pub fn get_u64(&self, field: &str) -> Option<u64> {
        self.get(field).and_then(|v| v.trim().parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(k, _)| k == name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
