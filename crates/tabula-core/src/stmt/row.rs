use super::{Array, Value};
use crate::{Error, Result};

use indexmap::IndexMap;

/// A single table row: column name to value, in column order.
///
/// Column names are stored lower-cased, matching the schema's canonical
/// names.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn set(mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Option<Value> {
        self.columns
            .insert(column.as_ref().to_lowercase(), value.into())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        match self.columns.get(column) {
            Some(value) => Some(value),
            None => self.columns.get(&column.to_lowercase()),
        }
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &Value)> {
        self.columns
            .get_index(index)
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.columns.shift_remove(&column.to_lowercase())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> + '_ {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_columns(self) -> Array {
        self.columns
    }
}

impl TryFrom<Value> for Row {
    type Error = Error;

    fn try_from(value: Value) -> Result<Row> {
        match value {
            Value::Array(array) => Ok(array.into_iter().collect()),
            other => Err(Error::invalid_argument(format!(
                "expected a row of column values, got {other}"
            ))),
        }
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl<K: AsRef<str>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Row {
    fn from(columns: [(K, V); N]) -> Self {
        columns.into_iter().collect()
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_are_case_insensitive() {
        let row = Row::new().set("Guestbook_Name", "Ann");
        assert_eq!(row.get("guestbook_name"), Some(&Value::from("Ann")));
        assert_eq!(row.get("GUESTBOOK_NAME"), Some(&Value::from("Ann")));
    }

    #[test]
    fn keeps_insertion_order() {
        let row = Row::from([("b", 1), ("a", 2)]);
        assert_eq!(row.columns().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn scalar_is_not_a_row() {
        let err = Row::try_from(Value::from(1)).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
