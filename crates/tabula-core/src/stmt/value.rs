use super::Row;
use crate::{Error, Result};

use indexmap::IndexMap;
use std::fmt;

/// Ordered, string-keyed map. The stored shape of array-typed columns, and the
/// shape `select` uses to hand back rows and lists of rows.
pub type Array = IndexMap<String, Value>;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// Double precision float
    F64(f64),

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Nested, ordered map of values
    Array(Array),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// An empty value is null or an empty array. `select` returns an empty
    /// array for rows that do not exist.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Array(array) => array.is_empty(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            Self::I64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Array> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Renders a scalar as a map key. Row keys and array sub-paths are
    /// strings, so integer keys become their decimal form.
    pub fn to_key(&self) -> Option<String> {
        match self {
            Self::I64(v) => Some(v.to_string()),
            Self::String(v) => Some(v.clone()),
            Self::Bool(v) => Some(u8::from(*v).to_string()),
            Self::F64(v) => Some(v.to_string()),
            _ => None,
        }
    }

    /// Looks up a nested element by sub-path. An empty path returns `self`.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let mut value = self;
        for segment in path {
            value = value.as_array()?.get(segment.as_ref())?;
        }
        Some(value)
    }

    /// Replaces the element addressed by `path`, creating intermediate arrays
    /// where they are missing. Fails when a scalar sits on the path.
    pub fn set_path<S: AsRef<str>>(&mut self, path: &[S], new: Value) -> Result<()> {
        let Some((last, parents)) = path.split_last() else {
            *self = new;
            return Ok(());
        };

        let mut value = self;
        for segment in parents {
            if value.is_null() {
                *value = Value::Array(Array::new());
            }
            let Value::Array(array) = value else {
                return Err(Error::invalid_argument(format!(
                    "cannot descend into scalar at `{}`",
                    segment.as_ref()
                )));
            };
            value = array
                .entry(segment.as_ref().to_string())
                .or_insert(Value::Null);
        }

        if value.is_null() {
            *value = Value::Array(Array::new());
        }
        match value {
            Value::Array(array) => {
                array.insert(last.as_ref().to_string(), new);
                Ok(())
            }
            _ => Err(Error::invalid_argument(format!(
                "cannot set `{}` on a scalar value",
                last.as_ref()
            ))),
        }
    }

    /// Converts to a JSON value. Bytes become an array of numbers.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Null => Json::Null,
            Self::Bool(v) => Json::Bool(*v),
            Self::I64(v) => Json::from(*v),
            Self::F64(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Self::String(v) => Json::String(v.clone()),
            Self::Bytes(v) => Json::Array(v.iter().map(|b| Json::from(*b)).collect()),
            Self::Array(array) => Json::Object(
                array
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Converts from a JSON value. JSON lists become arrays keyed by position.
    pub fn from_json(json: serde_json::Value) -> Value {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(v) => Self::Bool(v),
            Json::Number(n) => match n.as_i64() {
                Some(v) => Self::I64(v),
                None => Self::F64(n.as_f64().unwrap_or_default()),
            },
            Json::String(v) => Self::String(v),
            Json::Array(items) => Self::Array(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), Value::from_json(item)))
                    .collect(),
            ),
            Json::Object(map) => Self::Array(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Serializes an array value to the JSON text SQL drivers store.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    pub fn from_json_str(src: &str) -> Result<Value> {
        Ok(Value::from_json(serde_json::from_str(src)?))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::Array(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src.into())
    }
}

impl From<u32> for Value {
    fn from(src: u32) -> Self {
        Self::I64(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl From<Array> for Value {
    fn from(src: Array) -> Self {
        Self::Array(src)
    }
}

impl From<Row> for Value {
    fn from(src: Row) -> Self {
        Self::Array(src.into_columns())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_path_creates_intermediate_arrays() {
        let mut value = Value::Null;
        value.set_path(&["a", "b"], Value::from(1)).unwrap();

        assert_eq!(value.get_path(&["a", "b"]), Some(&Value::I64(1)));
        assert_eq!(value.get_path(&["a", "c"]), None);
    }

    #[test]
    fn set_path_keeps_siblings() {
        let mut value = Value::from_json_str(r#"{"a": {"b": 1, "c": 2}, "d": 3}"#).unwrap();
        value.set_path(&["a", "b"], Value::from("x")).unwrap();

        assert_eq!(
            value.to_json(),
            serde_json::json!({"a": {"b": "x", "c": 2}, "d": 3})
        );
    }

    #[test]
    fn set_path_through_scalar_fails() {
        let mut value = Value::from_json_str(r#"{"a": 5}"#).unwrap();
        let err = value.set_path(&["a", "b"], Value::from(1)).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn json_lists_are_keyed_by_position() {
        let value = Value::from_json_str(r#"["x", "y"]"#).unwrap();
        assert_eq!(value.get_path(&["1"]), Some(&Value::from("y")));
    }

    #[test]
    fn empty_values() {
        assert!(Value::Null.is_empty());
        assert!(Value::Array(Array::new()).is_empty());
        assert!(!Value::from(0).is_empty());
    }
}
