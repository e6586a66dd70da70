use crate::stmt::Value;

/// Declared column type. Drives validation of input values and the coercion
/// applied before values are bound as query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Integer,

    Float,

    Boolean,

    /// Short string, optionally bounded to a maximum number of characters
    String(Option<u64>),

    /// Unbounded text
    Text,

    /// Structured value. Stored serialized, addressable by sub-path.
    Array,

    /// Raw bytes
    Blob,
}

impl Type {
    /// Coerces `value` into this type. `NULL` passes through untouched; the
    /// column decides whether it is acceptable. On failure the error message
    /// describes the mismatch.
    pub fn coerce(&self, value: Value) -> Result<Value, String> {
        if value.is_null() {
            return Ok(value);
        }

        match (self, value) {
            (Type::Integer, Value::I64(v)) => Ok(Value::I64(v)),
            (Type::Integer, Value::Bool(v)) => Ok(Value::I64(v.into())),
            (Type::Integer, Value::F64(v)) if v.fract() == 0.0 => {
                // 2^63 is exactly representable; i64::MAX is not
                if v >= i64::MIN as f64 && v < i64::MAX as f64 {
                    Ok(Value::I64(v as i64))
                } else {
                    Err(format!("integer out of range: {v}"))
                }
            }
            (Type::Integer, Value::String(v)) => v
                .trim()
                .parse::<i64>()
                .map(Value::I64)
                .map_err(|_| format!("expected integer, got {v:?}")),

            (Type::Float, Value::F64(v)) => Ok(Value::F64(v)),
            (Type::Float, Value::I64(v)) => Ok(Value::F64(v as f64)),
            (Type::Float, Value::String(v)) => v
                .trim()
                .parse::<f64>()
                .map(Value::F64)
                .map_err(|_| format!("expected float, got {v:?}")),

            (Type::Boolean, Value::Bool(v)) => Ok(Value::Bool(v)),
            (Type::Boolean, Value::I64(v @ (0 | 1))) => Ok(Value::Bool(v == 1)),
            (Type::Boolean, Value::String(v)) => match v.trim().to_lowercase().as_str() {
                "1" | "true" => Ok(Value::Bool(true)),
                "0" | "false" | "" => Ok(Value::Bool(false)),
                _ => Err(format!("expected boolean, got {v:?}")),
            },

            (Type::String(max), value) => {
                let s = match value {
                    Value::String(s) => s,
                    Value::I64(v) => v.to_string(),
                    Value::F64(v) => v.to_string(),
                    Value::Bool(v) => u8::from(v).to_string(),
                    other => return Err(format!("expected string, got {other}")),
                };
                match max {
                    Some(max) if s.chars().count() as u64 > *max => Err(format!(
                        "string of {} characters exceeds maximum length {max}",
                        s.chars().count()
                    )),
                    _ => Ok(Value::String(s)),
                }
            }
            (Type::Text, Value::String(s)) => Ok(Value::String(s)),
            (Type::Text, value @ (Value::I64(_) | Value::F64(_))) => {
                Ok(Value::String(value.to_key().unwrap_or_default()))
            }
            (Type::Text, Value::Bool(v)) => Ok(Value::String(u8::from(v).to_string())),

            (Type::Array, Value::Array(v)) => Ok(Value::Array(v)),

            (Type::Blob, Value::Bytes(v)) => Ok(Value::Bytes(v)),
            (Type::Blob, Value::String(v)) => Ok(Value::Bytes(v.into_bytes())),

            (ty, other) => Err(format!("expected {}, got {other}", ty.name())),
        }
    }

    /// Converts a value read back from a database into this type's runtime
    /// shape: arrays are stored as JSON text, booleans as integers.
    pub fn decode(&self, value: Value) -> Value {
        match (self, value) {
            (Type::Array, Value::String(src)) => {
                Value::from_json_str(&src).unwrap_or(Value::String(src))
            }
            (Type::Array, Value::Bytes(src)) => match String::from_utf8(src) {
                Ok(src) => Value::from_json_str(&src).unwrap_or(Value::String(src)),
                Err(err) => Value::Bytes(err.into_bytes()),
            },
            // JSON stores bytes as a list of numbers.
            (Type::Blob, Value::Array(items)) => {
                let bytes: Option<Vec<u8>> = items
                    .values()
                    .map(|item| item.as_i64().and_then(|b| u8::try_from(b).ok()))
                    .collect();
                match bytes {
                    Some(bytes) => Value::Bytes(bytes),
                    None => Value::Array(items),
                }
            }
            (Type::Blob, Value::String(v)) => Value::Bytes(v.into_bytes()),
            (Type::Boolean, Value::I64(v)) => Value::Bool(v != 0),
            (Type::Boolean, Value::String(v)) if v == "0" || v == "1" => Value::Bool(v == "1"),
            (Type::Integer, Value::String(v)) => match v.parse() {
                Ok(v) => Value::I64(v),
                Err(_) => Value::String(v),
            },
            (Type::Float, Value::I64(v)) => Value::F64(v as f64),
            (Type::String(_) | Type::Text, Value::Bytes(v)) => match String::from_utf8(v) {
                Ok(v) => Value::String(v),
                Err(err) => Value::Bytes(err.into_bytes()),
            },
            (_, value) => value,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Type::Integer => "integer",
            Type::Float => "float",
            Type::Boolean => "boolean",
            Type::String(_) => "string",
            Type::Text => "text",
            Type::Array => "array",
            Type::Blob => "blob",
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_stored_values() {
        let mut array = crate::stmt::Array::new();
        array.insert("0".to_string(), Value::from("a"));
        assert_eq!(
            Type::Array.decode(Value::from(r#"["a"]"#)),
            Value::Array(array)
        );
        assert_eq!(Type::Boolean.decode(Value::I64(1)), Value::Bool(true));
        assert_eq!(Type::Integer.decode(Value::from("12")), Value::I64(12));
        assert_eq!(Type::Text.decode(Value::from("x")), Value::from("x"));
    }

    #[test]
    fn integer_from_numeric_string() {
        assert_eq!(Type::Integer.coerce(Value::from(" 42 ")), Ok(Value::I64(42)));
        assert!(Type::Integer.coerce(Value::from("4x")).is_err());
        assert!(Type::Integer.coerce(Value::F64(1.5)).is_err());
    }

    #[test]
    fn integer_from_float_stays_in_range() {
        assert_eq!(Type::Integer.coerce(Value::F64(-3.0)), Ok(Value::I64(-3)));
        assert_eq!(
            Type::Integer.coerce(Value::F64(-9_223_372_036_854_775_808.0)),
            Ok(Value::I64(i64::MIN))
        );
        assert!(Type::Integer.coerce(Value::F64(1e300)).is_err());
        assert!(Type::Integer.coerce(Value::F64(9_223_372_036_854_775_808.0)).is_err());
        assert!(Type::Integer.coerce(Value::F64(f64::INFINITY)).is_err());
        assert!(Type::Integer.coerce(Value::F64(f64::NAN)).is_err());
    }

    #[test]
    fn string_length_is_enforced() {
        let ty = Type::String(Some(3));
        assert_eq!(ty.coerce(Value::from("abc")), Ok(Value::from("abc")));
        assert!(ty.coerce(Value::from("abcd")).is_err());
        assert_eq!(ty.coerce(Value::from(12)), Ok(Value::from("12")));
    }

    #[test]
    fn boolean_forms() {
        assert_eq!(Type::Boolean.coerce(Value::from("true")), Ok(Value::Bool(true)));
        assert_eq!(Type::Boolean.coerce(Value::from(0)), Ok(Value::Bool(false)));
        assert!(Type::Boolean.coerce(Value::from(2)).is_err());
    }

    #[test]
    fn null_passes_through() {
        assert_eq!(Type::Array.coerce(Value::Null), Ok(Value::Null));
    }

    #[test]
    fn array_requires_array() {
        assert!(Type::Array.coerce(Value::from("[]")).is_err());
    }
}
