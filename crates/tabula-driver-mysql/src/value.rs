use mysql_async::{prelude::ToValue, Value as SqlValue};
use tabula_core::{schema::Type, stmt::Value as CoreValue};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a MySQL value to a Tabula value, using the declared column
    /// type when the column is known.
    pub fn from_sql(value: SqlValue, ty: Option<Type>) -> Self {
        let core_value = match value {
            SqlValue::NULL => CoreValue::Null,
            SqlValue::Int(v) => CoreValue::I64(v),
            SqlValue::UInt(v) => match i64::try_from(v) {
                Ok(v) => CoreValue::I64(v),
                Err(_) => CoreValue::String(v.to_string()),
            },
            SqlValue::Float(v) => CoreValue::F64(v.into()),
            SqlValue::Double(v) => CoreValue::F64(v),
            SqlValue::Bytes(bytes) => match ty {
                Some(Type::Blob) => CoreValue::Bytes(bytes),
                _ => match String::from_utf8(bytes) {
                    Ok(v) => CoreValue::String(v),
                    Err(err) => CoreValue::Bytes(err.into_bytes()),
                },
            },
            SqlValue::Date(year, month, day, hour, minute, second, micros) => {
                CoreValue::String(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micros:06}"
                ))
            }
            SqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
                let sign = if negative { "-" } else { "" };
                let hours = u32::from(hours) + days * 24;
                CoreValue::String(format!(
                    "{sign}{hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
                ))
            }
        };

        Value(match ty {
            Some(ty) => ty.decode(core_value),
            None => core_value,
        })
    }
}

impl ToValue for Value {
    fn to_value(&self) -> SqlValue {
        match &self.0 {
            CoreValue::Null => SqlValue::NULL,
            CoreValue::Bool(value) => value.to_value(),
            CoreValue::I64(value) => value.to_value(),
            CoreValue::F64(value) => value.to_value(),
            CoreValue::String(value) => value.to_value(),
            CoreValue::Bytes(value) => SqlValue::Bytes(value.clone()),
            value @ CoreValue::Array(_) => value.to_json_string().to_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_using_column_type() {
        let text = SqlValue::Bytes(b"hello".to_vec());
        assert_eq!(Value::from_sql(text, None).into_inner(), CoreValue::from("hello"));

        let blob = SqlValue::Bytes(vec![0, 159]);
        assert_eq!(
            Value::from_sql(blob, Some(Type::Blob)).into_inner(),
            CoreValue::Bytes(vec![0, 159])
        );

        let flag = SqlValue::Int(1);
        assert_eq!(
            Value::from_sql(flag, Some(Type::Boolean)).into_inner(),
            CoreValue::Bool(true)
        );

        let json = SqlValue::Bytes(br#"["a"]"#.to_vec());
        let decoded = Value::from_sql(json, Some(Type::Array)).into_inner();
        assert_eq!(decoded.get_path(&["0"]), Some(&CoreValue::from("a")));
    }

    #[test]
    fn encodes_arrays_as_json() {
        let array = CoreValue::from_json_str(r#"{"k":1}"#).unwrap();
        assert_eq!(
            Value::from(array).to_value(),
            SqlValue::Bytes(br#"{"k":1}"#.to_vec())
        );
        assert_eq!(Value::from(CoreValue::Null).to_value(), SqlValue::NULL);
    }
}
