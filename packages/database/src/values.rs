//! Conversion of store rows into [`QueryResult`]s.

use securecheck_database_models::{QueryResult, ResultRow};
use serde_json::{Number, Value};
use switchy_database::{DatabaseValue, Row};

pub fn rows_to_result(rows: &[Row]) -> QueryResult {
    let columns = rows
        .first()
        .map(|row| row.columns.iter().map(|(name, _)| name.clone()).collect())
        .unwrap_or_default();

    let rows = rows
        .iter()
        .map(|row| {
            row.columns
                .iter()
                .map(|(name, value)| (name.clone(), to_json(value)))
                .collect::<ResultRow>()
        })
        .collect();

    QueryResult::new(columns, rows)
}

pub fn to_json(value: &DatabaseValue) -> Value {
    match value {
        DatabaseValue::Null => Value::Null,
        DatabaseValue::String(s) => Value::String(s.clone()),
        DatabaseValue::StringOpt(s) => s.clone().map_or(Value::Null, Value::String),
        DatabaseValue::Bool(b) => Value::Bool(*b),
        DatabaseValue::BoolOpt(b) => b.map_or(Value::Null, Value::Bool),
        DatabaseValue::Int8(n) => Value::from(*n),
        DatabaseValue::Int8Opt(n) => n.map_or(Value::Null, Value::from),
        DatabaseValue::Int16(n) => Value::from(*n),
        DatabaseValue::Int16Opt(n) => n.map_or(Value::Null, Value::from),
        DatabaseValue::Int32(n) => Value::from(*n),
        DatabaseValue::Int32Opt(n) => n.map_or(Value::Null, Value::from),
        DatabaseValue::Int64(n) => Value::from(*n),
        DatabaseValue::Int64Opt(n) => n.map_or(Value::Null, Value::from),
        DatabaseValue::UInt8(n) => Value::from(*n),
        DatabaseValue::UInt8Opt(n) => n.map_or(Value::Null, Value::from),
        DatabaseValue::UInt16(n) => Value::from(*n),
        DatabaseValue::UInt16Opt(n) => n.map_or(Value::Null, Value::from),
        DatabaseValue::UInt32(n) => Value::from(*n),
        DatabaseValue::UInt32Opt(n) => n.map_or(Value::Null, Value::from),
        DatabaseValue::UInt64(n) => Value::from(*n),
        DatabaseValue::UInt64Opt(n) => n.map_or(Value::Null, Value::from),
        DatabaseValue::Real32(n) => float(f64::from(*n)),
        DatabaseValue::Real32Opt(n) => n.map_or(Value::Null, |n| float(f64::from(n))),
        DatabaseValue::Real64(n) => float(*n),
        DatabaseValue::Real64Opt(n) => n.map_or(Value::Null, float),
        DatabaseValue::DateTime(dt) => Value::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        // Statement-side values (`Now`, `NowPlus`) and feature-gated column
        // types never come back from the reports or the stops table.
        #[allow(unreachable_patterns)]
        _ => {
            log::warn!("Unsupported column value type, rendering as NULL");
            Value::Null
        }
    }
}

fn float(n: f64) -> Value {
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_and_narrow_variants_convert() {
        assert_eq!(to_json(&DatabaseValue::Int8(1)), Value::from(1));
        assert_eq!(to_json(&DatabaseValue::UInt64Opt(Some(42))), Value::from(42));
        assert_eq!(to_json(&DatabaseValue::StringOpt(None)), Value::Null);
        assert_eq!(
            to_json(&DatabaseValue::StringOpt(Some("Speeding".to_string()))),
            Value::String("Speeding".to_string())
        );
        assert_eq!(to_json(&DatabaseValue::Real32(0.5)), float(0.5));
        assert_eq!(to_json(&DatabaseValue::BoolOpt(Some(true))), Value::Bool(true));
        assert_eq!(to_json(&DatabaseValue::Int64Opt(None)), Value::Null);
    }

    #[test]
    fn text_is_kept_verbatim() {
        let name = "O\"Brien \\ Sons\n".to_string();
        assert_eq!(
            to_json(&DatabaseValue::StringOpt(Some(name.clone()))),
            Value::String(name.clone())
        );
        assert_eq!(to_json(&DatabaseValue::String(name.clone())), Value::String(name));
    }

    #[test]
    fn known_variants_convert_directly() {
        assert_eq!(to_json(&DatabaseValue::Null), Value::Null);
        assert_eq!(to_json(&DatabaseValue::Int64(7)), Value::from(7));
        assert_eq!(
            to_json(&DatabaseValue::String("USA".to_string())),
            Value::String("USA".to_string())
        );
        assert_eq!(to_json(&DatabaseValue::Real64(f64::NAN)), Value::Null);
    }
}
