//! Serialization of query results to CSV and JSON.
//!
//! Both exporters take an explicit column list so the output has a
//! stable shape even though individual rows may miss keys. Missing and
//! null cells render as empty CSV fields and JSON `null`.

use rowql_core::{Error, Result, Row, Value};
use serde_json::{Map, Number, Value as JsonValue};

/// Serialize rows as semicolon-delimited CSV with a header record.
///
/// Fields containing the delimiter, quotes, or line breaks are quoted
/// and quote-escaped.
pub fn to_csv(columns: &[String], rows: &[Row]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer
        .write_record(columns)
        .map_err(|e| Error::Export(e.to_string()))?;
    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| cell_text(row.get(column)))
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| Error::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

/// Serialize rows as a pretty-printed JSON array of objects.
pub fn to_json(columns: &[String], rows: &[Row]) -> Result<String> {
    let objects: Vec<JsonValue> = rows.iter().map(|row| row_object(columns, row)).collect();
    serde_json::to_string_pretty(&objects).map_err(|e| Error::Export(e.to_string()))
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => value.to_string(),
    }
}

fn row_object(columns: &[String], row: &Row) -> JsonValue {
    let mut object = Map::new();
    for column in columns {
        object.insert(column.clone(), json_value(row.get(column)));
    }
    JsonValue::Object(object)
}

/// Numbers that are mathematically integers serialize without a decimal
/// point; everything else stays a float.
fn json_value(value: Option<&Value>) -> JsonValue {
    match value {
        None | Some(Value::Null) => JsonValue::Null,
        Some(Value::Number(n)) => {
            if n.fract() == 0.0 && n.is_finite() && n.abs() < 9.0e15 {
                JsonValue::Number(Number::from(*n as i64))
            } else {
                Number::from_f64(*n)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            }
        }
        Some(Value::Text(text)) => JsonValue::String(text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(cells: &[(&str, Value)]) -> Row {
        cells
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_csv_uses_semicolons_and_quotes_when_needed() {
        let rows = vec![
            row(&[("name", "Ada".into()), ("note", "a;b".into())]),
            row(&[("name", "Bob".into())]),
        ];
        let output = to_csv(&columns(&["name", "note"]), &rows).unwrap();
        assert_eq!(output, "name;note\nAda;\"a;b\"\nBob;\n");
    }

    #[test]
    fn test_csv_renders_numbers_plainly() {
        let rows = vec![row(&[("v", 4.0.into()), ("w", 2.5.into())])];
        let output = to_csv(&columns(&["v", "w"]), &rows).unwrap();
        assert_eq!(output, "v;w\n4;2.5\n");
    }

    #[test]
    fn test_json_types_and_nulls() {
        let rows = vec![
            row(&[("name", "Ada".into()), ("age", 36.0.into())]),
            row(&[("name", "Bob".into()), ("age", Value::Null)]),
            row(&[("name", "Cleo".into())]),
        ];
        let output = to_json(&columns(&["name", "age"]), &rows).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed,
            json!([
                { "name": "Ada", "age": 36 },
                { "name": "Bob", "age": null },
                { "name": "Cleo", "age": null },
            ])
        );
    }

    #[test]
    fn test_json_keeps_fractional_numbers() {
        let rows = vec![row(&[("v", 2.5.into())])];
        let output = to_json(&columns(&["v"]), &rows).unwrap();
        assert!(output.contains("2.5"));
    }

    #[test]
    fn test_empty_row_set_still_has_csv_header() {
        let output = to_csv(&columns(&["a", "b"]), &[]).unwrap();
        assert_eq!(output, "a;b\n");
    }
}
