//! Response validation.
//!
//! The model's reply must parse as JSON and be an object at the top level.
//! Nothing is repaired: no fence stripping, no partial recovery. In strict
//! mode the object is additionally walked against the template's key lists
//! and the first violation is reported with its JSON path.

use serde_json::{Map, Value};

use cvjson_core::error::{CvJsonError, Result};
use cvjson_core::record::{StructuredRecord, ValidationMode};
use cvjson_core::template::{HistorySection, SchemaSpec};

pub fn validate(raw: &str, schema: &SchemaSpec, mode: ValidationMode) -> Result<StructuredRecord> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CvJsonError::MalformedJson(e.to_string()))?;

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(CvJsonError::UnexpectedShape(format!(
                "expected a JSON object at the top level, got {}",
                type_name(&other)
            )))
        }
    };

    if mode == ValidationMode::Strict {
        check_schema(&fields, schema)?;
    }

    Ok(StructuredRecord::new(fields))
}

fn check_schema(fields: &Map<String, Value>, schema: &SchemaSpec) -> Result<()> {
    for key in schema.top_level_keys {
        object_at(fields, key, key)?;
    }

    let employee = object_at(fields, "employee", "employee")?;
    for key in schema.employee_fields {
        string_at(employee, key, &format!("employee.{key}"))?;
    }
    let biodata = object_at(employee, "biodata", "employee.biodata")?;
    for key in schema.biodata_fields {
        string_at(biodata, key, &format!("employee.biodata.{key}"))?;
    }

    let histories = object_at(fields, "histories", "histories")?;
    for section in schema.history_sections {
        check_section(histories, section)?;
    }

    Ok(())
}

fn check_section(histories: &Map<String, Value>, section: &HistorySection) -> Result<()> {
    let path = format!("histories.{}", section.name);
    let items = match histories.get(section.name) {
        Some(Value::Array(items)) => items,
        Some(other) => return Err(wrong_type(&path, "an array", other)),
        None => return Err(missing(&path)),
    };

    for (index, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{index}]");
        let Value::Object(item) = item else {
            return Err(wrong_type(&item_path, "an object", item));
        };
        for key in section.required_fields {
            string_at(item, key, &format!("{item_path}.{key}"))?;
        }
        for key in section.optional_fields {
            if let Some(value) = item.get(*key) {
                if !value.is_string() {
                    return Err(wrong_type(&format!("{item_path}.{key}"), "a string", value));
                }
            }
        }
    }

    Ok(())
}

fn object_at<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Map<String, Value>> {
    match fields.get(key) {
        Some(Value::Object(inner)) => Ok(inner),
        Some(other) => Err(wrong_type(path, "an object", other)),
        None => Err(missing(path)),
    }
}

fn string_at(fields: &Map<String, Value>, key: &str, path: &str) -> Result<()> {
    match fields.get(key) {
        Some(Value::String(_)) => Ok(()),
        Some(other) => Err(wrong_type(path, "a string", other)),
        None => Err(missing(path)),
    }
}

fn missing(path: &str) -> CvJsonError {
    CvJsonError::UnexpectedShape(format!("missing required key '{path}'"))
}

fn wrong_type(path: &str, expected: &str, found: &Value) -> CvJsonError {
    CvJsonError::UnexpectedShape(format!(
        "'{path}' must be {expected}, got {}",
        type_name(found)
    ))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
