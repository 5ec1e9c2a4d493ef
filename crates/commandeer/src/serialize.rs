//! Serde-backed formatter.
//!
//! [`SerdeFormatter`] renders structured payloads in the formats the
//! option contract names: `json`, `yaml`, `xml`, `csv`, and the fixed
//! scalar format `string` that field mode forces. CSV output flattens the
//! JSON shape first: an array of objects becomes header plus rows, a
//! single object becomes key/value pairs, a scalar becomes one value.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::format::RenderConfig;
use crate::render::{Formatter, RenderError};

/// Errors that can occur while serializing a payload.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("CSV serialization failed: {0}")]
    Csv(String),
}

/// Serializes a payload to pretty-printed JSON.
pub fn to_json<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Serializes a payload to YAML.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(data)?)
}

/// Serializes a payload to XML under a `result` root element.
///
/// Object keys are sanitized into valid XML element names; arrays and
/// scalars are wrapped as a `value` child so every payload shape has a
/// well-formed rendering.
pub fn to_xml<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    let sanitized = sanitize_xml_keys(&serde_json::to_value(data)?);
    let rooted = match sanitized {
        Value::Object(_) => sanitized,
        Value::Null => Value::Object(serde_json::Map::new()),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("value".to_string(), other);
            Value::Object(map)
        }
    };
    Ok(quick_xml::se::to_string_with_root("result", &rooted)?)
}

/// Recursively rewrites object keys into valid XML element names.
fn sanitize_xml_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (sanitize_xml_name(k), sanitize_xml_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_xml_keys).collect()),
        other => other.clone(),
    }
}

/// XML names start with a letter or underscore; later characters may add
/// digits, hyphens, and periods. Everything else becomes an underscore.
fn sanitize_xml_name(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    let mut result = String::with_capacity(name.len() + 1);
    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            if c.is_ascii_alphabetic() || c == '_' {
                result.push(c);
            } else {
                result.push('_');
                if c.is_ascii_alphanumeric() {
                    result.push(c);
                }
            }
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
            result.push(c);
        } else {
            result.push('_');
        }
    }
    result
}

/// Serializes a payload to CSV by flattening its JSON shape.
pub fn to_csv<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    let value = serde_json::to_value(data)?;
    let mut writer = csv::Writer::from_writer(Vec::new());

    match &value {
        Value::Array(items) if !items.is_empty() => {
            if let Some(Value::Object(first)) = items.first() {
                let headers: Vec<&str> = first.keys().map(String::as_str).collect();
                write_record(&mut writer, headers.iter().copied())?;
                for item in items {
                    if let Value::Object(row) = item {
                        let cells: Vec<String> = headers
                            .iter()
                            .map(|h| row.get(*h).map(scalar_string).unwrap_or_default())
                            .collect();
                        write_record(&mut writer, cells.iter().map(String::as_str))?;
                    }
                }
            } else {
                write_record(&mut writer, ["value"])?;
                for item in items {
                    write_record(&mut writer, [scalar_string(item).as_str()])?;
                }
            }
        }
        Value::Object(map) => {
            write_record(&mut writer, ["key", "value"])?;
            for (key, val) in map {
                write_record(&mut writer, [key.as_str(), scalar_string(val).as_str()])?;
            }
        }
        scalar => {
            write_record(&mut writer, ["value"])?;
            write_record(&mut writer, [scalar_string(scalar).as_str()])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SerializeError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SerializeError::Csv(e.to_string()))
}

fn write_record<'a, W, I>(writer: &mut csv::Writer<W>, record: I) -> Result<(), SerializeError>
where
    W: Write,
    I: IntoIterator<Item = &'a str>,
{
    writer
        .write_record(record)
        .map_err(|e| SerializeError::Csv(e.to_string()))
}

/// Renders a JSON value as a bare string: strings verbatim, null empty,
/// everything else compact JSON.
fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The serde-backed [`Formatter`] implementation.
///
/// Falls back to `json` when no format resolved for the invocation.
#[derive(Debug, Clone)]
pub struct SerdeFormatter {
    default_format: String,
}

impl SerdeFormatter {
    /// Creates a formatter defaulting to `json`.
    pub fn new() -> Self {
        Self {
            default_format: "json".to_string(),
        }
    }

    /// Overrides the format used when none resolves from the options.
    pub fn with_default(mut self, format: impl Into<String>) -> Self {
        self.default_format = format.into();
        self
    }

    fn render(&self, format: &str, payload: &Value, config: &RenderConfig) -> Result<String, RenderError> {
        match format {
            "json" => Ok(to_json(payload)?),
            "yaml" => Ok(to_yaml(payload)?),
            "xml" => Ok(to_xml(payload)?),
            "csv" => Ok(to_csv(payload)?),
            "string" => render_string(payload, config),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

impl Default for SerdeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for SerdeFormatter {
    fn write(
        &self,
        stream: &mut dyn Write,
        format: Option<&str>,
        payload: &Value,
        config: &RenderConfig,
    ) -> Result<(), RenderError> {
        let name = format.unwrap_or(&self.default_format);
        let rendered = self.render(name, payload, config)?;
        if rendered.ends_with('\n') {
            write!(stream, "{}", rendered)?;
        } else {
            writeln!(stream, "{}", rendered)?;
        }
        Ok(())
    }
}

/// The `string` format: a scalar, or the single field that field mode
/// selected. Arrays of objects print the field once per row.
fn render_string(payload: &Value, config: &RenderConfig) -> Result<String, RenderError> {
    let Some(field) = config.field() else {
        return Ok(scalar_string(payload));
    };

    match payload {
        Value::Object(map) => map
            .get(field)
            .map(scalar_string)
            .ok_or_else(|| RenderError::UnknownField(field.to_string())),
        Value::Array(items) => {
            let mut lines = Vec::with_capacity(items.len());
            for item in items {
                let cell = item
                    .as_object()
                    .and_then(|row| row.get(field))
                    .ok_or_else(|| RenderError::UnknownField(field.to_string()))?;
                lines.push(scalar_string(cell));
            }
            Ok(lines.join("\n"))
        }
        _ => Err(RenderError::UnknownField(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AnnotationData, Options};
    use serde_json::json;

    fn config_with_field(field: &str) -> RenderConfig {
        RenderConfig::new(&AnnotationData::new(), &Options::new().with("field", field))
    }

    fn write_to_string(
        formatter: &SerdeFormatter,
        format: Option<&str>,
        payload: &Value,
        config: &RenderConfig,
    ) -> String {
        let mut buf = Vec::new();
        formatter.write(&mut buf, format, payload, config).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_json_round_trips() {
        let payload = json!({"a": 1, "b": 2});
        let out = write_to_string(
            &SerdeFormatter::new(),
            Some("json"),
            &payload,
            &RenderConfig::default(),
        );
        let back: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_default_format_is_json() {
        let out = write_to_string(
            &SerdeFormatter::new(),
            None,
            &json!({"k": "v"}),
            &RenderConfig::default(),
        );
        assert!(out.contains("\"k\": \"v\""));
    }

    #[test]
    fn test_yaml() {
        let out = write_to_string(
            &SerdeFormatter::new(),
            Some("yaml"),
            &json!({"name": "test", "count": 42}),
            &RenderConfig::default(),
        );
        assert!(out.contains("name: test"));
        assert!(out.contains("count: 42"));
    }

    #[test]
    fn test_xml() {
        let out = write_to_string(
            &SerdeFormatter::new(),
            Some("xml"),
            &json!({"name": "test"}),
            &RenderConfig::default(),
        );
        assert!(out.contains("<name>test</name>"));
    }

    #[test]
    fn test_xml_wraps_scalars_and_sanitizes_keys() {
        let out = to_xml(&json!("hello")).unwrap();
        assert!(out.contains("<value>hello</value>"));

        let out = to_xml(&json!({"0": "zero"})).unwrap();
        assert!(out.contains("<_0>zero</_0>"));
    }

    #[test]
    fn test_csv_array_of_objects() {
        let payload = json!([
            {"name": "alpha", "size": 1},
            {"name": "beta", "size": 2}
        ]);
        let out = to_csv(&payload).unwrap();
        assert!(out.starts_with("name,size\n") || out.starts_with("size,name\n"));
        assert!(out.contains("alpha"));
        assert!(out.contains("beta"));
    }

    #[test]
    fn test_csv_single_object() {
        let out = to_csv(&json!({"name": "alpha", "size": 1})).unwrap();
        assert!(out.contains("key,value"));
        assert!(out.contains("name,alpha"));
        assert!(out.contains("size,1"));
    }

    #[test]
    fn test_csv_scalar() {
        let out = to_csv(&json!(true)).unwrap();
        assert_eq!(out, "value\ntrue\n");
    }

    #[test]
    fn test_string_scalar_without_field() {
        let out = write_to_string(
            &SerdeFormatter::new(),
            Some("string"),
            &json!(3.5),
            &RenderConfig::default(),
        );
        assert_eq!(out, "3.5\n");
    }

    #[test]
    fn test_string_field_from_object() {
        let out = write_to_string(
            &SerdeFormatter::new(),
            Some("string"),
            &json!({"name": "alpha", "size": 1}),
            &config_with_field("name"),
        );
        assert_eq!(out, "alpha\n");
    }

    #[test]
    fn test_string_field_from_rows() {
        let out = write_to_string(
            &SerdeFormatter::new(),
            Some("string"),
            &json!([{"name": "alpha"}, {"name": "beta"}]),
            &config_with_field("name"),
        );
        assert_eq!(out, "alpha\nbeta\n");
    }

    #[test]
    fn test_string_missing_field_errors() {
        let mut buf = Vec::new();
        let err = SerdeFormatter::new()
            .write(
                &mut buf,
                Some("string"),
                &json!({"name": "alpha"}),
                &config_with_field("size"),
            )
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownField(f) if f == "size"));
    }

    #[test]
    fn test_unknown_format_errors() {
        let mut buf = Vec::new();
        let err = SerdeFormatter::new()
            .write(
                &mut buf,
                Some("toml"),
                &json!({}),
                &RenderConfig::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownFormat(f) if f == "toml"));
    }
}
