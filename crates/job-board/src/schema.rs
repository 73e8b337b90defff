//! Permissive casting of request payloads into record fields.
//!
//! Records accept any subset of their fields. Unknown keys are ignored, scalars are coerced to
//! text, lone scalars are wrapped into sequences, and only values that cannot be cast at all
//! (objects where text is expected, malformed identifiers) are refused. Every refused field in a
//! payload is reported in one message.

use serde_json::{Map, Number, Value};

use crate::store::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SchemaError(String);

impl SchemaError {
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Decodes a request body. Bodies that are blank or not declared as `application/json` are an
/// empty payload.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, SchemaError> {
    if !is_json(content_type) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body)
        .map_err(|err| SchemaError(format!("request body is not valid JSON: {err}")))
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

/// Reads typed fields out of one payload while collecting cast failures.
pub struct PayloadReader<'a> {
    model: &'static str,
    fields: Option<&'a Map<String, Value>>,
    failures: Vec<String>,
}

impl<'a> PayloadReader<'a> {
    /// Arrays and `null` carry no named fields and read as an empty payload.
    pub fn new(model: &'static str, payload: &'a Value) -> Result<Self, SchemaError> {
        let fields = match payload {
            Value::Object(fields) => Some(fields),
            Value::Array(_) | Value::Null => None,
            other => {
                return Err(SchemaError(format!(
                    "{model} validation failed: payload must be a JSON object, got {} {other}",
                    kind(other)
                )))
            }
        };

        Ok(Self {
            model,
            fields,
            failures: Vec::new(),
        })
    }

    fn get(&self, path: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|fields| fields.get(path))
            .filter(|value| !value.is_null())
    }

    pub fn string(&mut self, path: &str) -> Option<String> {
        let value = self.get(path)?;
        match cast_string(value) {
            Some(text) => Some(text),
            None => {
                self.fail(path, "string", value);
                None
            }
        }
    }

    /// `null` entries are dropped; a single scalar becomes a one-element sequence.
    pub fn strings(&mut self, path: &str) -> Vec<String> {
        let Some(value) = self.get(path) else {
            return Vec::new();
        };

        match value {
            Value::Array(items) => {
                let mut texts = Vec::with_capacity(items.len());
                for item in items.iter().filter(|item| !item.is_null()) {
                    match cast_string(item) {
                        Some(text) => texts.push(text),
                        None => {
                            self.fail(path, "[string]", value);
                            return Vec::new();
                        }
                    }
                }
                texts
            }
            scalar => match cast_string(scalar) {
                Some(text) => vec![text],
                None => {
                    self.fail(path, "[string]", scalar);
                    Vec::new()
                }
            },
        }
    }

    pub fn record_id(&mut self, path: &str) -> Option<RecordId> {
        let value = self.get(path)?;
        let parsed = match value {
            Value::String(raw) => RecordId::parse(raw).ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.fail(path, "ObjectId", value);
        }
        parsed
    }

    pub fn finish(self) -> Result<(), SchemaError> {
        if self.failures.is_empty() {
            return Ok(());
        }
        Err(SchemaError(format!(
            "{} validation failed: {}",
            self.model,
            self.failures.join(", ")
        )))
    }

    fn fail(&mut self, path: &str, target: &str, value: &Value) {
        self.failures.push(format!(
            "{path}: Cast to {target} failed for value {value} (type {}) at path \"{path}\"",
            kind(value)
        ));
    }
}

fn cast_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number_text(number)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Renders numbers the way JavaScript's `String(n)` does: integral values drop the fractional
/// part (`3.0` reads as `"3"`), and magnitudes from `1e21` up or below `1e-6` use exponent form
/// with an explicit sign (`"1e+21"`, `"1.5e-7"`).
fn number_text(number: &Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(uint) = number.as_u64() {
        return uint.to_string();
    }
    let Some(float) = number.as_f64() else {
        return number.to_string();
    };

    let magnitude = float.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        let scientific = format!("{float:e}");
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => scientific,
        };
    }
    if float.fract() == 0.0 {
        return format!("{float:.0}");
    }
    float.to_string()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reader(payload: &Value) -> PayloadReader<'_> {
        PayloadReader::new("Probe", payload).expect("object payload")
    }

    #[test]
    fn scalars_coerce_to_text() {
        let payload = json!({ "a": "x", "b": 42, "c": 2.5, "d": 3.0, "e": true, "f": -7 });
        let mut reader = reader(&payload);
        assert_eq!(reader.string("a").as_deref(), Some("x"));
        assert_eq!(reader.string("b").as_deref(), Some("42"));
        assert_eq!(reader.string("c").as_deref(), Some("2.5"));
        assert_eq!(reader.string("d").as_deref(), Some("3"));
        assert_eq!(reader.string("e").as_deref(), Some("true"));
        assert_eq!(reader.string("f").as_deref(), Some("-7"));
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn missing_and_null_fields_read_as_absent() {
        let payload = json!({ "present": null });
        let mut reader = reader(&payload);
        assert_eq!(reader.string("present"), None);
        assert_eq!(reader.string("missing"), None);
        assert!(reader.strings("missing").is_empty());
        assert_eq!(reader.record_id("present"), None);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn sequences_wrap_scalars_and_drop_nulls() {
        let payload = json!({ "one": "SQL", "many": ["Rust", null, 7], "none": [] });
        let mut reader = reader(&payload);
        assert_eq!(reader.strings("one"), vec!["SQL".to_string()]);
        assert_eq!(
            reader.strings("many"),
            vec!["Rust".to_string(), "7".to_string()]
        );
        assert!(reader.strings("none").is_empty());
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn objects_fail_to_cast_and_failures_are_collected() {
        let payload = json!({ "title": { "en": "Engineer" }, "tags": [["nested"]] });
        let mut reader = reader(&payload);
        assert_eq!(reader.string("title"), None);
        assert!(reader.strings("tags").is_empty());

        let err = reader.finish().expect_err("two failures");
        assert_eq!(
            err.message(),
            "Probe validation failed: \
             title: Cast to string failed for value {\"en\":\"Engineer\"} (type Object) at path \"title\", \
             tags: Cast to [string] failed for value [[\"nested\"]] (type Array) at path \"tags\""
        );
    }

    #[test]
    fn identifiers_require_hex_text() {
        let payload = json!({ "good": "64b7f0c2a1e4d3f2b1c0a9e8", "bad": "job-1", "num": 12 });
        let mut reader = reader(&payload);
        assert_eq!(
            reader.record_id("good").map(|id| id.to_hex()),
            Some("64b7f0c2a1e4d3f2b1c0a9e8".to_string())
        );
        assert_eq!(reader.record_id("bad"), None);
        assert_eq!(reader.record_id("num"), None);

        let err = reader.finish().expect_err("malformed identifiers");
        assert!(err.message().contains("bad: Cast to ObjectId failed for value \"job-1\""));
        assert!(err.message().contains("num: Cast to ObjectId failed for value 12 (type number)"));
    }

    #[test]
    fn arrays_and_null_read_as_empty_payloads() {
        for payload in [json!([1, 2]), Value::Null] {
            let mut reader = reader(&payload);
            assert_eq!(reader.string("anything"), None);
            assert!(reader.finish().is_ok());
        }
    }

    #[test]
    fn scalar_payloads_are_refused() {
        let payload = json!("just text");
        let err = match PayloadReader::new("Probe", &payload) {
            Ok(_) => panic!("scalar payload accepted"),
            Err(err) => err,
        };
        assert!(err.message().starts_with("Probe validation failed"));
    }

    #[test]
    fn parse_body_treats_blank_as_empty_object() {
        let json_type = Some("application/json");
        assert_eq!(parse_body(json_type, b"").expect("empty body"), json!({}));
        assert_eq!(parse_body(json_type, b" \n").expect("blank body"), json!({}));
        assert_eq!(
            parse_body(Some("application/json; charset=utf-8"), br#"{"jobTitle":"X"}"#)
                .expect("json body"),
            json!({ "jobTitle": "X" })
        );
        let err = parse_body(json_type, b"{not json").expect_err("syntax error");
        assert!(err.message().starts_with("request body is not valid JSON"));
    }

    #[test]
    fn parse_body_ignores_bodies_not_declared_as_json() {
        for content_type in [Some("application/x-www-form-urlencoded"), Some("text/plain"), None] {
            assert_eq!(
                parse_body(content_type, b"jobTitle=X").expect("ignored body"),
                json!({}),
                "{content_type:?}"
            );
        }
    }

    #[test]
    fn extreme_magnitudes_use_exponent_notation() {
        let payload = json!({ "big": 1e21, "bigger": 1.5e22, "tiny": 1.5e-7, "small": 0.000001 });
        let mut reader = reader(&payload);
        assert_eq!(reader.string("big").as_deref(), Some("1e+21"));
        assert_eq!(reader.string("bigger").as_deref(), Some("1.5e+22"));
        assert_eq!(reader.string("tiny").as_deref(), Some("1.5e-7"));
        assert_eq!(reader.string("small").as_deref(), Some("0.000001"));
        assert!(reader.finish().is_ok());
    }
}
