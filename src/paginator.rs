//! Cursor pagination primitives
//!
//! A `Cursor` is an opaque resumable token derived from the sort key of the
//! last hit on a page. Encoding renders each sort value as text, joins the
//! values with `,`, and base64-encodes the result. Decoding reverses that and
//! recovers value types by inference: segments that parse as floats become
//! numbers, everything else stays a string. The scheme is deliberately
//! tag-free so tokens stay small; the cost is that string values containing
//! commas, booleans, and nulls cannot round-trip.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Cursor decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    /// Token is not valid base64 (or its payload is not valid UTF-8)
    #[error("unable to decode cursor token")]
    Malformed,
}

/// One value of a hit's sort key
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Numeric sort value (float64 precision)
    Number(f64),
    /// Textual sort value
    Text(String),
}

impl SortValue {
    /// Textual rendering used by the cursor codec
    fn render(&self) -> String {
        match self {
            SortValue::Number(n) => n.to_string(),
            SortValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        SortValue::Number(value)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        SortValue::Text(value)
    }
}

impl Serialize for SortValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SortValue::Number(n) => serializer.serialize_f64(*n),
            SortValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for SortValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => {
                let f = n
                    .as_f64()
                    .ok_or_else(|| serde::de::Error::custom("sort value out of f64 range"))?;
                Ok(SortValue::Number(f))
            }
            serde_json::Value::String(s) => Ok(SortValue::Text(s)),
            other => Err(serde::de::Error::custom(format!(
                "unsupported sort value type: {}",
                other
            ))),
        }
    }
}

/// Ordered sequence of sort values for one hit
///
/// The index backend returns this as the tie-break key of each hit; the last
/// hit's key is what the next page's cursor is derived from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortKey(pub Vec<SortValue>);

impl SortKey {
    /// Empty sort key
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of values in the key
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the key carries no values
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values in original order
    pub fn values(&self) -> &[SortValue] {
        &self.0
    }
}

impl From<Vec<SortValue>> for SortKey {
    fn from(values: Vec<SortValue>) -> Self {
        Self(values)
    }
}

/// Opaque resumable pagination token
///
/// The empty cursor doubles as the "start of result set" input and the
/// "no more pages" output sentinel. Serializes to the outer API wire shape
/// `{"next": "<token>"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap an existing token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The empty cursor: start of result set / no more pages
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Derive a cursor from a sort key
    pub fn from_sort_key(key: &SortKey) -> Self {
        if key.is_empty() {
            return Self::empty();
        }
        let joined = key
            .values()
            .iter()
            .map(SortValue::render)
            .collect::<Vec<_>>()
            .join(",");
        Self(STANDARD.encode(joined.as_bytes()))
    }

    /// Decode the cursor back into a sort key
    ///
    /// The empty cursor decodes to an empty key without error. Segment types
    /// are inferred: parseable floats become numbers, the rest stay text.
    /// Segment count is not validated against any sort spec.
    pub fn sort_key(&self) -> Result<SortKey, CursorError> {
        if self.0.is_empty() {
            return Ok(SortKey::new());
        }
        let bytes = STANDARD.decode(&self.0).map_err(|_| CursorError::Malformed)?;
        let text = String::from_utf8(bytes).map_err(|_| CursorError::Malformed)?;
        if text.is_empty() {
            return Ok(SortKey::new());
        }
        let values = text
            .split(',')
            .map(|segment| match segment.parse::<f64>() {
                Ok(n) => SortValue::Number(n),
                Err(_) => SortValue::Text(segment.to_string()),
            })
            .collect();
        Ok(SortKey(values))
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the empty sentinel
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Cursor", 1)?;
        state.serialize_field("next", &self.0)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_mixed_values() {
        let key = SortKey(vec![
            SortValue::Number(12.0),
            SortValue::Text("doc-9".to_string()),
            SortValue::Number(-3.5),
        ]);
        let cursor = Cursor::from_sort_key(&key);
        assert!(!cursor.is_empty());
        assert_eq!(cursor.sort_key().unwrap(), key);
    }

    #[test]
    fn test_numbers_compare_by_value_not_formatting() {
        // 12.0 renders as "12" but still decodes to the same f64
        let key = SortKey(vec![SortValue::Number(12.0)]);
        let decoded = Cursor::from_sort_key(&key).sort_key().unwrap();
        assert_eq!(decoded.values(), &[SortValue::Number(12.0)]);
    }

    #[test]
    fn test_empty_cursor_decodes_to_empty_key() {
        let decoded = Cursor::empty().sort_key().unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_empty_key_encodes_to_empty_cursor() {
        assert!(Cursor::from_sort_key(&SortKey::new()).is_empty());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let cursor = Cursor::new("!!not base64!!");
        assert_eq!(cursor.sort_key(), Err(CursorError::Malformed));
    }

    #[test]
    fn test_numeric_looking_string_becomes_number() {
        // Inference limitation: "42" the string decodes as 42 the number.
        let key = SortKey(vec![SortValue::Text("42".to_string())]);
        let decoded = Cursor::from_sort_key(&key).sort_key().unwrap();
        assert_eq!(decoded.values(), &[SortValue::Number(42.0)]);
    }

    #[test]
    fn test_embedded_comma_is_lossy() {
        // Documented limitation: decode splits naively on commas.
        let key = SortKey(vec![SortValue::Text("a,b".to_string())]);
        let decoded = Cursor::from_sort_key(&key).sort_key().unwrap();
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_wire_shape() {
        let cursor = Cursor::new("abc123");
        assert_eq!(serde_json::to_value(&cursor).unwrap(), json!({"next": "abc123"}));

        let end = Cursor::empty();
        assert_eq!(serde_json::to_value(&end).unwrap(), json!({"next": ""}));
    }

    #[test]
    fn test_sort_value_serde() {
        let values: Vec<SortValue> = serde_json::from_value(json!([12.0, "doc-9", 7])).unwrap();
        assert_eq!(
            values,
            vec![
                SortValue::Number(12.0),
                SortValue::Text("doc-9".to_string()),
                SortValue::Number(7.0),
            ]
        );
        assert_eq!(serde_json::to_value(&values).unwrap(), json!([12.0, "doc-9", 7.0]));
    }
}
