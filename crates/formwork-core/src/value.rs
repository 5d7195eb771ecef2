//! Submitted field values
//!
//! Every value that reaches the validation pipeline is a [`FieldValue`].
//! Coercion code matches the enum exhaustively.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wire marker for a field that was submitted but intentionally left blank.
///
/// Decoders turn a string equal to this marker into [`FieldValue::Blank`], and
/// [`FieldValue::Blank`] serializes back to it. Any collaborator exchanging
/// form data as plain strings must use the same value.
pub const BLANK_MARKER: &str = "__formwork_blank__";

/// Keys that make a submitted object an uploaded-file descriptor.
const FILE_KEYS: [&str; 5] = ["name", "type", "tmp_name", "error", "size"];

/// Uploaded file descriptor as produced by a multipart decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
	/// Client-side file name
	pub name: String,
	/// MIME type reported by the client
	#[serde(rename = "type")]
	pub content_type: String,
	/// Server-side temporary path
	pub tmp_name: String,
	/// Upload error code, `0` on success
	pub error: i64,
	/// Size in bytes
	pub size: u64,
}

impl UploadedFile {
	/// Create a descriptor for a successful upload
	///
	/// # Examples
	///
	/// ```
	/// use formwork_core::UploadedFile;
	///
	/// let file = UploadedFile::new("cv.pdf", "application/pdf", "/tmp/php1", 2048);
	/// assert!(file.is_ok());
	/// assert_eq!(file.extension(), Some("pdf"));
	/// ```
	pub fn new(
		name: impl Into<String>,
		content_type: impl Into<String>,
		tmp_name: impl Into<String>,
		size: u64,
	) -> Self {
		Self {
			name: name.into(),
			content_type: content_type.into(),
			tmp_name: tmp_name.into(),
			error: 0,
			size,
		}
	}

	/// Set the upload error code
	pub fn with_error(mut self, error: i64) -> Self {
		self.error = error;
		self
	}

	/// Whether the upload finished without error
	pub fn is_ok(&self) -> bool {
		self.error == 0
	}

	/// Extension of the client file name
	pub fn extension(&self) -> Option<&str> {
		let (stem, ext) = self.name.rsplit_once('.')?;
		if stem.is_empty() || ext.is_empty() {
			return None;
		}
		Some(ext)
	}

	fn from_json_object(obj: &serde_json::Map<String, serde_json::Value>) -> Option<Self> {
		if obj.len() != FILE_KEYS.len() || !FILE_KEYS.iter().all(|k| obj.contains_key(*k)) {
			return None;
		}
		Some(Self {
			name: obj.get("name")?.as_str()?.to_string(),
			content_type: obj.get("type")?.as_str()?.to_string(),
			tmp_name: obj.get("tmp_name")?.as_str()?.to_string(),
			error: obj.get("error")?.as_i64()?,
			size: obj.get("size")?.as_u64()?,
		})
	}
}

/// A raw submitted value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
	/// Explicit null
	#[default]
	Null,
	/// Present but intentionally blank
	Blank,
	Text(String),
	Integer(i64),
	Float(f64),
	Bool(bool),
	List(Vec<FieldValue>),
	Map(IndexMap<String, FieldValue>),
	File(UploadedFile),
}

impl FieldValue {
	/// Build a text value
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(value.into())
	}

	/// Whether this value counts as "nothing submitted".
	///
	/// True for [`FieldValue::Null`], [`FieldValue::Blank`], whitespace-only
	/// text, text equal to [`BLANK_MARKER`], and empty lists or maps.
	///
	/// # Examples
	///
	/// ```
	/// use formwork_core::{BLANK_MARKER, FieldValue};
	///
	/// assert!(FieldValue::Blank.is_blank());
	/// assert!(FieldValue::text("   ").is_blank());
	/// assert!(FieldValue::text(BLANK_MARKER).is_blank());
	/// assert!(!FieldValue::Integer(0).is_blank());
	/// ```
	pub fn is_blank(&self) -> bool {
		match self {
			Self::Null | Self::Blank => true,
			Self::Text(s) => is_blank_text(s),
			Self::List(items) => items.is_empty(),
			Self::Map(map) => map.is_empty(),
			Self::Integer(_) | Self::Float(_) | Self::Bool(_) | Self::File(_) => false,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_file(&self) -> Option<&UploadedFile> {
		match self {
			Self::File(file) => Some(file),
			_ => None,
		}
	}

	/// Whether the value is a list or a non-file map
	pub fn is_container(&self) -> bool {
		matches!(self, Self::List(_) | Self::Map(_))
	}

	/// Short name of the variant, used in developer-facing messages
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Blank => "blank",
			Self::Text(_) => "string",
			Self::Integer(_) => "integer",
			Self::Float(_) => "float",
			Self::Bool(_) => "boolean",
			Self::List(_) => "list",
			Self::Map(_) => "map",
			Self::File(_) => "file",
		}
	}
}

/// Whether a string should be treated as blank input
pub fn is_blank_text(text: &str) -> bool {
	let trimmed = text.trim();
	trimmed.is_empty() || trimmed == BLANK_MARKER
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&crate::html::to_display_string(self))
	}
}

impl From<serde_json::Value> for FieldValue {
	fn from(value: serde_json::Value) -> Self {
		use serde_json::Value;

		match value {
			Value::Null => Self::Null,
			Value::Bool(b) => Self::Bool(b),
			Value::Number(n) => match n.as_i64() {
				Some(i) => Self::Integer(i),
				None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			Value::String(s) if s == BLANK_MARKER => Self::Blank,
			Value::String(s) => Self::Text(s),
			Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
			Value::Object(obj) => match UploadedFile::from_json_object(&obj) {
				Some(file) => Self::File(file),
				None => Self::Map(obj.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
			},
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		if value == BLANK_MARKER {
			Self::Blank
		} else {
			Self::Text(value.to_string())
		}
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		if value == BLANK_MARKER {
			Self::Blank
		} else {
			Self::Text(value)
		}
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<UploadedFile> for FieldValue {
	fn from(value: UploadedFile) -> Self {
		Self::File(value)
	}
}

impl Serialize for FieldValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Null => serializer.serialize_unit(),
			Self::Blank => serializer.serialize_str(BLANK_MARKER),
			Self::Text(s) => serializer.serialize_str(s),
			Self::Integer(i) => serializer.serialize_i64(*i),
			Self::Float(f) => serializer.serialize_f64(*f),
			Self::Bool(b) => serializer.serialize_bool(*b),
			Self::List(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Self::Map(entries) => {
				let mut map = serializer.serialize_map(Some(entries.len()))?;
				for (key, value) in entries {
					map.serialize_entry(key, value)?;
				}
				map.end()
			}
			Self::File(file) => file.serialize(serializer),
		}
	}
}

impl<'de> Deserialize<'de> for FieldValue {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(Self::from)
	}
}

/// Convert a decoded JSON object into the map the validator consumes
///
/// # Examples
///
/// ```
/// use formwork_core::{FieldValue, value::field_map};
/// use serde_json::json;
///
/// let data = field_map(json!({"age": 30, "name": "Ada"}));
/// assert_eq!(data.get("age"), Some(&FieldValue::Integer(30)));
/// ```
pub fn field_map(value: serde_json::Value) -> IndexMap<String, FieldValue> {
	match value {
		serde_json::Value::Object(obj) => obj
			.into_iter()
			.map(|(k, v)| (k, FieldValue::from(v)))
			.collect(),
		_ => IndexMap::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_upload_object_becomes_file() {
		// Arrange
		let raw = json!({
			"name": "avatar.png",
			"type": "image/png",
			"tmp_name": "/tmp/upload1",
			"error": 0,
			"size": 512
		});

		// Act
		let value = FieldValue::from(raw);

		// Assert
		let file = value.as_file().expect("expected a file descriptor");
		assert_eq!(file.content_type, "image/png");
		assert_eq!(file.size, 512);
		assert!(file.is_ok());
	}

	#[rstest]
	fn test_partial_upload_object_stays_a_map() {
		let value = FieldValue::from(json!({"name": "avatar.png", "size": 1}));

		assert!(matches!(value, FieldValue::Map(_)));
	}

	#[rstest]
	fn test_blank_marker_round_trip() {
		let value = FieldValue::from(json!(BLANK_MARKER));
		assert_eq!(value, FieldValue::Blank);

		let encoded = serde_json::to_value(&value).unwrap();
		assert_eq!(encoded, json!(BLANK_MARKER));
	}

	#[rstest]
	#[case(json!(12), FieldValue::Integer(12))]
	#[case(json!(1.5), FieldValue::Float(1.5))]
	#[case(json!(true), FieldValue::Bool(true))]
	#[case(json!(null), FieldValue::Null)]
	fn test_scalar_conversion(#[case] raw: serde_json::Value, #[case] expected: FieldValue) {
		assert_eq!(FieldValue::from(raw), expected);
	}

	#[rstest]
	fn test_extension() {
		assert_eq!(UploadedFile::new("a.tar.gz", "", "", 1).extension(), Some("gz"));
		assert_eq!(UploadedFile::new(".bashrc", "", "", 1).extension(), None);
		assert_eq!(UploadedFile::new("README", "", "", 1).extension(), None);
	}
}
