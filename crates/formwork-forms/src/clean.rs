//! Coerced field values

use chrono::{DateTime, FixedOffset};
use formwork_core::html::to_display_string;
use formwork_core::{BLANK_MARKER, FieldValue, UploadedFile};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A field value after the format engine has run.
///
/// `Blank` marks a field that was present but intentionally left empty; it is
/// never reported as missing.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanValue {
	Blank,
	Null,
	Text(String),
	Integer(i64),
	Float(f64),
	Bool(bool),
	DateTime(DateTime<FixedOffset>),
	File(UploadedFile),
	List(Vec<CleanValue>),
	Map(IndexMap<String, CleanValue>),
}

impl CleanValue {
	pub fn is_blank(&self) -> bool {
		matches!(self, Self::Blank)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Float(f) => Some(*f),
			Self::Integer(i) => Some(*i as f64),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
		match self {
			Self::DateTime(dt) => Some(dt),
			_ => None,
		}
	}

	/// Text suitable for re-populating a form control
	///
	/// # Examples
	///
	/// ```
	/// use formwork_forms::CleanValue;
	///
	/// assert_eq!(CleanValue::Float(2.5).to_display_string(), "2.5");
	/// assert_eq!(CleanValue::Blank.to_display_string(), "");
	/// ```
	pub fn to_display_string(&self) -> String {
		match self {
			Self::DateTime(dt) => dt.to_rfc3339(),
			other => to_display_string(&FieldValue::from(other.clone())),
		}
	}
}

impl From<FieldValue> for CleanValue {
	fn from(value: FieldValue) -> Self {
		match value {
			FieldValue::Null => Self::Null,
			FieldValue::Blank => Self::Blank,
			FieldValue::Text(s) => Self::Text(s),
			FieldValue::Integer(i) => Self::Integer(i),
			FieldValue::Float(f) => Self::Float(f),
			FieldValue::Bool(b) => Self::Bool(b),
			FieldValue::File(file) => Self::File(file),
			FieldValue::List(items) => Self::List(items.into_iter().map(Self::from).collect()),
			FieldValue::Map(map) => Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
		}
	}
}

impl From<CleanValue> for FieldValue {
	fn from(value: CleanValue) -> Self {
		match value {
			CleanValue::Null => Self::Null,
			CleanValue::Blank => Self::Blank,
			CleanValue::Text(s) => Self::Text(s),
			CleanValue::Integer(i) => Self::Integer(i),
			CleanValue::Float(f) => Self::Float(f),
			CleanValue::Bool(b) => Self::Bool(b),
			CleanValue::DateTime(dt) => Self::Text(dt.to_rfc3339()),
			CleanValue::File(file) => Self::File(file),
			CleanValue::List(items) => Self::List(items.into_iter().map(Self::from).collect()),
			CleanValue::Map(map) => Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
		}
	}
}

impl From<serde_json::Value> for CleanValue {
	fn from(value: serde_json::Value) -> Self {
		Self::from(FieldValue::from(value))
	}
}

impl Serialize for CleanValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Blank => serializer.serialize_str(BLANK_MARKER),
			Self::Null => serializer.serialize_unit(),
			Self::Text(s) => serializer.serialize_str(s),
			Self::Integer(i) => serializer.serialize_i64(*i),
			Self::Float(f) => serializer.serialize_f64(*f),
			Self::Bool(b) => serializer.serialize_bool(*b),
			Self::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
			Self::File(file) => file.serialize(serializer),
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
		}
	}
}
