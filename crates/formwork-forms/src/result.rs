//! Validation result envelope
//!
//! A [`ValidationResult`] is either valid data keyed by field, or a single
//! error payload. The two never coexist.

use crate::clean::CleanValue;
use formwork_core::{ERROR_MARKER_KEY, ErrorPayload};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
enum State {
	Data(IndexMap<String, CleanValue>),
	Error(ErrorPayload),
}

/// Outcome of a validation run
///
/// # Examples
///
/// ```
/// use formwork_forms::{CleanValue, ValidationResult};
/// use indexmap::IndexMap;
///
/// let mut data = IndexMap::new();
/// data.insert("age".to_string(), CleanValue::Integer(42));
/// let result = ValidationResult::new(data);
///
/// assert!(result.is_valid());
/// assert_eq!(result.to_json().unwrap(), r#"{"age":42}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
	state: State,
}

impl ValidationResult {
	/// A valid result over `data`
	pub fn new(data: IndexMap<String, CleanValue>) -> Self {
		Self {
			state: State::Data(data),
		}
	}

	/// An invalid result carrying `error`
	pub fn invalid(error: ErrorPayload) -> Self {
		Self {
			state: State::Error(error),
		}
	}

	/// A result with no data; never valid
	pub fn empty() -> Self {
		Self::new(IndexMap::new())
	}

	/// Rebuild a result from its wire form.
	///
	/// An object whose only meaningful key is [`ERROR_MARKER_KEY`] holding a
	/// well-formed payload becomes an invalid result; anything else is data.
	pub fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
		if let Some(marker) = map.get(ERROR_MARKER_KEY)
			&& let Ok(payload) = serde_json::from_value::<ErrorPayload>(marker.clone())
		{
			return Self::invalid(payload);
		}
		Self::new(
			map.into_iter()
				.map(|(key, value)| (key, CleanValue::from(value)))
				.collect(),
		)
	}

	/// True only when the result holds at least one field and no error
	pub fn is_valid(&self) -> bool {
		match &self.state {
			State::Data(data) => !data.is_empty(),
			State::Error(_) => false,
		}
	}

	/// True when there is neither data nor an error
	pub fn is_empty(&self) -> bool {
		matches!(&self.state, State::Data(data) if data.is_empty())
	}

	/// The data of a valid result
	pub fn data(&self) -> Option<&IndexMap<String, CleanValue>> {
		match &self.state {
			State::Data(data) if !data.is_empty() => Some(data),
			_ => None,
		}
	}

	/// Consume the result, yielding its data when valid
	pub fn into_data(self) -> Option<IndexMap<String, CleanValue>> {
		match self.state {
			State::Data(data) if !data.is_empty() => Some(data),
			_ => None,
		}
	}

	/// Look up one field of a valid result
	pub fn get(&self, key: &str) -> Option<&CleanValue> {
		self.data()?.get(key)
	}

	pub fn error(&self) -> Option<&ErrorPayload> {
		match &self.state {
			State::Error(error) => Some(error),
			State::Data(_) => None,
		}
	}

	/// The wire form as a JSON value; `None` for an empty result
	pub fn to_value(&self) -> Option<serde_json::Value> {
		match &self.state {
			State::Data(data) if data.is_empty() => None,
			State::Data(data) => serde_json::to_value(data).ok(),
			State::Error(error) => {
				let mut map = serde_json::Map::new();
				map.insert(ERROR_MARKER_KEY.to_string(), serde_json::to_value(error).ok()?);
				Some(serde_json::Value::Object(map))
			}
		}
	}

	/// The wire form as a JSON string; `None` for an empty result
	pub fn to_json(&self) -> Option<String> {
		self.to_value().map(|value| value.to_string())
	}
}

impl Default for ValidationResult {
	fn default() -> Self {
		Self::empty()
	}
}

impl Serialize for ValidationResult {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self.to_value() {
			Some(value) => value.serialize(serializer),
			None => serializer.serialize_unit(),
		}
	}
}
