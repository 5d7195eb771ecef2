//! Field validation rules
//!
//! A [`Rule`] inspects one submitted value (and, when it needs to, the rest of
//! the submission) and either accepts it or returns a [`RuleViolation`].
//! Every rule except [`Required`] accepts blank values, so optional fields
//! only need `Required` when they must be filled in.

mod choice;
mod file;
mod numeric;
mod text;

pub use choice::{Equals, OneOf};
pub use file::{File, Mime};
pub use numeric::{Max, Min};
pub use text::{Alpha, AlphaNumeric, Email, MaxLength, MinLength, Numeric, Regex, Url};

use formwork_core::FieldValue;
use formwork_core::html::to_display_string;
use indexmap::IndexMap;
use std::fmt;

/// Upload error code reported when no file was sent
pub(crate) const UPLOAD_ERR_NO_FILE: i64 = 4;

/// A rejected value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{rule}: {message}")]
pub struct RuleViolation {
	/// Name of the rule that failed
	pub rule: &'static str,
	/// User-facing message
	pub message: String,
}

impl RuleViolation {
	pub fn new(rule: &'static str, message: impl Into<String>) -> Self {
		Self {
			rule,
			message: message.into(),
		}
	}
}

/// A single-purpose check on a submitted value
pub trait Rule: Send + Sync + fmt::Debug {
	/// Short rule name, used in developer messages
	fn name(&self) -> &'static str;

	/// Check `value`, submitted under `field`, against the rule.
	///
	/// `data` is the whole submission, for rules comparing fields.
	fn check(
		&self,
		field: &str,
		value: &FieldValue,
		data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation>;
}

/// Implements `with_message` for rules carrying an optional custom message
macro_rules! impl_with_message {
	($($ty:ty),+ $(,)?) => {
		$(
			impl $ty {
				/// Replace the default user-facing message
				pub fn with_message(mut self, message: impl Into<String>) -> Self {
					self.message = Some(message.into());
					self
				}
			}
		)+
	};
}
pub(crate) use impl_with_message;

/// Build a violation using the custom message when one is set
pub(crate) fn violation(
	rule: &'static str,
	custom: &Option<String>,
	default: impl FnOnce() -> String,
) -> RuleViolation {
	RuleViolation::new(rule, custom.clone().unwrap_or_else(default))
}

/// Textual leaves of a value: scalars yield their display form, lists and
/// maps yield the leaves of their items, files and blanks yield nothing.
pub(crate) fn text_leaves(value: &FieldValue) -> Vec<String> {
	match value {
		FieldValue::Null | FieldValue::Blank | FieldValue::File(_) => Vec::new(),
		FieldValue::List(items) => items.iter().flat_map(text_leaves).collect(),
		FieldValue::Map(map) => map.values().flat_map(text_leaves).collect(),
		FieldValue::Text(_) | FieldValue::Integer(_) | FieldValue::Float(_) | FieldValue::Bool(_) => {
			let text = to_display_string(value);
			if text.is_empty() { Vec::new() } else { vec![text] }
		}
	}
}

/// Whether a value counts as not filled in
pub(crate) fn is_unfilled(value: &FieldValue) -> bool {
	match value {
		FieldValue::File(file) => file.error == UPLOAD_ERR_NO_FILE,
		other => other.is_blank(),
	}
}

/// The field must be present and non-blank
///
/// # Examples
///
/// ```
/// use formwork_core::FieldValue;
/// use formwork_forms::rules::{Required, Rule};
/// use indexmap::IndexMap;
///
/// let data = IndexMap::new();
/// assert!(Required::new().check("name", &FieldValue::text("Ada"), &data).is_ok());
/// assert!(Required::new().check("name", &FieldValue::text("  "), &data).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Required {
	message: Option<String>,
}

impl Required {
	pub fn new() -> Self {
		Self::default()
	}
}

impl_with_message!(Required);

impl Rule for Required {
	fn name(&self) -> &'static str {
		"required"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		_data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		if is_unfilled(value) {
			return Err(violation(self.name(), &self.message, || {
				"This field is required.".to_string()
			}));
		}
		Ok(())
	}
}
