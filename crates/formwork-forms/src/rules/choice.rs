use super::{Rule, RuleViolation, impl_with_message, text_leaves, violation};
use formwork_core::FieldValue;
use formwork_core::html::to_display_string;
use indexmap::IndexMap;

/// Every submitted leaf must be one of the allowed values
#[derive(Debug, Clone)]
pub struct OneOf {
	allowed: Vec<String>,
	message: Option<String>,
}

impl OneOf {
	pub fn new<I, S>(allowed: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			allowed: allowed.into_iter().map(Into::into).collect(),
			message: None,
		}
	}

	pub fn allowed(&self) -> &[String] {
		&self.allowed
	}
}

impl_with_message!(OneOf);

impl Rule for OneOf {
	fn name(&self) -> &'static str {
		"one_of"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		_data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		if text_leaves(value).iter().all(|leaf| self.allowed.contains(leaf)) {
			Ok(())
		} else {
			Err(violation(self.name(), &self.message, || {
				"Select a valid choice.".to_string()
			}))
		}
	}
}

/// The value must equal the value of another field, as for password
/// confirmation
#[derive(Debug, Clone)]
pub struct Equals {
	other: String,
	message: Option<String>,
}

impl Equals {
	pub fn new(other: impl Into<String>) -> Self {
		Self {
			other: other.into(),
			message: None,
		}
	}
}

impl_with_message!(Equals);

impl Rule for Equals {
	fn name(&self) -> &'static str {
		"equals"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		if value.is_blank() {
			return Ok(());
		}
		let other = data.get(&self.other).map(to_display_string).unwrap_or_default();
		if to_display_string(value) == other {
			Ok(())
		} else {
			Err(violation(self.name(), &self.message, || {
				format!("The value must match '{}'.", self.other)
			}))
		}
	}
}
