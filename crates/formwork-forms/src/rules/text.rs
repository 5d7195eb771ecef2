use super::{Rule, RuleViolation, impl_with_message, text_leaves, violation};
use formwork_core::FieldValue;
use indexmap::IndexMap;
use std::sync::LazyLock;

static URL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
	regex::Regex::new(
		r"(?x)
		^https?://
		[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?           # host label
		(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*    # more labels
		(?::[0-9]{1,5})?                                        # port
		(?:/[^\s?\#]*)?                                         # path
		(?:\?[^\s\#]*)?                                         # query
		(?:\#\S*)?                                              # fragment
		$",
	)
	.expect("URL_REGEX: invalid regex pattern")
});

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
	regex::Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("EMAIL_REGEX: invalid regex pattern")
});

/// Run `accept` over every textual leaf of `value`
fn check_leaves(value: &FieldValue, accept: impl Fn(&str) -> bool) -> bool {
	text_leaves(value).iter().all(|leaf| accept(leaf))
}

macro_rules! predicate_rule {
	($(#[$meta:meta])* $ty:ident, $name:literal, $default:literal, $accept:expr) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Default)]
		pub struct $ty {
			message: Option<String>,
		}

		impl $ty {
			pub fn new() -> Self {
				Self::default()
			}
		}

		impl_with_message!($ty);

		impl Rule for $ty {
			fn name(&self) -> &'static str {
				$name
			}

			fn check(
				&self,
				_field: &str,
				value: &FieldValue,
				_data: &IndexMap<String, FieldValue>,
			) -> Result<(), RuleViolation> {
				if check_leaves(value, $accept) {
					Ok(())
				} else {
					Err(violation(self.name(), &self.message, || $default.to_string()))
				}
			}
		}
	};
}

predicate_rule!(
	/// Letters only
	Alpha,
	"alpha",
	"Enter letters only.",
	|s: &str| s.chars().all(char::is_alphabetic)
);

predicate_rule!(
	/// Letters and digits only
	AlphaNumeric,
	"alpha_numeric",
	"Enter letters and digits only.",
	|s: &str| s.chars().all(char::is_alphanumeric)
);

predicate_rule!(
	/// A finite decimal number
	Numeric,
	"numeric",
	"Enter a number.",
	|s: &str| s.trim().parse::<f64>().is_ok_and(f64::is_finite)
);

predicate_rule!(
	/// An e-mail address of the form `local@domain.tld`
	Email,
	"email",
	"Enter a valid email address.",
	|s: &str| EMAIL_REGEX.is_match(s.trim())
);

predicate_rule!(
	/// An http or https URL
	Url,
	"url",
	"Enter a valid URL.",
	|s: &str| URL_REGEX.is_match(s.trim())
);

/// Every textual leaf must match a caller-supplied pattern
#[derive(Debug, Clone)]
pub struct Regex {
	pattern: regex::Regex,
	message: Option<String>,
}

impl Regex {
	pub fn new(pattern: regex::Regex) -> Self {
		Self {
			pattern,
			message: None,
		}
	}

	/// Compile `pattern` and build the rule
	pub fn from_pattern(pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self::new(regex::Regex::new(pattern)?))
	}
}

impl_with_message!(Regex);

impl Rule for Regex {
	fn name(&self) -> &'static str {
		"regex"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		_data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		if check_leaves(value, |s| self.pattern.is_match(s)) {
			Ok(())
		} else {
			Err(violation(self.name(), &self.message, || {
				"Enter a value in the expected format.".to_string()
			}))
		}
	}
}

/// Length of a value: characters of text, items of a list
fn length_of(value: &FieldValue) -> Option<usize> {
	match value {
		FieldValue::List(items) => Some(items.len()),
		FieldValue::Map(map) => Some(map.len()),
		FieldValue::Text(text) => Some(text.chars().count()),
		FieldValue::Integer(_) | FieldValue::Float(_) | FieldValue::Bool(_) => {
			Some(value.to_string().chars().count())
		}
		FieldValue::Null | FieldValue::Blank | FieldValue::File(_) => None,
	}
}

/// At least `min` characters (or list items)
#[derive(Debug, Clone)]
pub struct MinLength {
	min: usize,
	message: Option<String>,
}

impl MinLength {
	pub fn new(min: usize) -> Self {
		Self { min, message: None }
	}
}

impl_with_message!(MinLength);

impl Rule for MinLength {
	fn name(&self) -> &'static str {
		"min_length"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		_data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		match length_of(value) {
			Some(length) if length < self.min && !value.is_blank() => {
				Err(violation(self.name(), &self.message, || {
					format!("Ensure this value has at least {} characters.", self.min)
				}))
			}
			_ => Ok(()),
		}
	}
}

/// At most `max` characters (or list items)
#[derive(Debug, Clone)]
pub struct MaxLength {
	max: usize,
	message: Option<String>,
}

impl MaxLength {
	pub fn new(max: usize) -> Self {
		Self { max, message: None }
	}
}

impl_with_message!(MaxLength);

impl Rule for MaxLength {
	fn name(&self) -> &'static str {
		"max_length"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		_data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		match length_of(value) {
			Some(length) if length > self.max => Err(violation(self.name(), &self.message, || {
				format!("Ensure this value has at most {} characters.", self.max)
			})),
			_ => Ok(()),
		}
	}
}
