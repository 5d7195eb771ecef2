//! JSON form descriptions
//!
//! A [`FormSchema`] describes a form once and yields both its markup
//! ([`FormSchema::build_form`]) and its validator
//! ([`FormSchema::build_validator`]), so the two cannot drift apart.
//!
//! ```json
//! {
//!   "action": "/signup",
//!   "fields": [
//!     { "name": "email", "type": "email", "label": "E-mail", "required": true,
//!       "rules": [{ "rule": "email" }] },
//!     { "name": "age", "type": "number", "format": { "modification": "integer" },
//!       "rules": [{ "rule": "min", "value": 18, "message": "Adults only" }] }
//!   ],
//!   "submit": "Sign up"
//! }
//! ```

use crate::attrs::AttrValue;
use crate::components::{Button, Element, Form, Input, InputType, Method, Select, Textarea};
use crate::format::FormatDirective;
use crate::rules::{self, Rule};
use crate::validator::{FieldSpec, Validator};
use formwork_core::FormConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
	#[error("Invalid form description: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Unknown type '{field_type}' for field '{field}'")]
	UnknownType { field: String, field_type: String },

	#[error("Invalid pattern for field '{field}': {source}")]
	InvalidPattern {
		field: String,
		#[source]
		source: regex::Error,
	},
}

fn default_type() -> String {
	"text".to_string()
}

/// A whole form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSchema {
	pub id: Option<String>,
	pub action: Option<String>,
	/// `get` or `post`
	pub method: Option<String>,
	pub multipart: bool,
	pub novalidate: bool,
	pub class: Option<String>,
	pub fields: Vec<FieldSchema>,
	/// Text of a submit button appended after the fields
	pub submit: Option<String>,
}

/// One field of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
	pub name: String,
	/// An input type, `textarea` or `select`
	#[serde(rename = "type", default = "default_type")]
	pub field_type: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub placeholder: Option<String>,
	#[serde(default)]
	pub required: bool,
	/// The submission may omit the field entirely
	#[serde(default)]
	pub optional: bool,
	#[serde(default)]
	pub rules: Vec<RuleSchema>,
	#[serde(default)]
	pub format: Option<FormatDirective>,
	#[serde(default)]
	pub options: Vec<OptionSchema>,
	/// Extra attributes: strings set values, booleans toggle flags
	#[serde(default)]
	pub attributes: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
	pub value: String,
	pub label: String,
}

/// A rule with an optional custom message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSchema {
	#[serde(flatten)]
	pub kind: RuleKind,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleKind {
	Required,
	Alpha,
	AlphaNumeric,
	Numeric,
	Email,
	Url,
	Regex { pattern: String },
	MinLength { value: usize },
	MaxLength { value: usize },
	Min { value: f64 },
	Max { value: f64 },
	OneOf { values: Vec<String> },
	Equals { field: String },
	File {
		#[serde(default)]
		min_size: Option<u64>,
		#[serde(default)]
		max_size: Option<u64>,
	},
	Mime { types: Vec<String> },
}

macro_rules! with_optional_message {
	($rule:expr, $message:expr) => {{
		let rule = $rule;
		let boxed: Box<dyn Rule> = match $message {
			Some(message) => Box::new(rule.with_message(message.clone())),
			None => Box::new(rule),
		};
		boxed
	}};
}

impl RuleSchema {
	/// Build the rule for `field`
	pub fn build(&self, field: &str) -> Result<Box<dyn Rule>, SchemaError> {
		let message = self.message.as_ref();
		Ok(match &self.kind {
			RuleKind::Required => with_optional_message!(rules::Required::new(), message),
			RuleKind::Alpha => with_optional_message!(rules::Alpha::new(), message),
			RuleKind::AlphaNumeric => with_optional_message!(rules::AlphaNumeric::new(), message),
			RuleKind::Numeric => with_optional_message!(rules::Numeric::new(), message),
			RuleKind::Email => with_optional_message!(rules::Email::new(), message),
			RuleKind::Url => with_optional_message!(rules::Url::new(), message),
			RuleKind::Regex { pattern } => {
				let rule = rules::Regex::from_pattern(pattern).map_err(|source| {
					SchemaError::InvalidPattern {
						field: field.to_string(),
						source,
					}
				})?;
				with_optional_message!(rule, message)
			}
			RuleKind::MinLength { value } => {
				with_optional_message!(rules::MinLength::new(*value), message)
			}
			RuleKind::MaxLength { value } => {
				with_optional_message!(rules::MaxLength::new(*value), message)
			}
			RuleKind::Min { value } => with_optional_message!(rules::Min::new(*value), message),
			RuleKind::Max { value } => with_optional_message!(rules::Max::new(*value), message),
			RuleKind::OneOf { values } => {
				with_optional_message!(rules::OneOf::new(values.iter().cloned()), message)
			}
			RuleKind::Equals { field } => {
				with_optional_message!(rules::Equals::new(field.as_str()), message)
			}
			RuleKind::File { min_size, max_size } => {
				let mut rule = rules::File::new();
				if let Some(min) = min_size {
					rule = rule.min_size(*min);
				}
				if let Some(max) = max_size {
					rule = rule.max_size(*max);
				}
				with_optional_message!(rule, message)
			}
			RuleKind::Mime { types } => {
				with_optional_message!(rules::Mime::new(types.iter().cloned()), message)
			}
		})
	}
}

fn json_attr(value: &serde_json::Value) -> AttrValue {
	match value {
		serde_json::Value::Null => AttrValue::Absent,
		serde_json::Value::Bool(flag) => AttrValue::Flag(*flag),
		serde_json::Value::String(text) => AttrValue::Text(text.clone()),
		other => AttrValue::Text(other.to_string()),
	}
}

impl FieldSchema {
	fn apply_common<E: Element>(&self, mut element: E) -> E {
		if let Some(label) = &self.label {
			element = element.label(label.as_str());
		}
		for (name, value) in &self.attributes {
			element = element.attr(name, json_attr(value));
		}
		element
	}

	fn build_into(&self, form: Form) -> Result<Form, SchemaError> {
		let kind = self.field_type.trim().to_ascii_lowercase();
		let placeholder = self.placeholder.clone().unwrap_or_default();
		Ok(match kind.as_str() {
			"textarea" => form.child(self.apply_common(
				Textarea::new(self.name.as_str())
					.placeholder(placeholder)
					.required(self.required),
			)),
			"select" => {
				let select = self
					.options
					.iter()
					.fold(Select::new(self.name.as_str()), |select, option| {
						select.option(option.value.as_str(), option.label.as_str())
					})
					.multiple(self.name.ends_with("[]"))
					.required(self.required);
				form.child(self.apply_common(select))
			}
			other => {
				let input_type = InputType::parse(other).ok_or_else(|| SchemaError::UnknownType {
					field: self.name.clone(),
					field_type: self.field_type.clone(),
				})?;
				let input = Input::new(input_type)
					.name(self.name.as_str())
					.placeholder(placeholder)
					.required(self.required);
				form.child(self.apply_common(input))
			}
		})
	}

	fn spec(&self) -> Result<FieldSpec, SchemaError> {
		let mut spec = FieldSpec::new(self.name.as_str());
		let has_required_rule = self
			.rules
			.iter()
			.any(|rule| rule.kind == RuleKind::Required);
		if self.required && !has_required_rule {
			spec = spec.rule(rules::Required::new());
		}
		for rule in &self.rules {
			spec = spec.boxed_rule(rule.build(&self.name)?);
		}
		if let Some(format) = &self.format {
			spec = spec.format(format.clone());
		}
		if self.optional {
			spec = spec.optional();
		}
		Ok(spec)
	}
}

impl FormSchema {
	pub fn from_json(source: &str) -> Result<Self, SchemaError> {
		Ok(serde_json::from_str(source)?)
	}

	/// Build the form markup tree
	pub fn build_form(&self, config: &FormConfig) -> Result<Form, SchemaError> {
		let method = match self.method.as_deref().map(str::trim) {
			Some(m) if m.eq_ignore_ascii_case("get") => Method::Get,
			_ => Method::Post,
		};
		let mut form = Form::new()
			.with_config(config)
			.method(method)
			.novalidate(self.novalidate);
		if let Some(action) = &self.action {
			form = form.action(action.as_str());
		}
		if let Some(id) = &self.id {
			form = form.id(id.as_str());
		}
		if let Some(class) = &self.class {
			form = form.class(class.as_str());
		}
		if self.multipart || self.fields.iter().any(|f| f.field_type.eq_ignore_ascii_case("file")) {
			form = form.multipart();
		}

		for field in &self.fields {
			form = field.build_into(form)?;
		}
		if let Some(text) = &self.submit {
			form = form.child(Button::submit(text.as_str()));
		}
		Ok(form)
	}

	/// Build the validator for submissions of this form
	pub fn build_validator(&self, config: &FormConfig) -> Result<Validator, SchemaError> {
		let mut validator = Validator::new(config);
		for field in &self.fields {
			validator = validator.field(field.spec()?);
		}
		Ok(validator)
	}
}
