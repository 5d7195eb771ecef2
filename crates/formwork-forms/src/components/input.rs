use super::Render;
use crate::attrs::Attributes;
use formwork_core::FieldValue;
use formwork_core::html::to_display_string;

const DECLARED: &[&str] = &[
	"type",
	"id",
	"name",
	"value",
	"class",
	"style",
	"title",
	"placeholder",
	"required",
	"disabled",
	"readonly",
	"checked",
	"multiple",
	"min",
	"max",
	"step",
	"minlength",
	"maxlength",
	"pattern",
	"accept",
	"autocomplete",
	"autofocus",
	"size",
	"form",
	"list",
];

/// The `type` of an `<input>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
	Text,
	Password,
	Email,
	Number,
	Tel,
	Url,
	Search,
	Date,
	DatetimeLocal,
	Time,
	Month,
	Week,
	Color,
	Range,
	Checkbox,
	Radio,
	File,
	Hidden,
	Submit,
	Reset,
	Button,
	Image,
}

impl InputType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Password => "password",
			Self::Email => "email",
			Self::Number => "number",
			Self::Tel => "tel",
			Self::Url => "url",
			Self::Search => "search",
			Self::Date => "date",
			Self::DatetimeLocal => "datetime-local",
			Self::Time => "time",
			Self::Month => "month",
			Self::Week => "week",
			Self::Color => "color",
			Self::Range => "range",
			Self::Checkbox => "checkbox",
			Self::Radio => "radio",
			Self::File => "file",
			Self::Hidden => "hidden",
			Self::Submit => "submit",
			Self::Reset => "reset",
			Self::Button => "button",
			Self::Image => "image",
		}
	}

	/// Parse an HTML type name, case-insensitively
	pub fn parse(name: &str) -> Option<Self> {
		let all = [
			Self::Text,
			Self::Password,
			Self::Email,
			Self::Number,
			Self::Tel,
			Self::Url,
			Self::Search,
			Self::Date,
			Self::DatetimeLocal,
			Self::Time,
			Self::Month,
			Self::Week,
			Self::Color,
			Self::Range,
			Self::Checkbox,
			Self::Radio,
			Self::File,
			Self::Hidden,
			Self::Submit,
			Self::Reset,
			Self::Button,
			Self::Image,
		];
		let name = name.trim().to_ascii_lowercase();
		all.into_iter().find(|t| t.as_str() == name)
	}
}

/// An `<input>` element
///
/// # Examples
///
/// ```
/// use formwork_forms::components::{Element, Input, Render};
///
/// let html = Input::email("contact").required(true).placeholder("you@example.com").render();
/// assert_eq!(
///     html,
///     r#"<input type="email" name="contact" placeholder="you@example.com" required />"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
	pub(super) attrs: Attributes,
	input_type: InputType,
}

macro_rules! typed_constructors {
	($($fn_name:ident => $variant:ident),+ $(,)?) => {
		$(
			pub fn $fn_name(name: impl Into<String>) -> Self {
				Self::new(InputType::$variant).with_name(name)
			}
		)+
	};
}

macro_rules! text_setters {
	($($fn_name:ident => $attr:literal),+ $(,)?) => {
		$(
			#[doc = concat!("Set `", $attr, "`; blank input is ignored")]
			pub fn $fn_name(mut self, value: impl Into<String>) -> Self {
				self.attrs.set($attr, value);
				self
			}
		)+
	};
}

macro_rules! flag_setters {
	($($fn_name:ident => $attr:literal),+ $(,)?) => {
		$(
			pub fn $fn_name(mut self, on: bool) -> Self {
				self.attrs.set_flag($attr, on);
				self
			}
		)+
	};
}

impl Input {
	pub fn new(input_type: InputType) -> Self {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("type", input_type.as_str());
		Self { attrs, input_type }
	}

	typed_constructors! {
		text => Text,
		password => Password,
		email => Email,
		number => Number,
		tel => Tel,
		url => Url,
		search => Search,
		date => Date,
		datetime_local => DatetimeLocal,
		time => Time,
		color => Color,
		range => Range,
		checkbox => Checkbox,
		radio => Radio,
		file => File,
		hidden => Hidden,
	}

	fn with_name(mut self, name: impl Into<String>) -> Self {
		self.attrs.set("name", name);
		self
	}

	pub fn input_type(&self) -> InputType {
		self.input_type
	}

	/// Set the value verbatim; blank input is ignored
	pub fn value(mut self, value: impl Into<String>) -> Self {
		self.attrs.set_raw("value", value);
		self
	}

	/// Re-populate the value from a submitted field.
	///
	/// Checkboxes and radios become `checked` when the submitted value equals
	/// their own value; other inputs take the display form of the value.
	/// Password and file inputs are never re-populated.
	pub fn value_from(mut self, submitted: &FieldValue) -> Self {
		match self.input_type {
			InputType::Password | InputType::File => {}
			InputType::Checkbox | InputType::Radio => {
				let own = self.attrs.get("value").unwrap_or("on").to_string();
				let matches = match submitted {
					FieldValue::List(items) => items.iter().any(|item| to_display_string(item) == own),
					other => to_display_string(other) == own,
				};
				self.attrs.set_flag("checked", matches);
			}
			_ => self.attrs.set_raw("value", to_display_string(submitted)),
		}
		self
	}

	text_setters! {
		placeholder => "placeholder",
		min => "min",
		max => "max",
		step => "step",
		pattern => "pattern",
		accept => "accept",
		autocomplete => "autocomplete",
		form => "form",
		list => "list",
	}

	flag_setters! {
		required => "required",
		disabled => "disabled",
		readonly => "readonly",
		checked => "checked",
		multiple => "multiple",
		autofocus => "autofocus",
	}

	pub fn minlength(mut self, length: usize) -> Self {
		self.attrs.set("minlength", length.to_string());
		self
	}

	pub fn maxlength(mut self, length: usize) -> Self {
		self.attrs.set("maxlength", length.to_string());
		self
	}

	pub fn size(mut self, size: usize) -> Self {
		self.attrs.set("size", size.to_string());
		self
	}
}

impl Render for Input {
	fn render(&self) -> String {
		self.attrs.render_element(|attrs| format!("<input{} />", attrs))
	}
}
