use super::Render;
use crate::attrs::Attributes;
use formwork_core::html::escape;

const DECLARED: &[&str] = &[
	"type", "id", "name", "value", "class", "style", "title", "disabled", "autofocus", "form",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonType {
	#[default]
	Submit,
	Reset,
	Button,
}

impl ButtonType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Submit => "submit",
			Self::Reset => "reset",
			Self::Button => "button",
		}
	}
}

/// A `<button>` element with escaped text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
	pub(super) attrs: Attributes,
	text: String,
}

impl Button {
	pub fn new(button_type: ButtonType, text: impl Into<String>) -> Self {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("type", button_type.as_str());
		Self {
			attrs,
			text: text.into(),
		}
	}

	pub fn submit(text: impl Into<String>) -> Self {
		Self::new(ButtonType::Submit, text)
	}

	pub fn reset(text: impl Into<String>) -> Self {
		Self::new(ButtonType::Reset, text)
	}

	pub fn value(mut self, value: impl Into<String>) -> Self {
		self.attrs.set_raw("value", value);
		self
	}

	pub fn disabled(mut self, on: bool) -> Self {
		self.attrs.set_flag("disabled", on);
		self
	}

	pub fn autofocus(mut self, on: bool) -> Self {
		self.attrs.set_flag("autofocus", on);
		self
	}
}

impl Render for Button {
	fn render(&self) -> String {
		let text = escape(&self.text);
		self.attrs
			.render_element(|attrs| format!("<button{}>{}</button>", attrs, text))
	}
}
