use super::Render;
use crate::attrs::Attributes;
use formwork_core::FieldValue;
use formwork_core::html::{escape, to_display_string};

const DECLARED: &[&str] = &[
	"id",
	"name",
	"class",
	"style",
	"title",
	"placeholder",
	"required",
	"disabled",
	"readonly",
	"rows",
	"cols",
	"minlength",
	"maxlength",
	"wrap",
	"autofocus",
	"form",
];

/// A `<textarea>` element; its content is escaped on render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Textarea {
	pub(super) attrs: Attributes,
	content: String,
}

impl Textarea {
	pub fn new(name: impl Into<String>) -> Self {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("name", name);
		Self {
			attrs,
			content: String::new(),
		}
	}

	pub fn content(mut self, content: impl Into<String>) -> Self {
		self.content = content.into();
		self
	}

	/// Re-populate the content from a submitted field
	pub fn value_from(self, submitted: &FieldValue) -> Self {
		self.content(to_display_string(submitted))
	}

	pub fn rows(mut self, rows: usize) -> Self {
		self.attrs.set("rows", rows.to_string());
		self
	}

	pub fn cols(mut self, cols: usize) -> Self {
		self.attrs.set("cols", cols.to_string());
		self
	}

	pub fn placeholder(mut self, text: impl Into<String>) -> Self {
		self.attrs.set("placeholder", text);
		self
	}

	pub fn maxlength(mut self, length: usize) -> Self {
		self.attrs.set("maxlength", length.to_string());
		self
	}

	pub fn required(mut self, on: bool) -> Self {
		self.attrs.set_flag("required", on);
		self
	}

	pub fn disabled(mut self, on: bool) -> Self {
		self.attrs.set_flag("disabled", on);
		self
	}

	pub fn readonly(mut self, on: bool) -> Self {
		self.attrs.set_flag("readonly", on);
		self
	}
}

impl Render for Textarea {
	fn render(&self) -> String {
		let content = escape(&self.content);
		self.attrs
			.render_element(|attrs| format!("<textarea{}>{}</textarea>", attrs, content))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_content_is_escaped() {
		let html = Textarea::new("bio")
			.rows(3)
			.value_from(&FieldValue::text("</textarea><script>"))
			.render();

		assert_eq!(
			html,
			r#"<textarea name="bio" rows="3">&lt;/textarea&gt;&lt;script&gt;</textarea>"#
		);
	}
}
