use super::Render;
use crate::attrs::Attributes;
use formwork_core::html::{escape, normalize_id};

const DECLARED: &[&str] = &["id", "for", "class", "style", "title"];

/// A standalone `<label>` pointing at another element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
	pub(super) attrs: Attributes,
	text: String,
}

impl Label {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			attrs: Attributes::new(DECLARED),
			text: text.into(),
		}
	}

	/// Point at the element with this id
	pub fn for_id(mut self, id: impl Into<String>) -> Self {
		self.attrs.set("for", id);
		self
	}

	/// Point at the element rendered for the field `name`
	pub fn for_field(self, name: &str) -> Self {
		self.for_id(normalize_id(name))
	}
}

impl Render for Label {
	fn render(&self) -> String {
		format!("<label{}>{}</label>", self.attrs.render(), escape(&self.text))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_for_field_uses_normalized_id() {
		let html = Label::new("Street").for_field("user[address][street]").render();

		assert_eq!(html, r#"<label for="user_address_street">Street</label>"#);
	}
}
