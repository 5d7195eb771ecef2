use super::{Child, Render, render_children};
use crate::attrs::Attributes;
use formwork_core::html::escape;

const FIELDSET_DECLARED: &[&str] = &["id", "name", "class", "style", "title", "disabled", "form"];
const LEGEND_DECLARED: &[&str] = &["id", "class", "style", "title"];

/// A `<legend>` caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
	pub(super) attrs: Attributes,
	text: String,
}

impl Legend {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			attrs: Attributes::new(LEGEND_DECLARED),
			text: text.into(),
		}
	}
}

impl Render for Legend {
	fn render(&self) -> String {
		let text = escape(&self.text);
		self.attrs
			.render_element(|attrs| format!("<legend{}>{}</legend>", attrs, text))
	}
}

/// A `<fieldset>` grouping child components under an optional legend
pub struct Fieldset {
	pub(super) attrs: Attributes,
	legend: Option<Legend>,
	children: Vec<Child>,
}

impl Fieldset {
	pub fn new() -> Self {
		Self {
			attrs: Attributes::new(FIELDSET_DECLARED),
			legend: None,
			children: Vec::new(),
		}
	}

	pub fn legend(mut self, legend: Legend) -> Self {
		self.legend = Some(legend);
		self
	}

	pub fn disabled(mut self, on: bool) -> Self {
		self.attrs.set_flag("disabled", on);
		self
	}

	pub fn child(mut self, child: impl Render + Send + Sync + 'static) -> Self {
		self.children.push(Box::new(child));
		self
	}
}

impl Default for Fieldset {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Fieldset {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Fieldset")
			.field("attrs", &self.attrs)
			.field("legend", &self.legend)
			.field("children", &self.children.len())
			.finish()
	}
}

impl Render for Fieldset {
	fn render(&self) -> String {
		let legend = self.legend.as_ref().map(Render::render).unwrap_or_default();
		let body = render_children(&self.children);
		self.attrs
			.render_element(|attrs| format!("<fieldset{}>{}{}</fieldset>", attrs, legend, body))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::{Element, Input};

	#[test]
	fn test_legend_precedes_children() {
		let html = Fieldset::new()
			.class("group")
			.legend(Legend::new("Address & Phone"))
			.child(Input::text("street"))
			.render();

		assert_eq!(
			html,
			concat!(
				r#"<fieldset class="group"><legend>Address &amp; Phone</legend>"#,
				r#"<input type="text" name="street" /></fieldset>"#
			)
		);
	}
}
