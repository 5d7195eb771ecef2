use super::Render;
use crate::attrs::{Attributes, splice_into_first_tag};

const DECLARED: &[&str] = &["id", "name", "class", "style", "title"];

/// Caller-supplied markup, rendered as is.
///
/// Attributes set on it are spliced into the first tag of the fragment and
/// dropped when the fragment has none.
///
/// # Examples
///
/// ```
/// use formwork_forms::components::{Element, Html, Render};
///
/// let html = Html::new("<p>Terms</p><p>More</p>").class("note").render();
/// assert_eq!(html, r#"<p class="note">Terms</p><p>More</p>"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Html {
	pub(super) attrs: Attributes,
	fragment: String,
}

impl Html {
	pub fn new(fragment: impl Into<String>) -> Self {
		Self {
			attrs: Attributes::new(DECLARED),
			fragment: fragment.into(),
		}
	}
}

impl Render for Html {
	fn render(&self) -> String {
		self.attrs
			.render_element(|attrs| splice_into_first_tag(&self.fragment, attrs))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::Element;

	#[test]
	fn test_fragment_without_tag_drops_attributes() {
		let html = Html::new("plain & simple").id("x").render();

		assert_eq!(html, "plain & simple");
	}
}
