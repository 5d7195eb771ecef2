//! Form components
//!
//! Every component owns an [`Attributes`] value and renders through the
//! shared attribute contract in [`crate::attrs`]. Builders consume and return
//! `self`; setters given blank input leave the component unchanged.

mod button;
mod fieldset;
mod form;
mod html;
mod input;
mod label;
mod select;
mod textarea;

pub use button::{Button, ButtonType};
pub use fieldset::{Fieldset, Legend};
pub use form::{Form, Method};
pub use html::Html;
pub use input::{Input, InputType};
pub use label::Label;
pub use select::{Select, SelectItem, SelectOption};
pub use textarea::Textarea;

use crate::attrs::{AttrValue, Attributes, IntoTokens};

/// Something that produces final markup
pub trait Render {
	fn render(&self) -> String;
}

/// A boxed child component
pub type Child = Box<dyn Render + Send + Sync>;

/// Fluent setters shared by every component
pub trait Element: Sized {
	fn attributes(&self) -> &Attributes;

	fn attributes_mut(&mut self) -> &mut Attributes;

	fn id(mut self, id: impl Into<String>) -> Self {
		self.attributes_mut().set("id", id);
		self
	}

	fn name(mut self, name: impl Into<String>) -> Self {
		self.attributes_mut().set("name", name);
		self
	}

	/// Append class tokens; repeated calls accumulate
	fn class(mut self, tokens: impl IntoTokens) -> Self {
		self.attributes_mut().add_class(tokens);
		self
	}

	/// Append style declarations; repeated calls accumulate
	fn style(mut self, tokens: impl IntoTokens) -> Self {
		self.attributes_mut().add_style(tokens);
		self
	}

	fn title(mut self, title: impl Into<String>) -> Self {
		self.attributes_mut().set("title", title);
		self
	}

	/// Add a custom attribute, see [`Attributes::set_custom`]
	fn attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
		self.attributes_mut().set_custom(name, value);
		self
	}

	/// Wrap the rendered element in a `<label>`
	fn label(mut self, text: impl Into<String>) -> Self {
		self.attributes_mut().set_label(text);
		self
	}
}

macro_rules! impl_element {
	($($ty:ty),+ $(,)?) => {
		$(
			impl Element for $ty {
				fn attributes(&self) -> &Attributes {
					&self.attrs
				}

				fn attributes_mut(&mut self) -> &mut Attributes {
					&mut self.attrs
				}
			}
		)+
	};
}

impl_element!(Button, Fieldset, Legend, Form, Html, Input, Label, Select, Textarea);

pub(crate) fn render_children(children: &[Child]) -> String {
	children.iter().map(|child| child.render()).collect()
}
