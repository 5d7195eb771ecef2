use super::Render;
use crate::attrs::Attributes;
use formwork_core::FieldValue;
use formwork_core::html::{escape, escape_attr, to_display_string};

const DECLARED: &[&str] = &[
	"id",
	"name",
	"class",
	"style",
	"title",
	"required",
	"disabled",
	"multiple",
	"size",
	"autofocus",
	"form",
];

/// One `<option>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
	pub value: String,
	pub label: String,
	pub disabled: bool,
}

impl SelectOption {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
			disabled: false,
		}
	}

	fn render(&self, selected: &[String]) -> String {
		let mut out = format!(r#"<option value="{}""#, escape_attr(&self.value));
		if selected.contains(&self.value) {
			out.push_str(" selected");
		}
		if self.disabled {
			out.push_str(" disabled");
		}
		out.push('>');
		out.push_str(&escape(&self.label));
		out.push_str("</option>");
		out
	}
}

/// An option or an `<optgroup>` of options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
	Option(SelectOption),
	Group {
		label: String,
		options: Vec<SelectOption>,
	},
}

/// A `<select>` element
///
/// # Examples
///
/// ```
/// use formwork_forms::components::{Render, Select};
///
/// let html = Select::new("size")
///     .option("s", "Small")
///     .option("m", "Medium")
///     .selected("m")
///     .render();
/// assert_eq!(
///     html,
///     r#"<select name="size"><option value="s">Small</option><option value="m" selected>Medium</option></select>"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
	pub(super) attrs: Attributes,
	items: Vec<SelectItem>,
	selected: Vec<String>,
}

impl Select {
	pub fn new(name: impl Into<String>) -> Self {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("name", name);
		Self {
			attrs,
			items: Vec::new(),
			selected: Vec::new(),
		}
	}

	pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
		self.items
			.push(SelectItem::Option(SelectOption::new(value, label)));
		self
	}

	pub fn push(mut self, item: SelectItem) -> Self {
		self.items.push(item);
		self
	}

	pub fn group<V, L>(mut self, label: impl Into<String>, options: impl IntoIterator<Item = (V, L)>) -> Self
	where
		V: Into<String>,
		L: Into<String>,
	{
		self.items.push(SelectItem::Group {
			label: label.into(),
			options: options
				.into_iter()
				.map(|(value, label)| SelectOption::new(value, label))
				.collect(),
		});
		self
	}

	/// Mark a value as selected. Without `multiple`, the last call wins.
	pub fn selected(mut self, value: impl Into<String>) -> Self {
		if !self.attrs.has_flag("multiple") {
			self.selected.clear();
		}
		self.selected.push(value.into());
		self
	}

	/// Select the values of a submitted field
	pub fn value_from(mut self, submitted: &FieldValue) -> Self {
		self.selected = match submitted {
			FieldValue::List(items) => items.iter().map(to_display_string).collect(),
			other => vec![to_display_string(other)],
		};
		if !self.attrs.has_flag("multiple") {
			self.selected.truncate(1);
		}
		self
	}

	pub fn multiple(mut self, on: bool) -> Self {
		self.attrs.set_flag("multiple", on);
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

	pub fn items(&self) -> &[SelectItem] {
		&self.items
	}
}

impl Render for Select {
	fn render(&self) -> String {
		let body: String = self
			.items
			.iter()
			.map(|item| match item {
				SelectItem::Option(option) => option.render(&self.selected),
				SelectItem::Group { label, options } => format!(
					r#"<optgroup label="{}">{}</optgroup>"#,
					escape_attr(label),
					options
						.iter()
						.map(|option| option.render(&self.selected))
						.collect::<String>()
				),
			})
			.collect();
		self.attrs
			.render_element(|attrs| format!("<select{}>{}</select>", attrs, body))
	}
}
