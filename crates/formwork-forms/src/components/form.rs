use super::{Child, Input, Render, render_children};
use crate::attrs::Attributes;
use formwork_core::FormConfig;

const DECLARED: &[&str] = &[
	"id",
	"name",
	"class",
	"style",
	"title",
	"action",
	"method",
	"enctype",
	"accept-charset",
	"target",
	"autocomplete",
	"novalidate",
];

const MULTIPART: &str = "multipart/form-data";

/// HTTP method of a form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
	Get,
	#[default]
	Post,
}

impl Method {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Get => "get",
			Self::Post => "post",
		}
	}
}

/// A `<form>` element and its children
///
/// # Examples
///
/// ```
/// use formwork_core::FormConfig;
/// use formwork_forms::components::{Button, Element, Form, Input, Render};
///
/// let form = Form::new()
///     .action("/signup")
///     .with_config(&FormConfig::default())
///     .child(Input::email("email").required(true))
///     .child(Button::submit("Sign up"));
///
/// assert_eq!(
///     form.render(),
///     concat!(
///         r#"<form action="/signup" method="post" accept-charset="UTF-8">"#,
///         r#"<input type="email" name="email" required />"#,
///         r#"<button type="submit">Sign up</button>"#,
///         "</form>"
///     )
/// );
/// ```
pub struct Form {
	pub(super) attrs: Attributes,
	csrf: Option<Input>,
	children: Vec<Child>,
}

impl Form {
	pub fn new() -> Self {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("method", Method::default().as_str());
		Self {
			attrs,
			csrf: None,
			children: Vec::new(),
		}
	}

	/// Apply rendering settings: `accept-charset` from the configured charset
	pub fn with_config(mut self, config: &FormConfig) -> Self {
		self.attrs.set("accept-charset", config.charset.as_str());
		self
	}

	pub fn action(mut self, url: impl Into<String>) -> Self {
		self.attrs.set("action", url);
		self
	}

	pub fn method(mut self, method: Method) -> Self {
		self.attrs.set("method", method.as_str());
		self
	}

	pub fn enctype(mut self, enctype: impl Into<String>) -> Self {
		self.attrs.set("enctype", enctype);
		self
	}

	/// Shorthand for `enctype="multipart/form-data"`, needed for file uploads
	pub fn multipart(self) -> Self {
		self.enctype(MULTIPART)
	}

	pub fn target(mut self, target: impl Into<String>) -> Self {
		self.attrs.set("target", target);
		self
	}

	pub fn autocomplete(mut self, on: bool) -> Self {
		self.attrs.set("autocomplete", if on { "on" } else { "off" });
		self
	}

	pub fn novalidate(mut self, on: bool) -> Self {
		self.attrs.set_flag("novalidate", on);
		self
	}

	/// Embed a CSRF hidden input as the first child
	pub fn csrf(mut self, hidden: Input) -> Self {
		self.csrf = Some(hidden);
		self
	}

	pub fn child(mut self, child: impl Render + Send + Sync + 'static) -> Self {
		self.children.push(Box::new(child));
		self
	}

	pub fn children(mut self, children: impl IntoIterator<Item = Child>) -> Self {
		self.children.extend(children);
		self
	}

	pub fn is_multipart(&self) -> bool {
		self.attrs.get("enctype") == Some(MULTIPART)
	}
}

impl Default for Form {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Form {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Form")
			.field("attrs", &self.attrs)
			.field("csrf", &self.csrf)
			.field("children", &self.children.len())
			.finish()
	}
}

impl Render for Form {
	fn render(&self) -> String {
		let csrf = self.csrf.as_ref().map(Render::render).unwrap_or_default();
		let body = render_children(&self.children);
		self.attrs
			.render_element(|attrs| format!("<form{}>{}{}</form>", attrs, csrf, body))
	}
}
