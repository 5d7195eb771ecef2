//! Attribute rendering shared by every component
//!
//! Each component owns an [`Attributes`] value holding the attributes its
//! kind declares, a bag of custom attributes, and an optional label. Values
//! are stored unescaped; escaping happens once, at render time.

use formwork_core::html::{escape, escape_attr, normalize_id, unescape};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static ATTR_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z_:][A-Za-z0-9_:.\-]*$")
		.expect("ATTR_NAME_REGEX: invalid regex pattern")
});

/// Attributes whose values accumulate instead of being replaced
const CUMULATIVE: [&str; 2] = ["class", "style"];

/// Value of a single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
	/// `true` renders the bare name, `false` suppresses the attribute
	Flag(bool),
	Text(String),
	/// Suppresses the attribute
	Absent,
}

impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		Self::Flag(value)
	}
}

impl From<&str> for AttrValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for AttrValue {
	fn from(value: i64) -> Self {
		Self::Text(value.to_string())
	}
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Absent, Into::into)
	}
}

/// Anything that can be split into class or style tokens
pub trait IntoTokens {
	fn into_tokens(self) -> Vec<String>;
}

impl IntoTokens for &str {
	fn into_tokens(self) -> Vec<String> {
		self.split_whitespace().map(str::to_string).collect()
	}
}

impl IntoTokens for String {
	fn into_tokens(self) -> Vec<String> {
		self.as_str().into_tokens()
	}
}

impl IntoTokens for &String {
	fn into_tokens(self) -> Vec<String> {
		self.as_str().into_tokens()
	}
}

impl<T: AsRef<str>> IntoTokens for Vec<T> {
	fn into_tokens(self) -> Vec<String> {
		self.iter().flat_map(|t| t.as_ref().into_tokens()).collect()
	}
}

impl<T: AsRef<str>> IntoTokens for &[T] {
	fn into_tokens(self) -> Vec<String> {
		self.iter().flat_map(|t| t.as_ref().into_tokens()).collect()
	}
}

impl<T: AsRef<str>, const N: usize> IntoTokens for [T; N] {
	fn into_tokens(self) -> Vec<String> {
		self.iter().flat_map(|t| t.as_ref().into_tokens()).collect()
	}
}

/// Resolved, escaped attribute set of one element, in render order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
	entries: IndexMap<String, AttrValue>,
}

impl AttributeBag {
	pub fn get(&self, name: &str) -> Option<&AttrValue> {
		self.entries.get(name)
	}

	/// Iterate over the attributes that will actually be emitted
	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
		self.entries
			.iter()
			.filter(|(_, value)| emits(value))
			.map(|(name, value)| (name.as_str(), value))
	}

	/// Serialize as ` name="value" flag ...`, each attribute preceded by a space
	pub fn to_attr_string(&self) -> String {
		let mut out = String::new();
		for (name, value) in self.iter() {
			match value {
				AttrValue::Flag(_) => {
					out.push(' ');
					out.push_str(name);
				}
				AttrValue::Text(text) => {
					out.push_str(&format!(r#" {}="{}""#, name, text));
				}
				AttrValue::Absent => {}
			}
		}
		out
	}
}

fn emits(value: &AttrValue) -> bool {
	match value {
		AttrValue::Flag(flag) => *flag,
		AttrValue::Text(text) => !text.is_empty(),
		AttrValue::Absent => false,
	}
}

/// Declared attributes, custom attributes and label of one component.
///
/// Every setter ignores blank input, so a call with `""` or whitespace never
/// clears a value that was set before.
///
/// # Examples
///
/// ```
/// use formwork_forms::attrs::Attributes;
///
/// let mut attrs = Attributes::new(&["id", "name", "class"]);
/// attrs.set("name", "email");
/// attrs.add_class("a");
/// attrs.add_class(["b", "c"]);
/// attrs.set_custom("data-x", "1 < 2");
///
/// assert_eq!(attrs.render(), r#" name="email" class="a b c" data-x="1 &lt; 2""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
	declared: &'static [&'static str],
	values: IndexMap<String, AttrValue>,
	custom: IndexMap<String, AttrValue>,
	label: Option<String>,
}

impl Attributes {
	pub fn new(declared: &'static [&'static str]) -> Self {
		Self {
			declared,
			values: IndexMap::new(),
			custom: IndexMap::new(),
			label: None,
		}
	}

	/// Names this component kind supports as typed attributes
	pub fn declared(&self) -> &'static [&'static str] {
		self.declared
	}

	pub fn is_declared(&self, name: &str) -> bool {
		self.declared.contains(&name)
	}

	/// Set a declared attribute, trimming the value.
	///
	/// Blank values are ignored. Undeclared names are ignored with a warning.
	pub fn set(&mut self, name: &str, value: impl Into<String>) {
		let value = value.into();
		if value.trim().is_empty() {
			return;
		}
		self.set_text(name, value.trim().to_string());
	}

	/// Set a declared attribute verbatim (used for `value`, which keeps its
	/// surrounding whitespace). Blank values are ignored.
	pub fn set_raw(&mut self, name: &str, value: impl Into<String>) {
		let value = value.into();
		if value.trim().is_empty() {
			return;
		}
		self.set_text(name, value);
	}

	fn set_text(&mut self, name: &str, value: String) {
		if !self.is_declared(name) {
			tracing::warn!(attribute = name, "ignoring undeclared attribute");
			return;
		}
		self.values.insert(name.to_string(), AttrValue::Text(value));
	}

	/// Turn a declared boolean attribute on or off
	pub fn set_flag(&mut self, name: &str, on: bool) {
		if !self.is_declared(name) {
			tracing::warn!(attribute = name, "ignoring undeclared attribute");
			return;
		}
		if on {
			self.values.insert(name.to_string(), AttrValue::Flag(true));
		} else {
			self.values.shift_remove(name);
		}
	}

	/// Append class tokens
	pub fn add_class(&mut self, tokens: impl IntoTokens) {
		self.append_tokens("class", tokens.into_tokens());
	}

	/// Append style declarations
	pub fn add_style(&mut self, tokens: impl IntoTokens) {
		self.append_tokens("style", tokens.into_tokens());
	}

	fn append_tokens(&mut self, name: &str, tokens: Vec<String>) {
		if tokens.is_empty() {
			return;
		}
		let target = if self.is_declared(name) {
			&mut self.values
		} else {
			&mut self.custom
		};
		let joined = tokens.join(" ");
		match target.get_mut(name) {
			Some(AttrValue::Text(existing)) if !existing.is_empty() => {
				existing.push(' ');
				existing.push_str(&joined);
			}
			_ => {
				target.insert(name.to_string(), AttrValue::Text(joined));
			}
		}
	}

	/// Add a custom attribute.
	///
	/// `class` and `style` accumulate; other names overwrite. Names outside
	/// `[A-Za-z0-9_:.-]` are dropped with a warning.
	pub fn set_custom(&mut self, name: &str, value: impl Into<AttrValue>) {
		let name = name.trim();
		if !ATTR_NAME_REGEX.is_match(name) {
			tracing::warn!(attribute = name, "dropping custom attribute with invalid name");
			return;
		}
		let value = value.into();
		let name = name.to_ascii_lowercase();
		if CUMULATIVE.contains(&name.as_str())
			&& let AttrValue::Text(text) = &value
			&& !text.trim().is_empty()
			&& let Some(AttrValue::Text(existing)) = self.custom.get_mut(&name)
		{
			existing.push(' ');
			existing.push_str(text.trim());
			return;
		}
		self.custom.insert(name, value);
	}

	/// Set the label text; blank input is ignored
	pub fn set_label(&mut self, text: impl Into<String>) {
		let text = text.into();
		if !text.trim().is_empty() {
			self.label = Some(text.trim().to_string());
		}
	}

	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	/// Raw (unescaped) value of a declared or custom text attribute
	pub fn get(&self, name: &str) -> Option<&str> {
		fn lookup<'a>(map: &'a IndexMap<String, AttrValue>, name: &str) -> Option<&'a str> {
			match map.get(name) {
				Some(AttrValue::Text(text)) => Some(text.as_str()),
				_ => None,
			}
		}
		lookup(&self.custom, name).or_else(|| lookup(&self.values, name))
	}

	/// Whether a boolean attribute is on
	pub fn has_flag(&self, name: &str) -> bool {
		matches!(self.custom.get(name), Some(AttrValue::Flag(true)))
			|| matches!(self.values.get(name), Some(AttrValue::Flag(true)))
	}

	/// Merge declared and custom attributes into the final escaped bag
	pub fn bag(&self) -> AttributeBag {
		let mut entries: IndexMap<String, AttrValue> = self
			.declared
			.iter()
			.map(|name| (name.to_string(), AttrValue::Absent))
			.collect();

		for (name, value) in &self.values {
			let resolved = match value {
				AttrValue::Text(text) => AttrValue::Text(escape_attr(text)),
				AttrValue::Flag(true) => AttrValue::Flag(true),
				_ => AttrValue::Absent,
			};
			entries.insert(name.clone(), resolved);
		}

		for (name, value) in &self.custom {
			match value {
				AttrValue::Text(text) if text.trim().is_empty() => {
					entries.shift_remove(name);
				}
				AttrValue::Text(text) if CUMULATIVE.contains(&name.as_str()) => {
					let addition = escape_attr(&unescape(text));
					let merged = match entries.get(name) {
						Some(AttrValue::Text(existing)) if !existing.is_empty() => {
							format!("{} {}", existing, addition)
						}
						_ => addition,
					};
					entries.insert(name.clone(), AttrValue::Text(merged));
				}
				AttrValue::Text(text) => {
					entries.insert(name.clone(), AttrValue::Text(escape_attr(text)));
				}
				AttrValue::Flag(true) => {
					entries.insert(name.clone(), AttrValue::Flag(true));
				}
				AttrValue::Flag(false) | AttrValue::Absent => {
					entries.shift_remove(name);
				}
			}
		}

		AttributeBag { entries }
	}

	/// The attribute string, each attribute preceded by a space
	pub fn render(&self) -> String {
		self.bag().to_attr_string()
	}

	/// Render an element through `build`, which receives the attribute
	/// string, and wrap it in a `<label>` when a label is set.
	///
	/// A labelled element without an id gets one derived from its name.
	pub fn render_element(&self, build: impl FnOnce(&str) -> String) -> String {
		let Some(label) = &self.label else {
			return build(&self.render());
		};

		let mut bag = self.bag();
		let explicit = match bag.get("id") {
			Some(AttrValue::Text(id)) if !id.is_empty() => Some(id.clone()),
			_ => None,
		};
		let id = explicit.or_else(|| {
			let derived = normalize_id(self.get("name")?);
			if derived.is_empty() {
				return None;
			}
			bag.entries
				.insert("id".to_string(), AttrValue::Text(derived.clone()));
			Some(derived)
		});

		let element = build(&bag.to_attr_string());
		match id {
			Some(id) => format!(r#"<label for="{}">{} {}</label>"#, id, escape(label), element),
			None => format!("<label>{} {}</label>", escape(label), element),
		}
	}
}

/// Splice `attrs` (as produced by [`Attributes::render`]) into the first tag
/// of an HTML fragment.
///
/// The attributes land before the closing `>` (or `/>`) of the first start
/// tag. A fragment without a tag is returned unchanged.
///
/// # Examples
///
/// ```
/// use formwork_forms::attrs::splice_into_first_tag;
///
/// assert_eq!(
///     splice_into_first_tag("text <img src=\"a>b\" /> <b>x</b>", r#" class="pic""#),
///     "text <img src=\"a>b\" class=\"pic\" /> <b>x</b>"
/// );
/// assert_eq!(splice_into_first_tag("no tags", r#" id="x""#), "no tags");
/// ```
pub fn splice_into_first_tag(fragment: &str, attrs: &str) -> String {
	if attrs.is_empty() {
		return fragment.to_string();
	}
	let Some(position) = insertion_point(fragment) else {
		return fragment.to_string();
	};
	let mut out = String::with_capacity(fragment.len() + attrs.len());
	out.push_str(&fragment[..position]);
	out.push_str(attrs);
	out.push_str(&fragment[position..]);
	out
}

fn insertion_point(fragment: &str) -> Option<usize> {
	let bytes = fragment.as_bytes();
	let start = bytes
		.windows(2)
		.position(|pair| pair[0] == b'<' && pair[1].is_ascii_alphabetic())?;

	let mut quote: Option<u8> = None;
	for (offset, &byte) in bytes[start..].iter().enumerate() {
		let index = start + offset;
		match (quote, byte) {
			(Some(q), b) if b == q => quote = None,
			(Some(_), _) => {}
			(None, b'"' | b'\'') => quote = Some(byte),
			(None, b'>') => {
				let mut end = index;
				if end > start && bytes[end - 1] == b'/' {
					end -= 1;
				}
				while end > start && bytes[end - 1].is_ascii_whitespace() {
					end -= 1;
				}
				return Some(end);
			}
			_ => {}
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const DECLARED: &[&str] = &["id", "name", "class", "style", "title", "required"];

	#[rstest]
	fn test_class_accumulates() {
		// Arrange
		let mut attrs = Attributes::new(DECLARED);

		// Act
		attrs.add_class("a");
		attrs.add_class(vec!["b", "c"]);

		// Assert
		assert_eq!(attrs.render(), r#" class="a b c""#);
	}

	#[rstest]
	fn test_blank_setter_keeps_previous_value() {
		let mut attrs = Attributes::new(DECLARED);

		attrs.set("title", "Hello");
		attrs.set("title", "   ");

		assert_eq!(attrs.get("title"), Some("Hello"));
	}

	#[rstest]
	fn test_undeclared_attribute_is_ignored() {
		let mut attrs = Attributes::new(DECLARED);

		attrs.set("action", "/submit");

		assert_eq!(attrs.render(), "");
	}

	#[rstest]
	fn test_declared_order_then_custom_order() {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set_custom("data-b", "2");
		attrs.set("name", "n");
		attrs.set_custom("data-a", "1");
		attrs.set("id", "i");

		let rendered = attrs.render();

		assert_eq!(rendered, r#" id="i" name="n" data-b="2" data-a="1""#);
	}

	#[rstest]
	fn test_custom_class_is_decoded_then_escaped() {
		let mut attrs = Attributes::new(DECLARED);
		attrs.add_class("base");
		attrs.set_custom("class", "x&amp;y");

		assert_eq!(attrs.render(), r#" class="base x&amp;y""#);
	}

	#[rstest]
	fn test_custom_text_overwrites_and_escapes() {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("title", "plain");
		attrs.set_custom("title", "\"quoted\"");

		assert_eq!(attrs.render(), r#" title="&quot;quoted&quot;""#);
	}

	#[rstest]
	#[case(AttrValue::Flag(false))]
	#[case(AttrValue::Absent)]
	#[case(AttrValue::Text(String::new()))]
	fn test_custom_suppresses_attribute(#[case] value: AttrValue) {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("title", "shown");
		attrs.set_custom("title", value);

		assert_eq!(attrs.render(), "");
	}

	#[rstest]
	fn test_flags_render_bare_name() {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set_flag("required", true);
		attrs.set_custom("hidden", true);

		assert_eq!(attrs.render(), " required hidden");
	}

	#[rstest]
	#[case("on click")]
	#[case("x\"y")]
	#[case("<script>")]
	fn test_invalid_custom_names_are_dropped(#[case] name: &str) {
		let mut attrs = Attributes::new(DECLARED);

		attrs.set_custom(name, "1");

		assert_eq!(attrs.render(), "");
	}

	#[rstest]
	fn test_label_derives_id_from_name() {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("name", "user[email]");
		attrs.set_label("E-mail <required>");

		let html = attrs.render_element(|a| format!("<input{} />", a));

		assert_eq!(
			html,
			r#"<label for="user_email">E-mail &lt;required&gt; <input id="user_email" name="user[email]" /></label>"#
		);
	}

	#[rstest]
	fn test_label_keeps_explicit_id() {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("id", "mail");
		attrs.set("name", "email");
		attrs.set_label("Mail");

		let html = attrs.render_element(|a| format!("<input{} />", a));

		assert_eq!(
			html,
			r#"<label for="mail">Mail <input id="mail" name="email" /></label>"#
		);
	}

	#[rstest]
	fn test_get_prefers_custom_over_declared() {
		let mut attrs = Attributes::new(DECLARED);
		attrs.set("name", "email");
		attrs.set("title", "declared");
		attrs.set_custom("title", "custom");
		attrs.set_flag("required", true);

		assert_eq!(attrs.get("name"), Some("email"));
		assert_eq!(attrs.get("title"), Some("custom"));
		assert_eq!(attrs.get("required"), None);
		assert_eq!(attrs.get("missing"), None);
	}

	#[rstest]
	#[case("<div>x</div>", r#"<div class="c">x</div>"#)]
	#[case("<br/>", r#"<br class="c"/>"#)]
	#[case("</p><p title='a>b'>", r#"</p><p title='a>b' class="c">"#)]
	#[case("1 < 2", "1 < 2")]
	fn test_splice(#[case] fragment: &str, #[case] expected: &str) {
		assert_eq!(splice_into_first_tag(fragment, r#" class="c""#), expected);
	}
}
