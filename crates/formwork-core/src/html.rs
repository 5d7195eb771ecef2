//! HTML utilities for escaping, display conversion and id normalization

use crate::value::{BLANK_MARKER, FieldValue};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;

/// Maximum number of characters of a submitted value quoted in an error message
pub const ERROR_VALUE_MAX_CHARS: usize = 50;

/// Entity for a character that must not appear raw in element text
fn text_entity(ch: char) -> Option<&'static str> {
	match ch {
		'&' => Some("&amp;"),
		'<' => Some("&lt;"),
		'>' => Some("&gt;"),
		'"' => Some("&quot;"),
		'\'' => Some("&#x27;"),
		_ => None,
	}
}

/// Entity for a character that must not appear raw in a quoted attribute;
/// line breaks and tabs are kept as numeric references.
fn attr_entity(ch: char) -> Option<&'static str> {
	match ch {
		'\n' => Some("&#10;"),
		'\r' => Some("&#13;"),
		'\t' => Some("&#9;"),
		other => text_entity(other),
	}
}

fn escape_with(text: &str, entity: fn(char) -> Option<&'static str>) -> String {
	let mut out = String::with_capacity(text.len());
	for ch in text.chars() {
		match entity(ch) {
			Some(replacement) => out.push_str(replacement),
			None => out.push(ch),
		}
	}
	out
}

/// Escape text placed between tags, such as a label or a textarea body
///
/// # Examples
///
/// ```
/// use formwork_core::html::escape;
///
/// assert_eq!(escape("Terms & Conditions"), "Terms &amp; Conditions");
/// assert_eq!(escape("<b>O'Brien</b>"), "&lt;b&gt;O&#x27;Brien&lt;/b&gt;");
/// ```
pub fn escape(text: &str) -> String {
	escape_with(text, text_entity)
}

/// Escape a value for a double-quoted attribute
///
/// # Examples
///
/// ```
/// use formwork_core::html::escape_attr;
///
/// assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
/// assert_eq!(escape_attr("a\tb\n"), "a&#9;b&#10;");
/// ```
pub fn escape_attr(text: &str) -> String {
	escape_with(text, attr_entity)
}

/// Unescape HTML entities
///
/// Named entities for the escaped set plus `&nbsp;`, decimal (`&#60;`) and
/// hexadecimal (`&#x3C;`) references are decoded. Anything else, including a
/// bare `&` without a terminating `;`, is copied through unchanged.
///
/// # Examples
///
/// ```
/// use formwork_core::html::unescape;
///
/// assert_eq!(unescape("&lt;option&gt;R&amp;D"), "<option>R&D");
/// assert_eq!(unescape("&#x27;&#39;"), "''");
/// assert_eq!(unescape("fish & chips"), "fish & chips");
/// ```
pub fn unescape(text: &str) -> String {
	let mut result = String::with_capacity(text.len());
	let mut rest = text;

	while let Some(pos) = rest.find('&') {
		result.push_str(&rest[..pos]);
		let tail = &rest[pos..];
		// Entities are short; a far-away ';' belongs to something else.
		let end = tail.char_indices().take(12).find(|&(_, c)| c == ';');
		match end.and_then(|(end, _)| decode_entity(&tail[1..end]).map(|ch| (end, ch))) {
			Some((end, ch)) => {
				result.push(ch);
				rest = &tail[end + 1..];
			}
			None => {
				result.push('&');
				rest = &tail[1..];
			}
		}
	}
	result.push_str(rest);
	result
}

fn decode_entity(entity: &str) -> Option<char> {
	match entity {
		"amp" => Some('&'),
		"lt" => Some('<'),
		"gt" => Some('>'),
		"quot" => Some('"'),
		"apos" => Some('\''),
		"nbsp" => Some('\u{a0}'),
		_ => {
			let code = entity.strip_prefix('#')?;
			let number = match code.strip_prefix(['x', 'X']) {
				Some(hex) => u32::from_str_radix(hex, 16).ok()?,
				None => code.parse::<u32>().ok()?,
			};
			char::from_u32(number)
		}
	}
}

/// Decode then escape, so already-escaped input is not double-encoded
///
/// # Examples
///
/// ```
/// use formwork_core::html::reescape;
///
/// assert_eq!(reescape("a &amp; b"), "a &amp; b");
/// assert_eq!(reescape("a & b"), "a &amp; b");
/// ```
pub fn reescape(text: &str) -> String {
	escape(&unescape(text))
}

/// Render a value the way it should appear inside markup or a text field.
///
/// Lists are joined with `", "`, booleans render as `true`/`false`, null and
/// blank render as the empty string, maps are flattened with
/// [`assoc_to_string`], and uploaded files render their client file name.
/// Lists holding nested containers and maps holding maps have no display
/// form and yield `""`.
/// A result that is whitespace-only or equal to [`BLANK_MARKER`] is forced
/// to `""`.
///
/// # Examples
///
/// ```
/// use formwork_core::FieldValue;
/// use formwork_core::html::to_display_string;
///
/// let list = FieldValue::List(vec![FieldValue::text("a"), FieldValue::Integer(2)]);
/// assert_eq!(to_display_string(&list), "a, 2");
/// assert_eq!(to_display_string(&FieldValue::Bool(false)), "false");
/// assert_eq!(to_display_string(&FieldValue::Null), "");
/// assert_eq!(to_display_string(&FieldValue::text("  ")), "");
/// ```
pub fn to_display_string(value: &FieldValue) -> String {
	let rendered = display_form(value).unwrap_or_default();
	let trimmed = rendered.trim();
	if trimmed.is_empty() || trimmed == BLANK_MARKER {
		String::new()
	} else {
		rendered
	}
}

/// Display form of a value, `None` when it cannot be shown as text
fn display_form(value: &FieldValue) -> Option<String> {
	match value {
		FieldValue::List(items) => items
			.iter()
			.map(scalar_form)
			.collect::<Option<Vec<_>>>()
			.map(|parts| parts.join(", ")),
		FieldValue::Map(map) if map.values().any(|v| matches!(v, FieldValue::Map(_))) => None,
		FieldValue::Map(map) => Some(assoc_to_string(map)),
		other => scalar_form(other),
	}
}

fn scalar_form(value: &FieldValue) -> Option<String> {
	match value {
		FieldValue::Null | FieldValue::Blank => Some(String::new()),
		FieldValue::Text(s) => Some(s.clone()),
		FieldValue::Integer(i) => Some(i.to_string()),
		FieldValue::Float(f) => Some(f.to_string()),
		FieldValue::Bool(b) => Some(b.to_string()),
		FieldValue::File(file) => Some(file.name.clone()),
		FieldValue::List(_) | FieldValue::Map(_) => None,
	}
}

/// Flatten a map into `"key: value"` pairs joined with `", "`
///
/// Nested lists render as `[a, b]` and nested maps as `{key: value}`.
///
/// # Examples
///
/// ```
/// use formwork_core::FieldValue;
/// use formwork_core::html::assoc_to_string;
/// use indexmap::IndexMap;
///
/// let mut map = IndexMap::new();
/// map.insert("street".to_string(), FieldValue::text("Main St"));
/// map.insert("no".to_string(), FieldValue::Integer(5));
/// assert_eq!(assoc_to_string(&map), "street: Main St, no: 5");
/// ```
pub fn assoc_to_string(map: &IndexMap<String, FieldValue>) -> String {
	map.iter()
		.map(|(key, value)| format!("{}: {}", key, nested_form(value)))
		.collect::<Vec<_>>()
		.join(", ")
}

fn nested_form(value: &FieldValue) -> String {
	match value {
		FieldValue::List(items) => format!(
			"[{}]",
			items.iter().map(nested_form).collect::<Vec<_>>().join(", ")
		),
		FieldValue::Map(map) => format!("{{{}}}", assoc_to_string(map)),
		other => scalar_form(other).unwrap_or_default(),
	}
}

/// Render a submitted value for quoting inside a user-facing error message.
///
/// `Null` renders as `null`, blank values as `[empty]`, values without a
/// display form as `[not convertible]`. The text is entity-decoded, cut to
/// [`ERROR_VALUE_MAX_CHARS`] characters (with a trailing `...`), and escaped,
/// so the result never carries raw markup and never ends in a broken entity.
///
/// # Examples
///
/// ```
/// use formwork_core::FieldValue;
/// use formwork_core::html::escape_for_error;
///
/// assert_eq!(escape_for_error(&FieldValue::Null), "null");
/// assert_eq!(escape_for_error(&FieldValue::Blank), "[empty]");
/// assert_eq!(escape_for_error(&FieldValue::text("<b>")), "&lt;b&gt;");
/// ```
pub fn escape_for_error(value: &FieldValue) -> String {
	let rendered = match value {
		FieldValue::Null => "null".to_string(),
		other => match display_form(other) {
			None => "[not convertible]".to_string(),
			Some(text) if text.trim().is_empty() || text.trim() == BLANK_MARKER => {
				"[empty]".to_string()
			}
			Some(text) => text,
		},
	};
	truncate_and_escape(&rendered)
}

/// Render a date-time for quoting inside an error message
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use formwork_core::html::escape_for_error_datetime;
///
/// let dt = DateTime::parse_from_rfc3339("2024-02-29T10:00:00+02:00").unwrap();
/// assert_eq!(escape_for_error_datetime(&dt), "[DateTime{2024-02-29T10:00:00+02:00}]");
/// ```
pub fn escape_for_error_datetime(value: &DateTime<FixedOffset>) -> String {
	truncate_and_escape(&format!("[DateTime{{{}}}]", value.to_rfc3339()))
}

fn truncate_and_escape(text: &str) -> String {
	let decoded = unescape(text);
	if decoded.chars().count() > ERROR_VALUE_MAX_CHARS {
		let cut: String = decoded.chars().take(ERROR_VALUE_MAX_CHARS).collect();
		format!("{}...", escape(&cut))
	} else {
		escape(&decoded)
	}
}

/// Turn a free-form field name into a value usable as an element id.
///
/// Bracket notation is flattened (`user[address][street]` becomes
/// `user_address_street`), characters outside `[A-Za-z0-9_-]` become `_`,
/// runs of `_` collapse, trailing `_` are stripped, a trailing `[]` appends
/// `_0`, and a leading digit gets an `id_` prefix. Normalizing an already
/// normalized id returns it unchanged.
///
/// # Examples
///
/// ```
/// use formwork_core::html::normalize_id;
///
/// assert_eq!(normalize_id("items[]"), "items_0");
/// assert_eq!(normalize_id("user[address][street]"), "user_address_street");
/// assert_eq!(normalize_id("123name"), "id_123name");
/// assert_eq!(normalize_id("first name"), "first_name");
/// ```
pub fn normalize_id(name: &str) -> String {
	let array_marker = name.ends_with("[]");

	let mut id = String::with_capacity(name.len() + 3);
	for ch in name.replace("][", "_").chars() {
		let mapped = if ch.is_ascii_alphanumeric() || ch == '-' {
			ch
		} else {
			'_'
		};
		if mapped == '_' && id.ends_with('_') {
			continue;
		}
		id.push(mapped);
	}

	let trimmed_len = id.trim_end_matches('_').len();
	id.truncate(trimmed_len);

	if array_marker {
		id.push_str("_0");
	}
	if id.starts_with(|c: char| c.is_ascii_digit()) {
		id.insert_str(0, "id_");
	}
	id
}

/// Permissive boolean parser for submitted tokens.
///
/// Accepts `1 true yes on y t` and `0 false no off n f` (trimmed,
/// case-insensitive) plus the empty string as false.
///
/// # Examples
///
/// ```
/// use formwork_core::html::parse_bool;
///
/// assert_eq!(parse_bool("Yes"), Some(true));
/// assert_eq!(parse_bool(" off "), Some(false));
/// assert_eq!(parse_bool("maybe"), None);
/// ```
pub fn parse_bool(text: &str) -> Option<bool> {
	match text.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" | "y" | "t" => Some(true),
		"0" | "false" | "no" | "off" | "n" | "f" | "" => Some(false),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("Q&A", "Q&amp;A", "Q&amp;A")]
	#[case("it's <b>", "it&#x27;s &lt;b&gt;", "it&#x27;s &lt;b&gt;")]
	#[case("a\r\nb\tc", "a\r\nb\tc", "a&#13;&#10;b&#9;c")]
	fn test_text_and_attribute_escaping(
		#[case] input: &str,
		#[case] text: &str,
		#[case] attr: &str,
	) {
		assert_eq!(escape(input), text);
		assert_eq!(escape_attr(input), attr);
		assert_eq!(unescape(&escape_attr(input)), input);
	}

	#[rstest]
	#[case("items[]", "items_0")]
	#[case("user[address][street]", "user_address_street")]
	#[case("123name", "id_123name")]
	#[case("a__b__", "a_b")]
	#[case("tags[][]", "tags_0")]
	#[case("héllo wörld", "h_llo_w_rld")]
	#[case("[]", "_0")]
	#[case("", "")]
	#[case("already_ok-1", "already_ok-1")]
	#[case("9[]", "id_9_0")]
	fn test_normalize_id(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(normalize_id(input), expected);
	}

	proptest! {
		#[test]
		fn prop_normalize_id_is_idempotent(name in ".{0,40}") {
			let once = normalize_id(&name);
			prop_assert_eq!(normalize_id(&once), once.clone());
			prop_assert!(once.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
		}
	}

	#[rstest]
	fn test_escape_for_error_truncates_long_values() {
		// Arrange
		let long = "<".repeat(60);

		// Act
		let rendered = escape_for_error(&FieldValue::text(long));

		// Assert
		assert!(rendered.ends_with("..."));
		assert_eq!(rendered.matches("&lt;").count(), ERROR_VALUE_MAX_CHARS);
		let stripped = rendered.replace("&lt;", "").replace("...", "");
		assert!(stripped.is_empty());
	}

	#[rstest]
	fn test_escape_for_error_sixty_plain_chars() {
		let rendered = escape_for_error(&FieldValue::text("x".repeat(60)));

		assert_eq!(rendered, format!("{}...", "x".repeat(50)));
	}

	#[rstest]
	fn test_escape_for_error_has_no_raw_markup() {
		let rendered = escape_for_error(&FieldValue::text("a & <b> &amp; \"c\""));

		assert!(!rendered.contains('<'));
		assert!(!rendered.contains('>'));
		assert_eq!(rendered, "a &amp; &lt;b&gt; &amp; &quot;c&quot;");
	}

	#[rstest]
	fn test_escape_for_error_not_convertible() {
		let nested = FieldValue::List(vec![FieldValue::List(vec![])]);

		assert_eq!(escape_for_error(&nested), "[not convertible]");
		assert_eq!(to_display_string(&nested), "");
	}

	#[rstest]
	fn test_map_holding_map_is_not_convertible() {
		let mut inner = IndexMap::new();
		inner.insert("b".to_string(), FieldValue::Integer(1));
		let mut nested = IndexMap::new();
		nested.insert("a".to_string(), FieldValue::Map(inner));
		let mut flat = IndexMap::new();
		flat.insert("a".to_string(), FieldValue::List(vec![FieldValue::Integer(1)]));

		assert_eq!(escape_for_error(&FieldValue::Map(nested.clone())), "[not convertible]");
		assert_eq!(to_display_string(&FieldValue::Map(nested)), "");
		assert_eq!(escape_for_error(&FieldValue::Map(flat)), "a: [1]");
	}

	#[rstest]
	fn test_display_string_blank_marker() {
		assert_eq!(to_display_string(&FieldValue::Text(BLANK_MARKER.to_string())), "");
		assert_eq!(to_display_string(&FieldValue::Blank), "");
		assert_eq!(to_display_string(&FieldValue::Float(1.5)), "1.5");
	}

	#[rstest]
	fn test_assoc_to_string_nested() {
		let mut inner = IndexMap::new();
		inner.insert("zip".to_string(), FieldValue::text("1000"));
		let mut outer = IndexMap::new();
		outer.insert("city".to_string(), FieldValue::text("Bern"));
		outer.insert("meta".to_string(), FieldValue::Map(inner));
		outer.insert(
			"tags".to_string(),
			FieldValue::List(vec![FieldValue::text("a"), FieldValue::text("b")]),
		);

		assert_eq!(
			assoc_to_string(&outer),
			"city: Bern, meta: {zip: 1000}, tags: [a, b]"
		);
	}

	#[rstest]
	#[case("&lt;&gt;&amp;&quot;&apos;", "<>&\"'")]
	#[case("&#60;&#x3C;&#X3c;", "<<<")]
	#[case("&unknown; & &#xZZ;", "&unknown; & &#xZZ;")]
	#[case("trailing &", "trailing &")]
	fn test_unescape(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(unescape(input), expected);
	}
}
