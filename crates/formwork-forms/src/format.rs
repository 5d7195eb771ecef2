//! Format engine
//!
//! Coerces a raw submitted [`FieldValue`] into the primitive type declared by
//! a [`FormatDirective`]. Blank input is never coerced, uploaded files are
//! never coerced, and a failure never leaves a partially converted value
//! behind.

use crate::clean::CleanValue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use formwork_core::html::{assoc_to_string, escape_for_error, parse_bool, to_display_string};
use formwork_core::{
	ErrorKind, ErrorMode, ErrorPayload, FieldValue, FormConfig, FormatError, FormatResult,
	value::is_blank_text,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::panic::Location;
use std::str::FromStr;

/// Largest precision `round` applies; beyond this f64 has no digits left.
const MAX_ROUND_PRECISION: u32 = 15;

/// Target type of a coercion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Modification {
	Round,
	Integer,
	Float,
	String,
	DateTime,
	Boolean,
	/// A name the engine does not know; reported as `UnsupportedFormat`
	Unsupported(String),
}

impl Modification {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Round => "round",
			Self::Integer => "integer",
			Self::Float => "float",
			Self::String => "string",
			Self::DateTime => "datetime",
			Self::Boolean => "boolean",
			Self::Unsupported(name) => name,
		}
	}
}

impl FromStr for Modification {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.trim().to_ascii_lowercase().as_str() {
			"round" => Self::Round,
			"integer" | "int" => Self::Integer,
			"float" | "double" => Self::Float,
			"string" => Self::String,
			"datetime" => Self::DateTime,
			"boolean" | "bool" => Self::Boolean,
			_ => Self::Unsupported(s.to_string()),
		})
	}
}

impl fmt::Display for Modification {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for Modification {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for Modification {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let name = String::deserialize(deserializer)?;
		let Ok(modification) = name.parse::<Modification>();
		Ok(modification)
	}
}

/// Declares how a raw value must be coerced.
///
/// `modification` is optional only so that a decoded field description with
/// a format block but no target type can be reported as
/// `MissingFormatDirective` instead of being silently skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDirective {
	#[serde(default)]
	pub modification: Option<Modification>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub precision: Option<u32>,
}

impl FormatDirective {
	pub fn new(modification: Modification) -> Self {
		Self {
			modification: Some(modification),
			precision: None,
		}
	}

	pub fn round(precision: u32) -> Self {
		Self::new(Modification::Round).with_precision(precision)
	}

	pub fn integer() -> Self {
		Self::new(Modification::Integer)
	}

	pub fn float() -> Self {
		Self::new(Modification::Float)
	}

	pub fn string() -> Self {
		Self::new(Modification::String)
	}

	pub fn datetime() -> Self {
		Self::new(Modification::DateTime)
	}

	pub fn boolean() -> Self {
		Self::new(Modification::Boolean)
	}

	pub fn with_precision(mut self, precision: u32) -> Self {
		self.precision = Some(precision);
		self
	}
}

/// Outcome of [`Format::coerce`]: a value, or the user-safe payload of a
/// failure when the engine runs in envelope mode
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	Value(CleanValue),
	Rejected(ErrorPayload),
}

/// The coercion engine
///
/// # Examples
///
/// ```
/// use formwork_core::{FieldValue, FormConfig};
/// use formwork_forms::{CleanValue, Format, FormatDirective};
///
/// let format = Format::new(&FormConfig::default());
/// let value = format
///     .format(&FieldValue::text("1.46"), &FormatDirective::round(1), "price")
///     .unwrap();
/// assert_eq!(value, CleanValue::Float(1.5));
/// ```
#[derive(Debug, Clone)]
pub struct Format {
	mode: ErrorMode,
}

impl Format {
	pub fn new(config: &FormConfig) -> Self {
		Self {
			mode: config.error_mode,
		}
	}

	pub fn error_mode(&self) -> ErrorMode {
		self.mode
	}

	/// Coerce `raw` under `directive`.
	///
	/// Errors carry the location of the call to this method as their origin.
	#[track_caller]
	pub fn format(
		&self,
		raw: &FieldValue,
		directive: &FormatDirective,
		field_key: &str,
	) -> FormatResult<CleanValue> {
		self.format_at(raw, directive, field_key, Location::caller())
	}

	/// Coerce `raw`, reporting failures the way the configured error mode
	/// asks: as an [`Outcome::Rejected`] payload in envelope mode, as `Err`
	/// in throw mode.
	#[track_caller]
	pub fn coerce(
		&self,
		raw: &FieldValue,
		directive: &FormatDirective,
		field_key: &str,
	) -> FormatResult<Outcome> {
		match self.format_at(raw, directive, field_key, Location::caller()) {
			Ok(value) => Ok(Outcome::Value(value)),
			Err(err) if self.mode == ErrorMode::Envelope => Ok(Outcome::Rejected(err.payload())),
			Err(err) => Err(err),
		}
	}

	pub(crate) fn format_at(
		&self,
		raw: &FieldValue,
		directive: &FormatDirective,
		field_key: &str,
		origin: &'static Location<'static>,
	) -> FormatResult<CleanValue> {
		let fail = |kind: ErrorKind, detail: String| {
			FormatError::at(
				kind,
				kind.default_message(),
				format!("field '{}': {}", field_key, detail),
				origin,
			)
			.with_field(field_key)
		};

		match raw {
			FieldValue::Blank => return Ok(CleanValue::Blank),
			FieldValue::Text(text) if is_blank_text(text) => return Ok(CleanValue::Blank),
			FieldValue::File(file) => return Ok(CleanValue::File(file.clone())),
			FieldValue::Null => return Ok(CleanValue::Null),
			_ => {}
		}

		let Some(modification) = &directive.modification else {
			return Err(fail(
				ErrorKind::MissingFormatDirective,
				"format directive has no modification".to_string(),
			));
		};

		tracing::debug!(field = field_key, modification = %modification, kind = raw.kind(), "coercing field value");

		match modification {
			Modification::Round => {
				let number = to_finite_float(raw).map_err(|(kind, detail)| fail(kind, detail))?;
				Ok(CleanValue::Float(round_to(number, directive.precision.unwrap_or(0))))
			}
			Modification::Integer => to_integer(raw)
				.map(CleanValue::Integer)
				.map_err(|(kind, detail)| fail(kind, detail)),
			Modification::Float => to_finite_float(raw)
				.map(CleanValue::Float)
				.map_err(|(kind, detail)| fail(kind, detail)),
			Modification::String => Ok(to_text(raw)),
			Modification::DateTime => to_datetime(raw)
				.map(CleanValue::DateTime)
				.map_err(|(kind, detail)| fail(kind, detail)),
			Modification::Boolean => to_bool(raw)
				.map(CleanValue::Bool)
				.map_err(|(kind, detail)| fail(kind, detail)),
			Modification::Unsupported(name) => Err(fail(
				ErrorKind::UnsupportedFormat,
				format!("unsupported modification '{}'", name),
			)),
		}
	}
}

type Failure = (ErrorKind, String);

fn non_scalar(raw: &FieldValue) -> Failure {
	(
		ErrorKind::NonScalarValue,
		format!("a {} cannot be coerced to a scalar", raw.kind()),
	)
}

fn to_float(raw: &FieldValue) -> Result<f64, Failure> {
	match raw {
		FieldValue::Integer(i) => Ok(*i as f64),
		FieldValue::Float(f) => Ok(*f),
		FieldValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
		FieldValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
			(
				ErrorKind::InvalidNumberFormat,
				format!("'{}' is not a number", escape_for_error(raw)),
			)
		}),
		FieldValue::List(_) | FieldValue::Map(_) => Err(non_scalar(raw)),
		// Short-circuited before dispatch.
		FieldValue::Null | FieldValue::Blank | FieldValue::File(_) => Ok(0.0),
	}
}

fn to_finite_float(raw: &FieldValue) -> Result<f64, Failure> {
	let number = to_float(raw)?;
	if number.is_finite() {
		Ok(number)
	} else {
		Err((
			ErrorKind::NumericOverflow,
			format!("'{}' is not a finite number", escape_for_error(raw)),
		))
	}
}

/// Round half away from zero to `precision` decimal places
fn round_to(number: f64, precision: u32) -> f64 {
	if precision == 0 {
		return number.round();
	}
	let factor = 10f64.powi(precision.min(MAX_ROUND_PRECISION) as i32);
	let rounded = (number * factor).round() / factor;
	if rounded.is_finite() { rounded } else { number }
}

fn to_integer(raw: &FieldValue) -> Result<i64, Failure> {
	match raw {
		FieldValue::Integer(i) => return Ok(*i),
		FieldValue::Text(text) => {
			let text = text.trim();
			if let Ok(i) = text.parse::<i64>() {
				return Ok(i);
			}
			// Integer literals just past the bounds round onto them as f64.
			let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
			if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
				return Err(overflow(raw));
			}
		}
		_ => {}
	}

	let number = to_float(raw)?;
	// i64::MAX is not representable; 2^63 is the first value out of range.
	const UPPER: f64 = 9_223_372_036_854_775_808.0;
	if !number.is_finite() || number >= UPPER || number < -UPPER {
		return Err(overflow(raw));
	}
	Ok(number.trunc() as i64)
}

fn overflow(raw: &FieldValue) -> Failure {
	(
		ErrorKind::NumericOverflow,
		format!("'{}' is outside the integer range", escape_for_error(raw)),
	)
}

fn to_text(raw: &FieldValue) -> CleanValue {
	match raw {
		FieldValue::Map(map) => CleanValue::Text(assoc_to_string(map)),
		FieldValue::List(_) => CleanValue::from(raw.clone()),
		FieldValue::Text(text) => CleanValue::Text(text.clone()),
		other => CleanValue::Text(to_display_string(other)),
	}
}

fn to_bool(raw: &FieldValue) -> Result<bool, Failure> {
	let invalid = || {
		(
			ErrorKind::InvalidBooleanFormat,
			format!("'{}' is not a boolean token", escape_for_error(raw)),
		)
	};
	match raw {
		FieldValue::Bool(b) => Ok(*b),
		FieldValue::Integer(0) => Ok(false),
		FieldValue::Integer(1) => Ok(true),
		FieldValue::Float(f) if *f == 0.0 => Ok(false),
		FieldValue::Float(f) if *f == 1.0 => Ok(true),
		FieldValue::Text(text) => parse_bool(text).ok_or_else(invalid),
		FieldValue::List(_) | FieldValue::Map(_) => Err(non_scalar(raw)),
		_ => Err(invalid()),
	}
}

fn utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
	naive.and_utc().fixed_offset()
}

fn midnight(date: NaiveDate) -> DateTime<FixedOffset> {
	utc(date.and_time(NaiveTime::MIN))
}

fn epoch_date() -> NaiveDate {
	NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn to_datetime(raw: &FieldValue) -> Result<DateTime<FixedOffset>, Failure> {
	let invalid = || {
		(
			ErrorKind::InvalidDateTimeFormat,
			format!("'{}' matches no accepted date/time format", escape_for_error(raw)),
		)
	};

	match raw {
		FieldValue::Integer(i) if *i >= 0 => from_timestamp(*i).ok_or_else(invalid),
		FieldValue::Float(f) if *f >= 0.0 && f.fract() == 0.0 && *f < 9.2e18 => {
			from_timestamp(*f as i64).ok_or_else(invalid)
		}
		FieldValue::Text(text) => parse_datetime(text).ok_or_else(invalid),
		FieldValue::List(_) | FieldValue::Map(_) => Err(non_scalar(raw)),
		_ => Err(invalid()),
	}
}

fn from_timestamp(seconds: i64) -> Option<DateTime<FixedOffset>> {
	DateTime::from_timestamp(seconds, 0).map(|dt| dt.fixed_offset())
}

/// Try the accepted formats in order; the first one whose re-rendering
/// equals the (upper-cased) input wins.
fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
	let input = text.trim().to_ascii_uppercase();
	let s = input.as_str();

	// (1) non-negative Unix timestamp
	if !s.is_empty()
		&& s.bytes().all(|b| b.is_ascii_digit())
		&& let Ok(seconds) = s.parse::<i64>()
		&& seconds.to_string() == s
		&& let Some(dt) = from_timestamp(seconds)
	{
		return Some(dt);
	}

	// (2) date and time with offset
	if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%:z")
		&& dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string() == s
	{
		return Some(dt);
	}

	// (3) and (4) local date and time
	for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
		if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern)
			&& naive.format(pattern).to_string() == s
		{
			return Some(utc(naive));
		}
	}

	// (5) date at midnight
	if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
		&& date.format("%Y-%m-%d").to_string() == s
	{
		return Some(midnight(date));
	}

	// (6) and (7) time of day on the epoch date
	for pattern in ["%H:%M:%S", "%H:%M"] {
		if let Ok(time) = NaiveTime::parse_from_str(s, pattern)
			&& time.format(pattern).to_string() == s
		{
			return Some(utc(epoch_date().and_time(time)));
		}
	}

	// (8) ISO week, Monday at midnight
	if let Some((year, week)) = s.split_once("-W")
		&& year.len() == 4
		&& week.len() == 2
		&& let (Ok(year), Ok(week)) = (year.parse::<i32>(), week.parse::<u32>())
		&& let Some(date) = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
		&& date.format("%G-W%V").to_string() == s
	{
		return Some(midnight(date));
	}

	// (9) year and month, first day
	if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
		&& date.format("%Y-%m").to_string() == s
	{
		return Some(midnight(date));
	}

	// (10) bare year, first of January
	if s.len() == 4
		&& s.bytes().all(|b| b.is_ascii_digit())
		&& let Ok(year) = s.parse::<i32>()
		&& let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1)
	{
		return Some(midnight(date));
	}

	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Datelike, Timelike};
	use formwork_core::{BLANK_MARKER, UploadedFile};
	use indexmap::IndexMap;
	use proptest::prelude::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn engine() -> Format {
		Format::new(&FormConfig::default())
	}

	fn all_directives() -> Vec<FormatDirective> {
		vec![
			FormatDirective::round(2),
			FormatDirective::integer(),
			FormatDirective::float(),
			FormatDirective::string(),
			FormatDirective::datetime(),
			FormatDirective::boolean(),
			FormatDirective::new(Modification::Unsupported("money".to_string())),
			FormatDirective {
				modification: None,
				precision: None,
			},
		]
	}

	#[rstest]
	#[case(FieldValue::text(""))]
	#[case(FieldValue::text("   \t"))]
	#[case(FieldValue::text(BLANK_MARKER))]
	#[case(FieldValue::Blank)]
	fn test_blank_input_short_circuits(engine: Format, #[case] raw: FieldValue) {
		for directive in all_directives() {
			let result = engine.format(&raw, &directive, "field");

			assert_eq!(result.unwrap(), CleanValue::Blank);
		}
	}

	#[rstest]
	fn test_files_are_never_coerced(engine: Format) {
		let file = UploadedFile::new("a.png", "image/png", "/tmp/x", 10);
		let raw = FieldValue::File(file.clone());

		for directive in all_directives() {
			assert_eq!(
				engine.format(&raw, &directive, "upload").unwrap(),
				CleanValue::File(file.clone())
			);
		}
	}

	#[rstest]
	#[case("1.5", 1, 1.5)]
	#[case("1.46", 1, 1.5)]
	#[case("2.5", 0, 3.0)]
	#[case("-2.5", 0, -3.0)]
	#[case("3.14159", 3, 3.142)]
	fn test_round(engine: Format, #[case] input: &str, #[case] precision: u32, #[case] expected: f64) {
		let value = engine
			.format(&FieldValue::text(input), &FormatDirective::round(precision), "n")
			.unwrap();

		assert_eq!(value, CleanValue::Float(expected));
	}

	#[rstest]
	fn test_round_defaults_to_zero_precision(engine: Format) {
		let directive = FormatDirective::new(Modification::Round);

		let value = engine.format(&FieldValue::Float(7.6), &directive, "n").unwrap();

		assert_eq!(value, CleanValue::Float(8.0));
	}

	#[rstest]
	#[case(FieldValue::text("1e400"))]
	#[case(FieldValue::text("NaN"))]
	#[case(FieldValue::Float(f64::INFINITY))]
	fn test_non_finite_overflows(engine: Format, #[case] raw: FieldValue) {
		for directive in [
			FormatDirective::round(0),
			FormatDirective::integer(),
			FormatDirective::float(),
		] {
			let err = engine.format(&raw, &directive, "n").unwrap_err();

			assert_eq!(err.kind(), ErrorKind::NumericOverflow);
		}
	}

	#[rstest]
	#[case(FieldValue::text("9223372036854775808"))]
	#[case(FieldValue::text("-9223372036854775809"))]
	#[case(FieldValue::Float(1e19))]
	#[case(FieldValue::Float(-1e19))]
	fn test_integer_out_of_range(engine: Format, #[case] raw: FieldValue) {
		let err = engine
			.format(&raw, &FormatDirective::integer(), "n")
			.unwrap_err();

		assert_eq!(err.kind(), ErrorKind::NumericOverflow);
		assert_eq!(err.id(), "F001");
	}

	#[rstest]
	#[case(FieldValue::text("42"), 42)]
	#[case(FieldValue::text(" -7 "), -7)]
	#[case(FieldValue::text("3.9"), 3)]
	#[case(FieldValue::Float(-3.9), -3)]
	#[case(FieldValue::Bool(true), 1)]
	fn test_integer(engine: Format, #[case] raw: FieldValue, #[case] expected: i64) {
		let value = engine.format(&raw, &FormatDirective::integer(), "n").unwrap();

		assert_eq!(value, CleanValue::Integer(expected));
	}

	proptest! {
		#[test]
		fn prop_integers_round_trip(n in any::<i64>()) {
			let engine = Format::new(&FormConfig::default());

			let from_int = engine.format(&FieldValue::Integer(n), &FormatDirective::integer(), "n").unwrap();
			let from_text = engine.format(&FieldValue::text(n.to_string()), &FormatDirective::integer(), "n").unwrap();

			prop_assert_eq!(from_int, CleanValue::Integer(n));
			prop_assert_eq!(from_text, CleanValue::Integer(n));
		}
	}

	#[rstest]
	fn test_non_numeric_text(engine: Format) {
		let err = engine
			.format(&FieldValue::text("abc"), &FormatDirective::float(), "n")
			.unwrap_err();

		assert_eq!(err.kind(), ErrorKind::InvalidNumberFormat);
	}

	#[rstest]
	fn test_string_flattens_maps(engine: Format) {
		let mut map = IndexMap::new();
		map.insert("first".to_string(), FieldValue::text("Ada"));
		map.insert("last".to_string(), FieldValue::text("Lovelace"));

		let value = engine
			.format(&FieldValue::Map(map), &FormatDirective::string(), "name")
			.unwrap();

		assert_eq!(value, CleanValue::Text("first: Ada, last: Lovelace".to_string()));
	}

	#[rstest]
	fn test_string_stringifies_scalars(engine: Format) {
		let value = engine
			.format(&FieldValue::Integer(12), &FormatDirective::string(), "n")
			.unwrap();

		assert_eq!(value, CleanValue::Text("12".to_string()));
	}

	#[rstest]
	fn test_datetime_with_offset(engine: Format) {
		let value = engine
			.format(
				&FieldValue::text("2024-02-29T10:00:00+02:00"),
				&FormatDirective::datetime(),
				"at",
			)
			.unwrap();

		let dt = value.as_datetime().unwrap();
		assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 2, 29));
		assert_eq!(dt.hour(), 10);
		assert_eq!(dt.offset().local_minus_utc(), 7200);
	}

	#[rstest]
	#[case("2024-02-30")]
	#[case("2024-13-99")]
	#[case("2024-02-29T25:00")]
	#[case("yesterday")]
	#[case("2024-02-29 10:00:00")]
	#[case("24:00")]
	fn test_datetime_rejects(engine: Format, #[case] input: &str) {
		let err = engine
			.format(&FieldValue::text(input), &FormatDirective::datetime(), "at")
			.unwrap_err();

		assert_eq!(err.kind(), ErrorKind::InvalidDateTimeFormat);
	}

	#[rstest]
	#[case("86400", "1970-01-02T00:00:00+00:00")]
	#[case("2024-05-06t07:08:09", "2024-05-06T07:08:09+00:00")]
	#[case("2024-05-06T07:08", "2024-05-06T07:08:00+00:00")]
	#[case("2024-05-06", "2024-05-06T00:00:00+00:00")]
	#[case("13:45:10", "1970-01-01T13:45:10+00:00")]
	#[case("13:45", "1970-01-01T13:45:00+00:00")]
	#[case("2024-w10", "2024-03-04T00:00:00+00:00")]
	#[case("2024-05", "2024-05-01T00:00:00+00:00")]
	#[case("0999", "0999-01-01T00:00:00+00:00")]
	fn test_datetime_formats(engine: Format, #[case] input: &str, #[case] expected: &str) {
		let value = engine
			.format(&FieldValue::text(input), &FormatDirective::datetime(), "at")
			.unwrap();

		assert_eq!(value.as_datetime().unwrap().to_rfc3339(), expected);
	}

	#[rstest]
	fn test_datetime_timestamp_wins_over_year(engine: Format) {
		let value = engine
			.format(&FieldValue::text("2024"), &FormatDirective::datetime(), "at")
			.unwrap();

		assert_eq!(value.as_datetime().unwrap().timestamp(), 2024);
	}

	#[rstest]
	#[case(FieldValue::text("yes"), true)]
	#[case(FieldValue::text("OFF"), false)]
	#[case(FieldValue::Integer(1), true)]
	#[case(FieldValue::Bool(false), false)]
	fn test_boolean(engine: Format, #[case] raw: FieldValue, #[case] expected: bool) {
		let value = engine.format(&raw, &FormatDirective::boolean(), "b").unwrap();

		assert_eq!(value, CleanValue::Bool(expected));
	}

	#[rstest]
	fn test_boolean_rejects_unknown_token(engine: Format) {
		let err = engine
			.format(&FieldValue::text("maybe"), &FormatDirective::boolean(), "b")
			.unwrap_err();

		assert_eq!(err.kind(), ErrorKind::InvalidBooleanFormat);
		assert_eq!(err.field(), Some("b"));
		assert!(err.developer_message().contains("maybe"));
	}

	#[rstest]
	fn test_unsupported_and_missing(engine: Format) {
		let raw = FieldValue::text("x");

		let unsupported = engine
			.format(
				&raw,
				&FormatDirective::new("money".parse().unwrap()),
				"n",
			)
			.unwrap_err();
		let missing = engine
			.format(
				&raw,
				&FormatDirective {
					modification: None,
					precision: Some(2),
				},
				"n",
			)
			.unwrap_err();

		assert_eq!(unsupported.kind(), ErrorKind::UnsupportedFormat);
		assert_eq!(missing.kind(), ErrorKind::MissingFormatDirective);
	}

	#[rstest]
	fn test_lists_rejected_by_scalar_directives(engine: Format) {
		let raw = FieldValue::List(vec![FieldValue::text("1")]);

		for directive in [
			FormatDirective::round(0),
			FormatDirective::integer(),
			FormatDirective::float(),
			FormatDirective::datetime(),
			FormatDirective::boolean(),
		] {
			let err = engine.format(&raw, &directive, "n").unwrap_err();
			assert_eq!(err.kind(), ErrorKind::NonScalarValue);
		}
	}

	#[rstest]
	fn test_coerce_envelope_mode_returns_payload(engine: Format) {
		let outcome = engine
			.coerce(&FieldValue::text("x"), &FormatDirective::integer(), "n")
			.unwrap();

		match outcome {
			Outcome::Rejected(payload) => assert_eq!(payload.id, "F007"),
			other => panic!("expected a rejection, got {:?}", other),
		}
	}

	#[rstest]
	fn test_coerce_throw_mode_returns_error() {
		let engine = Format::new(&FormConfig::default().with_error_mode(ErrorMode::Throw));

		let raw = FieldValue::text("x");
		let directive = FormatDirective::boolean();

		let line = line!() + 1;
		let result = engine.coerce(&raw, &directive, "b");

		let err = result.unwrap_err();

		assert_eq!(err.origin_line(), line);
		assert!(err.origin_file().ends_with("format.rs"));
	}

	#[rstest]
	fn test_directive_deserializes_unknown_modification() {
		let directive: FormatDirective =
			serde_json::from_str(r#"{"modification": "money", "precision": 2}"#).unwrap();

		assert_eq!(
			directive.modification,
			Some(Modification::Unsupported("money".to_string()))
		);
		assert_eq!(directive.precision, Some(2));
	}
}
