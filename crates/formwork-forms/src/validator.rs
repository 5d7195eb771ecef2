//! Validation pipeline
//!
//! A [`Validator`] runs the security gates (CSRF, then CAPTCHA), then every
//! declared field in declaration order: presence, rules, format. The first
//! failure stops the run.

use crate::captcha::CaptchaVerifier;
use crate::clean::CleanValue;
use crate::csrf::CsrfGuard;
use crate::error::{FormError, FormResult};
use crate::format::{Format, FormatDirective};
use crate::result::ValidationResult;
use crate::rules::Rule;
use formwork_core::value::is_blank_text;
use formwork_core::{ErrorKind, ErrorMode, FieldValue, FormConfig, FormatError};
use indexmap::IndexMap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Declaration of one expected field
#[derive(Debug)]
pub struct FieldSpec {
	key: String,
	rules: Vec<Box<dyn Rule>>,
	format: Option<FormatDirective>,
	optional: bool,
}

impl FieldSpec {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			rules: Vec::new(),
			format: None,
			optional: false,
		}
	}

	/// Append a rule; rules run in the order they were added
	pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
		self.rules.push(Box::new(rule));
		self
	}

	pub fn boxed_rule(mut self, rule: Box<dyn Rule>) -> Self {
		self.rules.push(rule);
		self
	}

	/// Coerce the value after the rules pass
	pub fn format(mut self, directive: FormatDirective) -> Self {
		self.format = Some(directive);
		self
	}

	/// Accept a submission without this key; the field then resolves to blank
	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn is_optional(&self) -> bool {
		self.optional
	}
}

/// Validates submissions against declared fields
///
/// # Examples
///
/// ```
/// use formwork_core::{FieldValue, FormConfig};
/// use formwork_forms::rules::{Email, Required};
/// use formwork_forms::{CleanValue, FieldSpec, FormatDirective, Validator};
/// use indexmap::IndexMap;
///
/// let validator = Validator::new(&FormConfig::default().with_csrf(false))
///     .field(FieldSpec::new("email").rule(Required::new()).rule(Email::new()))
///     .field(FieldSpec::new("age").format(FormatDirective::integer()));
///
/// let mut data = IndexMap::new();
/// data.insert("email".to_string(), FieldValue::text("ada@example.com"));
/// data.insert("age".to_string(), FieldValue::text("36"));
///
/// let result = validator.validate(&data).unwrap();
/// assert!(result.is_valid());
/// assert_eq!(result.get("age"), Some(&CleanValue::Integer(36)));
/// ```
pub struct Validator {
	config: FormConfig,
	format: Format,
	fields: Vec<FieldSpec>,
	csrf: Option<(Arc<CsrfGuard>, String)>,
	captcha: Option<Box<dyn CaptchaVerifier>>,
	remote_ip: Option<String>,
}

impl Validator {
	pub fn new(config: &FormConfig) -> Self {
		Self {
			config: config.clone(),
			format: Format::new(config),
			fields: Vec::new(),
			csrf: None,
			captcha: None,
			remote_ip: None,
		}
	}

	pub fn field(mut self, spec: FieldSpec) -> Self {
		self.fields.push(spec);
		self
	}

	/// Check the submitted CSRF token against the one issued for `session_id`
	pub fn csrf(mut self, guard: Arc<CsrfGuard>, session_id: impl Into<String>) -> Self {
		self.csrf = Some((guard, session_id.into()));
		self
	}

	pub fn captcha(mut self, verifier: impl CaptchaVerifier + 'static) -> Self {
		self.captcha = Some(Box::new(verifier));
		self
	}

	/// Client address forwarded to the CAPTCHA verifier
	pub fn remote_ip(mut self, ip: impl Into<String>) -> Self {
		self.remote_ip = Some(ip.into());
		self
	}

	pub fn config(&self) -> &FormConfig {
		&self.config
	}

	pub fn fields(&self) -> &[FieldSpec] {
		&self.fields
	}

	/// Validate `data` in the configured error mode
	#[track_caller]
	pub fn validate(&self, data: &IndexMap<String, FieldValue>) -> FormResult<ValidationResult> {
		self.run(data, self.config.error_mode, Location::caller())
	}

	/// Validate `data`, overriding the configured error mode
	#[track_caller]
	pub fn validate_with_mode(
		&self,
		data: &IndexMap<String, FieldValue>,
		mode: ErrorMode,
	) -> FormResult<ValidationResult> {
		self.run(data, mode, Location::caller())
	}

	/// Validate a decoded JSON object, see [`formwork_core::value::field_map`]
	#[track_caller]
	pub fn validate_json(&self, data: serde_json::Value) -> FormResult<ValidationResult> {
		let data = formwork_core::value::field_map(data);
		self.run(&data, self.config.error_mode, Location::caller())
	}

	fn run(
		&self,
		data: &IndexMap<String, FieldValue>,
		mode: ErrorMode,
		origin: &'static Location<'static>,
	) -> FormResult<ValidationResult> {
		match self.check(data, origin) {
			Ok(clean) => Ok(ValidationResult::new(clean)),
			Err(err) => {
				tracing::debug!(
					id = err.id(),
					field = err.field().unwrap_or_default(),
					"validation failed: {}",
					err.developer_message()
				);
				match mode {
					ErrorMode::Envelope => Ok(ValidationResult::invalid(err.payload())),
					ErrorMode::Throw => Err(FormError::Format(err)),
				}
			}
		}
	}

	fn check(
		&self,
		data: &IndexMap<String, FieldValue>,
		origin: &'static Location<'static>,
	) -> Result<IndexMap<String, CleanValue>, FormatError> {
		self.check_csrf(data, origin)?;
		self.check_captcha(data, origin)?;

		let mut clean = IndexMap::with_capacity(self.fields.len());
		for spec in &self.fields {
			let value = self.check_field(spec, data, origin)?;
			clean.insert(spec.key.clone(), value);
		}
		Ok(clean)
	}

	fn check_field(
		&self,
		spec: &FieldSpec,
		data: &IndexMap<String, FieldValue>,
		origin: &'static Location<'static>,
	) -> Result<CleanValue, FormatError> {
		let Some(raw) = data.get(&spec.key) else {
			if spec.optional {
				return Ok(CleanValue::Blank);
			}
			return Err(FormatError::at(
				ErrorKind::MissingField,
				ErrorKind::MissingField.default_message(),
				format!("field '{}' is missing from the submission", spec.key),
				origin,
			)
			.with_field(&spec.key));
		};

		for rule in &spec.rules {
			if let Err(violation) = rule.check(&spec.key, raw, data) {
				return Err(FormatError::at(
					ErrorKind::RuleFailed,
					violation.message,
					format!("field '{}' failed rule '{}'", spec.key, violation.rule),
					origin,
				)
				.with_field(&spec.key));
			}
		}

		match &spec.format {
			Some(directive) => self.format.format_at(raw, directive, &spec.key, origin),
			None => match raw {
				FieldValue::Text(text) if is_blank_text(text) => Ok(CleanValue::Blank),
				other => Ok(CleanValue::from(other.clone())),
			},
		}
	}

	fn check_csrf(
		&self,
		data: &IndexMap<String, FieldValue>,
		origin: &'static Location<'static>,
	) -> Result<(), FormatError> {
		if !self.config.csrf.enabled {
			return Ok(());
		}
		let fail = |detail: String, field: &str| {
			FormatError::at(
				ErrorKind::CsrfFailed,
				ErrorKind::CsrfFailed.default_message(),
				detail,
				origin,
			)
			.with_field(field)
		};

		let Some((guard, session_id)) = &self.csrf else {
			tracing::warn!("CSRF enabled but no guard attached, rejecting submission");
			return Err(fail(
				"CSRF is enabled but no guard is attached".to_string(),
				&self.config.csrf.field_name,
			));
		};
		let submitted = data.get(guard.field_name()).and_then(FieldValue::as_str);
		guard
			.verify(session_id, submitted)
			.map_err(|err| fail(err.to_string(), guard.field_name()))
	}

	fn check_captcha(
		&self,
		data: &IndexMap<String, FieldValue>,
		origin: &'static Location<'static>,
	) -> Result<(), FormatError> {
		if !self.config.captcha.enabled {
			return Ok(());
		}
		let field = self.config.captcha.field_name.as_str();
		let fail = |detail: String| {
			FormatError::at(
				ErrorKind::CaptchaFailed,
				ErrorKind::CaptchaFailed.default_message(),
				detail,
				origin,
			)
			.with_field(field)
		};

		let Some(verifier) = &self.captcha else {
			return Err(fail("CAPTCHA is enabled but no verifier is configured".to_string()));
		};
		let response = data
			.get(field)
			.and_then(FieldValue::as_str)
			.unwrap_or_default();
		match verifier.verify(response, self.remote_ip.as_deref()) {
			Ok(true) => Ok(()),
			Ok(false) => Err(fail("CAPTCHA response was rejected".to_string())),
			Err(err) => Err(fail(err.to_string())),
		}
	}
}

impl fmt::Debug for Validator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Validator")
			.field("config", &self.config)
			.field("fields", &self.fields)
			.field("csrf", &self.csrf.as_ref().map(|(_, session)| session))
			.field("captcha", &self.captcha.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::captcha::StaticCaptcha;
	use crate::rules::{MinLength, Required};
	use formwork_core::CsrfConfig;
	use rstest::rstest;

	fn submission(pairs: &[(&str, &str)]) -> IndexMap<String, FieldValue> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), FieldValue::text(*v)))
			.collect()
	}

	fn config() -> FormConfig {
		FormConfig::default().with_csrf(false)
	}

	#[rstest]
	fn test_first_failure_stops_validation() {
		// Arrange
		let validator = Validator::new(&config())
			.field(FieldSpec::new("name").rule(MinLength::new(3)))
			.field(FieldSpec::new("age").format(FormatDirective::integer()));
		let data = submission(&[("name", "Al"), ("age", "x")]);

		// Act
		let result = validator
			.validate_with_mode(&data, ErrorMode::Throw)
			.unwrap_err();

		// Assert
		let err = result.as_format().unwrap();
		assert_eq!(err.kind(), ErrorKind::RuleFailed);
		assert_eq!(err.field(), Some("name"));
		assert!(err.developer_message().contains("'name'"));
	}

	#[rstest]
	fn test_missing_and_optional_fields() {
		let validator = Validator::new(&config())
			.field(FieldSpec::new("nickname").optional())
			.field(FieldSpec::new("email"));

		let result = validator.validate(&submission(&[("nickname", "x")])).unwrap();
		let payload = result.error().unwrap();

		assert_eq!(payload.id, "V002");

		let result = validator.validate(&submission(&[("email", "a@b.c")])).unwrap();
		assert_eq!(result.get("nickname"), Some(&CleanValue::Blank));
	}

	#[rstest]
	fn test_undeclared_keys_are_dropped() {
		let validator = Validator::new(&config()).field(FieldSpec::new("a"));

		let result = validator.validate(&submission(&[("a", "1"), ("b", "2")])).unwrap();

		assert_eq!(result.data().unwrap().len(), 1);
		assert!(result.get("b").is_none());
	}

	#[rstest]
	fn test_blank_is_kept_but_required_rejects_it() {
		let lenient = Validator::new(&config()).field(FieldSpec::new("note"));
		let strict = Validator::new(&config()).field(FieldSpec::new("note").rule(Required::new()));
		let data = submission(&[("note", "   ")]);

		let lenient = lenient.validate(&data).unwrap();
		let strict = strict.validate(&data).unwrap();

		assert!(lenient.is_valid());
		assert!(!strict.is_valid());
		assert_eq!(strict.error().unwrap().message, "This field is required.");
	}

	#[rstest]
	fn test_csrf_gate_runs_before_fields() {
		let guard = Arc::new(CsrfGuard::in_memory(CsrfConfig::default()));
		let token = guard.issue("sess").unwrap();
		let validator = Validator::new(&FormConfig::default())
			.csrf(Arc::clone(&guard), "sess")
			.field(FieldSpec::new("q"));

		let forged = validator
			.validate(&submission(&[("_csrf_token", "nope"), ("q", "x")]))
			.unwrap();
		let genuine = validator
			.validate(&submission(&[("_csrf_token", token.as_str()), ("q", "x")]))
			.unwrap();

		assert_eq!(forged.error().unwrap().id, "S001");
		assert_eq!(forged.error().unwrap().code, 403);
		assert!(genuine.is_valid());
		assert!(genuine.get("_csrf_token").is_none());
	}

	#[rstest]
	#[case(None, false)]
	#[case(Some("wrong"), false)]
	#[case(Some("42"), true)]
	fn test_captcha_gate(#[case] response: Option<&str>, #[case] valid: bool) {
		let validator = Validator::new(&config().with_captcha(true))
			.captcha(StaticCaptcha::new("42"))
			.field(FieldSpec::new("q"));
		let mut data = submission(&[("q", "x")]);
		if let Some(response) = response {
			data.insert("captcha_response".to_string(), FieldValue::text(response));
		}

		let result = validator.validate(&data).unwrap();

		assert_eq!(result.is_valid(), valid);
	}

	#[rstest]
	fn test_captcha_without_verifier_fails_closed() {
		let validator = Validator::new(&config().with_captcha(true)).field(FieldSpec::new("q"));

		let result = validator.validate(&submission(&[("q", "x")])).unwrap();

		assert_eq!(result.error().unwrap().id, "S002");
	}

	#[rstest]
	fn test_csrf_without_guard_fails_closed() {
		let validator = Validator::new(&FormConfig::default()).field(FieldSpec::new("q"));

		let result = validator.validate(&submission(&[("q", "x")])).unwrap();

		let payload = result.error().unwrap();
		assert_eq!(payload.id, "S001");
		assert_eq!(payload.code, 403);
	}

	#[rstest]
	#[case(None)]
	#[case(Some(FormatDirective::string()))]
	fn test_blank_text_resolves_to_blank(#[case] directive: Option<FormatDirective>) {
		let spec = match directive {
			Some(directive) => FieldSpec::new("note").format(directive),
			None => FieldSpec::new("note"),
		};
		let validator = Validator::new(&config()).field(spec);

		let result = validator.validate(&submission(&[("note", "   ")])).unwrap();

		assert_eq!(result.get("note"), Some(&CleanValue::Blank));
	}

	#[rstest]
	fn test_throw_mode_origin_is_the_call_site() {
		let validator = Validator::new(&config().with_error_mode(ErrorMode::Throw))
			.field(FieldSpec::new("flag").format(FormatDirective::boolean()));
		let data = submission(&[("flag", "perhaps")]);

		let line = line!() + 1;
		let result = validator.validate(&data);

		let err = result.unwrap_err();
		let err = err.as_format().unwrap();
		assert_eq!(err.kind(), ErrorKind::InvalidBooleanFormat);
		assert_eq!(err.origin_line(), line);
		assert!(err.origin_file().ends_with("validator.rs"));
	}
}
