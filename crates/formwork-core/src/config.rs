//! Form configuration
//!
//! A [`FormConfig`] is built once at startup and handed to the format engine,
//! the validator and the renderers. Nothing in the workspace reads global
//! state; two validators in the same process can run with different settings.

use crate::html::parse_bool;
use serde::{Deserialize, Serialize};
use std::env;

/// Default environment variable prefix used by [`FormConfig::from_env`]
pub const ENV_PREFIX: &str = "FORMWORK_";

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Failed to parse configuration: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: String, message: String },
}

/// How a failure is reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
	/// Return an invalid validation result carrying the error payload
	#[default]
	Envelope,
	/// Return the full error, including its origin, as `Err`
	Throw,
}

/// CSRF token settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
	pub enabled: bool,
	/// Name of the hidden form field carrying the token
	pub field_name: String,
	/// Issue a fresh token after every successful verification
	pub rotate: bool,
	/// Token lifetime in seconds; `None` keeps tokens for the session lifetime
	pub ttl_secs: Option<u64>,
}

impl Default for CsrfConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			field_name: "_csrf_token".to_string(),
			rotate: false,
			ttl_secs: Some(7200),
		}
	}
}

/// CAPTCHA settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptchaConfig {
	pub enabled: bool,
	/// Name of the submitted field carrying the CAPTCHA response
	pub field_name: String,
}

impl Default for CaptchaConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			field_name: "captcha_response".to_string(),
		}
	}
}

/// Settings shared by formatting, validation and rendering
///
/// # Examples
///
/// ```
/// use formwork_core::{ErrorMode, FormConfig};
///
/// let config = FormConfig::default()
///     .with_error_mode(ErrorMode::Throw)
///     .with_csrf(false);
/// assert_eq!(config.charset, "UTF-8");
/// assert!(!config.csrf.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
	/// Rendered as the form's `accept-charset`
	pub charset: String,
	pub error_mode: ErrorMode,
	pub csrf: CsrfConfig,
	pub captcha: CaptchaConfig,
}

impl Default for FormConfig {
	fn default() -> Self {
		Self {
			charset: "UTF-8".to_string(),
			error_mode: ErrorMode::default(),
			csrf: CsrfConfig::default(),
			captcha: CaptchaConfig::default(),
		}
	}
}

impl FormConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the charset; blank input keeps the current value
	pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
		let charset = charset.into();
		if !charset.trim().is_empty() {
			self.charset = charset.trim().to_string();
		}
		self
	}

	pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
		self.error_mode = mode;
		self
	}

	pub fn with_csrf(mut self, enabled: bool) -> Self {
		self.csrf.enabled = enabled;
		self
	}

	pub fn with_csrf_config(mut self, csrf: CsrfConfig) -> Self {
		self.csrf = csrf;
		self
	}

	pub fn with_captcha(mut self, enabled: bool) -> Self {
		self.captcha.enabled = enabled;
		self
	}

	/// Parse a TOML document; missing keys fall back to their defaults
	///
	/// # Examples
	///
	/// ```
	/// use formwork_core::{ErrorMode, FormConfig};
	///
	/// let config = FormConfig::from_toml_str(r#"
	///     error_mode = "throw"
	///     [csrf]
	///     rotate = true
	/// "#).unwrap();
	/// assert_eq!(config.error_mode, ErrorMode::Throw);
	/// assert!(config.csrf.rotate);
	/// assert_eq!(config.csrf.field_name, "_csrf_token");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}

	/// Read overrides from `FORMWORK_*` environment variables
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_with_prefix(ENV_PREFIX)
	}

	/// Read overrides from environment variables with a custom prefix.
	///
	/// Recognised keys: `CHARSET`, `ERROR_MODE` (`envelope`/`throw`),
	/// `CSRF_ENABLED`, `CSRF_FIELD`, `CSRF_ROTATE`, `CSRF_TTL_SECS`,
	/// `CAPTCHA_ENABLED`, `CAPTCHA_FIELD`. Unset variables keep defaults.
	pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(format!("{}{}", prefix, key)).ok())
	}

	fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self::default();

		if let Some(charset) = lookup("CHARSET") {
			config = config.with_charset(charset);
		}
		if let Some(mode) = lookup("ERROR_MODE") {
			config.error_mode = match mode.trim().to_ascii_lowercase().as_str() {
				"envelope" => ErrorMode::Envelope,
				"throw" => ErrorMode::Throw,
				other => {
					return Err(ConfigError::InvalidValue {
						key: "ERROR_MODE".to_string(),
						message: format!("expected 'envelope' or 'throw', got '{}'", other),
					});
				}
			};
		}
		if let Some(enabled) = lookup("CSRF_ENABLED") {
			config.csrf.enabled = lookup_bool("CSRF_ENABLED", &enabled)?;
		}
		if let Some(field) = lookup("CSRF_FIELD")
			&& !field.trim().is_empty()
		{
			config.csrf.field_name = field.trim().to_string();
		}
		if let Some(rotate) = lookup("CSRF_ROTATE") {
			config.csrf.rotate = lookup_bool("CSRF_ROTATE", &rotate)?;
		}
		if let Some(ttl) = lookup("CSRF_TTL_SECS") {
			config.csrf.ttl_secs = match ttl.trim() {
				"" | "none" => None,
				value => Some(value.parse::<u64>().map_err(|e| {
					ConfigError::InvalidValue {
						key: "CSRF_TTL_SECS".to_string(),
						message: e.to_string(),
					}
				})?),
			};
		}
		if let Some(enabled) = lookup("CAPTCHA_ENABLED") {
			config.captcha.enabled = lookup_bool("CAPTCHA_ENABLED", &enabled)?;
		}
		if let Some(field) = lookup("CAPTCHA_FIELD")
			&& !field.trim().is_empty()
		{
			config.captcha.field_name = field.trim().to_string();
		}

		Ok(config)
	}
}

fn lookup_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
	parse_bool(value).ok_or_else(|| ConfigError::InvalidValue {
		key: key.to_string(),
		message: format!("'{}' is not a boolean", value),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| map.get(key).cloned()
	}

	#[rstest]
	fn test_defaults() {
		let config = FormConfig::default();

		assert_eq!(config.charset, "UTF-8");
		assert_eq!(config.error_mode, ErrorMode::Envelope);
		assert!(config.csrf.enabled);
		assert!(!config.captcha.enabled);
	}

	#[rstest]
	fn test_lookup_overrides() {
		// Arrange
		let lookup = lookup_from(&[
			("ERROR_MODE", "Throw"),
			("CSRF_ENABLED", "off"),
			("CSRF_TTL_SECS", "60"),
			("CAPTCHA_FIELD", "g-recaptcha-response"),
		]);

		// Act
		let config = FormConfig::from_lookup(lookup).unwrap();

		// Assert
		assert_eq!(config.error_mode, ErrorMode::Throw);
		assert!(!config.csrf.enabled);
		assert_eq!(config.csrf.ttl_secs, Some(60));
		assert_eq!(config.captcha.field_name, "g-recaptcha-response");
	}

	#[rstest]
	#[case("ERROR_MODE", "loud")]
	#[case("CSRF_ENABLED", "perhaps")]
	#[case("CSRF_TTL_SECS", "-5")]
	fn test_lookup_rejects_bad_values(#[case] key: &str, #[case] value: &str) {
		let result = FormConfig::from_lookup(lookup_from(&[(key, value)]));

		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}

	#[rstest]
	fn test_blank_charset_is_ignored() {
		let config = FormConfig::default().with_charset("   ");

		assert_eq!(config.charset, "UTF-8");
	}

	#[rstest]
	fn test_toml_rejects_unknown_mode() {
		let result = FormConfig::from_toml_str("error_mode = \"loud\"");

		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}
}
