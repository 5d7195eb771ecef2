//! Error taxonomy shared by the format engine and the validation pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;

/// Key under which a failed validation result carries its error payload on
/// the wire.
pub const ERROR_MARKER_KEY: &str = "__formwork_error__";

/// Machine-readable kind of a formatting or validation failure
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	NumericOverflow,
	InvalidDateTimeFormat,
	InvalidBooleanFormat,
	UnsupportedFormat,
	MissingFormatDirective,
	/// A list or map reached a directive that only accepts scalars
	NonScalarValue,
	/// Text that does not parse as a number reached a numeric directive
	InvalidNumberFormat,
	RuleFailed,
	MissingField,
	CsrfFailed,
	CaptchaFailed,
}

impl ErrorKind {
	/// Stable short identifier
	///
	/// # Examples
	///
	/// ```
	/// use formwork_core::ErrorKind;
	///
	/// assert_eq!(ErrorKind::NumericOverflow.id(), "F001");
	/// assert_eq!(ErrorKind::CsrfFailed.id(), "S001");
	/// ```
	pub fn id(self) -> &'static str {
		match self {
			Self::NumericOverflow => "F001",
			Self::InvalidDateTimeFormat => "F002",
			Self::InvalidBooleanFormat => "F003",
			Self::UnsupportedFormat => "F004",
			Self::MissingFormatDirective => "F005",
			Self::NonScalarValue => "F006",
			Self::InvalidNumberFormat => "F007",
			Self::RuleFailed => "V001",
			Self::MissingField => "V002",
			Self::CsrfFailed => "S001",
			Self::CaptchaFailed => "S002",
		}
	}

	/// HTTP-style status code
	pub fn code(self) -> u16 {
		match self {
			Self::UnsupportedFormat | Self::MissingFormatDirective => 500,
			Self::CsrfFailed | Self::CaptchaFailed => 403,
			Self::NumericOverflow
			| Self::InvalidDateTimeFormat
			| Self::InvalidBooleanFormat
			| Self::NonScalarValue
			| Self::InvalidNumberFormat
			| Self::RuleFailed
			| Self::MissingField => 422,
		}
	}

	/// Default user-facing message
	pub fn default_message(self) -> &'static str {
		match self {
			Self::NumericOverflow => "The number is out of range.",
			Self::InvalidDateTimeFormat => "Enter a valid date or time.",
			Self::InvalidBooleanFormat => "Enter a valid yes/no value.",
			Self::UnsupportedFormat | Self::MissingFormatDirective => {
				"The form could not be processed."
			}
			Self::NonScalarValue => "Enter a single value.",
			Self::InvalidNumberFormat => "Enter a number.",
			Self::RuleFailed => "The value is invalid.",
			Self::MissingField => "This field is required.",
			Self::CsrfFailed => "The form has expired, please submit it again.",
			Self::CaptchaFailed => "Please confirm you are not a robot.",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.id())
	}
}

/// User-safe error body carried by an invalid validation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
	pub message: String,
	pub code: u16,
	pub id: String,
}

/// A structured failure raised while coercing or validating a field.
///
/// Carries a user-safe message, a developer message with details, the kind
/// (which fixes the code and id), the offending field if known, and the
/// source location of the public call that produced it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{kind}] {developer_message}")]
pub struct FormatError {
	kind: ErrorKind,
	message: String,
	developer_message: String,
	field: Option<String>,
	origin: &'static Location<'static>,
}

impl FormatError {
	/// Create an error whose origin is the caller of this function
	///
	/// # Examples
	///
	/// ```
	/// use formwork_core::{ErrorKind, FormatError};
	///
	/// let err = FormatError::new(ErrorKind::InvalidBooleanFormat, "Enter yes or no", "token 'maybe'");
	/// assert_eq!(err.id(), "F003");
	/// assert_eq!(err.code(), 422);
	/// assert!(err.origin_file().ends_with(".rs"));
	/// ```
	#[track_caller]
	pub fn new(
		kind: ErrorKind,
		message: impl Into<String>,
		developer_message: impl Into<String>,
	) -> Self {
		Self::at(kind, message, developer_message, Location::caller())
	}

	/// Create an error with an explicit origin
	pub fn at(
		kind: ErrorKind,
		message: impl Into<String>,
		developer_message: impl Into<String>,
		origin: &'static Location<'static>,
	) -> Self {
		Self {
			kind,
			message: message.into(),
			developer_message: developer_message.into(),
			field: None,
			origin,
		}
	}

	/// Attach the field key the error belongs to
	pub fn with_field(mut self, field: impl Into<String>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn developer_message(&self) -> &str {
		&self.developer_message
	}

	pub fn field(&self) -> Option<&str> {
		self.field.as_deref()
	}

	pub fn code(&self) -> u16 {
		self.kind.code()
	}

	pub fn id(&self) -> &'static str {
		self.kind.id()
	}

	pub fn origin_file(&self) -> &'static str {
		self.origin.file()
	}

	pub fn origin_line(&self) -> u32 {
		self.origin.line()
	}

	/// The user-safe part of the error
	pub fn payload(&self) -> ErrorPayload {
		ErrorPayload {
			message: self.message.clone(),
			code: self.code(),
			id: self.id().to_string(),
		}
	}
}

/// Result type for format and validation operations
pub type FormatResult<T> = Result<T, FormatError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_origin_points_at_caller() {
		let line = line!() + 1;
		let err = FormatError::new(ErrorKind::NumericOverflow, "too big", "1e400");

		assert_eq!(err.origin_line(), line);
		assert!(err.origin_file().ends_with("error.rs"));
	}

	#[rstest]
	fn test_payload_excludes_developer_details() {
		let err = FormatError::new(ErrorKind::UnsupportedFormat, "Oops", "modification 'money'")
			.with_field("price");

		let payload = err.payload();

		assert_eq!(payload.message, "Oops");
		assert_eq!(payload.code, 500);
		assert_eq!(payload.id, "F004");
		assert_eq!(err.field(), Some("price"));
		assert_eq!(err.to_string(), "[F004] modification 'money'");
	}

	#[rstest]
	fn test_ids_are_unique() {
		let kinds = [
			ErrorKind::NumericOverflow,
			ErrorKind::InvalidDateTimeFormat,
			ErrorKind::InvalidBooleanFormat,
			ErrorKind::UnsupportedFormat,
			ErrorKind::MissingFormatDirective,
			ErrorKind::NonScalarValue,
			ErrorKind::InvalidNumberFormat,
			ErrorKind::RuleFailed,
			ErrorKind::MissingField,
			ErrorKind::CsrfFailed,
			ErrorKind::CaptchaFailed,
		];
		let mut ids: Vec<_> = kinds.iter().map(|k| k.id()).collect();
		ids.sort_unstable();
		ids.dedup();

		assert_eq!(ids.len(), kinds.len());
	}
}
