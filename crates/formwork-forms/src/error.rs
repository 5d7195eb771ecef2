use crate::schema::SchemaError;
use formwork_core::{ConfigError, FormatError};

/// Errors surfaced by the forms crate
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	/// A formatting or validation failure in throw mode
	#[error(transparent)]
	Format(#[from] FormatError),

	#[error(transparent)]
	Schema(#[from] SchemaError),

	#[error(transparent)]
	Config(#[from] ConfigError),
}

impl FormError {
	/// The underlying formatting or validation failure, if that is what this is
	pub fn as_format(&self) -> Option<&FormatError> {
		match self {
			Self::Format(err) => Some(err),
			_ => None,
		}
	}
}

pub type FormResult<T> = Result<T, FormError>;
