//! CAPTCHA verification seam
//!
//! The validator hands the submitted response to a [`CaptchaVerifier`].
//! Provider integrations (and their network timeouts) live behind this trait.

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptchaError {
	#[error("No CAPTCHA response was submitted")]
	MissingResponse,
	#[error("CAPTCHA provider error: {0}")]
	Provider(String),
}

/// Checks a CAPTCHA response
pub trait CaptchaVerifier: Send + Sync {
	/// Whether `response` solves the challenge. `remote_ip` is forwarded to
	/// providers that want it.
	fn verify(&self, response: &str, remote_ip: Option<&str>) -> Result<bool, CaptchaError>;
}

/// A verifier accepting one fixed answer, for tests and local development
///
/// # Examples
///
/// ```
/// use formwork_forms::captcha::{CaptchaVerifier, StaticCaptcha};
///
/// let captcha = StaticCaptcha::new("42");
/// assert_eq!(captcha.verify("42", None), Ok(true));
/// assert_eq!(captcha.verify("41", None), Ok(false));
/// ```
#[derive(Debug, Clone)]
pub struct StaticCaptcha {
	answer: String,
}

impl StaticCaptcha {
	pub fn new(answer: impl Into<String>) -> Self {
		Self {
			answer: answer.into(),
		}
	}
}

impl CaptchaVerifier for StaticCaptcha {
	fn verify(&self, response: &str, _remote_ip: Option<&str>) -> Result<bool, CaptchaError> {
		if response.trim().is_empty() {
			return Err(CaptchaError::MissingResponse);
		}
		Ok(response.trim() == self.answer)
	}
}
