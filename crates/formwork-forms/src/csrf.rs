//! CSRF tokens bound to a session
//!
//! A [`CsrfGuard`] issues a random token per session, renders it as a hidden
//! input and verifies the submitted copy in constant time. Tokens live in a
//! [`TokenStore`]; [`MemoryTokenStore`] keeps them in process memory.

use crate::components::Input;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use formwork_core::CsrfConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// CSRF token length in bytes (before base64 encoding)
const CSRF_TOKEN_BYTES: usize = 32;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsrfError {
	#[error("No CSRF token was submitted")]
	Missing,
	#[error("No CSRF token was issued for this session")]
	NotIssued,
	#[error("The CSRF token has expired")]
	Expired,
	#[error("The CSRF token does not match")]
	Mismatch,
	#[error("Failed to generate a CSRF token: {0}")]
	Random(String),
}

/// A token as kept by a [`TokenStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
	pub value: String,
	pub issued_at: DateTime<Utc>,
}

/// Persistence for issued tokens, keyed by session id
pub trait TokenStore: Send + Sync {
	fn put(&self, session_id: &str, token: StoredToken);

	fn get(&self, session_id: &str) -> Option<StoredToken>;

	fn remove(&self, session_id: &str);
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
	tokens: Mutex<HashMap<String, StoredToken>>,
}

impl MemoryTokenStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredToken>> {
		// A panic while holding the lock cannot leave the map half-updated.
		self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl TokenStore for MemoryTokenStore {
	fn put(&self, session_id: &str, token: StoredToken) {
		self.lock().insert(session_id.to_string(), token);
	}

	fn get(&self, session_id: &str) -> Option<StoredToken> {
		self.lock().get(session_id).cloned()
	}

	fn remove(&self, session_id: &str) {
		self.lock().remove(session_id);
	}
}

/// Generates a cryptographically secure token: 32 random bytes from the
/// operating system, encoded as URL-safe base64 without padding.
pub fn generate_token() -> Result<String, CsrfError> {
	let mut bytes = [0u8; CSRF_TOKEN_BYTES];
	getrandom::getrandom(&mut bytes).map_err(|e| CsrfError::Random(e.to_string()))?;
	Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Compare a submitted token with the stored one without an early exit.
///
/// Comparing SHA-256 digests keeps the work independent of either length.
fn tokens_match(submitted: &str, stored: &str) -> bool {
	use sha2::{Digest, Sha256};
	use subtle::ConstantTimeEq;

	let submitted = Sha256::digest(submitted.as_bytes());
	let stored = Sha256::digest(stored.as_bytes());
	submitted.as_slice().ct_eq(stored.as_slice()).into()
}

/// Issues and verifies CSRF tokens
///
/// # Examples
///
/// ```
/// use formwork_core::CsrfConfig;
/// use formwork_forms::csrf::{CsrfError, CsrfGuard};
///
/// let guard = CsrfGuard::in_memory(CsrfConfig::default());
/// let token = guard.issue("session-1").unwrap();
///
/// assert!(guard.verify("session-1", Some(&token)).is_ok());
/// assert_eq!(guard.verify("session-1", Some("forged")), Err(CsrfError::Mismatch));
/// assert_eq!(guard.verify("session-2", Some(&token)), Err(CsrfError::NotIssued));
/// ```
#[derive(Clone)]
pub struct CsrfGuard {
	config: CsrfConfig,
	store: Arc<dyn TokenStore>,
}

impl CsrfGuard {
	pub fn new(config: CsrfConfig, store: Arc<dyn TokenStore>) -> Self {
		Self { config, store }
	}

	/// A guard backed by a fresh [`MemoryTokenStore`]
	pub fn in_memory(config: CsrfConfig) -> Self {
		Self::new(config, Arc::new(MemoryTokenStore::new()))
	}

	pub fn config(&self) -> &CsrfConfig {
		&self.config
	}

	/// Name of the form field carrying the token
	pub fn field_name(&self) -> &str {
		&self.config.field_name
	}

	/// Issue a new token for `session_id`, replacing any previous one
	pub fn issue(&self, session_id: &str) -> Result<String, CsrfError> {
		self.issue_at(session_id, Utc::now())
	}

	fn issue_at(&self, session_id: &str, now: DateTime<Utc>) -> Result<String, CsrfError> {
		let value = generate_token()?;
		self.store.put(
			session_id,
			StoredToken {
				value: value.clone(),
				issued_at: now,
			},
		);
		Ok(value)
	}

	/// The current token of `session_id`, issuing one when none is live
	pub fn token(&self, session_id: &str) -> Result<String, CsrfError> {
		let now = Utc::now();
		match self.store.get(session_id) {
			Some(stored) if !self.is_expired(&stored, now) => Ok(stored.value),
			_ => self.issue_at(session_id, now),
		}
	}

	/// A hidden input carrying the current token of `session_id`
	pub fn hidden_input(&self, session_id: &str) -> Result<Input, CsrfError> {
		Ok(Input::hidden(self.field_name()).value(self.token(session_id)?))
	}

	/// Verify a submitted token against the one issued for `session_id`
	pub fn verify(&self, session_id: &str, submitted: Option<&str>) -> Result<(), CsrfError> {
		self.verify_at(session_id, submitted, Utc::now())
	}

	fn verify_at(
		&self,
		session_id: &str,
		submitted: Option<&str>,
		now: DateTime<Utc>,
	) -> Result<(), CsrfError> {
		let submitted = submitted
			.map(str::trim)
			.filter(|token| !token.is_empty())
			.ok_or(CsrfError::Missing)?;
		let stored = self.store.get(session_id).ok_or(CsrfError::NotIssued)?;

		if self.is_expired(&stored, now) {
			self.store.remove(session_id);
			tracing::warn!(session = session_id, "expired CSRF token submitted");
			return Err(CsrfError::Expired);
		}
		if !tokens_match(submitted, &stored.value) {
			tracing::warn!(session = session_id, "CSRF token mismatch");
			return Err(CsrfError::Mismatch);
		}

		if self.config.rotate {
			self.issue_at(session_id, now)?;
		}
		Ok(())
	}

	fn is_expired(&self, stored: &StoredToken, now: DateTime<Utc>) -> bool {
		let Some(ttl) = self.config.ttl_secs else {
			return false;
		};
		// A lifetime too large for a chrono duration never runs out.
		match i64::try_from(ttl).ok().and_then(Duration::try_seconds) {
			Some(ttl) => now - stored.issued_at >= ttl,
			None => false,
		}
	}
}

impl std::fmt::Debug for CsrfGuard {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CsrfGuard")
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}
