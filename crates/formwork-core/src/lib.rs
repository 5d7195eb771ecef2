//! Core types for formwork
//!
//! This crate holds the pieces every other formwork crate agrees on:
//! - [`FieldValue`], the closed set of shapes a submitted value can take
//! - HTML escaping, display conversion and id normalization ([`html`])
//! - [`FormConfig`], injected into engines and renderers at construction
//! - the error taxonomy ([`ErrorKind`], [`FormatError`], [`ErrorPayload`])

pub mod config;
pub mod error;
pub mod html;
pub mod value;

pub use config::{CaptchaConfig, ConfigError, CsrfConfig, ErrorMode, FormConfig};
pub use error::{ERROR_MARKER_KEY, ErrorKind, ErrorPayload, FormatError, FormatResult};
pub use value::{BLANK_MARKER, FieldValue, UploadedFile};
