//! # formwork
//!
//! Server-side HTML form building, rendering and validation.
//!
//! Build a form tree with fluent builders, render it with one consistent
//! attribute-escaping contract, and validate submissions against declared
//! fields: presence, rules, then type coercion, with CSRF and CAPTCHA gates
//! in front.
//!
//! ## Feature Flags
//!
//! - `forms` (default) - components, format engine, validator, CSRF and CAPTCHA
//! - `full` - everything
//!
//! Without `forms` only the core types are available: [`FieldValue`],
//! [`FormConfig`], the escaping helpers and the error taxonomy.
//!
//! ## Quick Example
//!
//! ```
//! use formwork::prelude::*;
//!
//! let config = FormConfig::default().with_csrf(false);
//! let validator = Validator::new(&config)
//!     .field(FieldSpec::new("price").format(FormatDirective::round(2)));
//!
//! let data = field_map(serde_json::json!({ "price": "19.999" }));
//! let result = validator.validate(&data).unwrap();
//!
//! assert_eq!(result.get("price"), Some(&CleanValue::Float(20.0)));
//! ```

pub mod core;
#[cfg(feature = "forms")]
pub mod forms;

pub use formwork_core::{
	BLANK_MARKER, ERROR_MARKER_KEY, ErrorKind, ErrorMode, ErrorPayload, FieldValue, FormConfig,
	FormatError, FormatResult, UploadedFile,
};

#[cfg(feature = "forms")]
pub use formwork_forms::{
	CleanValue, FieldSpec, Format, FormatDirective, FormError, FormResult, Modification,
	ValidationResult, Validator,
};

pub mod prelude {
	pub use formwork_core::html::{escape, escape_attr, normalize_id};
	pub use formwork_core::value::field_map;
	pub use formwork_core::{
		ErrorKind, ErrorMode, ErrorPayload, FieldValue, FormConfig, FormatError, UploadedFile,
	};

	#[cfg(feature = "forms")]
	pub use formwork_forms::components::{
		Button, ButtonType, Element, Fieldset, Form, Html, Input, InputType, Label, Legend, Method,
		Render, Select, Textarea,
	};
	#[cfg(feature = "forms")]
	pub use formwork_forms::csrf::{CsrfGuard, MemoryTokenStore, TokenStore};
	#[cfg(feature = "forms")]
	pub use formwork_forms::rules::{self, Rule};
	#[cfg(feature = "forms")]
	pub use formwork_forms::{
		CleanValue, FieldSpec, Format, FormatDirective, FormError, FormSchema, Modification,
		ValidationResult, Validator,
	};
}
