//! # formwork-forms
//!
//! Form construction and validation on top of `formwork-core`.
//!
//! ## Features
//!
//! - **Format engine**: coerce submitted values into integers, floats,
//!   rounded numbers, strings, date-times and booleans ([`Format`])
//! - **Validation pipeline**: presence checks, rules and formatting per field,
//!   stopping at the first failure ([`Validator`])
//! - **Result envelope**: valid data or a single error payload
//!   ([`ValidationResult`])
//! - **Components**: forms, inputs, selects and friends sharing one
//!   attribute-escaping contract ([`components`], [`attrs`])
//! - **Security**: CSRF tokens ([`csrf`]) and a CAPTCHA seam ([`captcha`])
//! - **Descriptions**: build form and validator from JSON ([`schema`])
//!
//! ## Example
//!
//! ```
//! use formwork_core::{FieldValue, FormConfig};
//! use formwork_forms::components::{Button, Element, Form, Input, Render};
//! use formwork_forms::rules::Required;
//! use formwork_forms::{FieldSpec, FormatDirective, Validator};
//! use indexmap::IndexMap;
//!
//! let config = FormConfig::default().with_csrf(false);
//!
//! let form = Form::new()
//!     .action("/rsvp")
//!     .child(Input::number("guests").label("Guests"))
//!     .child(Button::submit("Send"));
//! assert!(form.render().contains(r#"<label for="guests">Guests"#));
//!
//! let validator = Validator::new(&config)
//!     .field(FieldSpec::new("guests").rule(Required::new()).format(FormatDirective::integer()));
//!
//! let mut data = IndexMap::new();
//! data.insert("guests".to_string(), FieldValue::text("4"));
//! let result = validator.validate(&data).unwrap();
//! assert_eq!(result.to_json().unwrap(), r#"{"guests":4}"#);
//! ```

pub mod attrs;
pub mod captcha;
pub mod clean;
pub mod components;
pub mod csrf;
pub mod error;
pub mod format;
pub mod result;
pub mod rules;
pub mod schema;
pub mod validator;

pub use clean::CleanValue;
pub use error::{FormError, FormResult};
pub use format::{Format, FormatDirective, Modification, Outcome};
pub use result::ValidationResult;
pub use schema::{FormSchema, SchemaError};
pub use validator::{FieldSpec, Validator};
