//! Components, format engine, validation pipeline and security seams.
//!
//! # Examples
//!
//! ```
//! use formwork::forms::components::{Element, Input, Render};
//!
//! let html = Input::text("q").class("search").render();
//! assert_eq!(html, r#"<input type="text" name="q" class="search" />"#);
//! ```

pub use formwork_forms::*;
