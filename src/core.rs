//! Values, escaping, configuration and the error taxonomy.
//!
//! # Examples
//!
//! ```
//! use formwork::core::html::normalize_id;
//!
//! assert_eq!(normalize_id("user[address][street]"), "user_address_street");
//! ```

pub use formwork_core::*;
