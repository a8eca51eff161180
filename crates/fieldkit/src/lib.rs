//! Fieldkit - smart data-transfer objects for Rust.
//!
//! This is the main umbrella crate that re-exports all public APIs.
//!
//! A Fieldkit object exposes logical properties under either naming
//! convention (`access_rights` or `accessRights`), routes reads and writes
//! through optional custom accessor methods or an internally-prefixed
//! storage field, and converts whole objects to and from ordered key-value
//! mappings.
//!
//! # Example
//!
//! ```
//! use fieldkit::prelude::*;
//!
//! #[derive(Dto)]
//! struct UserDto {
//!     id: Option<i64>,
//!     username: Option<String>,
//!     _role: String,
//! }
//!
//! impl Default for UserDto {
//!     fn default() -> Self {
//!         Self {
//!             id: None,
//!             username: None,
//!             _role: "member".to_string(),
//!         }
//!     }
//! }
//!
//! let mut user = UserDto::default();
//!
//! // `role` resolves to the internal `_role` storage field.
//! let role = user.read("role").unwrap();
//! assert_eq!(*role.downcast::<String>().unwrap(), "member");
//! user.write_value("role", "admin".to_string()).unwrap();
//!
//! // Bulk conversion; internal prefixes never leak into keys.
//! let map = user.extract();
//! assert_eq!(map.keys().collect::<Vec<_>>(), ["id", "username", "role"]);
//! assert_eq!(map.get_as::<String>("role").unwrap(), "admin");
//! ```

pub use fieldkit_core::*;
pub use fieldkit_macros::*;

pub mod prelude;
