//! Core systems for Fieldkit.
//!
//! This crate provides the property-access engine behind Fieldkit's smart
//! data-transfer objects:
//!
//! - **Registration maps**: static per-type tables of storage fields and
//!   accessor methods ([`meta`])
//! - **Resolution & dispatch**: mapping style-insensitive logical property
//!   names onto accessors or internally-prefixed storage ([`accessor`])
//! - **Hydrate/extract**: converting whole objects to and from ordered
//!   key-value mappings ([`map`])
//!
//! Objects opt in by implementing [`Dto`], normally through the
//! `#[derive(Dto)]` macro from `fieldkit-macros`, which builds the
//! registration map at compile time.
//!
//! # Resolution Example
//!
//! ```ignore
//! use fieldkit_core::DtoAccess;
//! use fieldkit_macros::Dto;
//!
//! #[derive(Dto)]
//! struct UserDto {
//!     id: Option<i64>,
//!     username: Option<String>,
//!     _role: String,
//! }
//!
//! let mut user = UserDto::default();
//!
//! // `role` resolves to the internal `_role` storage field.
//! user.write_value("role", "admin".to_string())?;
//!
//! // Bulk conversion; internal prefixes never leak into keys.
//! let map = user.extract();
//! assert_eq!(map.keys().collect::<Vec<_>>(), ["id", "username", "role"]);
//! ```
//!
//! # Mapping Example
//!
//! ```
//! use fieldkit_core::FieldMap;
//!
//! let mut row = FieldMap::new();
//! row.insert_value("id", 951_i64);
//! row.insert_value("username", "joe.doe".to_string());
//!
//! assert_eq!(row.get_as::<i64>("id"), Some(&951));
//! assert_eq!(row.keys().collect::<Vec<_>>(), ["id", "username"]);
//! ```

pub mod accessor;
pub mod error;
pub mod logging;
pub mod map;
pub mod meta;

pub use accessor::DtoAccess;
pub use error::{AccessError, AccessResult};
pub use logging::FieldsDebug;
pub use map::FieldMap;
pub use meta::{
    dto_cast, dto_cast_mut, Dto, DtoMeta, FieldMeta, FieldValue, GetterMeta, SetterMeta,
    TypeRegistry,
};
