//! Prelude module for Fieldkit.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```ignore
//! use fieldkit::prelude::*;
//! ```
//!
//! This provides access to:
//! - The `Dto` trait and its derive macro
//! - Property access (`DtoAccess`, `FieldValue`, `FieldMap`)
//! - Error handling (`AccessError`, `AccessResult`)
//! - Dynamic creation by type name (`TypeRegistry`)

// ============================================================================
// Object Capability
// ============================================================================

pub use fieldkit_core::{Dto, DtoMeta};
pub use fieldkit_macros::Dto;

// ============================================================================
// Property Access
// ============================================================================

pub use fieldkit_core::{DtoAccess, FieldMap, FieldValue};

// ============================================================================
// Error Handling
// ============================================================================

pub use fieldkit_core::{AccessError, AccessResult};

// ============================================================================
// Type Registry
// ============================================================================

pub use fieldkit_core::TypeRegistry;
