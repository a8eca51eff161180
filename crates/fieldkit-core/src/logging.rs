//! Logging and debugging facilities.
//!
//! Fieldkit uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! Resolution events are emitted at `TRACE` level under the targets in
//! [`targets`], one per access, naming the path (direct field, getter,
//! setter, prefixed field) that handled it.

use std::fmt;

use crate::meta::Dto;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "fieldkit_core";
    /// Resolution and dispatch target.
    pub const ACCESSOR: &str = "fieldkit_core::accessor";
    /// Type metadata and registry target.
    pub const META: &str = "fieldkit_core::meta";
}

/// Renders a DTO's declared storage layout for debug output.
///
/// Values are type-erased and not printable; the rendering lists declared
/// fields with their types, marking internal storage.
///
/// # Example
///
/// ```ignore
/// tracing::debug!("hydrating {}", FieldsDebug::new(&user));
/// // UserDto { id: Option<i64>, username: Option<String>, _role: String (internal) }
/// ```
pub struct FieldsDebug<'a> {
    dto: &'a dyn Dto,
}

impl<'a> FieldsDebug<'a> {
    /// Create a debug renderer for the given object.
    pub fn new(dto: &'a dyn Dto) -> Self {
        Self { dto }
    }
}

impl fmt::Display for FieldsDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = self.dto.meta();
        write!(f, "{} {{ ", meta.type_name)?;
        for (i, field) in meta.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field.name, field.type_name)?;
            if field.internal {
                write!(f, " (internal)")?;
            }
        }
        write!(f, " }}")
    }
}
