//! Error types for Fieldkit.

use std::fmt;

/// Errors produced by property access operations.
///
/// The access layer itself has a single failure mode: a logical name that
/// resolves to neither an accessor method nor a backing storage field.
/// Everything else either originates inside a custom accessor (and is carried
/// through [`AccessError::Accessor`] untouched) or is a consequence of
/// type-erased storage writes ([`AccessError::TypeMismatch`]).
#[derive(Debug)]
pub enum AccessError {
    /// No accessor method or backing storage field resolves the logical name.
    NotFound {
        /// The logical property name exactly as the caller requested it.
        name: String,
    },
    /// A raw storage write received a value of the wrong type.
    TypeMismatch {
        /// The declared field the write targeted.
        property: &'static str,
        /// The field's declared type name.
        expected: &'static str,
    },
    /// An error raised inside a custom accessor method, passed through
    /// unchanged.
    Accessor(Box<dyn std::error::Error + Send + Sync>),
}

impl AccessError {
    /// Create a [`AccessError::NotFound`] for the given logical name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Wrap an error raised by a custom accessor.
    ///
    /// Custom setters use this to surface their own failures (a parse error,
    /// a rejected value) to the caller. The core never inspects the wrapped
    /// error; [`std::error::Error::source`] exposes it.
    pub fn accessor<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Accessor(Box::new(err))
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "Property '{name}' not found"),
            Self::TypeMismatch { property, expected } => {
                write!(f, "Field '{property}' expects a value of type {expected}")
            }
            Self::Accessor(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Accessor(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// A specialized Result type for property access operations.
pub type AccessResult<T> = std::result::Result<T, AccessError>;
