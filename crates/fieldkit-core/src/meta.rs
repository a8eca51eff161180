//! Registration-map metadata for DTO types.
//!
//! Provides the type-level tables the access layer dispatches over:
//!
//! - [`Dto`] - Base trait that all data-transfer objects implement
//! - [`DtoMeta`] - Static per-type table of storage fields and accessors
//! - [`FieldMeta`] - One declared storage field with raw get/set thunks
//! - [`GetterMeta`] / [`SetterMeta`] - One registered accessor method
//! - [`TypeRegistry`] - Process-wide registry for creation by type name
//!
//! The tables are normally generated by `#[derive(Dto)]` from the macros
//! crate; hand-written tables are equally valid and are what the unit tests
//! in this crate use.
//!
//! # Related Modules
//!
//! - [`crate::accessor`] - The resolution algorithm running over these tables

use std::any::{Any, TypeId};
use std::fmt;

use parking_lot::RwLock;
use static_assertions::assert_impl_all;

use crate::error::AccessResult;

/// A type-erased property value.
///
/// The access layer is type-agnostic pass-through: values cross it boxed and
/// are only downcast at the edges (a raw storage write, a custom accessor, or
/// the caller inspecting an extracted map).
pub type FieldValue = Box<dyn Any>;

/// The base trait for data-transfer objects.
///
/// Types implementing this trait expose their declared storage fields and
/// registered accessor methods through a static [`DtoMeta`] table, which the
/// access layer in [`crate::accessor`] dispatches over. Implement it with
/// `#[derive(Dto)]` rather than by hand.
///
/// # Example
///
/// ```ignore
/// use fieldkit_core::{Dto, DtoAccess};
/// use fieldkit_macros::Dto;
///
/// #[derive(Dto, Default, Clone)]
/// struct Session {
///     token: Option<String>,
///     _role: String,
/// }
///
/// let mut session = Session::default();
/// session.write("role", Box::new("admin".to_string()))?;
/// ```
pub trait Dto: Any {
    /// The static registration map for this type.
    fn meta(&self) -> &'static DtoMeta;
}

/// Metadata for one declared storage field.
///
/// `get` and `set` operate on the raw storage slot and never route through
/// accessor methods; they are what extraction and the field fallback paths of
/// read/write dispatch to.
pub struct FieldMeta {
    /// The declared field name, including the internal `_` prefix if any.
    pub name: &'static str,
    /// The field's type name (for diagnostics).
    pub type_name: &'static str,
    /// The field's TypeId for runtime type checking.
    pub type_id: TypeId,
    /// Whether the field is internal storage, i.e. not addressable by its
    /// declared name from outside. Implied by a leading `_`.
    pub internal: bool,
    /// Read the raw field value (cloned).
    pub get: fn(&dyn Dto) -> FieldValue,
    /// Overwrite the raw field value. Fails with
    /// [`TypeMismatch`](crate::AccessError::TypeMismatch) if the boxed value
    /// has the wrong type.
    pub set: fn(&mut dyn Dto, FieldValue) -> AccessResult<()>,
}

impl FieldMeta {
    /// The logical key under which this field appears in extraction output:
    /// the declared name with the internal prefix stripped.
    pub fn logical_key(&self) -> &'static str {
        self.name.trim_start_matches('_')
    }
}

impl fmt::Debug for FieldMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMeta")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("internal", &self.internal)
            .finish()
    }
}

/// Metadata for one registered getter method.
pub struct GetterMeta {
    /// The method name as declared, e.g. `get_access_rights`.
    pub method: &'static str,
    /// Invoke the method with no arguments and box its result.
    pub invoke: fn(&dyn Dto) -> FieldValue,
}

impl fmt::Debug for GetterMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetterMeta").field("method", &self.method).finish()
    }
}

/// Metadata for one registered setter method.
pub struct SetterMeta {
    /// The method name as declared, e.g. `set_config`.
    pub method: &'static str,
    /// Invoke the method with the single value argument. The method's own
    /// logic, including any coercion, fully determines the stored value.
    pub invoke: fn(&mut dyn Dto, FieldValue) -> AccessResult<()>,
}

impl fmt::Debug for SetterMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetterMeta").field("method", &self.method).finish()
    }
}

/// The static registration map for a DTO type.
///
/// One instance exists per type, in field declaration order, usually
/// generated by `#[derive(Dto)]`. The resolution algorithm over these tables
/// lives in [`crate::accessor`].
pub struct DtoMeta {
    /// The TypeId of the concrete type.
    pub type_id: TypeId,
    /// The type name (for registry lookup and diagnostics).
    pub type_name: &'static str,
    /// Declared storage fields, in declaration order.
    pub fields: &'static [FieldMeta],
    /// Registered getter methods.
    pub getters: &'static [GetterMeta],
    /// Registered setter methods.
    pub setters: &'static [SetterMeta],
    /// Factory for creating a fresh instance, if the type opted in.
    pub create: Option<fn() -> Box<dyn Dto>>,
}

impl DtoMeta {
    /// Look up a field by its declared name (prefix included).
    pub fn field(&self, declared_name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == declared_name)
    }

    /// The logical keys of all declared fields, in declaration order.
    pub fn logical_keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.logical_key()).collect()
    }
}

impl fmt::Debug for DtoMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DtoMeta")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("getters", &self.getters)
            .field("setters", &self.setters)
            .field("has_factory", &self.create.is_some())
            .finish()
    }
}

// The derive macro places DtoMeta values in statics.
assert_impl_all!(DtoMeta: Sync);
assert_impl_all!(FieldMeta: Sync);

/// Safe downcast function for [`Dto`] trait objects.
///
/// Returns `Some(&T)` if the object is of type `T`, otherwise `None`. The
/// generated accessor thunks use this to recover the concrete type.
///
/// # Related
///
/// - [`dto_cast_mut`] - Mutable version
pub fn dto_cast<T: Dto>(obj: &dyn Dto) -> Option<&T> {
    (obj as &dyn Any).downcast_ref::<T>()
}

/// Safe mutable downcast function for [`Dto`] trait objects.
///
/// # Related
///
/// - [`dto_cast`] - Immutable version
pub fn dto_cast_mut<T: Dto>(obj: &mut dyn Dto) -> Option<&mut T> {
    (obj as &mut dyn Any).downcast_mut::<T>()
}

/// Registered DTO types (lazy initialized).
static TYPES: RwLock<Vec<&'static DtoMeta>> = RwLock::new(Vec::new());

/// Process-wide registry of DTO types, keyed by type name.
///
/// Registering a type enables constructing instances dynamically, e.g. when
/// materializing rows fetched from storage into objects selected by name:
///
/// ```ignore
/// UserDto::register_type();
///
/// let mut user = TypeRegistry::create("UserDto").unwrap();
/// user.hydrate(row)?;
/// ```
pub struct TypeRegistry;

impl TypeRegistry {
    /// Register a type's metadata. Registering the same type twice is a
    /// no-op.
    pub fn register(meta: &'static DtoMeta) {
        let mut types = TYPES.write();
        if types.iter().any(|m| m.type_id == meta.type_id) {
            return;
        }
        tracing::trace!(
            target: "fieldkit_core::meta",
            type_name = meta.type_name,
            fields = meta.fields.len(),
            "registered dto type"
        );
        types.push(meta);
    }

    /// Whether a type with the given name is registered.
    pub fn contains(type_name: &str) -> bool {
        TYPES.read().iter().any(|m| m.type_name == type_name)
    }

    /// Look up metadata by type name.
    pub fn get_by_name(type_name: &str) -> Option<&'static DtoMeta> {
        TYPES.read().iter().copied().find(|m| m.type_name == type_name)
    }

    /// Look up metadata by concrete type.
    pub fn get<T: Dto>() -> Option<&'static DtoMeta> {
        let type_id = TypeId::of::<T>();
        TYPES.read().iter().copied().find(|m| m.type_id == type_id)
    }

    /// Create a fresh instance by type name via the registered factory.
    ///
    /// Returns `None` if the type is unknown or was declared without a
    /// factory.
    pub fn create(type_name: &str) -> Option<Box<dyn Dto>> {
        let factory = Self::get_by_name(type_name)?.create?;
        Some(factory())
    }

    /// Number of registered types.
    pub fn type_count() -> usize {
        TYPES.read().len()
    }

    /// Remove all registrations. Intended for tests.
    pub fn clear() {
        TYPES.write().clear();
    }
}
