//! Property resolution and accessor dispatch.
//!
//! This module implements the one nontrivial mechanism of the crate: mapping
//! a logical property name onto a target object's storage fields and
//! accessor methods, shared by the four bulk entry points.
//!
//! # Naming conventions
//!
//! The conventions are fixed so callers can predict resolution:
//!
//! - internal storage fields carry a single `_` prepended to the logical
//!   name (`_role` backs the logical property `role`);
//! - accessor methods are named `get`/`set` + the logical name with all
//!   separator characters removed, matched case-insensitively. Both
//!   `access_rights` and `accessRights` produce the candidate
//!   `getaccessrights`, which matches a method declared
//!   `get_access_rights`.
//!
//! # Resolution order
//!
//! For a logical name `name`, read and write resolve identically:
//!
//! 1. a declared non-internal field named exactly `name` is accessed raw;
//! 2. a registered accessor matching the `get`/`set` candidate is invoked;
//! 3. a declared field named exactly `_` + `name` is accessed raw;
//! 4. otherwise the operation fails with
//!    [`NotFound`](AccessError::NotFound) carrying `name` verbatim.
//!
//! Extraction deliberately ignores this order: it enumerates declared fields
//! and reads their raw values, bypassing getter methods entirely. Callers
//! depend on raw-field extraction, so the asymmetry is contractual.

use crate::error::{AccessError, AccessResult};
use crate::logging::targets;
use crate::map::FieldMap;
use crate::meta::{Dto, DtoMeta, FieldMeta, FieldValue, GetterMeta, SetterMeta};

/// Normalize a name fragment for accessor matching: every `_` removed,
/// ASCII-lowercased.
fn normalized(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl DtoMeta {
    fn direct_field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| !f.internal && f.name == name)
    }

    fn prefixed_field(&self, name: &str) -> Option<&FieldMeta> {
        // The prefix concatenates with the name exactly as given; prefixed
        // storage is intentionally not style-insensitive.
        let declared = format!("_{name}");
        self.fields.iter().find(|f| f.name == declared)
    }

    fn matching_getter(&self, name: &str) -> Option<&GetterMeta> {
        let candidate = format!("get{}", normalized(name));
        self.getters.iter().find(|g| normalized(g.method) == candidate)
    }

    fn matching_setter(&self, name: &str) -> Option<&SetterMeta> {
        let candidate = format!("set{}", normalized(name));
        self.setters.iter().find(|s| normalized(s.method) == candidate)
    }

    /// Resolve and execute a property read.
    pub fn read(&self, obj: &dyn Dto, name: &str) -> AccessResult<FieldValue> {
        if let Some(field) = self.direct_field(name) {
            tracing::trace!(target: targets::ACCESSOR, name, field = field.name, "read direct field");
            return Ok((field.get)(obj));
        }
        if let Some(getter) = self.matching_getter(name) {
            tracing::trace!(target: targets::ACCESSOR, name, method = getter.method, "read via getter");
            return Ok((getter.invoke)(obj));
        }
        if let Some(field) = self.prefixed_field(name) {
            tracing::trace!(target: targets::ACCESSOR, name, field = field.name, "read prefixed field");
            return Ok((field.get)(obj));
        }
        Err(AccessError::not_found(name))
    }

    /// Resolve and execute a property write.
    pub fn write(&self, obj: &mut dyn Dto, name: &str, value: FieldValue) -> AccessResult<()> {
        if let Some(field) = self.direct_field(name) {
            tracing::trace!(target: targets::ACCESSOR, name, field = field.name, "write direct field");
            return (field.set)(obj, value);
        }
        if let Some(setter) = self.matching_setter(name) {
            tracing::trace!(target: targets::ACCESSOR, name, method = setter.method, "write via setter");
            return (setter.invoke)(obj, value);
        }
        if let Some(field) = self.prefixed_field(name) {
            tracing::trace!(target: targets::ACCESSOR, name, field = field.name, "write prefixed field");
            return (field.set)(obj, value);
        }
        Err(AccessError::not_found(name))
    }

    /// Existence check: true iff the prefixed storage field exists or a
    /// matching getter is registered.
    ///
    /// Never invokes accessor logic and never fails. Direct fields are not
    /// consulted; the check mirrors what a read through the fallback chain
    /// could reach without touching accessible state.
    pub fn has(&self, name: &str) -> bool {
        self.prefixed_field(name).is_some() || self.matching_getter(name).is_some()
    }

    /// Bulk write from a key-value mapping, in the mapping's iteration
    /// order.
    ///
    /// The first failing key aborts the operation and propagates its error;
    /// writes already applied in the same call remain applied. There is no
    /// rollback.
    pub fn hydrate(&self, obj: &mut dyn Dto, values: FieldMap) -> AccessResult<()> {
        for (key, value) in values {
            self.write(obj, &key, value)?;
        }
        Ok(())
    }

    /// Bulk read into a key-value mapping.
    ///
    /// Enumerates declared fields in declaration order. The logical key is
    /// the declared name with the internal prefix stripped; the value is the
    /// raw current field value, bypassing getter methods entirely.
    /// Getter-only virtual properties are not emitted. Colliding logical
    /// keys collapse onto the first key's position, last value wins.
    pub fn extract(&self, obj: &dyn Dto) -> FieldMap {
        let mut map = FieldMap::with_capacity(self.fields.len());
        for field in self.fields {
            map.insert(field.logical_key(), (field.get)(obj));
        }
        map
    }
}

/// Ergonomic property access for concrete DTO types.
///
/// Blanket-implemented for every [`Dto`] type; forwards to the resolution
/// algorithm on the type's [`DtoMeta`].
///
/// # Example
///
/// ```ignore
/// use fieldkit_core::DtoAccess;
///
/// let mut user = UserDto::default();
/// user.write_value("role", "admin".to_string())?;
/// let role = user.read("role")?;
/// ```
pub trait DtoAccess: Dto + Sized {
    /// Resolve and execute a property read.
    fn read(&self, name: &str) -> AccessResult<FieldValue> {
        self.meta().read(self, name)
    }

    /// Resolve and execute a property write.
    fn write(&mut self, name: &str, value: FieldValue) -> AccessResult<()> {
        self.meta().write(self, name, value)
    }

    /// Convenience over [`write`](Self::write) that boxes a concrete value.
    fn write_value<T: 'static>(&mut self, name: &str, value: T) -> AccessResult<()> {
        self.write(name, Box::new(value))
    }

    /// Existence check without executing a getter.
    fn has(&self, name: &str) -> bool {
        self.meta().has(name)
    }

    /// Bulk write from a key-value mapping.
    fn hydrate(&mut self, values: FieldMap) -> AccessResult<()> {
        self.meta().hydrate(self, values)
    }

    /// Bulk read into a key-value mapping via direct field reads.
    fn extract(&self) -> FieldMap {
        self.meta().extract(self)
    }
}

impl<T: Dto> DtoAccess for T {}

/// The same surface for type-erased objects, e.g. instances produced by
/// [`TypeRegistry::create`](crate::meta::TypeRegistry::create).
impl dyn Dto {
    /// Resolve and execute a property read.
    pub fn read(&self, name: &str) -> AccessResult<FieldValue> {
        self.meta().read(self, name)
    }

    /// Resolve and execute a property write.
    pub fn write(&mut self, name: &str, value: FieldValue) -> AccessResult<()> {
        self.meta().write(self, name, value)
    }

    /// Existence check without executing a getter.
    pub fn has(&self, name: &str) -> bool {
        self.meta().has(name)
    }

    /// Bulk write from a key-value mapping.
    pub fn hydrate(&mut self, values: FieldMap) -> AccessResult<()> {
        self.meta().hydrate(self, values)
    }

    /// Bulk read into a key-value mapping via direct field reads.
    pub fn extract(&self) -> FieldMap {
        self.meta().extract(self)
    }
}
