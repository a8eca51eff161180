//! Integration tests for the #[derive(Dto)] macro.

use std::any::TypeId;

use fieldkit_core::{
    AccessError, AccessResult, Dto, DtoAccess, FieldValue, FieldsDebug, TypeRegistry,
};
use fieldkit_macros::Dto;
use serde_json::{json, Value};

// Basic test struct using the derive macro
#[derive(Dto)]
struct UserDto {
    id: Option<i64>,
    username: Option<String>,
    _role: String,

    #[field(setter = "set_config")]
    _config: Value,
}

impl Default for UserDto {
    fn default() -> Self {
        Self {
            id: None,
            username: None,
            _role: "member".to_string(),
            _config: json!({}),
        }
    }
}

impl UserDto {
    // Accepts a structured value or a JSON string.
    fn set_config(&mut self, value: FieldValue) -> AccessResult<()> {
        let value = match value.downcast::<String>() {
            Ok(raw) => serde_json::from_str(&raw).map_err(AccessError::accessor)?,
            Err(value) => *value.downcast::<Value>().map_err(|_| AccessError::TypeMismatch {
                property: "_config",
                expected: "Value",
            })?,
        };
        self._config = value;
        Ok(())
    }
}

// Test struct with a virtual getter and no factory
#[derive(Dto)]
#[dto(no_factory)]
#[dto(getter = "get_display_name")]
struct Profile {
    first_name: String,
    last_name: String,
}

impl Profile {
    fn get_display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// Test struct with a skipped field and internal unprefixed storage
#[derive(Dto)]
#[dto(no_factory)]
struct Contact {
    email: Option<String>,

    #[field(internal, setter = "set_tags")]
    tags: Vec<String>,

    #[field(skip)]
    dirty: bool,
}

impl Contact {
    fn set_tags(&mut self, value: FieldValue) -> AccessResult<()> {
        let value = value.downcast::<Vec<String>>().map_err(|_| AccessError::TypeMismatch {
            property: "tags",
            expected: "Vec<String>",
        })?;
        self.tags = *value;
        Ok(())
    }
}

// A direct field and an internal field sharing one logical key
#[derive(Dto)]
#[dto(no_factory)]
struct Shadowed {
    role: String,
    _role: String,
}

// ============= Tests =============

#[test]
fn test_derive_generates_meta() {
    let user = UserDto::default();
    let meta = user.meta();

    assert_eq!(meta.type_name, "UserDto");
    assert_eq!(meta.type_id, TypeId::of::<UserDto>());
    assert_eq!(meta.fields.len(), 4);
    assert!(std::ptr::eq(meta, UserDto::META));
}

#[test]
fn test_field_meta_details() {
    let meta = UserDto::META;

    let id = meta.field("id").unwrap();
    assert!(!id.internal);
    assert_eq!(id.type_id, TypeId::of::<Option<i64>>());
    assert_eq!(id.logical_key(), "id");

    let role = meta.field("_role").unwrap();
    assert!(role.internal);
    assert_eq!(role.logical_key(), "role");

    assert_eq!(meta.logical_keys(), ["id", "username", "role", "config"]);
}

#[test]
fn test_setter_registered() {
    let meta = UserDto::META;
    assert!(meta.getters.is_empty());
    assert_eq!(meta.setters.len(), 1);
    assert_eq!(meta.setters[0].method, "set_config");
}

#[test]
fn test_read_write_through_meta() {
    let mut user = UserDto::default();
    let meta = UserDto::META;

    meta.write(&mut user, "id", Box::new(Some(123_i64))).unwrap();
    assert_eq!(user.id, Some(123));

    let id = meta.read(&user, "id").unwrap();
    assert_eq!(*id.downcast::<Option<i64>>().unwrap(), Some(123));
}

#[test]
fn test_factory_generates_default() {
    let meta = UserDto::META;
    assert!(meta.create.is_some());

    let fresh = meta.create.unwrap()();
    assert_eq!(fresh.meta().type_name, "UserDto");
    let role = fresh.read("role").unwrap();
    assert_eq!(*role.downcast::<String>().unwrap(), "member");
}

#[test]
fn test_no_factory_attribute() {
    assert!(Profile::META.create.is_none());
}

#[test]
fn test_virtual_getter() {
    let mut profile = Profile {
        first_name: "Joe".to_string(),
        last_name: "Doe".to_string(),
    };

    assert!(profile.has("display_name"));
    assert!(profile.has("displayName"));

    let name = profile.read("display_name").unwrap();
    assert_eq!(*name.downcast::<String>().unwrap(), "Joe Doe");

    // Virtual properties have no storage and are absent from extraction.
    let map = profile.extract();
    assert_eq!(map.keys().collect::<Vec<_>>(), ["first_name", "last_name"]);

    // And they cannot be written.
    let err = profile
        .write_value("display_name", "nope".to_string())
        .unwrap_err();
    assert!(matches!(err, AccessError::NotFound { ref name } if name == "display_name"));
}

#[test]
fn test_skip_field_excluded() {
    let meta = Contact::META;
    assert_eq!(meta.fields.len(), 2);
    assert!(meta.field("dirty").is_none());

    let contact = Contact {
        email: None,
        tags: vec!["vip".to_string()],
        dirty: true,
    };
    let map = contact.extract();
    assert_eq!(map.keys().collect::<Vec<_>>(), ["email", "tags"]);
    assert!(contact.dirty);

    let err = contact.read("dirty").unwrap_err();
    assert!(matches!(err, AccessError::NotFound { .. }));
}

#[test]
fn test_internal_unprefixed_field() {
    let mut contact = Contact {
        email: None,
        tags: Vec::new(),
        dirty: false,
    };

    // Writable only through the registered setter.
    contact.write_value("tags", vec!["vip".to_string()]).unwrap();
    assert_eq!(contact.tags, ["vip"]);

    // No getter, no `_tags` storage: reads cannot resolve.
    let err = contact.read("tags").unwrap_err();
    assert!(matches!(err, AccessError::NotFound { ref name } if name == "tags"));

    // Extraction still enumerates it, under its unchanged name.
    let map = contact.extract();
    assert_eq!(map.get_as::<Vec<String>>("tags").unwrap(), &["vip".to_string()]);
}

#[test]
fn test_shadowed_logical_key_collapses_in_extraction() {
    let mut shadowed = Shadowed {
        role: "direct".to_string(),
        _role: "internal".to_string(),
    };

    // Reads and writes prefer the direct field.
    let role = shadowed.read("role").unwrap();
    assert_eq!(*role.downcast::<String>().unwrap(), "direct");
    shadowed.write_value("role", "changed".to_string()).unwrap();
    assert_eq!(shadowed.role, "changed");
    assert_eq!(shadowed._role, "internal");

    // Extraction keeps the first position; the later field's value wins.
    let map = shadowed.extract();
    assert_eq!(map.keys().collect::<Vec<_>>(), ["role"]);
    assert_eq!(map.get_as::<String>("role").unwrap(), "internal");
}

#[test]
fn test_config_setter_errors_pass_through() {
    let mut user = UserDto::default();

    let err = user.write_value("config", "{not json".to_string()).unwrap_err();
    assert!(matches!(err, AccessError::Accessor(_)));
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.is::<serde_json::Error>());

    // The failed write left the stored value untouched.
    assert_eq!(user._config, json!({}));
}

#[test]
fn test_fields_debug_rendering() {
    let user = UserDto::default();
    assert_eq!(
        FieldsDebug::new(&user).to_string(),
        "UserDto { id: Option<i64>, username: Option<String>, \
         _role: String (internal), _config: Value (internal) }"
    );
}

// ============= TypeRegistry Integration Tests =============

use std::sync::Mutex;

// Mutex to serialize tests that rely on the global TypeRegistry
static TYPE_REGISTRY_TEST_MUTEX: Mutex<()> = Mutex::new(());

fn setup_type_registry() -> std::sync::MutexGuard<'static, ()> {
    let guard = TYPE_REGISTRY_TEST_MUTEX.lock().unwrap();
    TypeRegistry::clear();
    guard
}

#[test]
fn test_register_type() {
    let _guard = setup_type_registry();

    assert!(!TypeRegistry::contains("UserDto"));
    UserDto::register_type();
    assert!(TypeRegistry::contains("UserDto"));

    let meta = TypeRegistry::get_by_name("UserDto").unwrap();
    assert_eq!(meta.type_name, "UserDto");
    assert!(std::ptr::eq(meta, UserDto::META));

    // Re-registering is a no-op.
    UserDto::register_type();
    assert_eq!(TypeRegistry::type_count(), 1);
}

#[test]
fn test_registry_get_by_type() {
    let _guard = setup_type_registry();

    UserDto::register_type();
    let meta = TypeRegistry::get::<UserDto>().unwrap();
    assert_eq!(meta.type_name, "UserDto");
    assert!(TypeRegistry::get::<Profile>().is_none());
}

#[test]
fn test_registry_dynamic_creation() {
    let _guard = setup_type_registry();

    UserDto::register_type();

    let mut user = TypeRegistry::create("UserDto").unwrap();
    user.write("username", Box::new(Some("joe.doe".to_string()))).unwrap();
    let map = user.extract();
    assert_eq!(
        map.get_as::<Option<String>>("username").unwrap(),
        &Some("joe.doe".to_string())
    );

    assert!(TypeRegistry::create("Unknown").is_none());
}

#[test]
fn test_registry_create_fails_without_factory() {
    let _guard = setup_type_registry();

    TypeRegistry::register(Profile::META);
    assert!(TypeRegistry::contains("Profile"));
    assert!(TypeRegistry::create("Profile").is_none());
}
