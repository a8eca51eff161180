//! Procedural macros for the Fieldkit registration-map system.
//!
//! This crate provides the `#[derive(Dto)]` macro, which turns a
//! named-field struct into a data-transfer object with a compile-time
//! registration map: every declared field becomes enumerable storage, and
//! accessor methods named after the `get`/`set` convention can be attached
//! to route individual properties through custom logic.
//!
//! # Attributes
//!
//! ## `#[field]`
//!
//! Optional per-field configuration:
//!
//! ```ignore
//! #[derive(Dto)]
//! struct UserDto {
//!     id: Option<i64>,
//!
//!     // Internal storage: reachable as the logical property `role`.
//!     _role: String,
//!
//!     // Internal storage with a coercing setter.
//!     #[field(setter = "set_config")]
//!     _config: serde_json::Value,
//!
//!     // Private unprefixed storage: writable only through its setter.
//!     #[field(internal, setter = "set_my_buddies")]
//!     my_buddies: Vec<String>,
//!
//!     // Not part of the registration map at all.
//!     #[field(skip)]
//!     dirty: bool,
//! }
//! ```
//!
//! Field attributes:
//! - `getter = "method"` / `setter = "method"`: Register accessor methods
//!   backed by this field
//! - `internal`: Exclude the field from direct by-name access (implied by a
//!   leading `_` in the field name)
//! - `skip`: Exclude the field from the registration map entirely
//!
//! ## `#[dto]`
//!
//! Struct-level configuration:
//!
//! ```ignore
//! #[derive(Dto)]
//! #[dto(no_factory)]                     // Don't generate a factory
//! #[dto(getter = "get_display_name")]    // Virtual accessor, no backing field
//! struct Profile {
//!     // ...
//! }
//! ```
//!
//! # Accessor method shapes
//!
//! Getters are ordinary typed methods; setters receive the dynamic value
//! and own any coercion:
//!
//! ```ignore
//! impl UserDto {
//!     fn get_display_name(&self) -> String { /* ... */ }
//!
//!     fn set_config(&mut self, value: FieldValue) -> AccessResult<()> {
//!         /* downcast, parse, store */
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, Field, Fields, Ident, Lit,
    Type,
};

/// Derive the `Dto` trait and generate the registration map.
///
/// This macro generates:
/// - Type-erased raw get/set thunks for every declared storage field
/// - Invoke thunks for registered accessor methods
/// - A static `DtoMeta` with fields in declaration order
/// - A `META` associated const and a `register_type()` method
/// - The `Dto` trait implementation
///
/// Storage field types must be `Clone + 'static`. Unless `#[dto(no_factory)]`
/// is given, the type must also implement `Default` for the generated
/// factory.
#[proc_macro_derive(Dto, attributes(dto, field))]
pub fn derive_dto(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive_dto(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Parsed storage-field information.
struct FieldInfo {
    field_name: Ident,
    field_type: Type,
    internal: bool,
}

/// Parsed accessor registration: the declared method name, spanned at the
/// attribute that requested it (for error reporting).
struct AccessorInfo {
    method: Ident,
}

/// Parsed struct-level attributes.
struct DtoAttrs {
    no_factory: bool,
    getters: Vec<Ident>,
    setters: Vec<Ident>,
}

fn impl_derive_dto(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let meta_static_name = format_ident!("{}_META", struct_name.to_string().to_uppercase());

    // Parse struct-level attributes
    let dto_attrs = parse_dto_attrs(&input.attrs)?;

    // Get struct fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Dto derive only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Dto derive only supports structs",
            ))
        }
    };

    // Parse storage fields and collect accessor registrations
    let mut storage_fields = Vec::new();
    let mut getters: Vec<AccessorInfo> = dto_attrs
        .getters
        .into_iter()
        .map(|method| AccessorInfo { method })
        .collect();
    let mut setters: Vec<AccessorInfo> = dto_attrs
        .setters
        .into_iter()
        .map(|method| AccessorInfo { method })
        .collect();

    for field in fields.iter() {
        let parsed = parse_field(field)?;
        let Some((info, field_getter, field_setter)) = parsed else {
            continue;
        };
        storage_fields.push(info);
        if let Some(method) = field_getter {
            getters.push(AccessorInfo { method });
        }
        if let Some(method) = field_setter {
            setters.push(AccessorInfo { method });
        }
    }

    validate_accessors(&getters, "get")?;
    validate_accessors(&setters, "set")?;

    // Generate raw field thunks
    let field_thunks = generate_field_thunks(struct_name, &storage_fields);

    // Generate accessor invoke thunks
    let getter_thunks = generate_getter_thunks(struct_name, &getters);
    let setter_thunks = generate_setter_thunks(struct_name, &setters);

    // Generate metadata arrays
    let field_meta = generate_field_meta(struct_name, &storage_fields);
    let getter_meta = generate_getter_meta(struct_name, &getters);
    let setter_meta = generate_setter_meta(struct_name, &setters);

    // Generate factory function
    let factory = if dto_attrs.no_factory {
        quote! { None }
    } else {
        quote! {
            Some(|| Box::new(<#struct_name as Default>::default()) as Box<dyn fieldkit_core::Dto>)
        }
    };

    // Generate the full implementation
    let expanded = quote! {
        #field_thunks
        #getter_thunks
        #setter_thunks

        /// Static registration map for this type (generated by #[derive(Dto)]).
        #[allow(non_upper_case_globals)]
        static #meta_static_name: fieldkit_core::DtoMeta = fieldkit_core::DtoMeta {
            type_id: std::any::TypeId::of::<#struct_name>(),
            type_name: stringify!(#struct_name),
            fields: &#field_meta,
            getters: &#getter_meta,
            setters: &#setter_meta,
            create: #factory,
        };

        impl #struct_name {
            /// Reference to the static DtoMeta for this type.
            ///
            /// This can be used to access the registration map without an
            /// instance:
            /// ```ignore
            /// let meta = UserDto::META;
            /// println!("{} declares {} fields", meta.type_name, meta.fields.len());
            /// ```
            pub const META: &'static fieldkit_core::DtoMeta = &#meta_static_name;

            /// Register this type in the global TypeRegistry.
            ///
            /// Call this during application initialization to enable dynamic
            /// object creation by type name:
            /// ```ignore
            /// UserDto::register_type();
            ///
            /// // Later, create dynamically:
            /// let user = TypeRegistry::create("UserDto");
            /// ```
            pub fn register_type() {
                fieldkit_core::TypeRegistry::register(&#meta_static_name);
            }
        }

        impl fieldkit_core::Dto for #struct_name {
            fn meta(&self) -> &'static fieldkit_core::DtoMeta {
                &#meta_static_name
            }
        }
    };

    Ok(expanded)
}

/// Parse struct-level #[dto(...)] attributes.
fn parse_dto_attrs(attrs: &[Attribute]) -> syn::Result<DtoAttrs> {
    let mut result = DtoAttrs {
        no_factory: false,
        getters: Vec::new(),
        setters: Vec::new(),
    };

    for attr in attrs {
        if !attr.path().is_ident("dto") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("no_factory") {
                result.no_factory = true;
            } else if meta.path.is_ident("getter") {
                result.getters.push(parse_method_name(&meta)?);
            } else if meta.path.is_ident("setter") {
                result.setters.push(parse_method_name(&meta)?);
            }
            Ok(())
        })?;
    }

    Ok(result)
}

/// Parse a field and its #[field(...)] attribute.
///
/// Returns `None` for skipped fields; otherwise the storage info plus any
/// accessor registrations declared on the field.
#[allow(clippy::type_complexity)]
fn parse_field(field: &Field) -> syn::Result<Option<(FieldInfo, Option<Ident>, Option<Ident>)>> {
    let field_name = match &field.ident {
        Some(name) => name.clone(),
        None => return Ok(None),
    };

    let mut internal = field_name.to_string().starts_with('_');
    let mut skip = false;
    let mut getter = None;
    let mut setter = None;

    for attr in &field.attrs {
        if !attr.path().is_ident("field") {
            continue;
        }

        // A bare #[field] is just a marker; only #[field(...)] carries options.
        if matches!(attr.meta, syn::Meta::Path(_)) {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
            } else if meta.path.is_ident("internal") {
                internal = true;
            } else if meta.path.is_ident("getter") {
                getter = Some(parse_method_name(&meta)?);
            } else if meta.path.is_ident("setter") {
                setter = Some(parse_method_name(&meta)?);
            }
            Ok(())
        })?;
    }

    if skip {
        return Ok(None);
    }

    Ok(Some((
        FieldInfo {
            field_name,
            field_type: field.ty.clone(),
            internal,
        },
        getter,
        setter,
    )))
}

/// Parse a `getter = "method_name"` style value into an identifier.
fn parse_method_name(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Ident> {
    let value: Expr = meta.value()?.parse()?;
    if let Expr::Lit(ExprLit {
        lit: Lit::Str(lit_str),
        ..
    }) = value
    {
        lit_str.parse::<Ident>()
    } else {
        Err(meta.error("expected a string literal naming a method"))
    }
}

/// Check accessor names follow the `get`/`set` + property convention and are
/// not registered twice.
fn validate_accessors(accessors: &[AccessorInfo], prefix: &str) -> syn::Result<()> {
    let mut seen = Vec::new();
    for accessor in accessors {
        let name = accessor.method.to_string();
        let normalized = normalized(&name);
        let fragment = normalized.strip_prefix(prefix);
        if fragment.is_none_or(str::is_empty) {
            return Err(syn::Error::new_spanned(
                &accessor.method,
                format!("accessor method `{name}` must be named `{prefix}` + property name"),
            ));
        }
        if seen.contains(&normalized) {
            return Err(syn::Error::new_spanned(
                &accessor.method,
                format!("accessor method `{name}` registered more than once"),
            ));
        }
        seen.push(normalized);
    }
    Ok(())
}

/// Normalize a name for accessor matching: every `_` removed,
/// ASCII-lowercased. Must agree with the core's resolution rule.
fn normalized(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Convert a type to a compact string representation.
fn type_to_string(ty: &Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
}

fn field_get_thunk_name(struct_name: &Ident, field_name: &Ident) -> Ident {
    format_ident!(
        "__{}_{}_get",
        struct_name.to_string().to_lowercase(),
        field_name
    )
}

fn field_set_thunk_name(struct_name: &Ident, field_name: &Ident) -> Ident {
    format_ident!(
        "__{}_{}_set",
        struct_name.to_string().to_lowercase(),
        field_name
    )
}

fn accessor_thunk_name(struct_name: &Ident, method: &Ident) -> Ident {
    format_ident!(
        "__{}_{}_invoke",
        struct_name.to_string().to_lowercase(),
        method
    )
}

/// Generate raw get/set thunks for storage fields.
fn generate_field_thunks(struct_name: &Ident, fields: &[FieldInfo]) -> TokenStream2 {
    let thunks: Vec<TokenStream2> = fields
        .iter()
        .map(|field| {
            let field_name = &field.field_name;
            let field_type = &field.field_type;
            let field_name_str = field_name.to_string();
            let type_name_str = type_to_string(field_type);
            let get_name = field_get_thunk_name(struct_name, field_name);
            let set_name = field_set_thunk_name(struct_name, field_name);

            quote! {
                #[allow(non_snake_case)]
                fn #get_name(obj: &dyn fieldkit_core::Dto) -> fieldkit_core::FieldValue {
                    let typed = fieldkit_core::dto_cast::<#struct_name>(obj)
                        .expect("dto_cast failed in generated field getter");
                    Box::new(typed.#field_name.clone())
                }

                #[allow(non_snake_case)]
                fn #set_name(
                    obj: &mut dyn fieldkit_core::Dto,
                    value: fieldkit_core::FieldValue,
                ) -> fieldkit_core::AccessResult<()> {
                    let typed = fieldkit_core::dto_cast_mut::<#struct_name>(obj)
                        .expect("dto_cast_mut failed in generated field setter");
                    let value = value.downcast::<#field_type>().map_err(|_| {
                        fieldkit_core::AccessError::TypeMismatch {
                            property: #field_name_str,
                            expected: #type_name_str,
                        }
                    })?;
                    typed.#field_name = *value;
                    Ok(())
                }
            }
        })
        .collect();

    quote! { #(#thunks)* }
}

/// Generate invoke thunks for getter methods.
fn generate_getter_thunks(struct_name: &Ident, getters: &[AccessorInfo]) -> TokenStream2 {
    let thunks: Vec<TokenStream2> = getters
        .iter()
        .map(|accessor| {
            let method = &accessor.method;
            let thunk_name = accessor_thunk_name(struct_name, method);

            quote! {
                #[allow(non_snake_case)]
                fn #thunk_name(obj: &dyn fieldkit_core::Dto) -> fieldkit_core::FieldValue {
                    let typed = fieldkit_core::dto_cast::<#struct_name>(obj)
                        .expect("dto_cast failed in generated getter thunk");
                    Box::new(typed.#method())
                }
            }
        })
        .collect();

    quote! { #(#thunks)* }
}

/// Generate invoke thunks for setter methods.
fn generate_setter_thunks(struct_name: &Ident, setters: &[AccessorInfo]) -> TokenStream2 {
    let thunks: Vec<TokenStream2> = setters
        .iter()
        .map(|accessor| {
            let method = &accessor.method;
            let thunk_name = accessor_thunk_name(struct_name, method);

            quote! {
                #[allow(non_snake_case)]
                fn #thunk_name(
                    obj: &mut dyn fieldkit_core::Dto,
                    value: fieldkit_core::FieldValue,
                ) -> fieldkit_core::AccessResult<()> {
                    let typed = fieldkit_core::dto_cast_mut::<#struct_name>(obj)
                        .expect("dto_cast_mut failed in generated setter thunk");
                    typed.#method(value)
                }
            }
        })
        .collect();

    quote! { #(#thunks)* }
}

/// Generate the storage-field metadata array.
fn generate_field_meta(struct_name: &Ident, fields: &[FieldInfo]) -> TokenStream2 {
    let entries: Vec<TokenStream2> = fields
        .iter()
        .map(|field| {
            let field_name = &field.field_name;
            let field_type = &field.field_type;
            let field_name_str = field_name.to_string();
            let type_name_str = type_to_string(field_type);
            let internal = field.internal;
            let get_name = field_get_thunk_name(struct_name, field_name);
            let set_name = field_set_thunk_name(struct_name, field_name);

            quote! {
                fieldkit_core::FieldMeta {
                    name: #field_name_str,
                    type_name: #type_name_str,
                    type_id: std::any::TypeId::of::<#field_type>(),
                    internal: #internal,
                    get: #get_name,
                    set: #set_name,
                }
            }
        })
        .collect();

    quote! { [#(#entries),*] }
}

/// Generate the getter metadata array.
fn generate_getter_meta(struct_name: &Ident, getters: &[AccessorInfo]) -> TokenStream2 {
    let entries: Vec<TokenStream2> = getters
        .iter()
        .map(|accessor| {
            let method = &accessor.method;
            let method_str = method.to_string();
            let thunk_name = accessor_thunk_name(struct_name, method);

            quote! {
                fieldkit_core::GetterMeta {
                    method: #method_str,
                    invoke: #thunk_name,
                }
            }
        })
        .collect();

    quote! { [#(#entries),*] }
}

/// Generate the setter metadata array.
fn generate_setter_meta(struct_name: &Ident, setters: &[AccessorInfo]) -> TokenStream2 {
    let entries: Vec<TokenStream2> = setters
        .iter()
        .map(|accessor| {
            let method = &accessor.method;
            let method_str = method.to_string();
            let thunk_name = accessor_thunk_name(struct_name, method);

            quote! {
                fieldkit_core::SetterMeta {
                    method: #method_str,
                    invoke: #thunk_name,
                }
            }
        })
        .collect();

    quote! { [#(#entries),*] }
}
