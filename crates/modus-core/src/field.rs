//! Field descriptors: the declarative constraint set for one property.
//!
//! Descriptors are usually built through the per-type shorthands and refined
//! with builder methods:
//!
//! ```
//! use modus_core::field::{number, string};
//! use serde_json::json;
//!
//! let age = number().with_default(json!(10));
//! let password = string().validate(|v, _| v.as_str().is_some_and(|s| s.len() > 5));
//! assert!(age.is_required());
//! assert!(password.validator().is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::checks::{TypeChecks, TypeTag};
use crate::schema::Schema;

/// Custom validator signature. Receives the present value and the
/// type-check registry; `false` rejects the value.
pub type ValidatorFn = dyn Fn(&Value, &TypeChecks) -> bool + Send + Sync;

/// Constraints for a single property.
///
/// Invariants held by the builder: a descriptor carrying a nested schema is
/// typed `object`, and one carrying an element type is typed `array`.
#[derive(Clone)]
pub struct FieldDescriptor {
    required: bool,
    type_tag: Option<TypeTag>,
    validator: Option<Arc<ValidatorFn>>,
    default: Option<Value>,
    schema: Option<Arc<Schema>>,
    element_type: Option<TypeTag>,
}

impl FieldDescriptor {
    /// Required field with no type constraint.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            required: true,
            type_tag: None,
            validator: None,
            default: None,
            schema: None,
            element_type: None,
        }
    }

    /// Required field checked against `tag`.
    #[must_use]
    pub const fn typed(tag: TypeTag) -> Self {
        let mut descriptor = Self::new();
        descriptor.type_tag = Some(tag);
        descriptor
    }

    /// Synthetic descriptor applied to each element of a typed array.
    #[must_use]
    pub(crate) const fn element(tag: TypeTag) -> Self {
        Self::typed(tag)
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub const fn optional(self) -> Self {
        self.required(false)
    }

    /// Attach a custom validator, replacing any previous one.
    #[must_use]
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value, &TypeChecks) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Value injected at construction time when the field is absent.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Govern the field's value by a nested schema. Forces type `object`.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<Arc<Schema>>) -> Self {
        self.schema = Some(schema.into());
        self.type_tag = Some(TypeTag::Object);
        self
    }

    /// Check every array element against `tag`. Forces type `array`.
    #[must_use]
    pub const fn with_element_type(mut self, tag: TypeTag) -> Self {
        self.element_type = Some(tag);
        self.type_tag = Some(TypeTag::Array);
        self
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn type_tag(&self) -> Option<TypeTag> {
        self.type_tag
    }

    #[must_use]
    pub fn validator(&self) -> Option<&ValidatorFn> {
        self.validator.as_deref()
    }

    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    #[must_use]
    pub const fn element_type(&self) -> Option<TypeTag> {
        self.element_type
    }

    /// Whether values of this field are materialized as guarded arrays.
    pub(crate) fn is_array(&self) -> bool {
        self.type_tag == Some(TypeTag::Array)
    }
}

impl Default for FieldDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("required", &self.required)
            .field("type_tag", &self.type_tag)
            .field("validator", &self.validator.as_ref().map(|_| "<fn>"))
            .field("default", &self.default)
            .field("schema", &self.schema)
            .field("element_type", &self.element_type)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Options form
// ---------------------------------------------------------------------------

/// Options mapping accepted by [`define_field`].
#[derive(Clone, Default)]
pub struct FieldOptions {
    /// `None` means required.
    pub required: Option<bool>,
    pub validate: Option<Arc<ValidatorFn>>,
    pub default: Option<Value>,
    pub schema: Option<Schema>,
    pub element_type: Option<TypeTag>,
}

impl FieldOptions {
    /// Options holding only a validator: the bare-function shorthand.
    #[must_use]
    pub fn validator<F>(validator: F) -> Self
    where
        F: Fn(&Value, &TypeChecks) -> bool + Send + Sync + 'static,
    {
        Self {
            validate: Some(Arc::new(validator)),
            ..Self::default()
        }
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("required", &self.required)
            .field("validate", &self.validate.as_ref().map(|_| "<fn>"))
            .field("default", &self.default)
            .field("schema", &self.schema)
            .field("element_type", &self.element_type)
            .finish()
    }
}

/// Build a descriptor typed `tag` from an options mapping.
///
/// A nested schema or element type in `options` overrides `tag` with
/// `object` or `array` respectively.
#[must_use]
pub fn define_field(options: FieldOptions, tag: TypeTag) -> FieldDescriptor {
    let mut descriptor = FieldDescriptor::typed(tag).required(options.required.unwrap_or(true));
    descriptor.validator = options.validate;
    descriptor.default = options.default;
    if let Some(schema) = options.schema {
        descriptor = descriptor.with_schema(schema);
    }
    if let Some(element) = options.element_type {
        descriptor = descriptor.with_element_type(element);
    }
    descriptor
}

#[must_use]
pub const fn number() -> FieldDescriptor {
    FieldDescriptor::typed(TypeTag::Number)
}

#[must_use]
pub const fn array() -> FieldDescriptor {
    FieldDescriptor::typed(TypeTag::Array)
}

#[must_use]
pub const fn boolean() -> FieldDescriptor {
    FieldDescriptor::typed(TypeTag::Boolean)
}

#[must_use]
pub const fn object() -> FieldDescriptor {
    FieldDescriptor::typed(TypeTag::Object)
}

#[must_use]
pub const fn string() -> FieldDescriptor {
    FieldDescriptor::typed(TypeTag::String)
}

#[must_use]
pub const fn defined() -> FieldDescriptor {
    FieldDescriptor::typed(TypeTag::Defined)
}
