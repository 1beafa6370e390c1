//! Ordered mapping from field name to descriptor.

use serde_json::Value;

use crate::engine;
use crate::error::ValidationError;
use crate::field::FieldDescriptor;
use crate::model::Model;

/// What a schema entry may be declared as.
///
/// A bare nested [`Schema`] is promoted to an `object`-typed, required
/// descriptor carrying that schema. Promotion happens once, when the entry
/// is added with [`Schema::field`].
#[derive(Debug, Clone)]
pub enum FieldSpec {
    Leaf(FieldDescriptor),
    Nested(Schema),
}

impl FieldSpec {
    #[must_use]
    pub fn into_descriptor(self) -> FieldDescriptor {
        match self {
            Self::Leaf(descriptor) => descriptor,
            Self::Nested(schema) => FieldDescriptor::new().with_schema(schema),
        }
    }
}

impl From<FieldDescriptor> for FieldSpec {
    fn from(descriptor: FieldDescriptor) -> Self {
        Self::Leaf(descriptor)
    }
}

impl From<Schema> for FieldSpec {
    fn from(schema: Schema) -> Self {
        Self::Nested(schema)
    }
}

impl From<&Model> for FieldSpec {
    fn from(model: &Model) -> Self {
        Self::Leaf(model.field())
    }
}

impl From<Model> for FieldSpec {
    fn from(model: Model) -> Self {
        Self::from(&model)
    }
}

/// Describes one object shape.
///
/// Field order is declaration order; validation walks fields in that order,
/// so the first failure reported under `throw` is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldDescriptor)>,
}

impl Schema {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add (or replace) a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> Self {
        let name = name.into();
        let descriptor = spec.into().into_descriptor();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = descriptor,
            None => self.fields.push((name, descriptor)),
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every failure in `value`, regardless of severity mode.
    ///
    /// Defaults are not injected and nothing is guarded; this is a pure
    /// report over the tree as given. A non-object `value` is reported as if
    /// every field were absent.
    #[must_use]
    pub fn failures(&self, value: &Value) -> Vec<ValidationError> {
        let mut failures = Vec::new();
        engine::collect_tree(self, "", value.as_object(), &mut failures);
        failures
    }
}
