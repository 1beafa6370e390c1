//! Guarded views: live wrappers that validate every write.
//!
//! A [`GuardedObject`] owns its entries. Fields governed by a nested schema
//! are held as nested guards and typed arrays as [`GuardedArray`]s, so a
//! mutable handle obtained through [`GuardedObject::object_mut`] or
//! [`GuardedObject::array_mut`] is itself guarded. Governed values are never
//! exposed as `&mut Value`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::checks::TypeTag;
use crate::engine::{self, child_path, index_path};
use crate::error::{ModelError, ValidationError};
use crate::field::FieldDescriptor;
use crate::schema::Schema;
use crate::severity::Policy;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One entry of a guarded object.
#[derive(Debug, Clone)]
pub enum Node {
    /// A value with no nested guard: primitives, untyped objects, and keys
    /// the schema does not name.
    Plain(Value),
    Object(GuardedObject),
    Array(GuardedArray),
}

impl Node {
    #[must_use]
    pub const fn as_plain(&self) -> Option<&Value> {
        match self {
            Self::Plain(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&GuardedObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_array(&self) -> Option<&GuardedArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Deep copy of the underlying data.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Plain(value) => value.clone(),
            Self::Object(object) => object.to_value(),
            Self::Array(array) => array.to_value(),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Plain(value) => value,
            Self::Object(object) => object.into_value(),
            Self::Array(array) => array.into_value(),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Plain(value) => value.serialize(serializer),
            Self::Object(object) => object.serialize(serializer),
            Self::Array(array) => array.serialize(serializer),
        }
    }
}

/// Wrap a validated value according to its descriptor.
fn materialize(
    descriptor: &FieldDescriptor,
    path: String,
    value: Value,
    policy: &Policy,
) -> Result<Node, ValidationError> {
    let node = match value {
        Value::Object(map) => match descriptor.schema() {
            Some(schema) => Node::Object(GuardedObject::build(
                Arc::clone(schema),
                path,
                map,
                policy,
            )?),
            None => Node::Plain(Value::Object(map)),
        },
        Value::Array(items) if descriptor.is_array() => Node::Array(GuardedArray {
            element_type: descriptor.element_type(),
            path,
            policy: policy.clone(),
            items,
        }),
        other => Node::Plain(other),
    };
    Ok(node)
}

// ---------------------------------------------------------------------------
// GuardedObject
// ---------------------------------------------------------------------------

/// A validated object whose writes are re-validated against its schema.
#[derive(Debug, Clone)]
pub struct GuardedObject {
    schema: Arc<Schema>,
    path: String,
    policy: Policy,
    entries: BTreeMap<String, Node>,
}

impl GuardedObject {
    /// Inject defaults, validate every field, and wrap nested subtrees.
    ///
    /// # Errors
    ///
    /// Returns the first failure when the policy is in `throw` mode.
    pub(crate) fn build(
        schema: Arc<Schema>,
        path: String,
        mut object: Map<String, Value>,
        policy: &Policy,
    ) -> Result<Self, ValidationError> {
        for (name, descriptor) in schema.iter() {
            if let Some(default) = descriptor.default_value() {
                if !object.contains_key(name) {
                    object.insert(name.to_string(), default.clone());
                }
            }
        }

        let mut entries = BTreeMap::new();
        for (name, descriptor) in schema.iter() {
            let field_path = child_path(&path, name);
            engine::validate_field(descriptor, &field_path, object.get(name), policy)?;
            if let Some(value) = object.remove(name) {
                let node = materialize(descriptor, field_path, value, policy)?;
                entries.insert(name.to_string(), node);
            }
        }
        entries.extend(
            object
                .into_iter()
                .map(|(name, value)| (name, Node::Plain(value))),
        );

        tracing::debug!(target: "modus", path = %path, fields = entries.len(), "guard installed");
        Ok(Self {
            schema,
            path,
            policy: policy.clone(),
            entries,
        })
    }

    /// Validate and store `value` under `key`.
    ///
    /// Objects written to a schema-governed field are wrapped in their own
    /// guard before they are stored. Keys the schema does not name are stored
    /// without checks.
    ///
    /// # Errors
    ///
    /// Under `throw`, a failing value is rejected and the previous value is
    /// kept.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Result<(), ModelError> {
        let key = key.into();
        let path = child_path(&self.path, &key);
        let Some(descriptor) = self.schema.get(&key) else {
            tracing::debug!(target: "modus", path = %path, "write outside schema");
            self.entries.insert(key, Node::Plain(value));
            return Ok(());
        };

        engine::validate_field(descriptor, &path, Some(&value), &self.policy)?;
        let node = materialize(descriptor, path, value, &self.policy)?;
        self.entries.insert(key, node);
        Ok(())
    }

    /// Remove `key`, checking that its field may be absent.
    ///
    /// # Errors
    ///
    /// Under `throw`, removing a required field is rejected and the entry is
    /// kept.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, ModelError> {
        if let Some(descriptor) = self.schema.get(key) {
            engine::validate_field(descriptor, &child_path(&self.path, key), None, &self.policy)?;
        }
        Ok(self.entries.remove(key).map(Node::into_value))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Deep copy of the value stored under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(Node::to_value)
    }

    /// Mutable handle to a nested guarded object.
    pub fn object_mut(&mut self, key: &str) -> Option<&mut GuardedObject> {
        match self.entries.get_mut(key) {
            Some(Node::Object(object)) => Some(object),
            _ => None,
        }
    }

    /// Mutable handle to a guarded array.
    pub fn array_mut(&mut self, key: &str) -> Option<&mut GuardedArray> {
        match self.entries.get_mut(key) {
            Some(Node::Array(array)) => Some(array),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dotted path of this object from the model root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, node)| (key.clone(), node.to_value()))
                .collect(),
        )
    }

    /// Drop the guard and return the plain data.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(
            self.entries
                .into_iter()
                .map(|(key, node)| (key, node.into_value()))
                .collect(),
        )
    }
}

impl Serialize for GuardedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.entries)
    }
}

// ---------------------------------------------------------------------------
// GuardedArray
// ---------------------------------------------------------------------------

/// A sequence whose writes are checked against an optional element type.
#[derive(Debug, Clone)]
pub struct GuardedArray {
    element_type: Option<TypeTag>,
    path: String,
    policy: Policy,
    items: Vec<Value>,
}

impl GuardedArray {
    fn check_element(&self, index: usize, value: &Value) -> Result<(), ValidationError> {
        match self.element_type {
            Some(tag) => engine::validate_field(
                &FieldDescriptor::element(tag),
                &index_path(&self.path, index),
                Some(value),
                &self.policy,
            ),
            None => Ok(()),
        }
    }

    /// Replace the element at `index`, or append when `index == len()`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` when `index > len()`; under `throw`, a value that
    /// fails the element type is rejected.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), ModelError> {
        let len = self.items.len();
        if index > len {
            return Err(ModelError::IndexOutOfBounds {
                path: self.path.clone(),
                index,
                len,
            });
        }
        self.check_element(index, &value)?;
        match self.items.get_mut(index) {
            Some(slot) => *slot = value,
            None => self.items.push(value),
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Under `throw`, a value that fails the element type is rejected.
    pub fn push(&mut self, value: Value) -> Result<(), ModelError> {
        self.set(self.items.len(), value)
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn element_type(&self) -> Option<TypeTag> {
        self.element_type
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.items.clone())
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Array(self.items)
    }
}

impl<'a> IntoIterator for &'a GuardedArray {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for GuardedArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}
