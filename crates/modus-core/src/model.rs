//! Models: schemas bound to a policy, producing guarded instances.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::checks::{TypeTag, runtime_type};
use crate::engine;
use crate::error::ModelError;
use crate::field::FieldDescriptor;
use crate::guard::GuardedObject;
use crate::schema::Schema;
use crate::severity::Policy;

/// Build a model that follows the process-wide severity mode.
#[must_use]
pub fn define_model(schema: Schema) -> Model {
    Model::new(schema)
}

/// A reusable validator and guard factory for one schema.
///
/// ```
/// use modus_core::field::{number, string};
/// use modus_core::{Model, Policy, Schema, SeverityMode};
/// use serde_json::json;
///
/// let user = Model::with_policy(
///     Schema::new().field("name", string()).field("age", number()),
///     Policy::fixed(SeverityMode::Throw),
/// );
/// let mut instance = user.apply_value(json!({ "name": "kevin", "age": 20 }))?;
/// assert!(instance.set("age", json!("old")).is_err());
/// assert_eq!(instance.value("age"), Some(json!(20)));
/// # Ok::<(), modus_core::ModelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    schema: Arc<Schema>,
    policy: Policy,
    label: String,
}

impl Model {
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self::with_policy(schema, Policy::global())
    }

    #[must_use]
    pub fn with_policy(schema: Schema, policy: Policy) -> Self {
        Self {
            schema: Arc::new(schema),
            policy,
            label: String::new(),
        }
    }

    /// Prefix every reported path with `label`, e.g. `User.name` instead of
    /// `.name`.
    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Models always nest as objects.
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        TypeTag::Object
    }

    /// Required descriptor that nests this model's schema.
    #[must_use]
    pub fn field(&self) -> FieldDescriptor {
        FieldDescriptor::new().with_schema(Arc::clone(&self.schema))
    }

    /// Validate `input`, inject defaults, and wrap the result in a guard.
    ///
    /// With the policy's mode at `off` the input is returned untouched and
    /// unguarded.
    ///
    /// # Errors
    ///
    /// Under `throw`, the first failure aborts construction.
    pub fn apply(&self, input: Map<String, Value>) -> Result<Instance, ModelError> {
        if self.policy.is_off() {
            return Ok(Instance::Raw(Value::Object(input)));
        }
        let guarded = GuardedObject::build(
            Arc::clone(&self.schema),
            self.label.clone(),
            input,
            &self.policy,
        )?;
        Ok(Instance::Guarded(guarded))
    }

    /// [`Model::apply`] for an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// `NotAnObject` when `input` is not an object (unless the mode is
    /// `off`), otherwise as [`Model::apply`].
    pub fn apply_value(&self, input: Value) -> Result<Instance, ModelError> {
        match input {
            Value::Object(map) => self.apply(map),
            other if self.policy.is_off() => Ok(Instance::Raw(other)),
            other => Err(self.not_an_object(&other)),
        }
    }

    /// Check `input` against the schema without injecting defaults or
    /// installing guards. Failures are routed through the policy.
    ///
    /// # Errors
    ///
    /// Under `throw`, the first failure; `NotAnObject` for non-object input.
    pub fn validate(&self, input: &Value) -> Result<(), ModelError> {
        if self.policy.is_off() {
            return Ok(());
        }
        let object = input.as_object().ok_or_else(|| self.not_an_object(input))?;
        engine::validate_tree(&self.schema, &self.label, Some(object), &self.policy)?;
        Ok(())
    }

    fn not_an_object(&self, input: &Value) -> ModelError {
        let path = if self.label.is_empty() {
            "(root)".to_string()
        } else {
            self.label.clone()
        };
        ModelError::NotAnObject {
            path,
            received: runtime_type(Some(input)),
        }
    }
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

/// What a model hands back: a guarded object, or the raw input when the
/// severity mode was `off` at construction time.
#[derive(Debug, Clone)]
pub enum Instance {
    Raw(Value),
    Guarded(GuardedObject),
}

impl Instance {
    #[must_use]
    pub const fn is_guarded(&self) -> bool {
        matches!(self, Self::Guarded(_))
    }

    #[must_use]
    pub const fn as_guarded(&self) -> Option<&GuardedObject> {
        match self {
            Self::Guarded(guarded) => Some(guarded),
            Self::Raw(_) => None,
        }
    }

    pub fn as_guarded_mut(&mut self) -> Option<&mut GuardedObject> {
        match self {
            Self::Guarded(guarded) => Some(guarded),
            Self::Raw(_) => None,
        }
    }

    #[must_use]
    pub fn into_guarded(self) -> Option<GuardedObject> {
        match self {
            Self::Guarded(guarded) => Some(guarded),
            Self::Raw(_) => None,
        }
    }

    /// Deep copy of the value stored under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Value> {
        match self {
            Self::Raw(raw) => raw.get(key).cloned(),
            Self::Guarded(guarded) => guarded.value(key),
        }
    }

    /// Write `value` under `key`: validated when guarded, plain otherwise.
    ///
    /// # Errors
    ///
    /// Validation failures under `throw`; `NotAnObject` when a raw instance
    /// is not an object.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Result<(), ModelError> {
        match self {
            Self::Guarded(guarded) => guarded.set(key, value),
            Self::Raw(Value::Object(map)) => {
                map.insert(key.into(), value);
                Ok(())
            }
            Self::Raw(other) => Err(ModelError::NotAnObject {
                path: "(root)".to_string(),
                received: runtime_type(Some(other)),
            }),
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Raw(raw) => raw.clone(),
            Self::Guarded(guarded) => guarded.to_value(),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Raw(raw) => raw,
            Self::Guarded(guarded) => guarded.into_value(),
        }
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Raw(raw) => raw.serialize(serializer),
            Self::Guarded(guarded) => guarded.serialize(serializer),
        }
    }
}
