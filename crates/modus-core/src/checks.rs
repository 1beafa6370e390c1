//! Primitive type tags and the fixed predicate table behind them.
//!
//! The table is closed: every descriptor's `type` and every array's element
//! type resolve to one of the six [`TypeTag`] variants. Predicates are total
//! and side-effect free; an absent value is modelled as `None`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// TypeTag
// ---------------------------------------------------------------------------

/// Primitive type tag a field (or array element) is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Number,
    Array,
    Boolean,
    Object,
    String,
    /// Any non-absent value, including `null`.
    Defined,
}

impl TypeTag {
    /// All tags, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Number,
        Self::Array,
        Self::Boolean,
        Self::Object,
        Self::String,
        Self::Defined,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::String => "string",
            Self::Defined => "defined",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TypeChecks
// ---------------------------------------------------------------------------

/// The type-check registry.
///
/// Handed to every custom validator so validators can reuse the same
/// predicates the engine applies, e.g. `|v, is| is.string(v) && ...`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeChecks;

impl TypeChecks {
    /// Run the predicate registered for `tag` against a possibly-absent value.
    #[must_use]
    pub fn check(self, tag: TypeTag, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match tag {
            TypeTag::Number => self.number(value),
            TypeTag::Array => self.array(value),
            TypeTag::Boolean => self.boolean(value),
            TypeTag::Object => self.object(value),
            TypeTag::String => self.string(value),
            TypeTag::Defined => true,
        }
    }

    /// Finite numeric value.
    #[must_use]
    pub fn number(self, value: &Value) -> bool {
        value.as_f64().is_some_and(f64::is_finite)
    }

    #[must_use]
    pub fn array(self, value: &Value) -> bool {
        value.is_array()
    }

    #[must_use]
    pub fn boolean(self, value: &Value) -> bool {
        value.is_boolean()
    }

    /// Plain key-value mapping. Arrays and `null` are not objects.
    #[must_use]
    pub fn object(self, value: &Value) -> bool {
        value.is_object()
    }

    #[must_use]
    pub fn string(self, value: &Value) -> bool {
        value.is_string()
    }

    #[must_use]
    pub const fn defined(self, value: Option<&Value>) -> bool {
        value.is_some()
    }
}

/// Name of a value's runtime type, as reported in type-mismatch messages.
#[must_use]
pub fn runtime_type(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
