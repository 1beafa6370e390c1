//! The validation engine.
//!
//! Per field, checks run in a fixed order and the first failure wins:
//!
//! ```text
//! required  →  type  →  custom validator
//! ```
//!
//! Element checks on typed arrays, and recursion into nested schemas, run
//! independently of the field's own verdict. A field that failed its type
//! check still has its elements checked if it happens to be an array.
//!
//! [`field_failure`] and [`element_failures`] are pure. [`validate_field`]
//! and [`validate_tree`] route failures through a [`Policy`].

use serde_json::{Map, Value};

use crate::checks::{TypeChecks, runtime_type};
use crate::error::ValidationError;
use crate::field::FieldDescriptor;
use crate::schema::Schema;
use crate::severity::Policy;

/// `parent.key`
#[must_use]
pub fn child_path(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

/// `parent[index]`
#[must_use]
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// First failure of `value` against `descriptor`, if any.
///
/// An absent optional value passes without consulting the type check or the
/// custom validator.
#[must_use]
pub fn field_failure(
    descriptor: &FieldDescriptor,
    path: &str,
    value: Option<&Value>,
) -> Option<ValidationError> {
    let Some(present) = value else {
        return descriptor
            .is_required()
            .then(|| ValidationError::RequiredPropertyMissing {
                path: path.to_string(),
            });
    };

    if let Some(tag) = descriptor.type_tag() {
        if !TypeChecks.check(tag, value) {
            return Some(ValidationError::TypeMismatch {
                path: path.to_string(),
                expected: tag,
                received: runtime_type(value),
            });
        }
    }

    if let Some(validator) = descriptor.validator() {
        if !validator(present, &TypeChecks) {
            return Some(ValidationError::CustomValidationFailed {
                path: path.to_string(),
            });
        }
    }

    None
}

/// Failures of each element of an array value against the descriptor's
/// element type. Empty when there is no element type or no array.
#[must_use]
pub fn element_failures(
    descriptor: &FieldDescriptor,
    path: &str,
    value: Option<&Value>,
) -> Vec<ValidationError> {
    let (Some(tag), Some(items)) = (descriptor.element_type(), value.and_then(Value::as_array))
    else {
        return Vec::new();
    };
    let element = FieldDescriptor::element(tag);
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| field_failure(&element, &index_path(path, index), Some(item)))
        .collect()
}

/// Validate one field (and its elements) under `policy`.
///
/// # Errors
///
/// Returns the first failure when the policy is in `throw` mode.
pub fn validate_field(
    descriptor: &FieldDescriptor,
    path: &str,
    value: Option<&Value>,
    policy: &Policy,
) -> Result<(), ValidationError> {
    if policy.is_off() {
        return Ok(());
    }
    report_field(descriptor, path, value, &mut |failure: ValidationError| policy.report(failure))
}

/// Validate a whole object tree under `policy` without injecting defaults or
/// guarding anything.
///
/// # Errors
///
/// Returns the first failure when the policy is in `throw` mode.
pub fn validate_tree(
    schema: &Schema,
    path: &str,
    object: Option<&Map<String, Value>>,
    policy: &Policy,
) -> Result<(), ValidationError> {
    if policy.is_off() {
        return Ok(());
    }
    walk_tree(schema, path, object, &mut |failure: ValidationError| policy.report(failure))
}

/// Append every failure in the tree to `out`.
pub(crate) fn collect_tree(
    schema: &Schema,
    path: &str,
    object: Option<&Map<String, Value>>,
    out: &mut Vec<ValidationError>,
) {
    let collected = walk_tree(schema, path, object, &mut |failure: ValidationError| {
        out.push(failure);
        Ok(())
    });
    debug_assert!(collected.is_ok());
}

type Report<'a> = dyn FnMut(ValidationError) -> Result<(), ValidationError> + 'a;

fn report_field(
    descriptor: &FieldDescriptor,
    path: &str,
    value: Option<&Value>,
    report: &mut Report<'_>,
) -> Result<(), ValidationError> {
    if let Some(failure) = field_failure(descriptor, path, value) {
        report(failure)?;
    }
    for failure in element_failures(descriptor, path, value) {
        report(failure)?;
    }
    Ok(())
}

fn walk_tree(
    schema: &Schema,
    path: &str,
    object: Option<&Map<String, Value>>,
    report: &mut Report<'_>,
) -> Result<(), ValidationError> {
    for (name, descriptor) in schema.iter() {
        let field_path = child_path(path, name);
        let value = object.and_then(|map| map.get(name));
        report_field(descriptor, &field_path, value, report)?;

        if let (Some(nested), Some(Value::Object(inner))) = (descriptor.schema(), value) {
            walk_tree(nested, &field_path, Some(inner), report)?;
        }
    }
    Ok(())
}
