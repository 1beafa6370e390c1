//! Validation and guard error types.

use thiserror::Error;

use crate::checks::TypeTag;

/// A single field-level validation failure.
///
/// The rendered message is always prefixed by the dotted/bracketed path of
/// the offending field, e.g. `.profile.password is a required property`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent.
    #[error("{path} is a required property")]
    RequiredPropertyMissing { path: String },

    /// A present value did not satisfy the declared type tag.
    #[error("{path} must be of type: {expected}, received: {received}")]
    TypeMismatch {
        path: String,
        expected: TypeTag,
        received: &'static str,
    },

    /// The custom validator returned `false`.
    #[error("{path} failed validation")]
    CustomValidationFailed { path: String },
}

impl ValidationError {
    /// Path of the field that failed.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::RequiredPropertyMissing { path }
            | Self::TypeMismatch { path, .. }
            | Self::CustomValidationFailed { path } => path,
        }
    }

    /// Short machine-readable code, used as a structured logging field.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RequiredPropertyMissing { .. } => "required",
            Self::TypeMismatch { .. } => "type",
            Self::CustomValidationFailed { .. } => "validation",
        }
    }
}

/// Errors from building models and writing through guarded views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A field failed validation while the policy was in `throw` mode.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The root value handed to a model was not a JSON object.
    #[error("{path} must be an object, received: {received}")]
    NotAnObject { path: String, received: &'static str },

    /// A guarded array write skipped past the end of the sequence.
    #[error("{path}[{index}] is out of bounds for length {len}")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },
}

impl ModelError {
    /// The underlying validation failure, if this error is one.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }
}
