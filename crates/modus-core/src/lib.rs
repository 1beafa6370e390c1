//! # modus-core
//!
//! Declarative object shapes, enforced at construction and on every write.
//!
//! This crate provides:
//! - `TypeChecks`: the fixed predicate table behind the six type tags
//! - `FieldDescriptor` and the `number()`/`string()`/... shorthands
//! - `Schema`: ordered field descriptors, with nested schemas promoted to object fields
//! - The validation engine: per-field checks, element checks, whole-tree walks
//! - `Policy`: severity mode (`off` / `throw` / `warn`) plus a diagnostic sink
//! - `Model`: validates input, injects defaults, and returns a `GuardedObject`
//!
//! ## Architecture
//!
//! Data trees are `serde_json::Value`. A guarded object owns its entries and
//! re-runs the field's checks on every `set`; nested schema-governed objects
//! and typed arrays are held as their own guards, so the guarantee holds at
//! any depth.
//!
//! ```
//! use modus_core::field::{number, string};
//! use modus_core::{Model, Policy, Schema, SeverityMode};
//! use serde_json::json;
//!
//! let user = Model::with_policy(
//!     Schema::new()
//!         .field("name", string())
//!         .field("profile", Schema::new().field("posts", number().with_default(json!(0)))),
//!     Policy::fixed(SeverityMode::Throw),
//! );
//!
//! let mut instance = user
//!     .apply_value(json!({ "name": "kevin", "profile": {} }))?
//!     .into_guarded()
//!     .expect("guarded");
//! assert_eq!(instance.to_value(), json!({ "name": "kevin", "profile": { "posts": 0 } }));
//!
//! let profile = instance.object_mut("profile").expect("nested guard");
//! assert!(profile.set("posts", json!("many")).is_err());
//! # Ok::<(), modus_core::ModelError>(())
//! ```

pub mod checks;
pub mod engine;
pub mod error;
pub mod field;
pub mod guard;
pub mod model;
pub mod schema;
pub mod severity;

pub use checks::{TypeChecks, TypeTag};
pub use error::{ModelError, ValidationError};
pub use field::{FieldDescriptor, FieldOptions, define_field};
pub use guard::{GuardedArray, GuardedObject, Node};
pub use model::{Instance, Model, define_model};
pub use schema::{FieldSpec, Schema};
pub use severity::{
    DiagnosticSink, MemorySink, Policy, SeverityMode, TracingSink, set_severity_mode,
    severity_mode,
};
