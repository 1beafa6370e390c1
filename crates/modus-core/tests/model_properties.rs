//! End-to-end behaviour of models and guarded instances.
//!
//! Every model here pins its severity mode with `Policy::fixed`, so these
//! tests never observe the process-wide default.

use std::sync::Arc;

use modus_core::field::{array, boolean, number, object, string};
use modus_core::{
    GuardedObject, Instance, MemorySink, Model, ModelError, Policy, Schema, SeverityMode, TypeTag,
    ValidationError,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn throwing(schema: Schema) -> Model {
    Model::with_policy(schema, Policy::fixed(SeverityMode::Throw))
}

fn guarded(model: &Model, input: Value) -> GuardedObject {
    model
        .apply_value(input)
        .expect("input should validate")
        .into_guarded()
        .expect("instance should be guarded")
}

fn user_schema() -> Schema {
    Schema::new()
        .field("name", string())
        .field("age", number())
        .field("registered", boolean())
        .field("pets", array())
        .field("profile", object())
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn construction_rejects_wrong_types() {
    let user = throwing(user_schema());
    let err = user
        .apply_value(json!({
            "name": 10,
            "age": "not a num",
            "registered": true,
            "pets": [],
            "profile": {}
        }))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        ".name must be of type: string, received: number"
    );
}

#[test]
fn missing_required_field_fails_construction() {
    let model = throwing(Schema::new().field("id", number()));
    let err = model.apply_value(json!({})).unwrap_err();
    assert!(err.to_string().ends_with("is a required property"));
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::RequiredPropertyMissing { path: ".id".into() })
    );

    assert!(model.apply_value(json!({ "id": 1 })).is_ok());
}

#[test]
fn null_counts_as_defined() {
    let model = throwing(Schema::new().field("anything", modus_core::field::defined()));
    assert!(model.apply_value(json!({ "anything": null })).is_ok());
    assert!(model.apply_value(json!({})).is_err());
}

#[test]
fn optional_fields_may_be_absent_but_are_still_typed() {
    let model = throwing(
        Schema::new()
            .field("name", string().optional())
            .field("id", number()),
    );
    let mut instance = guarded(&model, json!({ "id": 1 }));
    assert!(!instance.contains_key("name"));

    let err = instance.set("name", json!(10)).unwrap_err();
    assert_eq!(
        err.to_string(),
        ".name must be of type: string, received: number"
    );
    instance.set("name", json!("kevin")).unwrap();
}

#[test]
fn custom_validator_runs_after_type_check() {
    let model = throwing(
        Schema::new().field(
            "password",
            string().validate(|v, _| v.as_str().is_some_and(|s| s.len() > 5)),
        ),
    );
    let err = model.apply_value(json!({ "password": "short" })).unwrap_err();
    assert_eq!(err.to_string(), ".password failed validation");

    let err = model.apply_value(json!({ "password": 123_456 })).unwrap_err();
    assert_eq!(
        err.to_string(),
        ".password must be of type: string, received: number"
    );

    let mut instance = guarded(&model, json!({ "password": "hunter22" }));
    assert!(instance.set("password", json!("abc")).is_err());
    assert_eq!(instance.value("password"), Some(json!("hunter22")));
}

// ---------------------------------------------------------------------------
// Guarded writes
// ---------------------------------------------------------------------------

#[test]
fn guarded_writes_enforce_declared_types() {
    let user = throwing(user_schema());
    let mut instance = guarded(
        &user,
        json!({
            "name": "kevin",
            "age": 20,
            "registered": true,
            "pets": ["maggie"],
            "profile": {}
        }),
    );

    assert!(instance.set("name", json!(20)).is_err());
    assert_eq!(instance.value("name"), Some(json!("kevin")));

    assert!(instance.set("age", json!("not a num")).is_err());
    assert!(instance.set("registered", json!("not a bool")).is_err());
    assert!(instance.set("pets", json!({})).is_err());
    assert!(instance.set("profile", json!([])).is_err());

    instance.set("age", json!(21.5)).unwrap();
    assert_eq!(instance.value("age"), Some(json!(21.5)));
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn defaults_fill_absent_fields_only() {
    let model = throwing(Schema::new().field("age", number().with_default(json!(10))));
    assert_eq!(guarded(&model, json!({})).to_value(), json!({ "age": 10 }));
    assert_eq!(
        guarded(&model, json!({ "age": 5 })).to_value(),
        json!({ "age": 5 })
    );
}

#[test]
fn falsy_defaults_are_still_injected() {
    let model = throwing(
        Schema::new()
            .field("count", number().with_default(json!(0)))
            .field("active", boolean().with_default(json!(false))),
    );
    assert_eq!(
        guarded(&model, json!({})).to_value(),
        json!({ "count": 0, "active": false })
    );
}

#[test]
fn defaults_are_validated_like_input() {
    let model = throwing(Schema::new().field("age", number().with_default(json!("ten"))));
    let err = model.apply_value(json!({})).unwrap_err();
    assert_eq!(
        err.to_string(),
        ".age must be of type: number, received: string"
    );
}

#[test]
fn nested_defaults_are_injected_per_subtree() {
    let model = throwing(
        Schema::new().field(
            "profile",
            Schema::new()
                .field("password", string())
                .field("posts", number().with_default(json!(234))),
        ),
    );
    let instance = guarded(&model, json!({ "profile": { "password": "niceaa" } }));
    assert_eq!(
        instance.to_value(),
        json!({ "profile": { "password": "niceaa", "posts": 234 } })
    );
}

// ---------------------------------------------------------------------------
// Nesting
// ---------------------------------------------------------------------------

fn nested_user() -> Model {
    let profile = throwing(
        Schema::new()
            .field("password", string())
            .field("posts", number().optional()),
    );
    throwing(
        Schema::new()
            .field("name", string().optional())
            .field("profile", &profile),
    )
}

#[test]
fn nested_models_validate_and_guard() {
    let user = nested_user();
    let mut instance = guarded(
        &user,
        json!({
            "name": "kevin",
            "profile": { "password": "this is required", "posts": 10 }
        }),
    );
    assert_eq!(
        instance.to_value(),
        json!({
            "name": "kevin",
            "profile": { "password": "this is required", "posts": 10 }
        })
    );

    let profile = instance.object_mut("profile").expect("profile is guarded");
    let err = profile.set("password", json!(10)).unwrap_err();
    assert_eq!(
        err.to_string(),
        ".profile.password must be of type: string, received: number"
    );

    profile.set("password", json!("hunter2")).unwrap();
    assert_eq!(profile.value("password"), Some(json!("hunter2")));

    let err = user
        .apply_value(json!({
            "name": "kevin",
            "profile": { "password": 10, "posts": "asdfasdf" }
        }))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        ".profile.password must be of type: string, received: number"
    );

    assert!(
        user.apply_value(json!({ "profile": { "password": "passwd" } }))
            .is_ok()
    );
}

#[test]
fn replacement_subtrees_are_rewrapped() {
    let inner = throwing(Schema::new().field("c", number()));
    let outer = throwing(Schema::new().field("b", &inner));
    let mut instance = guarded(&outer, json!({ "b": { "c": 1 } }));

    let err = instance
        .object_mut("b")
        .unwrap()
        .set("c", json!("x"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        ".b.c must be of type: number, received: string"
    );

    instance.set("b", json!({ "c": 5 })).unwrap();
    let b = instance.object_mut("b").expect("replacement is guarded");
    assert!(b.set("c", json!("y")).is_err());
    assert_eq!(instance.to_value(), json!({ "b": { "c": 5 } }));
}

#[test]
fn invalid_replacement_subtree_is_not_committed() {
    let outer = throwing(Schema::new().field("b", Schema::new().field("c", number())));
    let mut instance = guarded(&outer, json!({ "b": { "c": 1 } }));

    let err = instance.set("b", json!({ "c": "nope" })).unwrap_err();
    assert_eq!(
        err.to_string(),
        ".b.c must be of type: number, received: string"
    );
    assert!(instance.set("b", json!(3)).is_err());
    assert_eq!(instance.to_value(), json!({ "b": { "c": 1 } }));
}

#[test]
fn auto_promoted_schema_requires_an_object() {
    let model = throwing(Schema::new().field("meta", Schema::new().field("v", number())));
    let err = model.apply_value(json!({ "meta": "flat" })).unwrap_err();
    assert_eq!(
        err.to_string(),
        ".meta must be of type: object, received: string"
    );
    let err = model.apply_value(json!({})).unwrap_err();
    assert_eq!(err.to_string(), ".meta is a required property");
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[test]
fn typed_arrays_check_elements() {
    let model = throwing(Schema::new().field("nums", array().with_element_type(TypeTag::Number)));
    let mut instance = guarded(&model, json!({ "nums": [1, 2, 3] }));

    let nums = instance.array_mut("nums").expect("typed array is guarded");
    let err = nums.push(json!("four")).unwrap_err();
    assert_eq!(
        err.to_string(),
        ".nums[3] must be of type: number, received: string"
    );
    let err = nums.set(1, json!(null)).unwrap_err();
    assert_eq!(
        err.to_string(),
        ".nums[1] must be of type: number, received: null"
    );
    nums.push(json!(4)).unwrap();
    assert_eq!(instance.value("nums"), Some(json!([1, 2, 3, 4])));

    let err = model.apply_value(json!({ "nums": [1, "x"] })).unwrap_err();
    assert_eq!(
        err.to_string(),
        ".nums[1] must be of type: number, received: string"
    );
}

#[test]
fn replacing_a_typed_array_rechecks_elements() {
    let model = throwing(Schema::new().field("tags", array().with_element_type(TypeTag::String)));
    let mut instance = guarded(&model, json!({ "tags": [] }));

    assert!(instance.set("tags", json!(["a", 1])).is_err());
    instance.set("tags", json!(["a", "b"])).unwrap();
    let tags = instance.array_mut("tags").expect("replacement is guarded");
    assert_eq!(tags.len(), 2);
    assert!(tags.push(json!(false)).is_err());
}

// ---------------------------------------------------------------------------
// Severity modes
// ---------------------------------------------------------------------------

#[test]
fn warn_reports_once_per_failing_field_and_stores_value() {
    let sink = Arc::new(MemorySink::new());
    let model = Model::with_policy(
        Schema::new()
            .field("name", string())
            .field("age", number().validate(|_, _| false))
            .field("ok", boolean()),
        Policy::fixed(SeverityMode::Warn).with_sink(sink.clone()),
    );

    let mut instance = model
        .apply_value(json!({ "age": "old", "ok": true }))
        .expect("warn never aborts");
    assert_eq!(
        sink.messages(),
        [
            ".name is a required property",
            ".age must be of type: number, received: string",
        ]
    );
    assert_eq!(instance.value("age"), Some(json!("old")));

    instance.set("ok", json!("yes")).unwrap();
    assert_eq!(sink.len(), 3);
    assert_eq!(instance.value("ok"), Some(json!("yes")));
}

#[test]
fn off_skips_validation_and_guarding() {
    let sink = Arc::new(MemorySink::new());
    let model = Model::with_policy(
        Schema::new().field("age", number().with_default(json!(1))),
        Policy::fixed(SeverityMode::Off).with_sink(sink.clone()),
    );

    let mut instance = model.apply_value(json!({ "age": "old" })).unwrap();
    assert!(matches!(instance, Instance::Raw(_)));
    instance.set("age", json!([])).unwrap();
    instance.set("extra", json!(1)).unwrap();

    let untouched = model.apply_value(json!({})).unwrap();
    assert_eq!(untouched.to_value(), json!({}));
    assert_eq!(instance.to_value(), json!({ "age": [], "extra": 1 }));
    assert!(sink.is_empty());
}

#[test]
fn model_error_variants_are_distinguishable() {
    let model = throwing(Schema::new().field("id", number()));
    assert!(matches!(
        model.apply_value(json!(null)),
        Err(ModelError::NotAnObject { .. })
    ));
    assert!(matches!(
        model.apply_value(json!({})),
        Err(ModelError::Validation(_))
    ));
}
