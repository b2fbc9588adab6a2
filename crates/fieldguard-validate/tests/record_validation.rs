use std::fs;
use std::path::Path;

use fieldguard_core::{FieldConfig, Schema, SchemaDocument, StorageKind};
use fieldguard_validate::{
    ValidateOptions, check_document, load_document, validate, validate_collect,
    validate_with_options,
};
use serde_json::{Value, json};

fn load_json(name: &str) -> Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let contents =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

fn contact() -> SchemaDocument {
    load_document(&load_json("contact.schema.json")).expect("load contact schema")
}

fn record() -> Value {
    load_json("contact.record.json")
}

fn with(mut record: Value, key: &str, value: Value) -> Value {
    record[key] = value;
    record
}

fn without(mut record: Value, key: &str) -> Value {
    record.as_object_mut().expect("record object").remove(key);
    record
}

#[test]
fn fixture_schema_is_consistent() {
    check_document(&contact()).expect("contact schema should be consistent");
}

#[test]
fn valid_record_passes_in_both_modes() {
    let schema = contact().fields;
    validate(&record(), &schema).expect("record should validate");
    let outcome = validate_collect(&record(), &schema);
    assert!(outcome.is_ok(), "{outcome:?}");
}

#[test]
fn missing_required_key_is_flagged() {
    let schema = contact().fields;
    let error = validate(&without(record(), "phone"), &schema).unwrap_err();
    assert_eq!(error.path, "phone");
    assert_eq!(error.message, "Missing required key 'phone' in supplied object.");
    assert!(error.required_and_missing);
}

#[test]
fn blank_required_value_is_reported_once() {
    let schema = contact().fields;
    let outcome = validate_collect(&with(record(), "phone", json!("")), &schema);
    assert_eq!(
        outcome.messages("phone"),
        ["Missing required key 'phone' in supplied object."]
    );
    assert!(outcome.is_required_and_missing("phone"));
}

#[test]
fn invalid_value_is_not_required_and_missing() {
    let schema = contact().fields;
    let outcome = validate_collect(&with(record(), "phone", json!("5551234")), &schema);
    assert!(!outcome.is_ok());
    assert!(!outcome.is_required_and_missing("phone"));
}

#[test]
fn conditional_presence_uses_the_full_record() {
    let schema = contact().fields;
    let outcome = validate_collect(&with(record(), "last_name", json!("")), &schema);
    assert_eq!(
        outcome.messages("last_name"),
        ["Key last_name must have a value if all of the keys first_name are present, received ."]
    );

    let no_first_name = with(with(record(), "last_name", json!("")), "first_name", Value::Null);
    assert!(validate_collect(&no_first_name, &schema).is_ok());
}

#[test]
fn conditional_presence_applies_to_absent_fields() {
    let schema = contact().fields;
    let outcome = validate_collect(&without(record(), "last_name"), &schema);
    assert_eq!(
        outcome.messages("last_name"),
        ["Key last_name must have a value if all of the keys first_name are present, received undefined."]
    );

    let neither = without(without(record(), "last_name"), "first_name");
    assert!(validate_collect(&neither, &schema).is_ok());
}

#[test]
fn key_equals_forces_presence() {
    let schema = contact().fields;
    let building = with(with(record(), "is_building", json!(true)), "company", Value::Null);
    let outcome = validate_collect(&building, &schema);
    assert_eq!(
        outcome.messages("company"),
        ["company must have a value when is_building has a value of true"]
    );

    let staffed = with(building, "company", json!("Analytical Engines Ltd"));
    assert!(validate_collect(&staffed, &schema).is_ok());
}

#[test]
fn enum_membership_is_enforced() {
    let schema = contact().fields;
    let error = validate(&with(record(), "favorite_drink", json!("soda")), &schema).unwrap_err();
    assert_eq!(error.path, "favorite_drink");
    assert_eq!(
        error.message,
        "Key 'favorite_drink' expected a specific value from the specified enum. Instead received 'soda'."
    );
}

#[test]
fn remote_enum_is_not_enforced() {
    let schema = contact().fields;
    assert!(validate(&with(record(), "region", json!("atlantis")), &schema).is_ok());
}

#[test]
fn forbidden_email_domain_is_rejected() {
    let schema = contact().fields;
    let outcome = validate_collect(&with(record(), "email", json!("a@gail.com")), &schema);
    assert_eq!(
        outcome.messages("email"),
        ["Key 'email' was passed an email with a forbidden domain 'gail'."]
    );
    assert!(validate(&with(record(), "email", json!("a@mail.com")), &schema).is_ok());
}

#[test]
fn zero_is_a_valid_age() {
    let schema = contact().fields;
    assert!(validate(&with(record(), "age", json!(0)), &schema).is_ok());

    let outcome = validate_collect(&with(record(), "age", json!(121)), &schema);
    assert_eq!(
        outcome.messages("age"),
        ["Key 'age' has a maximum value of '120' but received '121'."]
    );
}

#[test]
fn type_mismatch_names_expected_and_received_kinds() {
    let schema = contact().fields;
    let error = validate(&with(record(), "age", json!("36")), &schema).unwrap_err();
    assert_eq!(
        error.message,
        "Key 'age' was specified as type number but received string."
    );
}

#[test]
fn nested_errors_carry_the_nested_path() {
    let schema = contact().fields;
    let address = json!({ "zip": "123" });
    let outcome = validate_collect(&with(record(), "address", address), &schema);

    assert!(outcome.is_required_and_missing("address.street"));
    assert_eq!(
        outcome.messages("address.zip"),
        ["Key 'address.zip' should have an exact length of 5, but received 3."]
    );
}

#[test]
fn three_levels_deep() {
    let schema = contact().fields;
    let address = json!({
        "street": "1 Main St",
        "zip": "10001",
        "billing": { "zip": "10001" }
    });
    let outcome = validate_collect(&with(record(), "address", address.clone()), &schema);
    assert_eq!(
        outcome.messages("address.billing.zip"),
        ["Key 'address.billing.zip' was specified as type number but received string."]
    );

    let error = validate(&with(record(), "address", address), &schema).unwrap_err();
    assert_eq!(error.path, "address.billing.zip");
}

#[test]
fn array_of_objects_validates_each_element() {
    let schema = contact().fields;
    let items = json!([{ "sku": "A-1" }, { "qty": 0 }]);
    let outcome = validate_collect(&with(record(), "items", items), &schema);

    assert!(outcome.is_required_and_missing("items.1.sku"));
    assert_eq!(
        outcome.messages("items.1.qty"),
        ["Key 'items.1.qty' has a minimum value of '1' but received '0'."]
    );
    assert!(outcome.field("items.0.sku").is_none());
}

#[test]
fn array_length_rules_count_items() {
    let schema = contact().fields;
    let tags = json!(["a", "b", "c", "d"]);
    let outcome = validate_collect(&with(record(), "tags", tags), &schema);
    assert_eq!(
        outcome.messages("tags"),
        ["Key 'tags' should not exceed a length of 3, but received 4."]
    );
}

#[test]
fn hidden_fields_are_skipped() {
    let schema = contact().fields;
    assert!(validate(&with(record(), "internal_id", json!(42)), &schema).is_ok());
}

#[test]
fn aggregation_reports_every_field() {
    let schema = contact().fields;
    let broken = with(
        with(without(record(), "phone"), "age", json!(-5)),
        "email",
        json!("not-an-email"),
    );
    let outcome = validate_collect(&broken, &schema);

    assert!(outcome.did_fail);
    assert_eq!(
        outcome.fields.keys().collect::<Vec<_>>(),
        ["age", "email", "phone"]
    );

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["didFail"], true);
    assert_eq!(json["fields"]["phone"]["requiredAndMissing"], true);
    assert_eq!(json["fields"]["age"]["requiredAndMissing"], false);
}

#[test]
fn aggregation_is_idempotent() {
    let schema = contact().fields;
    let broken = with(with(record(), "age", json!(500)), "favorite_drink", json!("tea"));
    assert_eq!(validate_collect(&broken, &schema), validate_collect(&broken, &schema));
}

#[test]
fn out_key_alias_satisfies_required_field() {
    let schema = Schema::new().with_field(
        "display_name",
        FieldConfig::new(StorageKind::String).with_out_key("displayName"),
    );
    assert!(validate(&json!({ "displayName": "Ada" }), &schema).is_ok());

    let error = validate(&json!({ "displayName": 7 }), &schema).unwrap_err();
    assert_eq!(error.path, "displayName");

    let error = validate(&json!({}), &schema).unwrap_err();
    assert_eq!(error.path, "display_name");
    assert!(error.required_and_missing);
}

#[test]
fn conditional_targets_resolve_against_explicit_full_record() {
    let schema = Schema::new().with_field(
        "zip",
        FieldConfig::new(StorageKind::String).optional().with_rules(
            fieldguard_core::Rules {
                ensure_present_if_any_present: vec!["address.street".to_string()],
                ..Default::default()
            },
        ),
    );
    let full = json!({ "address": { "street": "1 Main St" } });
    let options = ValidateOptions::collect().with_full_record(&full);

    let outcome = validate_with_options(&json!({ "zip": null }), &schema, &options).unwrap();
    assert_eq!(
        outcome.messages("zip"),
        ["Key zip must have a value if any of the keys address.street are present, received null."]
    );
}

fn account() -> Schema {
    let document = load_document(&load_json("account.schema.json")).expect("load account schema");
    check_document(&document).expect("account schema should be consistent");
    document.fields
}

fn filled(record: Value) -> Value {
    [
        "empty_all_present",
        "empty_any_present",
        "empty_any_empty",
        "empty_all_empty",
        "empty_none_empty",
    ]
    .into_iter()
    .fold(record, |record, key| with(record, key, json!("v")))
}

#[test]
fn ensure_empty_rules_when_every_target_is_present() {
    let outcome = validate_collect(&filled(json!({ "a": "x", "b": "y" })), &account());
    assert_eq!(
        outcome.messages("empty_all_present"),
        ["Key empty_all_present must be empty if all of the keys a, b are present, received v."]
    );
    assert_eq!(
        outcome.messages("empty_any_present"),
        ["Key empty_any_present must be empty if any of the keys a, b are present, received v."]
    );
    assert_eq!(
        outcome.messages("empty_none_empty"),
        ["Key empty_none_empty must be empty if none of the keys a, b are empty, received v."]
    );
    assert!(outcome.field("empty_any_empty").is_none());
    assert!(outcome.field("empty_all_empty").is_none());
}

#[test]
fn ensure_empty_rules_when_some_targets_are_empty() {
    let outcome = validate_collect(&filled(json!({ "a": "x", "b": "" })), &account());
    assert_eq!(
        outcome.fields.keys().collect::<Vec<_>>(),
        ["empty_any_empty", "empty_any_present"]
    );
    assert_eq!(
        outcome.messages("empty_any_empty"),
        ["Key empty_any_empty must be empty if any of the keys a, b are empty, received v."]
    );
}

#[test]
fn ensure_empty_rules_when_every_target_is_empty() {
    let outcome = validate_collect(&filled(json!({})), &account());
    assert_eq!(
        outcome.fields.keys().collect::<Vec<_>>(),
        ["empty_all_empty", "empty_any_empty"]
    );
    assert_eq!(
        outcome.messages("empty_all_empty"),
        ["Key empty_all_empty must be empty if all of the keys a, b are empty, received v."]
    );

    let cleared = json!({ "empty_all_empty": "", "empty_any_empty": null });
    assert!(validate_collect(&cleared, &account()).is_ok());
}

#[test]
fn key_equals_forces_emptiness() {
    let schema = account();
    let error = validate(&json!({ "locked": true, "note": "keep out" }), &schema).unwrap_err();
    assert_eq!(error.path, "note");
    assert_eq!(error.message, "note must not have a value when locked has a value of true");

    assert!(validate(&json!({ "locked": false, "note": "open" }), &schema).is_ok());
    assert!(validate(&json!({ "locked": true }), &schema).is_ok());
}

#[test]
fn array_target_with_scalar_key_value_is_a_configuration_error() {
    let outcome = validate_collect(&json!({ "roles": ["admin"] }), &account());
    assert_eq!(
        outcome.messages("admin_note"),
        ["Invalid key configuration for key admin_note in field 'rules.ensure_present_if_key_equals': 'roles' resolved to an array but the rule value is not an array."]
    );
    assert!(!outcome.is_required_and_missing("admin_note"));
}

#[test]
fn equals_and_not_equals() {
    let schema = account();
    let outcome = validate_collect(&json!({ "version": 3, "status": "deleted" }), &schema);
    assert_eq!(outcome.messages("version"), ["Key 'version' should equal '2'."]);
    assert_eq!(outcome.messages("status"), ["Key 'status' should not equal 'deleted'."]);

    assert!(validate(&json!({ "version": 2, "status": "active" }), &schema).is_ok());
}

#[test]
fn array_enum_names_only_the_disallowed_element() {
    let outcome = validate_collect(&json!({ "roles": ["staff", "z"] }), &account());
    assert_eq!(
        outcome.messages("roles"),
        ["Value 'z' specified in array for key 'roles' is not an allowed value according to the supplied enum."]
    );
    assert!(validate(&json!({ "roles": ["staff"] }), &account()).is_ok());
}

#[test]
fn temporal_kinds_are_carried_as_strings() {
    let schema = account();
    let record = json!({ "born": "1815-12-10", "seen_at": "1843-07-01T09:00:00Z", "opens": "09:00" });
    assert!(validate(&record, &schema).is_ok());

    let outcome = validate_collect(&json!({ "born": 1815, "seen_at": 0, "opens": false }), &schema);
    assert_eq!(
        outcome.messages("born"),
        ["Key 'born' was specified as type date but received number."]
    );
    assert_eq!(
        outcome.messages("seen_at"),
        ["Key 'seen_at' was specified as type datetime but received number."]
    );
    assert_eq!(
        outcome.messages("opens"),
        ["Key 'opens' was specified as type time but received boolean."]
    );
}

#[test]
fn explicit_null_for_optional_array_field_is_reported() {
    let outcome = validate_collect(&with(record(), "tags", Value::Null), &contact().fields);
    assert_eq!(
        outcome.messages("tags"),
        ["Key 'tags' was specified as an array field, but an array was not received."]
    );
    assert!(validate_collect(&without(record(), "tags"), &contact().fields).is_ok());
}

#[test]
fn non_ascii_digits_are_not_a_phone_number() {
    let schema = contact().fields;
    assert!(validate(&with(record(), "phone", json!("+\u{665}\u{665}\u{665}")), &schema).is_err());
    assert!(validate(&with(record(), "phone", json!("+\u{ff15}\u{ff15}\u{ff15}")), &schema).is_err());
}
