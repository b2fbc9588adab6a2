use fieldguard_core::{FieldConfig, Rules, Schema, SchemaDocument, StorageKind};
use serde_json::json;

#[test]
fn serializes_document_deterministically() {
    let document = SchemaDocument {
        key: "contacts".to_string(),
        title: None,
        description: None,
        fields: Schema::new()
            .with_field(
                "name",
                FieldConfig::new(StorageKind::String).with_rules(Rules {
                    max_length: Some(30),
                    ..Rules::default()
                }),
            )
            .with_field("age", FieldConfig::new(StorageKind::Number).optional()),
    };

    let json = serde_json::to_string_pretty(&document).expect("serialize document");
    let expected = r#"{
  "key": "contacts",
  "fields": {
    "age": {
      "storage": "number",
      "optional": true,
      "is_array": false,
      "rules": {},
      "presentation": {
        "hidden": false,
        "disabled": false
      }
    },
    "name": {
      "storage": "string",
      "optional": false,
      "is_array": false,
      "rules": {
        "max_length": 30
      },
      "presentation": {
        "hidden": false,
        "disabled": false
      }
    }
  }
}"#;

    assert_eq!(json, expected);
}

#[test]
fn round_trips_authored_document() {
    let authored = json!({
        "key": "orders",
        "fields": {
            "email": {
                "storage": "string",
                "optional": true,
                "rules": { "is_email": { "forbidden_tlds": ["zz"] } },
                "presentation": { "label": "Email", "out_key": "emailAddress" }
            },
            "lines": {
                "storage": "object",
                "is_array": true,
                "nested_schema": {
                    "sku": { "storage": "string" },
                    "qty": { "storage": "number", "rules": { "min": 1 } }
                }
            }
        }
    });

    let document: SchemaDocument = serde_json::from_value(authored).expect("parse document");
    let encoded = serde_json::to_value(&document).expect("encode document");
    let decoded: SchemaDocument = serde_json::from_value(encoded).expect("decode document");

    assert_eq!(document, decoded);
    let email = document.fields.get("email").expect("email field");
    assert_eq!(email.out_key(), Some("emailAddress"));
    assert_eq!(email.presentation.label.as_deref(), Some("Email"));
}
