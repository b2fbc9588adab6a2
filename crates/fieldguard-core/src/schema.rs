use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::Rules;
use crate::types::StorageKind;

/// A named, authored schema: the unit that is checked and synced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Stable identifier of the schema within a project.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field configurations describing the record shape.
    pub fields: Schema,
}

/// Mapping of field name to its configuration. Nestable through
/// [`FieldConfig::nested_schema`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Schema(pub BTreeMap<String, FieldConfig>);

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, field: FieldConfig) -> Self {
        self.0.insert(name.into(), field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldConfig> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldConfig)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields a record must supply: not optional and not hidden.
    pub fn required_fields(&self) -> impl Iterator<Item = (&String, &FieldConfig)> {
        self.0
            .iter()
            .filter(|(_, field)| !field.optional && !field.is_hidden())
    }

    /// Find the field whose `presentation.out_key` equals `data_key`.
    pub fn find_by_out_key(&self, data_key: &str) -> Option<(&String, &FieldConfig)> {
        self.0
            .iter()
            .find(|(_, field)| field.out_key() == Some(data_key))
    }
}

/// Configuration of a single field: storage, shape, rules, presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Storage kind; a schema is invalid without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageKind>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub is_array: bool,
    /// Shape of the value when `storage` is `object`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_schema: Option<Schema>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<EnumSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub presentation: Presentation,
}

impl FieldConfig {
    pub fn new(storage: StorageKind) -> Self {
        Self {
            storage: Some(storage),
            ..Self::default()
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn nested(mut self, schema: Schema) -> Self {
        self.nested_schema = Some(schema);
        self
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_enum(mut self, values: EnumSource) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.presentation.hidden = true;
        self
    }

    pub fn with_out_key(mut self, out_key: impl Into<String>) -> Self {
        self.presentation.out_key = Some(out_key.into());
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.presentation.hidden
    }

    pub fn out_key(&self) -> Option<&str> {
        self.presentation.out_key.as_deref()
    }

    /// Whether an enum with at least one entry, or a remote source, is set.
    pub fn has_enum(&self) -> bool {
        match &self.enum_values {
            None => false,
            Some(EnumSource::Values(values)) => !values.is_empty(),
            Some(EnumSource::Remote(_)) => true,
        }
    }
}

/// Allowed values for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EnumSource {
    /// Inline literals, optionally labelled.
    Values(Vec<EnumEntry>),
    /// Values fetched by a client at render time; not enforced by the validator.
    Remote(RemoteSource),
}

impl EnumSource {
    /// Flat list of allowed literals, or `None` for a remote source.
    pub fn literals(&self) -> Option<Vec<&Value>> {
        match self {
            EnumSource::Values(entries) => Some(entries.iter().map(EnumEntry::value).collect()),
            EnumSource::Remote(_) => None,
        }
    }
}

/// One enum entry: either `{ "value", "label" }` or a bare literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EnumEntry {
    Labeled { value: Value, label: String },
    Literal(Value),
}

impl EnumEntry {
    pub fn value(&self) -> &Value {
        match self {
            EnumEntry::Labeled { value, .. } => value,
            EnumEntry::Literal(value) => value,
        }
    }
}

/// HTTP source of enum options for dynamic dropdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RemoteSource {
    pub uri: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Path to the option list inside the response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Presentation hints. Only `hidden` and `out_key` affect validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Presentation {
    /// Excludes the field from validation entirely (server-populated fields).
    #[serde(default)]
    pub hidden: bool,
    /// Alternate key under which the value may appear in a record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TablePresentation>,
}

/// Column settings when the field is rendered in a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TablePresentation {
    #[serde(default)]
    pub hidden: bool,
    /// Column width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_width: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_field_configuration() {
        let schema: Schema = serde_json::from_value(json!({
            "address": {
                "storage": "object",
                "nested_schema": {
                    "zip": { "storage": "number" }
                }
            },
            "drink": {
                "storage": "string",
                "enum": [{"value": "beer", "label": "Beer"}, {"value": "wine", "label": "Wine"}]
            }
        }))
        .unwrap();

        let address = schema.get("address").unwrap();
        assert_eq!(address.storage, Some(StorageKind::Object));
        let nested = address.nested_schema.as_ref().unwrap();
        assert_eq!(nested.get("zip").unwrap().storage, Some(StorageKind::Number));

        let drink = schema.get("drink").unwrap();
        let literals = drink.enum_values.as_ref().unwrap().literals().unwrap();
        assert_eq!(literals, vec![&json!("beer"), &json!("wine")]);
    }

    #[test]
    fn remote_enum_source_has_no_literals() {
        let source: EnumSource = serde_json::from_value(json!({
            "uri": "https://example.test/options",
            "data_path": "data.items"
        }))
        .unwrap();
        assert!(source.literals().is_none());
    }

    #[test]
    fn required_fields_skip_optional_and_hidden() {
        let schema = Schema::new()
            .with_field("id", FieldConfig::new(StorageKind::String).hidden())
            .with_field("name", FieldConfig::new(StorageKind::String))
            .with_field("nick", FieldConfig::new(StorageKind::String).optional());

        let required: Vec<&str> = schema
            .required_fields()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(required, vec!["name"]);
    }

    #[test]
    fn finds_field_by_out_key() {
        let schema = Schema::new().with_field(
            "first_name",
            FieldConfig::new(StorageKind::String).with_out_key("firstName"),
        );
        let (name, _) = schema.find_by_out_key("firstName").unwrap();
        assert_eq!(name, "first_name");
        assert!(schema.find_by_out_key("first_name").is_none());
    }
}
