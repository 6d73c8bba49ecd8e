// dqgate-core/src/domain/schema/definition.rs

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use jsonschema::{Draft, Validator};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use validator::Validate;

use crate::domain::error::DomainError;

/// A record as received from ingestion: field name -> dynamic value, insertion ordered.
pub type Record = serde_json::Map<String, Value>;

// =============================================================================
//  1. DATA CONTRACT (as written in the schema YAML files)
// =============================================================================

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SchemaFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub entities: Vec<EntitySchema>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct EntitySchema {
    #[validate(length(min = 1, message = "Entity name cannot be empty"))]
    pub entity: String,

    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether fields not declared below are tolerated.
    #[serde(default = "default_true")]
    pub additional_fields: bool,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FieldSpec {
    pub name: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub nullable: bool,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Properties of a nested object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,

    /// Element definition of an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldSpec>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    #[default]
    Any,
}

impl FieldType {
    /// JSON Schema `type` keyword; `Any` leaves the type open.
    pub fn json_type(&self) -> Option<&'static str> {
        match self {
            Self::String => Some("string"),
            Self::Integer => Some("integer"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Object => Some("object"),
            Self::Array => Some("array"),
            Self::Any => None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    Email,
    Date,
    DateTime,
    Uuid,
}

impl FieldFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Uuid => "uuid",
        }
    }
}

fn default_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

// =============================================================================
//  2. RUNTIME STRUCTS (compiled once, read-only afterwards)
// =============================================================================

const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

#[derive(Clone)]
pub struct CompiledSchema {
    pub entity: String,
    pub version: u32,
    /// The JSON Schema document the validator was built from.
    pub document: Value,
    pub validator: Arc<Validator>,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("entity", &self.entity)
            .field("version", &self.version)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl EntitySchema {
    pub fn try_compile(&self) -> Result<CompiledSchema, DomainError> {
        self.validate()
            .map_err(|e| DomainError::SchemaError(format!("{}: {}", self.entity, e)))?;

        let document = self.json_schema()?;
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .should_validate_formats(true)
            .build(&document)
            .map_err(|e| DomainError::SchemaError(format!("{}: invalid schema: {}", self.entity, e)))?;

        Ok(CompiledSchema {
            entity: self.entity.clone(),
            version: self.version,
            document,
            validator: Arc::new(validator),
        })
    }

    /// Draft 7 JSON Schema equivalent of this entity definition.
    pub fn json_schema(&self) -> Result<Value, DomainError> {
        let mut document = object_schema(&self.entity, &self.fields)?;
        document.insert("$schema".into(), json!(JSON_SCHEMA_DRAFT));
        document.insert("title".into(), json!(self.entity));
        document.insert("additionalProperties".into(), json!(self.additional_fields));
        Ok(Value::Object(document))
    }
}

fn object_schema(entity: &str, fields: &[FieldSpec]) -> Result<Map<String, Value>, DomainError> {
    let mut seen = HashSet::new();
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(DomainError::SchemaError(format!(
                "{}: field '{}' is declared twice",
                entity, field.name
            )));
        }
        if field.required {
            required.push(json!(field.name));
        }
        properties.insert(field.name.clone(), field.json_schema(entity)?);
    }

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    Ok(schema)
}

impl FieldSpec {
    fn json_schema(&self, entity: &str) -> Result<Value, DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::SchemaError(format!(
                "{}: field name cannot be empty",
                entity
            )));
        }
        if let (Some(min), Some(max)) = (self.minimum, self.maximum)
            && min > max
        {
            return Err(DomainError::SchemaError(format!(
                "{}.{}: minimum {} is greater than maximum {}",
                entity, self.name, min, max
            )));
        }

        let mut schema = if self.fields.is_empty() {
            Map::new()
        } else {
            object_schema(entity, &self.fields)?
        };
        // The declared type (and nullability) wins over the nested object default.
        schema.remove("type");

        match (self.field_type.json_type(), self.nullable) {
            (Some(t), true) => schema.insert("type".into(), json!([t, "null"])),
            (Some(t), false) => schema.insert("type".into(), json!(t)),
            (None, false) => schema.insert("not".into(), json!({"type": "null"})),
            (None, true) => None,
        };

        if let Some(values) = &self.allowed_values {
            let mut values = values.clone();
            if self.nullable && !values.contains(&Value::Null) {
                values.push(Value::Null);
            }
            schema.insert("enum".into(), Value::Array(values));
        }
        if let Some(pattern) = &self.pattern {
            schema.insert("pattern".into(), json!(pattern));
        }
        if let Some(format) = self.format {
            schema.insert("format".into(), json!(format.as_str()));
        }
        if let Some(min) = self.minimum {
            schema.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.maximum {
            schema.insert("maximum".into(), json!(max));
        }

        // Length bounds apply to strings and arrays alike.
        let length_keywords = match self.field_type {
            FieldType::String => &[("minLength", "maxLength")][..],
            FieldType::Array => &[("minItems", "maxItems")][..],
            _ => &[("minLength", "maxLength"), ("minItems", "maxItems")][..],
        };
        for (min_kw, max_kw) in length_keywords {
            if let Some(min) = self.min_length {
                schema.insert((*min_kw).into(), json!(min));
            }
            if let Some(max) = self.max_length {
                schema.insert((*max_kw).into(), json!(max));
            }
        }

        if let Some(items) = &self.items {
            schema.insert("items".into(), items.json_schema(entity)?);
        }

        Ok(Value::Object(schema))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: FieldType) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            field_type,
            ..Default::default()
        }
    }

    fn entity(fields: Vec<FieldSpec>) -> EntitySchema {
        EntitySchema {
            entity: "customer".into(),
            version: 1,
            description: None,
            additional_fields: true,
            fields,
        }
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let schema = entity(vec![FieldSpec {
            pattern: Some("([unclosed".into()),
            ..field("customer_id", FieldType::String)
        }]);
        let err = schema.try_compile().unwrap_err();
        assert!(matches!(err, DomainError::SchemaError(msg) if msg.starts_with("customer: invalid schema")));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let schema = entity(vec![field("a", FieldType::Any), field("a", FieldType::String)]);
        assert!(matches!(
            schema.try_compile(),
            Err(DomainError::SchemaError(msg)) if msg.contains("declared twice")
        ));
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let schema = entity(vec![FieldSpec {
            minimum: Some(10.0),
            maximum: Some(1.0),
            ..field("lifetime_value", FieldType::Number)
        }]);
        assert!(schema.try_compile().is_err());
    }

    #[test]
    fn test_empty_entity_name_is_rejected() {
        let mut schema = entity(vec![]);
        schema.entity = String::new();
        assert!(schema.try_compile().is_err());
    }

    #[test]
    fn test_nullable_fields_admit_null_in_type_and_enum() -> anyhow::Result<()> {
        let doc = entity(vec![
            FieldSpec {
                nullable: true,
                allowed_values: Some(vec![json!("M"), json!("F")]),
                ..field("gender", FieldType::String)
            },
            field("status", FieldType::Any),
        ])
        .json_schema()?;

        assert_eq!(doc["properties"]["gender"]["type"], json!(["string", "null"]));
        assert_eq!(doc["properties"]["gender"]["enum"], json!(["M", "F", null]));
        assert_eq!(doc["properties"]["status"]["not"], json!({"type": "null"}));
        assert_eq!(doc["additionalProperties"], json!(true));
        Ok(())
    }

    #[test]
    fn test_yaml_definition_compiles_to_json_schema() -> anyhow::Result<()> {
        let yaml = r#"
version: "1"
entities:
  - entity: product
    additional_fields: false
    fields:
      - name: product_id
        type: string
        required: true
        pattern: "^PROD-\\d{4}$"
      - name: price
        type: number
        minimum: 0
      - name: tags
        type: array
        max_length: 3
        items:
          name: tag
          type: string
      - name: dimensions
        type: object
        fields:
          - name: width
            type: number
            required: true
"#;
        let file: SchemaFile = serde_yaml::from_str(yaml)?;
        assert_eq!(file.entities.len(), 1);
        let compiled = file.entities[0].try_compile()?;
        let doc = &compiled.document;

        assert_eq!(compiled.version, 1);
        assert_eq!(doc["required"], json!(["product_id"]));
        assert_eq!(doc["additionalProperties"], json!(false));
        assert_eq!(doc["properties"]["product_id"]["pattern"], json!("^PROD-\\d{4}$"));
        assert_eq!(doc["properties"]["tags"]["maxItems"], json!(3));
        assert_eq!(doc["properties"]["tags"]["items"]["type"], json!("string"));
        assert_eq!(doc["properties"]["dimensions"]["type"], json!("object"));
        assert_eq!(doc["properties"]["dimensions"]["required"], json!(["width"]));
        Ok(())
    }
}
