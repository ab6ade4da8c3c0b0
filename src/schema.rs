//! Schema definitions and validation for stored grocery items.
//!
//! A [`Schema`] shapes a document before it reaches the store. On insert it
//! enforces required attributes and types and fills defaults. On update it keeps
//! only the attributes that may change. Attributes the schema does not define are
//! dropped rather than rejected.

use crate::error::{ValidationError, ValidationResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the grocery item schema.
pub const GROCERY_ITEM: &str = "GroceryItem";

/// Data types an attribute may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    String,
    Boolean,
    DateTime,
}

impl AttributeType {
    fn name(self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Boolean => "boolean",
            AttributeType::DateTime => "dateTime",
        }
    }
}

/// Whether an attribute may change after insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    ReadWrite,
    Immutable,
}

/// Value filled in on insert when the attribute is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultValue {
    Boolean(bool),
    /// The time of insertion.
    Now,
}

impl DefaultValue {
    fn resolve(&self) -> Value {
        match self {
            DefaultValue::Boolean(flag) => Value::Bool(*flag),
            DefaultValue::Now => {
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

/// Definition of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub name: String,
    pub data_type: AttributeType,
    pub required: bool,
    pub mutability: Mutability,
    pub default: Option<DefaultValue>,
}

/// A named set of attribute definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub attributes: Vec<AttributeDefinition>,
}

impl Schema {
    /// The grocery item schema.
    ///
    /// `itemName` is required text, `isPurchased` defaults to `false` and is the
    /// only attribute an update may touch, `createdOn` defaults to the insertion
    /// time.
    pub fn grocery_item() -> Self {
        Self {
            name: GROCERY_ITEM.to_string(),
            attributes: vec![
                AttributeDefinition {
                    name: "itemName".to_string(),
                    data_type: AttributeType::String,
                    required: true,
                    mutability: Mutability::Immutable,
                    default: None,
                },
                AttributeDefinition {
                    name: "isPurchased".to_string(),
                    data_type: AttributeType::Boolean,
                    required: false,
                    mutability: Mutability::ReadWrite,
                    default: Some(DefaultValue::Boolean(false)),
                },
                AttributeDefinition {
                    name: "createdOn".to_string(),
                    data_type: AttributeType::DateTime,
                    required: false,
                    mutability: Mutability::Immutable,
                    default: Some(DefaultValue::Now),
                },
            ],
        }
    }

    /// Look up an attribute definition by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Validate a new document and fill its defaults.
    ///
    /// `null` counts as absent.
    pub fn prepare_insert(&self, document: &Value) -> ValidationResult<Map<String, Value>> {
        let obj = document
            .as_object()
            .ok_or_else(|| ValidationError::custom(format!("{} must be a JSON object", self.name)))?;

        let mut shaped = Map::new();
        for attr in &self.attributes {
            match obj.get(&attr.name).filter(|value| !value.is_null()) {
                Some(value) => {
                    Self::check_value(attr, value)?;
                    shaped.insert(attr.name.clone(), value.clone());
                }
                None if attr.required => return Err(ValidationError::missing(&attr.name)),
                None => {
                    if let Some(default) = &attr.default {
                        shaped.insert(attr.name.clone(), default.resolve());
                    }
                }
            }
        }

        Ok(shaped)
    }

    /// Validate a partial update.
    ///
    /// No defaults apply. Only read-write attributes that are present and not
    /// `null` survive; everything else is dropped.
    pub fn prepare_update(&self, changes: &Map<String, Value>) -> ValidationResult<Map<String, Value>> {
        let mut shaped = Map::new();

        for (name, value) in changes {
            let Some(attr) = self.attribute(name) else {
                continue;
            };
            if attr.mutability != Mutability::ReadWrite || value.is_null() {
                continue;
            }

            Self::check_value(attr, value)?;
            shaped.insert(name.clone(), value.clone());
        }

        Ok(shaped)
    }

    fn check_value(attr: &AttributeDefinition, value: &Value) -> ValidationResult<()> {
        let type_error =
            || ValidationError::invalid_type(&attr.name, attr.data_type.name(), json_type_name(value));

        match attr.data_type {
            AttributeType::Boolean => {
                value.as_bool().ok_or_else(type_error)?;
            }
            AttributeType::String => {
                let text = value.as_str().ok_or_else(type_error)?;
                if attr.required && text.is_empty() {
                    return Err(ValidationError::EmptyAttribute {
                        attribute: attr.name.clone(),
                    });
                }
            }
            AttributeType::DateTime => {
                let text = value.as_str().ok_or_else(type_error)?;
                DateTime::parse_from_rfc3339(text).map_err(|_| ValidationError::InvalidDateTime {
                    attribute: attr.name.clone(),
                    value: text.to_string(),
                })?;
            }
        }

        Ok(())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::grocery_item()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
