use anyhow::{Context, Result};
use jsonschema::{Validator, validator_for};
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Category, Color, Condition, PackageSize, Platform};
use crate::form::{Draft, DraftField, FieldCoercionError};

fn default_true() -> bool {
    true
}

/// Body of a listing creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingPayload {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub condition: Condition,
    pub city: String,
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default = "default_true")]
    pub shipping_available: bool,
    #[serde(default)]
    pub package_size: Option<PackageSize>,
    #[serde(default)]
    pub shipping_cost: Option<f64>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

impl CreateListingPayload {
    /// Builds a creation request from a wizard draft: strings trimmed, province
    /// uppercased, blank optional strings left out.
    pub fn from_draft(draft: &Draft) -> Result<Self, FieldCoercionError> {
        let price = draft
            .price
            .ok_or_else(|| FieldCoercionError::new(DraftField::Price.name(), "Enter a valid price"))?;
        let category = draft.category.ok_or_else(|| {
            FieldCoercionError::new(DraftField::Category.name(), "Select a category")
        })?;
        let condition = draft.condition.ok_or_else(|| {
            FieldCoercionError::new(DraftField::Condition.name(), "Select the condition")
        })?;

        Ok(Self {
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            price,
            category,
            condition,
            city: draft.city.trim().to_string(),
            province: draft.province.trim().to_uppercase(),
            brand: non_blank(&draft.brand),
            size: non_blank(&draft.size),
            colors: draft.colors.clone(),
            material: non_blank(&draft.material),
            shipping_available: draft.shipping_available,
            package_size: draft.package_size,
            shipping_cost: draft.shipping_cost,
            platforms: draft.platforms.clone(),
        })
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Partial update: only the keys present are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateListingPayload {
    fields: Map<String, Value>,
}

impl UpdateListingPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update built from selected draft fields, normalized the same way as a
    /// creation request. Blank optional strings become `null`.
    pub fn from_draft_fields(draft: &Draft, fields: impl IntoIterator<Item = DraftField>) -> Self {
        let mut payload = Self::new();
        for field in fields {
            if matches!(field, DraftField::Photos | DraftField::Platforms) {
                continue;
            }
            let value = match field {
                DraftField::Province => Value::String(draft.province.trim().to_uppercase()),
                DraftField::Brand => optional_text(&draft.brand),
                DraftField::Size => optional_text(&draft.size),
                DraftField::Material => optional_text(&draft.material),
                _ => match draft.value_of(field) {
                    Value::String(text) => Value::String(text.trim().to_string()),
                    other => other,
                },
            };
            payload.set(field, value);
        }
        payload
    }

    pub fn set(&mut self, field: DraftField, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }

    /// Inserts an arbitrary key, including ones the service will refuse.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

fn optional_text(text: &str) -> Value {
    non_blank(text).map_or(Value::Null, Value::String)
}

/// A schema violation in a raw creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadIssue {
    pub pointer: String,
    pub message: String,
}

impl std::fmt::Display for PayloadIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pointer = if self.pointer.is_empty() {
            "<root>"
        } else {
            &self.pointer
        };
        write!(f, "{pointer}: {}", self.message)
    }
}

/// Checks untrusted JSON against the schema derived from
/// [`CreateListingPayload`] before it is deserialized.
pub struct PayloadValidator {
    validator: Validator,
}

impl PayloadValidator {
    pub fn new() -> Result<Self> {
        let schema = Self::schema()?;
        let validator = validator_for(&schema).context("failed to compile JSON schema")?;
        Ok(Self { validator })
    }

    pub fn schema() -> Result<Value> {
        serde_json::to_value(schema_for!(CreateListingPayload))
            .context("failed to render the payload schema")
    }

    pub fn validate(&self, value: &Value) -> Result<CreateListingPayload, Vec<PayloadIssue>> {
        let issues: Vec<PayloadIssue> = self
            .validator
            .iter_errors(value)
            .map(|error| PayloadIssue {
                pointer: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect();
        if !issues.is_empty() {
            return Err(issues);
        }
        serde_json::from_value(value.clone()).map_err(|err| {
            vec![PayloadIssue {
                pointer: String::new(),
                message: err.to_string(),
            }]
        })
    }
}
