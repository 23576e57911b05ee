use serde::{Deserialize, Serialize};

use crate::fields::ValueKind;
use crate::provision::FieldRecord;

// --- NetBox API types ---

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeChoice {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NbContentType {
    pub id: i64,
    pub app_label: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NbCustomField {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(rename = "type")]
    pub field_type: TypeChoice,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub default: serde_json::Value,
    #[serde(default)]
    pub validation_minimum: Option<i64>,
    #[serde(default)]
    pub validation_maximum: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NbStatus {
    #[serde(rename = "netbox-version", default)]
    pub netbox_version: Option<String>,
}

impl From<NbCustomField> for FieldRecord {
    fn from(cf: NbCustomField) -> Self {
        let default = match cf.default {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        };

        FieldRecord {
            id: cf.id,
            name: cf.name,
            label: cf.label,
            group: cf.group_name,
            value_kind: cf.field_type.value,
            description: cf.description,
            choices: cf.choices.unwrap_or_default(),
            default,
            min: cf.validation_minimum,
            max: cf.validation_maximum,
            object_types: cf.content_types,
        }
    }
}

// --- Write request types ---

/// Body for creating a custom field, or for a full PATCH when `content_types` is None
#[derive(Debug, Serialize)]
pub(crate) struct CustomFieldWrite {
    pub name: String,
    pub label: String,
    pub group_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_types: Option<Vec<String>>,
    pub choices: Vec<String>,
    pub default: serde_json::Value,
    pub validation_minimum: Option<i64>,
    pub validation_maximum: Option<i64>,
}

impl CustomFieldWrite {
    pub fn from_record(record: &FieldRecord, content_types: Option<Vec<String>>) -> Self {
        // NetBox rejects a minimum or maximum on anything but numeric fields
        let numeric = ValueKind::from_netbox(&record.value_kind) == Some(ValueKind::Integer);
        Self {
            name: record.name.clone(),
            label: record.label.clone(),
            group_name: record.group.clone(),
            field_type: record.value_kind.clone(),
            description: record.description.clone(),
            content_types,
            choices: record.choices.clone(),
            default: default_value(&record.value_kind, record.default.as_deref()),
            validation_minimum: record.min.filter(|_| numeric),
            validation_maximum: record.max.filter(|_| numeric),
        }
    }
}

/// Integer fields take a JSON number default, everything else a string
fn default_value(value_kind: &str, default: Option<&str>) -> serde_json::Value {
    match (ValueKind::from_netbox(value_kind), default) {
        (_, None) => serde_json::Value::Null,
        (Some(ValueKind::Integer), Some(d)) => match d.parse::<i64>() {
            Ok(n) => serde_json::json!(n),
            Err(_) => serde_json::json!(d),
        },
        (_, Some(d)) => serde_json::json!(d),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ContentTypesPatch {
    pub content_types: Vec<String>,
}
