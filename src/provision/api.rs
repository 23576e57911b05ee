use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::fields::{FieldSpec, RecordType};

/// Live custom field as stored by NetBox
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRecord {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub group: String,
    pub value_kind: String,
    pub description: String,
    pub choices: Vec<String>,
    pub default: Option<String>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    /// Resolved content types the field is attached to, e.g. `dcim.cable`
    pub object_types: Vec<String>,
}

impl FieldRecord {
    /// Build an unbound record carrying every attribute of `spec`
    pub fn from_spec(id: i64, spec: &FieldSpec) -> Self {
        let mut record = Self {
            id,
            name: spec.name.to_string(),
            label: String::new(),
            group: String::new(),
            value_kind: String::new(),
            description: String::new(),
            choices: Vec::new(),
            default: None,
            min: None,
            max: None,
            object_types: Vec::new(),
        };
        record.apply(spec);
        record
    }

    /// Overwrite every mutable attribute from `spec`. Name, id and binding are left alone.
    pub fn apply(&mut self, spec: &FieldSpec) {
        self.label = spec.label.to_string();
        self.group = spec.group.to_string();
        self.value_kind = spec.value_kind.as_str().to_string();
        self.description = spec.description.to_string();
        self.choices = spec.choices.iter().map(|c| c.to_string()).collect();
        self.default = spec.default.map(str::to_string);
        self.min = spec.min;
        self.max = spec.max;
    }
}

/// The slice of NetBox's extras API the provisioner needs
#[async_trait]
pub trait SchemaApi: Send + Sync {
    async fn lookup_field(&self, name: &str) -> Result<Option<FieldRecord>>;

    async fn lookup_fields(&self, group: &str) -> Result<Vec<FieldRecord>>;

    /// Create the field. The returned record is not yet bound.
    async fn define_field(&self, spec: &FieldSpec) -> Result<FieldRecord>;

    /// Replace the set of content types the field is attached to
    async fn bind(&self, record: &mut FieldRecord, object_types: &[String]) -> Result<()>;

    async fn save(&self, record: &FieldRecord) -> Result<()>;

    async fn delete(&self, record: &FieldRecord) -> Result<()>;

    /// Map a record type to the host's content type identifier
    async fn resolve_record_type(&self, record_type: RecordType) -> Result<String>;

    fn is_dry_run(&self) -> bool {
        false
    }
}
