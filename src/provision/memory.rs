//! In-memory NetBox stand-in for provisioner tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use crate::fields::{FieldSpec, RecordType};

use super::api::{FieldRecord, SchemaApi};

#[derive(Default)]
struct State {
    next_id: i64,
    fields: Vec<FieldRecord>,
    writes: u32,
    resolves: u32,
    fail_define: Option<String>,
    fail_resolve: Option<RecordType>,
}

#[derive(Default)]
pub struct MemoryApi {
    state: Mutex<State>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `define_field` fail for the named field
    pub fn fail_define_of(&self, name: &str) {
        self.state.lock().unwrap().fail_define = Some(name.to_string());
    }

    /// Make `resolve_record_type` fail for one record type
    pub fn fail_resolve_of(&self, record_type: RecordType) {
        self.state.lock().unwrap().fail_resolve = Some(record_type);
    }

    /// Insert a field directly, bypassing the provisioner
    pub fn insert(&self, name: &str, group: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.fields.push(FieldRecord {
            id,
            name: name.to_string(),
            label: name.to_string(),
            group: group.to_string(),
            value_kind: "text".to_string(),
            description: String::new(),
            choices: Vec::new(),
            default: None,
            min: None,
            max: None,
            object_types: vec!["dcim.cable".to_string()],
        });
        id
    }

    pub fn get(&self, name: &str) -> Option<FieldRecord> {
        let state = self.state.lock().unwrap();
        state.fields.iter().find(|f| f.name == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().fields.len()
    }

    /// Number of mutating calls received
    pub fn writes(&self) -> u32 {
        self.state.lock().unwrap().writes
    }

    /// Number of record type resolutions received
    pub fn resolves(&self) -> u32 {
        self.state.lock().unwrap().resolves
    }

    fn replace(&self, record: &FieldRecord) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let slot = state
            .fields
            .iter_mut()
            .find(|f| f.id == record.id)
            .ok_or_else(|| anyhow!("custom field {} not found", record.id))?;
        *slot = record.clone();
        Ok(())
    }
}

#[async_trait]
impl SchemaApi for MemoryApi {
    async fn lookup_field(&self, name: &str) -> Result<Option<FieldRecord>> {
        Ok(self.get(name))
    }

    async fn lookup_fields(&self, group: &str) -> Result<Vec<FieldRecord>> {
        let state = self.state.lock().unwrap();
        Ok(state.fields.iter().filter(|f| f.group == group).cloned().collect())
    }

    async fn define_field(&self, spec: &FieldSpec) -> Result<FieldRecord> {
        let mut state = self.state.lock().unwrap();
        if state.fail_define.as_deref() == Some(spec.name) {
            return Err(anyhow!("NetBox API create error: 403 Forbidden"));
        }
        if state.fields.iter().any(|f| f.name == spec.name) {
            return Err(anyhow!("custom field with this name already exists"));
        }
        state.writes += 1;
        state.next_id += 1;
        let record = FieldRecord::from_spec(state.next_id, spec);
        state.fields.push(record.clone());
        Ok(record)
    }

    async fn bind(&self, record: &mut FieldRecord, object_types: &[String]) -> Result<()> {
        record.object_types = object_types.to_vec();
        self.replace(record)
    }

    async fn save(&self, record: &FieldRecord) -> Result<()> {
        self.replace(record)
    }

    async fn delete(&self, record: &FieldRecord) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.fields.len();
        state.fields.retain(|f| f.id != record.id);
        if state.fields.len() == before {
            return Err(anyhow!("custom field {} not found", record.id));
        }
        state.writes += 1;
        Ok(())
    }

    async fn resolve_record_type(&self, record_type: RecordType) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.resolves += 1;
        if state.fail_resolve == Some(record_type) {
            return Err(anyhow!("no content type {}", record_type.content_type()));
        }
        Ok(record_type.content_type())
    }
}
