use anyhow::Result;
use async_trait::async_trait;

use crate::fields::{FieldSpec, RecordType};

use super::api::{FieldRecord, SchemaApi};

/// Reads go to NetBox, writes are only logged
pub struct DryRun<'a, A: SchemaApi + ?Sized> {
    inner: &'a A,
}

impl<'a, A: SchemaApi + ?Sized> DryRun<'a, A> {
    pub fn new(inner: &'a A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<'a, A: SchemaApi + ?Sized> SchemaApi for DryRun<'a, A> {
    async fn lookup_field(&self, name: &str) -> Result<Option<FieldRecord>> {
        self.inner.lookup_field(name).await
    }

    async fn lookup_fields(&self, group: &str) -> Result<Vec<FieldRecord>> {
        self.inner.lookup_fields(group).await
    }

    async fn define_field(&self, spec: &FieldSpec) -> Result<FieldRecord> {
        tracing::debug!("dry run: would create custom field {}", spec.name);
        Ok(FieldRecord::from_spec(0, spec))
    }

    async fn bind(&self, record: &mut FieldRecord, object_types: &[String]) -> Result<()> {
        tracing::debug!("dry run: would bind {} to {}", record.name, object_types.join(", "));
        record.object_types = object_types.to_vec();
        Ok(())
    }

    async fn save(&self, record: &FieldRecord) -> Result<()> {
        tracing::debug!("dry run: would save {}", record.name);
        Ok(())
    }

    async fn delete(&self, record: &FieldRecord) -> Result<()> {
        tracing::debug!("dry run: would delete {} (id {})", record.name, record.id);
        Ok(())
    }

    async fn resolve_record_type(&self, record_type: RecordType) -> Result<String> {
        self.inner.resolve_record_type(record_type).await
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
