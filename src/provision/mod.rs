pub mod api;
pub mod dry_run;
pub mod report;

#[cfg(test)]
mod memory;

use std::collections::{HashMap, HashSet};

use crate::fields::{self, FieldSpec, RecordType, TableError};

pub use api::{FieldRecord, SchemaApi};
pub use dry_run::DryRun;
pub use report::{LogLevel, Report, RunError};

use report::Operation;

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} does not exist")]
    NotFound(String),

    #[error(transparent)]
    InvalidTable(#[from] TableError),

    #[error(transparent)]
    Api(#[from] anyhow::Error),
}

/// Resolves record types through the API once per run
struct TypeResolver<'a, A: SchemaApi + ?Sized> {
    api: &'a A,
    cache: HashMap<RecordType, String>,
}

impl<'a, A: SchemaApi + ?Sized> TypeResolver<'a, A> {
    fn new(api: &'a A) -> Self {
        Self {
            api,
            cache: HashMap::new(),
        }
    }

    async fn resolve(&mut self, spec: &FieldSpec) -> Result<Vec<String>, ProvisionError> {
        let mut resolved = Vec::new();
        for record_type in spec.target_set() {
            if let Some(id) = self.cache.get(&record_type) {
                resolved.push(id.clone());
                continue;
            }
            let id = self.api.resolve_record_type(record_type).await?;
            self.cache.insert(record_type, id.clone());
            resolved.push(id);
        }
        Ok(resolved)
    }
}

/// Create every field of `table` that doesn't exist yet
pub async fn create<A: SchemaApi + ?Sized>(table: &[FieldSpec], api: &A) -> Result<Report, RunError> {
    let mut report = Report::new(Operation::Create, api.is_dry_run());
    match create_fields(table, api, &mut report).await {
        Ok(()) => Ok(report),
        Err(e) => Err(report.abort(e)),
    }
}

async fn create_fields<A: SchemaApi + ?Sized>(
    table: &[FieldSpec],
    api: &A,
    report: &mut Report,
) -> Result<(), ProvisionError> {
    fields::validate_table(table)?;
    let mut types = TypeResolver::new(api);

    for spec in table {
        if api.lookup_field(spec.name).await?.is_some() {
            report.failure(ProvisionError::AlreadyExists(spec.name.to_string()).to_string());
            report.counts.skipped += 1;
            continue;
        }

        let object_types = types.resolve(spec).await?;
        let mut record = api.define_field(spec).await?;
        api.bind(&mut record, &object_types).await?;

        report.info(format!("{} created", spec.name));
        report.counts.created += 1;
    }

    report.success(format!(
        "Custom field creation complete ({} created, {} skipped)",
        report.counts.created, report.counts.skipped
    ));
    Ok(())
}

/// Overwrite every field of `table` with the table's attributes. All fields must exist.
pub async fn update<A: SchemaApi + ?Sized>(table: &[FieldSpec], api: &A) -> Result<Report, RunError> {
    let mut report = Report::new(Operation::Update, api.is_dry_run());
    match update_fields(table, api, &mut report).await {
        Ok(()) => Ok(report),
        Err(e) => Err(report.abort(e)),
    }
}

async fn update_fields<A: SchemaApi + ?Sized>(
    table: &[FieldSpec],
    api: &A,
    report: &mut Report,
) -> Result<(), ProvisionError> {
    fields::validate_table(table)?;
    let mut types = TypeResolver::new(api);

    for spec in table {
        let mut record = api
            .lookup_field(spec.name)
            .await?
            .ok_or_else(|| ProvisionError::NotFound(spec.name.to_string()))?;

        record.apply(spec);
        let object_types = types.resolve(spec).await?;
        api.bind(&mut record, &object_types).await?;
        api.save(&record).await?;

        report.info(format!("{} updated", spec.name));
        report.counts.updated += 1;
    }

    report.success(format!("All optical fields updated ({})", report.counts.updated));
    Ok(())
}

/// Group tags swept by `remove`: the table's groups, then any legacy groups
pub fn sweep_groups(table: &[FieldSpec], legacy_groups: &[String]) -> Vec<String> {
    let mut groups: Vec<String> = fields::table_groups(table)
        .into_iter()
        .map(str::to_string)
        .collect();
    for group in legacy_groups {
        if !groups.contains(group) {
            groups.push(group.clone());
        }
    }
    groups
}

/// Live fields carrying any of `groups`, each listed once
pub async fn live_fields<A: SchemaApi + ?Sized>(groups: &[String], api: &A) -> anyhow::Result<Vec<FieldRecord>> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for group in groups {
        for record in api.lookup_fields(group).await? {
            if seen.insert(record.id) {
                records.push(record);
            }
        }
    }
    Ok(records)
}

/// Delete every live field tagged with one of the table's groups or a legacy group.
///
/// Deletion is driven by the group tag on the live records rather than the
/// table rows, so fields dropped or renamed in later table revisions are
/// swept up as well.
pub async fn remove<A: SchemaApi + ?Sized>(
    table: &[FieldSpec],
    legacy_groups: &[String],
    api: &A,
) -> Result<Report, RunError> {
    let mut report = Report::new(Operation::Remove, api.is_dry_run());
    match remove_fields(table, legacy_groups, api, &mut report).await {
        Ok(()) => Ok(report),
        Err(e) => Err(report.abort(e)),
    }
}

async fn remove_fields<A: SchemaApi + ?Sized>(
    table: &[FieldSpec],
    legacy_groups: &[String],
    api: &A,
    report: &mut Report,
) -> Result<(), ProvisionError> {
    fields::validate_table(table)?;
    let groups = sweep_groups(table, legacy_groups);

    for record in live_fields(&groups, api).await? {
        api.delete(&record).await?;
        report.info(format!("{} removed", record.name));
        report.counts.removed += 1;
    }

    report.success(format!("All optical fields removed ({})", report.counts.removed));
    Ok(())
}
