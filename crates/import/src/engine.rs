use std::path::Path;

use csv2wp_io::SourceRecord;
use csv2wp_wp_client::{ClientError, Collection, RemoteEntity, WpClient};

use crate::error::ImportError;
use crate::mapping::{ArchitectMapping, BuildingMapping, FieldMapping};
use crate::model::{ImportReport, ImportSummary, PlannedAction, RowOutcome, RowResult};

/// Mandatory column on every entity.
pub const NAME_COLUMN: &str = "name";

/// Import architects from `path`.
pub fn import_architects(
    path: &Path,
    dry_run: bool,
    client: &WpClient,
) -> Result<ImportReport, ImportError> {
    let records = load_source(path)?;
    tracing::info!(entity = "architects", count = records.len(), "parsed CSV");

    let collection = client.architects();
    let existing = snapshot(&collection);

    Ok(run(&records, &existing, &collection, &ArchitectMapping, dry_run))
}

/// Import buildings from `path`, linking each to its architect by name.
pub fn import_buildings(
    path: &Path,
    dry_run: bool,
    client: &WpClient,
) -> Result<ImportReport, ImportError> {
    let records = load_source(path)?;
    tracing::info!(entity = "buildings", count = records.len(), "parsed CSV");

    let architects = snapshot(&client.architects());
    let mapping = BuildingMapping::new(architects);

    let collection = client.buildings();
    let existing = snapshot(&collection);

    Ok(run(&records, &existing, &collection, &mapping, dry_run))
}

/// Read and validate the CSV. Fails before any network I/O.
///
/// Every record must carry a non-empty `name`; names are trimmed in place.
pub fn load_source(path: &Path) -> Result<Vec<SourceRecord>, ImportError> {
    let mut records =
        csv2wp_io::read_records(path).map_err(|e| ImportError::from_csv(path, e))?;

    if let Some(bad) = records.iter().find(|r| r.get_non_empty(NAME_COLUMN).is_none()) {
        return Err(ImportError::MissingField {
            row: bad.row,
            line: bad.line,
            column: NAME_COLUMN,
            record: serde_json::to_string(bad).unwrap_or_default(),
        });
    }

    for record in &mut records {
        let trimmed = record.get_or_empty(NAME_COLUMN).trim().to_string();
        record.set(NAME_COLUMN, trimmed);
    }

    Ok(records)
}

/// Fetch the current collection once for matching.
///
/// A failed fetch is logged and treated as an empty collection; every row
/// will then look new and be created.
pub fn snapshot(collection: &Collection<'_>) -> Vec<RemoteEntity> {
    match collection.list() {
        Ok(entities) => {
            tracing::info!(entity = %collection.kind(), count = entities.len(), "fetched existing");
            entities
        }
        Err(e) => {
            tracing::warn!(
                entity = %collection.kind(),
                error = %e,
                status = ?e.status(),
                "could not fetch existing entities; treating collection as empty",
            );
            Vec::new()
        }
    }
}

/// First entity whose name equals `name`, ignoring case.
pub fn find_match<'a>(existing: &'a [RemoteEntity], name: &str) -> Option<&'a RemoteEntity> {
    existing.iter().find(|e| e.name_matches(name))
}

/// Create-or-update every record against the `existing` snapshot.
///
/// Rows are processed strictly in order, one request at a time. The snapshot
/// is not refreshed as rows are written.
pub fn reconcile<M: FieldMapping>(
    records: &[SourceRecord],
    existing: &[RemoteEntity],
    collection: &Collection<'_>,
    mapping: &M,
    dry_run: bool,
) -> (ImportSummary, Vec<RowResult>) {
    let kind = collection.kind();
    let mut summary = ImportSummary::default();
    let mut rows = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let name = record.get_or_empty(NAME_COLUMN).to_string();
        tracing::info!(
            entity = %kind,
            row = record.row,
            "importing {}/{}: {}",
            index + 1,
            records.len(),
            name,
        );

        let payload = mapping.map(record);
        let matched = find_match(existing, &name);

        let outcome = if dry_run {
            let planned = match matched {
                Some(e) => PlannedAction::Update { id: e.id },
                None => PlannedAction::Create,
            };
            tracing::info!(entity = %kind, name = %name, ?planned, "dry run, skipped");
            RowOutcome::Skipped { planned }
        } else {
            tracing::debug!(
                entity = %kind,
                name = %name,
                payload = %serde_json::to_string(&payload).unwrap_or_default(),
                "sending",
            );
            write_row(collection, matched, &payload, &name)
        };

        summary.record(&outcome);
        rows.push(RowResult { row: record.row, name, outcome });
    }

    (summary, rows)
}

fn run<M: FieldMapping>(
    records: &[SourceRecord],
    existing: &[RemoteEntity],
    collection: &Collection<'_>,
    mapping: &M,
    dry_run: bool,
) -> ImportReport {
    let (summary, rows) = reconcile(records, existing, collection, mapping, dry_run);
    tracing::info!(
        entity = %collection.kind(),
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        errors = summary.errors,
        "import finished",
    );

    ImportReport { entity: collection.kind(), dry_run, summary, rows }
}

fn write_row<P: serde::Serialize>(
    collection: &Collection<'_>,
    matched: Option<&RemoteEntity>,
    payload: &P,
    name: &str,
) -> RowOutcome {
    let kind = collection.kind();
    let result = match matched {
        Some(existing) => collection
            .update(existing.id, payload)
            .map(|_| RowOutcome::Updated { id: existing.id }),
        None => collection
            .create(payload)
            .map(|ack| RowOutcome::Created { id: ack.entity.map(|e| e.id) }),
    };

    match result {
        Ok(outcome) => {
            match &outcome {
                RowOutcome::Updated { id } => {
                    tracing::info!(entity = %kind, name = %name, id, "updated");
                }
                RowOutcome::Created { id } => {
                    tracing::info!(entity = %kind, name = %name, id = ?id, "created");
                }
                _ => {}
            }
            outcome
        }
        Err(e) => failed(kind.singular(), name, e),
    }
}

fn failed(entity: &str, name: &str, err: ClientError) -> RowOutcome {
    tracing::error!(
        entity,
        name = %name,
        status = ?err.status(),
        body = err.body().unwrap_or(""),
        "error importing {} {}: {}",
        entity,
        name,
        err,
    );

    RowOutcome::Failed {
        error: err.to_string(),
        status: err.status(),
        body: err.body().map(String::from),
    }
}
