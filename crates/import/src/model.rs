use serde::{Serialize, Serializer};

use csv2wp_wp_client::EntityKind;

/// WordPress post status for everything we write.
pub const PUBLISH: &str = "publish";

// ---------------------------------------------------------------------------
// Typed records (built from a SourceRecord at the mapping boundary)
// ---------------------------------------------------------------------------

/// Map coordinates. Unparseable input becomes 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Education {
    pub school: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OfficeLocation {
    pub office: String,
    pub position: Position,
}

/// One architect row. Every optional column defaults to "" / 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArchitectRecord {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub education: Education,
    pub office_location: OfficeLocation,
}

/// One building row. Every optional column defaults to "" / [] / 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildingRecord {
    pub name: String,
    pub description: String,
    pub year_built: String,
    /// Name of the architect to link; resolved to an id at import time
    pub architect_name: String,
    pub city: String,
    pub region: String,
    pub images: Vec<String>,
    pub position: Position,
}

// ---------------------------------------------------------------------------
// Wire payloads
// ---------------------------------------------------------------------------

/// Body of `POST/PUT …/architects`. Structured fields travel as JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchitectPayload {
    pub title: String,
    pub status: &'static str,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub education: String,
    pub office_locations: String,
}

/// Body of `POST/PUT …/buildings`. Structured fields travel as JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingPayload {
    pub title: String,
    pub status: &'static str,
    pub name: String,
    pub description: String,
    pub year_built: String,
    /// Architect post id, or "" when the name did not resolve
    #[serde(serialize_with = "id_or_empty")]
    pub architect_id: Option<u64>,
    pub city: String,
    pub region: String,
    pub images: String,
    pub position: String,
}

fn id_or_empty<S: Serializer>(id: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => serializer.serialize_u64(*id),
        None => serializer.serialize_str(""),
    }
}

/// Structured payload fields travel as JSON text.
///
/// Only used on plain structs of strings and finite floats, which always
/// serialize.
fn json_text<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

impl Position {
    pub fn to_json_text(&self) -> String {
        json_text(self)
    }
}

impl ArchitectRecord {
    pub fn to_payload(&self) -> ArchitectPayload {
        ArchitectPayload {
            title: self.name.clone(),
            status: PUBLISH,
            name: self.name.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            education: json_text(&self.education),
            office_locations: json_text(&self.office_location),
        }
    }
}

impl BuildingRecord {
    pub fn to_payload(&self, architect_id: Option<u64>) -> BuildingPayload {
        BuildingPayload {
            title: self.name.clone(),
            status: PUBLISH,
            name: self.name.clone(),
            description: self.description.clone(),
            year_built: self.year_built.clone(),
            architect_id,
            city: self.city.clone(),
            region: self.region.clone(),
            images: json_text(&self.images),
            position: self.position.to_json_text(),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What a dry run would have done with a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlannedAction {
    Create,
    Update { id: u64 },
}

/// Per-row result. Failures are values, never panics or early returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    /// `id` is present when the server echoed the new entity
    Created { id: Option<u64> },
    Updated { id: u64 },
    Skipped { planned: PlannedAction },
    Failed {
        error: String,
        status: Option<u16>,
        body: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowResult {
    /// 1-based data row number in the CSV
    pub row: usize,
    pub name: String,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl ImportSummary {
    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Created { .. } => self.created += 1,
            RowOutcome::Updated { .. } => self.updated += 1,
            RowOutcome::Skipped { .. } => self.skipped += 1,
            RowOutcome::Failed { .. } => self.errors += 1,
        }
    }
}

/// Everything one import run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub entity: EntityKind,
    pub dry_run: bool,
    pub summary: ImportSummary,
    pub rows: Vec<RowResult>,
}

impl ImportReport {
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}
