//! Source record → typed record → wire payload.
//!
//! ## Architect columns
//!
//! | Column             | Field                         |
//! |--------------------|-------------------------------|
//! | `name`             | name / title                  |
//! | `description`      | description                   |
//! | `image_url`        | image_url                     |
//! | `education_school` | education.school (fallback: `education`) |
//! | `education_lat`    | education.position.lat        |
//! | `education_lng`    | education.position.lng        |
//! | `office`           | office_locations.office (fallback: `office_locations`) |
//! | `office_lat`       | office_locations.position.lat |
//! | `office_lng`       | office_locations.position.lng |
//!
//! ## Building columns
//!
//! | Column           | Field                                      |
//! |------------------|--------------------------------------------|
//! | `name`           | name / title                               |
//! | `description`    | description                                |
//! | `year_built`     | year_built (passed through as text)        |
//! | `architect_name` | architect_id (resolved by name, else "")   |
//! | `city`           | city                                       |
//! | `region`         | region                                     |
//! | `images`         | images (comma-separated → JSON array)      |
//! | `latitude`       | position.lat                               |
//! | `longitude`      | position.lng                               |

use serde::Serialize;

use csv2wp_io::SourceRecord;
use csv2wp_wp_client::RemoteEntity;

use crate::engine::find_match;
use crate::model::{
    ArchitectPayload, ArchitectRecord, BuildingPayload, BuildingRecord, Education,
    OfficeLocation, Position,
};

/// Entity-specific translation of a source record into its wire payload.
pub trait FieldMapping {
    type Payload: Serialize;

    fn map(&self, record: &SourceRecord) -> Self::Payload;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArchitectMapping;

impl FieldMapping for ArchitectMapping {
    type Payload = ArchitectPayload;

    fn map(&self, record: &SourceRecord) -> ArchitectPayload {
        architect_record(record).to_payload()
    }
}

/// Building mapping; carries the architect snapshot used to resolve
/// `architect_name` to an id.
#[derive(Debug, Clone, Default)]
pub struct BuildingMapping {
    architects: Vec<RemoteEntity>,
}

impl BuildingMapping {
    pub fn new(architects: Vec<RemoteEntity>) -> Self {
        Self { architects }
    }

    /// Case-insensitive lookup; first match wins.
    pub fn resolve_architect(&self, name: &str) -> Option<u64> {
        if name.is_empty() {
            return None;
        }
        find_match(&self.architects, name).map(|a| a.id)
    }
}

impl FieldMapping for BuildingMapping {
    type Payload = BuildingPayload;

    fn map(&self, record: &SourceRecord) -> BuildingPayload {
        let building = building_record(record);
        let architect_id = self.resolve_architect(&building.architect_name);
        if architect_id.is_none() && !building.architect_name.is_empty() {
            tracing::debug!(
                building = %building.name,
                architect = %building.architect_name,
                "architect not found; importing without reference",
            );
        }
        building.to_payload(architect_id)
    }
}

pub fn architect_record(record: &SourceRecord) -> ArchitectRecord {
    let school = record
        .get_non_empty("education_school")
        .or_else(|| record.get_non_empty("education"))
        .unwrap_or("");
    let office = record
        .get_non_empty("office")
        .or_else(|| record.get_non_empty("office_locations"))
        .unwrap_or("");

    ArchitectRecord {
        name: record.get_or_empty("name").to_string(),
        description: record.get_or_empty("description").to_string(),
        image_url: record.get_or_empty("image_url").to_string(),
        education: Education {
            school: school.to_string(),
            position: position(record, "education_lat", "education_lng"),
        },
        office_location: OfficeLocation {
            office: office.to_string(),
            position: position(record, "office_lat", "office_lng"),
        },
    }
}

pub fn building_record(record: &SourceRecord) -> BuildingRecord {
    BuildingRecord {
        name: record.get_or_empty("name").to_string(),
        description: record.get_or_empty("description").to_string(),
        year_built: record.get_or_empty("year_built").to_string(),
        architect_name: record.get_or_empty("architect_name").to_string(),
        city: record.get_or_empty("city").to_string(),
        region: record.get_or_empty("region").to_string(),
        images: split_images(record.get_or_empty("images")),
        position: position(record, "latitude", "longitude"),
    }
}

/// Split a comma-separated URL list. Entries are trimmed; empty ones dropped.
pub fn split_images(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a coordinate, falling back to 0 for anything that is not a finite number.
pub fn parse_coordinate(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn position(record: &SourceRecord, lat: &str, lng: &str) -> Position {
    Position {
        lat: parse_coordinate(record.get_or_empty(lat)),
        lng: parse_coordinate(record.get_or_empty(lng)),
    }
}
