//! Remote entity shapes.

use std::fmt;

use serde::Serialize;

/// Which remote collection a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Architects,
    Buildings,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Architects => "architects",
            EntityKind::Buildings => "buildings",
        }
    }

    /// Singular noun for log lines ("architect", "building").
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Architects => "architect",
            EntityKind::Buildings => "building",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An existing record on the server: id + matching name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntity {
    pub id: u64,
    pub name: String,
}

impl RemoteEntity {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// Extract id + name from a JSON object.
    ///
    /// `id` may be a number or a numeric string. `name` falls back to the
    /// WordPress post title (`title.rendered` or a plain `title` string).
    /// Returns `None` without a usable id.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let id = value["id"]
            .as_u64()
            .or_else(|| value["id"].as_str().and_then(|s| s.trim().parse().ok()))?;

        let name = value["name"]
            .as_str()
            .or_else(|| value["title"]["rendered"].as_str())
            .or_else(|| value["title"].as_str())
            .unwrap_or("")
            .to_string();

        Some(Self { id, name })
    }

    /// Case-insensitive name comparison used for matching.
    pub fn name_matches(&self, name: &str) -> bool {
        !self.name.is_empty() && self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Server acknowledgement of a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    pub status: u16,
    /// The entity echoed back, when the response body carries one
    pub entity: Option<RemoteEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_numeric_id() {
        let e = RemoteEntity::from_json(&json!({"id": 12, "name": "Hassan Fathy"})).unwrap();
        assert_eq!(e, RemoteEntity::new(12, "Hassan Fathy"));
    }

    #[test]
    fn test_from_json_string_id_and_title_fallback() {
        let e = RemoteEntity::from_json(&json!({"id": "7", "title": {"rendered": "Villa Majorelle"}}))
            .unwrap();
        assert_eq!(e.id, 7);
        assert_eq!(e.name, "Villa Majorelle");
    }

    #[test]
    fn test_from_json_without_id() {
        assert!(RemoteEntity::from_json(&json!({"name": "orphan"})).is_none());
        assert!(RemoteEntity::from_json(&json!({"id": "abc", "name": "x"})).is_none());
    }

    #[test]
    fn test_name_matches_case_insensitive() {
        let e = RemoteEntity::new(1, "Hassan Fathy");
        assert!(e.name_matches("hassan fathy"));
        assert!(e.name_matches("HASSAN FATHY"));
        assert!(!e.name_matches("Hassan"));
    }

    #[test]
    fn test_empty_remote_name_never_matches() {
        let e = RemoteEntity::new(1, "");
        assert!(!e.name_matches(""));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(EntityKind::Architects.to_string(), "architects");
        assert_eq!(EntityKind::Buildings.singular(), "building");
        assert_eq!(serde_json::to_value(EntityKind::Buildings).unwrap(), json!("buildings"));
    }
}
