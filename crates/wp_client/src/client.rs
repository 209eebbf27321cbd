//! WordPress HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! One client per run; `collection()` binds it to an entity endpoint.

use std::time::Duration;

use csv2wp_config::ImportConfig;
use serde::Serialize;

use crate::auth::Credentials;
use crate::entity::{EntityKind, RemoteEntity, WriteAck};

/// Per-request ceiling. A timeout surfaces as `ClientError::Network`.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("csv2wp/", env!("CARGO_PKG_VERSION"));

/// Error type for WordPress API operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport failure or timeout
    Network(String),
    /// 401 / 403
    Auth { status: u16, body: String },
    /// 5xx, or any non-success status outside 4xx
    Server { status: u16, body: String },
    /// Any other 4xx
    Validation { status: u16, body: String },
    /// Response body was not the expected JSON shape
    Parse(String),
}

impl ClientError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Auth { status, .. }
            | ClientError::Server { status, .. }
            | ClientError::Validation { status, .. } => Some(*status),
            ClientError::Network(_) | ClientError::Parse(_) => None,
        }
    }

    /// Raw response body, when the server answered with one.
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::Auth { body, .. }
            | ClientError::Server { body, .. }
            | ClientError::Validation { body, .. } => {
                Some(body.as_str()).filter(|b| !b.is_empty())
            }
            ClientError::Network(_) | ClientError::Parse(_) => None,
        }
    }

    fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ClientError::Auth { status, body },
            400..=499 => ClientError::Validation { status, body },
            _ => ClientError::Server { status, body },
        }
    }

    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Network(format!(
                "request timed out after {}s",
                REQUEST_TIMEOUT.as_secs(),
            ))
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Auth { status, .. } => {
                write!(f, "Authentication rejected (HTTP {})", status)
            }
            ClientError::Server { status, .. } => write!(f, "Server error (HTTP {})", status),
            ClientError::Validation { status, .. } => {
                write!(f, "Request rejected (HTTP {})", status)
            }
            ClientError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// WordPress API client (blocking).
#[derive(Clone)]
pub struct WpClient {
    http: reqwest::blocking::Client,
    api_base: String,
    credentials: Credentials,
    architects_endpoint: String,
    buildings_endpoint: String,
}

impl WpClient {
    /// Create a client from the run configuration.
    pub fn new(config: &ImportConfig) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: config.api_url.trim_end_matches('/').to_string(),
            credentials: Credentials::from_config(config),
            architects_endpoint: config.architects_endpoint.clone(),
            buildings_endpoint: config.buildings_endpoint.clone(),
        })
    }

    /// Bind the client to one entity collection.
    pub fn collection(&self, kind: EntityKind) -> Collection<'_> {
        let endpoint = match kind {
            EntityKind::Architects => self.architects_endpoint.as_str(),
            EntityKind::Buildings => self.buildings_endpoint.as_str(),
        };
        Collection { client: self, kind, endpoint }
    }

    pub fn architects(&self) -> Collection<'_> {
        self.collection(EntityKind::Architects)
    }

    pub fn buildings(&self) -> Collection<'_> {
        self.collection(EntityKind::Buildings)
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn send(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, ClientError> {
        let response = self
            .credentials
            .apply(req)
            .send()
            .map_err(ClientError::from_transport)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::from_status(status, body));
        }

        Ok(response)
    }
}

/// A client bound to one entity endpoint.
#[derive(Clone, Copy)]
pub struct Collection<'a> {
    client: &'a WpClient,
    kind: EntityKind,
    endpoint: &'a str,
}

impl<'a> Collection<'a> {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Collection URL: `{api_base}/{endpoint}`.
    pub fn url(&self) -> String {
        format!("{}/{}", self.client.api_base, self.endpoint)
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/{}", self.url(), id)
    }

    /// Fetch the whole collection.
    ///
    /// Entries without a usable id are dropped.
    pub fn list(&self) -> Result<Vec<RemoteEntity>, ClientError> {
        let resp = self.client.send(self.client.http.get(self.url()))?;
        let text = resp.text().map_err(ClientError::from_transport)?;
        let json: serde_json::Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))
            .map_err(|e| ClientError::Parse(format!("{} list is not JSON: {}", self.kind, e)))?;

        let items = json.as_array().ok_or_else(|| {
            ClientError::Parse(format!("{} list response is not an array", self.kind))
        })?;

        let entities: Vec<RemoteEntity> = items.iter().filter_map(RemoteEntity::from_json).collect();
        if entities.len() < items.len() {
            tracing::debug!(
                entity = %self.kind,
                dropped = items.len() - entities.len(),
                "ignored list entries without an id",
            );
        }

        Ok(entities)
    }

    /// Create a new entity.
    pub fn create<T: Serialize + ?Sized>(&self, payload: &T) -> Result<WriteAck, ClientError> {
        let resp = self.client.send(self.client.http.post(self.url()).json(payload))?;
        Ok(read_ack(resp))
    }

    /// Update the entity with `id`.
    pub fn update<T: Serialize + ?Sized>(
        &self,
        id: u64,
        payload: &T,
    ) -> Result<WriteAck, ClientError> {
        let resp = self.client.send(self.client.http.put(self.item_url(id)).json(payload))?;
        Ok(read_ack(resp))
    }
}

/// A successful write whose body is not an entity is still a success.
fn read_ack(resp: reqwest::blocking::Response) -> WriteAck {
    let status = resp.status().as_u16();
    let entity = resp
        .text()
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .and_then(|json| RemoteEntity::from_json(&json));
    WriteAck { status, entity }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(base_url: String) -> ImportConfig {
        ImportConfig::from_lookup(|key| match key {
            "WP_API_URL" => Some(base_url.clone()),
            "WP_API_USERNAME" => Some("admin".into()),
            "WP_API_PASSWORD" => Some("secret".into()),
            _ => None,
        })
        .unwrap()
    }

    // ── Unit tests ──────────────────────────────────────────────────

    #[test]
    fn test_status_classification() {
        assert!(matches!(ClientError::from_status(401, String::new()), ClientError::Auth { .. }));
        assert!(matches!(ClientError::from_status(403, String::new()), ClientError::Auth { .. }));
        assert!(matches!(
            ClientError::from_status(422, String::new()),
            ClientError::Validation { .. }
        ));
        assert!(matches!(ClientError::from_status(500, String::new()), ClientError::Server { .. }));
        assert!(matches!(ClientError::from_status(503, String::new()), ClientError::Server { .. }));
    }

    #[test]
    fn test_error_accessors() {
        let err = ClientError::Server { status: 500, body: "boom".into() };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some("boom"));
        assert_eq!(err.to_string(), "Server error (HTTP 500)");

        let err = ClientError::Network("refused".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
    }

    #[test]
    fn test_collection_urls() {
        let config = test_config("https://example.org/wp-json/".into());
        let client = WpClient::new(&config).unwrap();
        assert_eq!(
            client.architects().url(),
            "https://example.org/wp-json/morocco-architecture/v1/architects",
        );
        assert_eq!(
            client.buildings().item_url(9),
            "https://example.org/wp-json/morocco-architecture/v1/buildings/9",
        );
    }

    // ── httpmock tests ──────────────────────────────────────────────

    #[test]
    fn test_list_sends_basic_auth_and_parses() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/morocco-architecture/v1/architects")
                .header("Authorization", "Basic YWRtaW46c2VjcmV0");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([
                    {"id": 1, "name": "Hassan Fathy"},
                    {"id": "2", "name": "Jean-François Zevaco"},
                    {"name": "no id"}
                ]));
        });

        let client = WpClient::new(&test_config(server.base_url())).unwrap();
        let list = client.architects().list().unwrap();

        mock.assert();
        assert_eq!(
            list,
            vec![
                RemoteEntity::new(1, "Hassan Fathy"),
                RemoteEntity::new(2, "Jean-François Zevaco"),
            ],
        );
    }

    #[test]
    fn test_list_auth_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/morocco-architecture/v1/buildings");
            then.status(401)
                .json_body(json!({"code": "rest_forbidden", "message": "Sorry, you are not allowed"}));
        });

        let client = WpClient::new(&test_config(server.base_url())).unwrap();
        let err = client.buildings().list().unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(matches!(err, ClientError::Auth { .. }));
        assert!(err.body().unwrap_or("").contains("rest_forbidden"));
    }

    #[test]
    fn test_list_non_array_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/morocco-architecture/v1/buildings");
            then.status(200).json_body(json!({"items": []}));
        });

        let client = WpClient::new(&test_config(server.base_url())).unwrap();
        let err = client.buildings().list().unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)), "got {:?}", err);
    }

    #[test]
    fn test_create_posts_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/morocco-architecture/v1/architects")
                .header("Authorization", "Basic YWRtaW46c2VjcmV0")
                .json_body(json!({"name": "Elie Azagury"}));
            then.status(201).json_body(json!({"id": 44, "name": "Elie Azagury"}));
        });

        let client = WpClient::new(&test_config(server.base_url())).unwrap();
        let ack = client
            .architects()
            .create(&json!({"name": "Elie Azagury"}))
            .unwrap();

        mock.assert();
        assert_eq!(ack.status, 201);
        assert_eq!(ack.entity, Some(RemoteEntity::new(44, "Elie Azagury")));
    }

    #[test]
    fn test_update_puts_to_item_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/morocco-architecture/v1/buildings/17");
            then.status(200).body("ok");
        });

        let client = WpClient::new(&test_config(server.base_url())).unwrap();
        let ack = client.buildings().update(17, &json!({"name": "Villa"})).unwrap();

        mock.assert();
        assert_eq!(ack.status, 200);
        assert_eq!(ack.entity, None);
    }

    #[test]
    fn test_create_validation_error_keeps_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/morocco-architecture/v1/buildings");
            then.status(422).body(r#"{"message":"year_built invalid"}"#);
        });

        let client = WpClient::new(&test_config(server.base_url())).unwrap();
        let err = client.buildings().create(&json!({"name": "x"})).unwrap_err();

        assert!(matches!(err, ClientError::Validation { status: 422, .. }));
        assert_eq!(err.body(), Some(r#"{"message":"year_built invalid"}"#));
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        // Nothing listens on port 9 (discard) in test environments.
        let client = WpClient::new(&test_config("http://127.0.0.1:9".into())).unwrap();
        let err = client.architects().list().unwrap_err();
        assert!(matches!(err, ClientError::Network(_)), "got {:?}", err);
    }
}
