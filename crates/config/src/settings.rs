// Import settings
// Read once from the environment (optionally seeded from a .env file) and
// handed to the WordPress client. Nothing else reads the environment.

use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_ARCHITECTS_CSV: &str = "./data/architects.csv";
pub const DEFAULT_BUILDINGS_CSV: &str = "./data/buildings.csv";
pub const DEFAULT_ARCHITECTS_ENDPOINT: &str = "morocco-architecture/v1/architects";
pub const DEFAULT_BUILDINGS_ENDPOINT: &str = "morocco-architecture/v1/buildings";

const ENV_API_URL: &str = "WP_API_URL";
const ENV_USERNAME: &str = "WP_API_USERNAME";
const ENV_PASSWORD: &str = "WP_API_PASSWORD";
const ENV_ARCHITECTS_CSV: &str = "ARCHITECTS_CSV";
const ENV_BUILDINGS_CSV: &str = "BUILDINGS_CSV";
const ENV_ARCHITECTS_ENDPOINT: &str = "ARCHITECTS_ENDPOINT";
const ENV_BUILDINGS_ENDPOINT: &str = "BUILDINGS_ENDPOINT";

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `WP_API_URL` is unset or empty
    MissingApiUrl,
    /// `WP_API_USERNAME` or `WP_API_PASSWORD` is unset or empty
    MissingCredentials,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiUrl => write!(f, "{} is not defined", ENV_API_URL),
            ConfigError::MissingCredentials => write!(
                f,
                "WordPress API credentials are not defined ({} / {})",
                ENV_USERNAME, ENV_PASSWORD,
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything a run needs to talk to WordPress and find its input files.
#[derive(Clone)]
pub struct ImportConfig {
    /// API root, e.g. "https://example.org/wp-json" (no trailing slash)
    pub api_url: String,
    pub username: String,
    pub password: String,
    pub architects_csv: PathBuf,
    pub buildings_csv: PathBuf,
    /// Endpoint path relative to `api_url` (no leading/trailing slash)
    pub architects_endpoint: String,
    pub buildings_endpoint: String,
}

impl fmt::Debug for ImportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportConfig")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("architects_csv", &self.architects_csv)
            .field("buildings_csv", &self.buildings_csv)
            .field("architects_endpoint", &self.architects_endpoint)
            .field("buildings_endpoint", &self.buildings_endpoint)
            .finish()
    }
}

impl ImportConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Empty or whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = get(ENV_API_URL).ok_or(ConfigError::MissingApiUrl)?;
        let (username, password) = match (get(ENV_USERNAME), get(ENV_PASSWORD)) {
            (Some(u), Some(p)) => (u, p),
            _ => return Err(ConfigError::MissingCredentials),
        };

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            username,
            password,
            architects_csv: PathBuf::from(
                get(ENV_ARCHITECTS_CSV).unwrap_or_else(|| DEFAULT_ARCHITECTS_CSV.to_string()),
            ),
            buildings_csv: PathBuf::from(
                get(ENV_BUILDINGS_CSV).unwrap_or_else(|| DEFAULT_BUILDINGS_CSV.to_string()),
            ),
            architects_endpoint: normalize_endpoint(
                get(ENV_ARCHITECTS_ENDPOINT).as_deref().unwrap_or(DEFAULT_ARCHITECTS_ENDPOINT),
            ),
            buildings_endpoint: normalize_endpoint(
                get(ENV_BUILDINGS_ENDPOINT).as_deref().unwrap_or(DEFAULT_BUILDINGS_ENDPOINT),
            ),
        })
    }
}

/// Load `.env` from the working directory if present.
///
/// Variables already set in the process environment win.
/// Returns the path that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn base_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("WP_API_URL", "https://example.org/wp-json/"),
            ("WP_API_USERNAME", "admin"),
            ("WP_API_PASSWORD", "s3cret app password"),
        ]
    }

    #[test]
    fn test_defaults_applied() {
        let config = ImportConfig::from_lookup(lookup_from(&base_env())).unwrap();

        assert_eq!(config.api_url, "https://example.org/wp-json");
        assert_eq!(config.architects_csv, PathBuf::from(DEFAULT_ARCHITECTS_CSV));
        assert_eq!(config.buildings_csv, PathBuf::from(DEFAULT_BUILDINGS_CSV));
        assert_eq!(config.architects_endpoint, DEFAULT_ARCHITECTS_ENDPOINT);
        assert_eq!(config.buildings_endpoint, DEFAULT_BUILDINGS_ENDPOINT);
    }

    #[test]
    fn test_overrides_applied() {
        let mut env = base_env();
        env.push(("ARCHITECTS_CSV", "/tmp/a.csv"));
        env.push(("BUILDINGS_ENDPOINT", "/custom/v2/buildings/"));
        let config = ImportConfig::from_lookup(lookup_from(&env)).unwrap();

        assert_eq!(config.architects_csv, PathBuf::from("/tmp/a.csv"));
        assert_eq!(config.buildings_endpoint, "custom/v2/buildings");
    }

    #[test]
    fn test_missing_api_url() {
        let err = ImportConfig::from_lookup(lookup_from(&[
            ("WP_API_USERNAME", "admin"),
            ("WP_API_PASSWORD", "pw"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingApiUrl);
    }

    #[test]
    fn test_missing_password() {
        let err = ImportConfig::from_lookup(lookup_from(&[
            ("WP_API_URL", "https://example.org/wp-json"),
            ("WP_API_USERNAME", "admin"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingCredentials);
    }

    #[test]
    fn test_blank_value_is_missing() {
        let err = ImportConfig::from_lookup(lookup_from(&[
            ("WP_API_URL", "   "),
            ("WP_API_USERNAME", "admin"),
            ("WP_API_PASSWORD", "pw"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingApiUrl);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ImportConfig::from_lookup(lookup_from(&base_env())).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cret"), "debug output leaked password: {}", debug);
        assert!(debug.contains("<redacted>"));
    }
}
