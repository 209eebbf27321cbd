//! Basic credentials for the WordPress API.
//!
//! Built from the import config. The password never reaches `Debug` output,
//! logs, or error messages.

use std::fmt;

use csv2wp_config::ImportConfig;

/// Username + application password sent as HTTP Basic auth on every request.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }

    /// Attach Basic auth to a request.
    pub(crate) fn apply(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        req.basic_auth(&self.username, Some(&self.password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
