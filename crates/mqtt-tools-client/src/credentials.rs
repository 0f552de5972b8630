//! Credential file loading.
//!
//! The file is JSON:
//!
//! ```json
//! { "username": "device-7", "password": "s3cret" }
//! ```
//!
//! `password` may be omitted for brokers that authenticate on username alone.

use crate::error::ClientError;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Username and password presented in the MQTT CONNECT packet.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// MQTT username
    pub username: String,
    /// MQTT password
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Load credentials from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Credentials(format!("{}: {e}", path.display())))?;

        let credentials: Self = serde_json::from_str(&contents)
            .map_err(|e| ClientError::Credentials(format!("{}: {e}", path.display())))?;

        tracing::debug!(username = %credentials.username, "Loaded broker credentials");

        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_username_and_password() {
        let file = write_file(r#"{"username": "device-7", "password": "s3cret"}"#);
        let creds = Credentials::load(file.path()).unwrap();
        assert_eq!(creds.username, "device-7");
        assert_eq!(creds.password, "s3cret");
    }

    #[test]
    fn password_defaults_to_empty() {
        let file = write_file(r#"{"username": "device-7"}"#);
        let creds = Credentials::load(file.path()).unwrap();
        assert!(creds.password.is_empty());
    }

    #[test]
    fn missing_file() {
        let err = Credentials::load(Path::new("/nonexistent/creds.json")).unwrap_err();
        assert!(matches!(err, ClientError::Credentials(_)));
        assert!(err.to_string().contains("/nonexistent/creds.json"));
    }

    #[test]
    fn malformed_json() {
        let file = write_file("username=device-7");
        assert!(matches!(
            Credentials::load(file.path()),
            Err(ClientError::Credentials(_))
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials {
            username: "u".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
