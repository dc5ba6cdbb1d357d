//! Endpoint configuration file.
//!
//! The file is a JSON array, one object per Confluent cluster:
//!
//! ```json
//! [
//!   {
//!     "id": "lkc-1",
//!     "name": "Production",
//!     "url": "https://api.telemetry.confluent.cloud",
//!     "apiKey": "KEY",
//!     "apiSecret": "SECRET",
//!     "ignoreHiddenTopics": true
//!   }
//! ]
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// A remote metrics source. Never mutated once loaded.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: String,
    pub name: String,
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default)]
    pub ignore_hidden_topics: bool,
}

// Hand-written so the secret never ends up in a log line.
impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("ignore_hidden_topics", &self.ignore_hidden_topics)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read endpoint configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse endpoint configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no endpoints configured in {0}")]
    Empty(PathBuf),
}

/// Load the endpoints to collect from. Any failure here is fatal to the run.
pub fn load_endpoints(path: &Path) -> Result<Vec<Endpoint>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let endpoints = parse_endpoints(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if endpoints.is_empty() {
        return Err(ConfigError::Empty(path.to_path_buf()));
    }
    log::info!("Read {} endpoint(s) from {}", endpoints.len(), path.display());
    Ok(endpoints)
}

fn parse_endpoints(content: &str) -> Result<Vec<Endpoint>, serde_json::Error> {
    // `null` is accepted by some hand-edited files and means "nothing configured"
    let endpoints: Option<Vec<Endpoint>> = serde_json::from_str(content)?;
    Ok(endpoints.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_endpoints() {
        let file = config_file(
            r#"[
                {"id": "lkc-1", "name": "Production", "url": "https://api.telemetry.confluent.cloud",
                 "apiKey": "KEY", "apiSecret": "SECRET", "ignoreHiddenTopics": true},
                {"id": "lkc-2", "name": "Staging", "url": "https://example.test",
                 "apiKey": "K2", "apiSecret": "S2"}
            ]"#,
        );
        let endpoints = load_endpoints(file.path()).unwrap();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].id, "lkc-1");
        assert_eq!(endpoints[0].api_secret, "SECRET");
        assert!(endpoints[0].ignore_hidden_topics);
        assert!(!endpoints[1].ignore_hidden_topics);
    }

    #[test]
    fn debug_hides_the_secret() {
        let file = config_file(
            r#"[{"id": "lkc-1", "name": "P", "url": "u", "apiKey": "KEY", "apiSecret": "SECRET"}]"#,
        );
        let endpoints = load_endpoints(file.path()).unwrap();
        let debug = format!("{:?}", endpoints[0]);
        assert!(!debug.contains("SECRET"));
        assert!(debug.contains("KEY"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_endpoints(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let file = config_file(r#"[{"id": "lkc-1"}]"#);
        assert!(matches!(
            load_endpoints(file.path()).unwrap_err(),
            ConfigError::Parse { .. }
        ));

        let file = config_file("not json");
        assert!(matches!(
            load_endpoints(file.path()).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn empty_configuration_is_an_error() {
        for content in ["[]", "null"] {
            let file = config_file(content);
            assert!(matches!(
                load_endpoints(file.path()).unwrap_err(),
                ConfigError::Empty(_)
            ));
        }
    }
}
