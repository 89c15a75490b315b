//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub directory_file: PathBuf,
    pub template_cache_ttl: Duration,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output"),
            directory_file: PathBuf::from("static/directory.json"),
            template_cache_ttl: Duration::from_secs(300),
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("FORMS_HOST") {
            config.host = host.trim().to_string();
        }
        if let Some(port) = get("FORMS_PORT") {
            config.port = parse_number("FORMS_PORT", &port)?;
        }
        if let Some(dir) = get("FORMS_TEMPLATES_DIR") {
            config.templates_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("FORMS_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(file) = get("FORMS_DIRECTORY_FILE") {
            config.directory_file = PathBuf::from(file);
        }
        if let Some(ttl) = get("FORMS_TEMPLATE_CACHE_TTL_SECS") {
            config.template_cache_ttl =
                Duration::from_secs(parse_number("FORMS_TEMPLATE_CACHE_TTL_SECS", &ttl)?);
        }
        if let Some(origins) = get("FORMS_ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.template_cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("FORMS_PORT", "9090"),
            ("FORMS_OUTPUT_DIR", "/tmp/pdf"),
            ("FORMS_TEMPLATE_CACHE_TTL_SECS", "5"),
            ("FORMS_ALLOWED_ORIGINS", "https://biuro.pl, ,http://localhost:5173"),
            ("FORMS_HOST", "  "),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/pdf"));
        assert_eq!(config.template_cache_ttl, Duration::from_secs(5));
        assert_eq!(
            config.allowed_origins,
            vec!["https://biuro.pl", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup(&[("FORMS_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("FORMS_PORT"));
    }
}
