//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{Environment, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `backend.base_url`.
pub const ENV_API_URL: &str = "PLENTI_API_URL";
/// Overrides `environment`.
pub const ENV_ENVIRONMENT: &str = "PLENTI_ENV";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PLENTI_ENV: {0}")]
    Environment(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    finalize(config, |key| std::env::var(key).ok())
}

/// Load configuration without a file: defaults plus environment.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    finalize(GatewayConfig::default(), |key| std::env::var(key).ok())
}

/// Apply environment overrides, then validate.
pub fn finalize<F>(mut config: GatewayConfig, env: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.backend.base_url = Some(url.trim().to_string());
    }

    if let Some(value) = env(ENV_ENVIRONMENT) {
        config.environment = value
            .parse::<Environment>()
            .map_err(ConfigError::Environment)?;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_file_and_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [backend]
            base_url = "http://127.0.0.1:4000/api"

            [session]
            cookie_name = "plenti_token"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.session.cookie_name, "plenti_token");
        assert_eq!(config.backend.base_url.as_deref(), Some("http://127.0.0.1:4000/api"));
    }

    #[test]
    fn parse_errors_surface() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend\nbase_url = 3").unwrap();

        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let env = |key: &str| match key {
            ENV_API_URL => Some("https://api.plenti.test".to_string()),
            ENV_ENVIRONMENT => Some("production".to_string()),
            _ => None,
        };

        let config = finalize(GatewayConfig::default(), env).unwrap();
        assert_eq!(config.backend.base_url.as_deref(), Some("https://api.plenti.test"));
        assert!(config.environment.is_production());
    }

    #[test]
    fn blank_api_url_is_ignored() {
        let env = |key: &str| (key == ENV_API_URL).then(|| "  ".to_string());
        let config = finalize(GatewayConfig::default(), env).unwrap();
        assert!(config.backend.base_url.is_none());
    }

    #[test]
    fn bad_environment_is_rejected() {
        let env = |key: &str| (key == ENV_ENVIRONMENT).then(|| "qa".to_string());
        assert!(matches!(
            finalize(GatewayConfig::default(), env),
            Err(ConfigError::Environment(_))
        ));
    }

    #[test]
    fn validation_errors_are_joined() {
        let mut config = GatewayConfig::default();
        config.session.max_age_secs = 0;
        config.session.cookie_name = String::new();

        let err = finalize(config, |_| None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: session.cookie_name: must not be empty, session.max_age_secs: must be greater than 0"
        );
    }
}
