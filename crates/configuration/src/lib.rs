use crate::error::ConfigError;
use std::env;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ApiSettings, DatabaseSettings, LoggingSettings, Settings, StorageBackend, WebSettings};

/// Minimum length of a session key, as required by the cookie encryption.
pub const MIN_SESSION_KEY_LEN: usize = 64;

/// Loads the application configuration.
///
/// Sources, lowest precedence first: the TOML file at `path` (optional),
/// `FLEETBOOK__SECTION__KEY` environment variables, then the well-known
/// `API_URL` and `DATABASE_URL` variables.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("FLEETBOOK")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let mut settings = builder.try_deserialize::<Settings>()?;
    settings.apply_overrides(env::var("API_URL").ok(), env::var("DATABASE_URL").ok());
    settings.validate()?;

    tracing::debug!(path = %path.display(), backend = ?settings.database.backend, "Configuration loaded.");
    Ok(settings)
}

impl Settings {
    /// Applies the unprefixed environment overrides the deployment scripts use.
    pub fn apply_overrides(&mut self, api_url: Option<String>, database_url: Option<String>) {
        if let Some(api_url) = api_url.filter(|v| !v.trim().is_empty()) {
            self.web.api_url = api_url;
        }
        if let Some(database_url) = database_url.filter(|v| !v.trim().is_empty()) {
            self.database.url = Some(database_url);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.web.api_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("web.api_url must not be empty".to_string()));
        }
        if let Some(key) = &self.web.session_key {
            if key.len() < MIN_SESSION_KEY_LEN {
                return Err(ConfigError::ValidationError(format!(
                    "web.session_key must be at least {MIN_SESSION_KEY_LEN} bytes, got {}",
                    key.len()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_config(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(settings.api.bind_addr.port(), 8000);
        assert_eq!(settings.web.bind_addr.port(), 5000);
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.logging.filter, "info");
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[database]
backend = "memory"
max_connections = 3

[api]
bind_addr = "127.0.0.1:9100"
"#
        )
        .unwrap();

        let settings = load_config(file.path()).unwrap();
        assert_eq!(settings.database.backend, StorageBackend::Memory);
        assert_eq!(settings.database.max_connections, 3);
        assert_eq!(settings.api.bind_addr, "127.0.0.1:9100".parse().unwrap());
    }

    #[test]
    fn well_known_variables_override_the_file() {
        let mut settings = Settings::default();
        settings.apply_overrides(Some("http://api:8000".into()), Some("postgres://db/fleet".into()));
        assert_eq!(settings.web.api_url, "http://api:8000");
        assert_eq!(settings.database.url.as_deref(), Some("postgres://db/fleet"));

        settings.apply_overrides(Some(String::new()), None);
        assert_eq!(settings.web.api_url, "http://api:8000");
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(9), false)]
    #[case(Some(MIN_SESSION_KEY_LEN - 1), false)]
    #[case(Some(MIN_SESSION_KEY_LEN), true)]
    fn session_key_length_is_checked(#[case] len: Option<usize>, #[case] valid: bool) {
        let mut settings = Settings::default();
        settings.web.session_key = len.map(|n| "k".repeat(n));
        match settings.validate() {
            Ok(()) => assert!(valid),
            Err(ConfigError::ValidationError(_)) => assert!(!valid),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
