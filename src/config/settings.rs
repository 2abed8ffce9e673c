use crate::utils::error::{IonError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::Deserialize;
use std::path::Path;

pub const ENV_CLIENT_ID: &str = "PRISMASASE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "PRISMASASE_CLIENT_SECRET";
pub const ENV_TSG_ID: &str = "PRISMASASE_TSG_ID";
pub const ENV_API_BASE: &str = "PRISMASASE_API_BASE";
pub const ENV_AUTH_BASE: &str = "PRISMASASE_AUTH_BASE";

/// Service-account credentials plus optional endpoint overrides. Loaded from
/// a TOML settings file, falling back to environment variables, and validated
/// before any network work starts.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub tsg_id: String,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub auth_base: Option<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Settings file '{}' not found, reading credentials from environment",
                path.display()
            );
            Self::from_env()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings =
            toml::from_str(&content).map_err(|e| IonError::InvalidConfigValueError {
                field: "settings".to_string(),
                value: path.display().to_string(),
                reason: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        let settings = Settings {
            client_id: required_env(ENV_CLIENT_ID)?,
            client_secret: required_env(ENV_CLIENT_SECRET)?,
            tsg_id: required_env(ENV_TSG_ID)?,
            api_base: std::env::var(ENV_API_BASE).ok(),
            auth_base: std::env::var(ENV_AUTH_BASE).ok(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| IonError::MissingConfigError {
        field: name.to_string(),
    })
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("client_id", &self.client_id)?;
        validate_non_empty_string("client_secret", &self.client_secret)?;
        validate_non_empty_string("tsg_id", &self.tsg_id)?;
        if let Some(api_base) = &self.api_base {
            validate_url("api_base", api_base)?;
        }
        if let Some(auth_base) = &self.auth_base {
            validate_url("auth_base", auth_base)?;
        }
        Ok(())
    }
}
