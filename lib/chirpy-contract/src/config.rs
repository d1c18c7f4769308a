use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ChirpyError;
use crate::auth::SecureString;

/// Default location of the API under test.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Prefix of the environment variables overriding the configuration.
pub const ENV_PREFIX: &str = "CHIRPY_";

/// Where the API under test lives and which account the tests log in with.
///
/// Loaded by [`figment`] from, later sources winning:
///
/// 1. defaults (`base_url = http://localhost:8080`),
/// 2. an optional YAML file,
/// 3. `CHIRPY_BASE_URL`, `CHIRPY_EMAIL` and `CHIRPY_PASSWORD`.
///
/// ```yaml
/// base_url: https://chirpy.example.com
/// email: walt@breakingbad.com
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChirpyConfig {
    /// Base URL every path is resolved against.
    pub base_url: Url,
    /// Email of the test account.
    pub email: String,
    /// Password of the test account.
    pub password: SecureString,
}

impl ChirpyConfig {
    /// Loads the configuration, reading `file` first if given.
    ///
    /// # Errors
    ///
    /// [`ChirpyError::Config`] if a credential is missing or a value cannot be
    /// parsed, [`ChirpyError::InvalidConfig`] if a value is unusable.
    pub fn load(file: Option<&Path>) -> Result<Self, ChirpyError> {
        Self::from_figment(&Self::figment(file))
    }

    /// Loads the configuration from defaults and the environment only.
    ///
    /// # Errors
    ///
    /// See [`ChirpyConfig::load`].
    pub fn from_env() -> Result<Self, ChirpyError> {
        Self::load(None)
    }

    /// The layered sources, before extraction.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::default("base_url", DEFAULT_BASE_URL));
        if let Some(file) = file {
            figment = figment.merge(Yaml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extracts and checks the configuration from `figment`.
    ///
    /// # Errors
    ///
    /// See [`ChirpyConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ChirpyError> {
        let config = figment.extract::<Self>()?;
        config.check()?;
        tracing::debug!(base_url = %config.base_url, email = %config.email, "configuration loaded");
        Ok(config)
    }

    fn check(&self) -> Result<(), ChirpyError> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "base_url must be an http(s) URL, got `{}`",
                self.base_url
            )));
        }
        if self.email.trim().is_empty() {
            return Err(invalid("email is empty"));
        }
        if self.password.expose().is_empty() {
            return Err(invalid("password is empty"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ChirpyError {
    ChirpyError::InvalidConfig {
        message: message.into(),
    }
}
