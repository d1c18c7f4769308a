use indexmap::IndexMap;
use url::Url;

use super::{BaseClient, FetchConfig};
use crate::ChirpyError;
use crate::config::DEFAULT_BASE_URL;

/// Builder for [`BaseClient`].
///
/// # Default Configuration
///
/// - **Base URL**: `http://localhost:8080`
/// - **Headers**: none
/// - **HTTP client**: a fresh `reqwest::Client`, with its default timeouts
///
/// # Example
///
/// ```rust
/// use chirpy_contract::BaseClient;
///
/// # fn example() -> Result<(), chirpy_contract::ChirpyError> {
/// let client = BaseClient::builder()
///     .with_base_url("https://chirpy.example.com")?
///     .with_header("Accept", "application/json")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaseClientBuilder {
    client: Option<reqwest::Client>,
    base_url: Option<Url>,
    headers: IndexMap<String, String>,
}

impl BaseClientBuilder {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Fails if the default base URL is used and cannot be parsed.
    pub fn build(self) -> Result<BaseClient, ChirpyError> {
        let Self {
            client,
            base_url,
            headers,
        } = self;

        let base_url = match base_url {
            Some(base_url) => base_url,
            None => DEFAULT_BASE_URL.parse()?,
        };
        let mut config = FetchConfig::new(base_url, IndexMap::new());
        for (name, value) in headers {
            config.set_header(name, value);
        }

        Ok(BaseClient {
            handle: client.unwrap_or_default(),
            config,
        })
    }

    /// Sets the base URL, e.g. `https://chirpy.example.com`.
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not an absolute URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ChirpyError> {
        self.base_url = Some(base_url.parse()?);
        Ok(self)
    }

    /// Sets an already parsed base URL.
    #[must_use]
    pub fn with_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Adds a header sent with every call.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Uses the given `reqwest::Client` as transport handle.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }
}
