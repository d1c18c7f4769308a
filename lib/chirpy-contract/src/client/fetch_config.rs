use std::fmt;

use http::header::AUTHORIZATION;
use indexmap::IndexMap;
use url::Url;

use crate::ChirpyError;
use crate::auth::SecureString;

/// Base URL and headers shared by every call of one client.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchConfig {
    base_url: Url,
    headers: IndexMap<String, String>,
}

impl FetchConfig {
    pub(crate) fn new(base_url: Url, headers: IndexMap<String, String>) -> Self {
        Self { base_url, headers }
    }

    /// The base URL every relative path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client-level headers, in insertion order.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Looks up a header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn set_header(&mut self, name: String, value: String) {
        self.remove_header(&name);
        self.headers.insert(name, value);
    }

    pub(crate) fn remove_header(&mut self, name: &str) -> Option<String> {
        let key = self
            .headers
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()?;
        self.headers.shift_remove(&key)
    }

    /// Resolves `path` against the base URL.
    ///
    /// Absolute `http(s)` URLs are returned as-is; other paths are appended to
    /// the base URL, keeping its path prefix.
    pub(crate) fn resolve(&self, path: &str) -> Result<Url, ChirpyError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path.parse()?);
        }
        let url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(url.parse()?)
    }

    /// Client headers overridden by `overrides` on a case-insensitive name collision.
    pub(crate) fn merged_headers(
        &self,
        overrides: &IndexMap<String, String>,
    ) -> IndexMap<String, String> {
        let mut merged = self.clone();
        for (name, value) in overrides {
            merged.set_header(name.clone(), value.clone());
        }
        merged.headers
    }
}

impl fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                let value = if name.eq_ignore_ascii_case(AUTHORIZATION.as_str()) {
                    SecureString::mask(value)
                } else {
                    value.clone()
                };
                (name.as_str(), value)
            })
            .collect::<Vec<_>>();
        f.debug_struct("FetchConfig")
            .field("base_url", &self.base_url.as_str())
            .field("headers", &headers)
            .finish()
    }
}
