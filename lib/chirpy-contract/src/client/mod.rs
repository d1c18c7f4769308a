//! A thin client owning a base URL and a set of headers.
//!
//! [`BaseClient`] neither checks statuses nor validates bodies: it resolves the
//! path, merges headers, and hands the call to [`transport::fetch`]. Typed,
//! validated operations live on top of it, see [`ChirpyClient`](crate::ChirpyClient).

use url::Url;

use crate::ChirpyError;
use crate::auth::{Authentication, SecureString};
use crate::transport::{self, RequestOptions, UniformResponse};

mod builder;
pub use self::builder::BaseClientBuilder;

mod fetch_config;
pub use self::fetch_config::FetchConfig;

/// HTTP client bound to one base URL.
///
/// Header mutations take `&mut self`: a client is owned by one test flow at a
/// time. Cloning a client clones its header set, the clones evolve
/// independently while sharing the connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use chirpy_contract::BaseClient;
/// use chirpy_contract::transport::RequestOptions;
///
/// # async fn example() -> Result<(), chirpy_contract::ChirpyError> {
/// let mut client = BaseClient::builder()
///     .with_base_url("http://localhost:8080")?
///     .build()?;
/// client.set_header("Accept", "application/json");
///
/// let response = client
///     .make_request("/api/healthz", RequestOptions::get())
///     .await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BaseClient {
    handle: reqwest::Client,
    config: FetchConfig,
}

impl BaseClient {
    /// Starts building a client.
    pub fn builder() -> BaseClientBuilder {
        BaseClientBuilder::default()
    }

    /// The base URL and the client-level headers.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// The base URL every relative path is resolved against.
    pub fn base_url(&self) -> &Url {
        self.config.base_url()
    }

    /// Sets a header sent with every subsequent call.
    ///
    /// An existing header with the same name, in any case, is replaced.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.config.set_header(name.into(), value.into());
    }

    /// Removes a client-level header, returning its previous value.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.config.remove_header(name)
    }

    /// Sends `authentication` with every subsequent call.
    ///
    /// # Errors
    ///
    /// Fails if the credentials cannot be carried by a header value.
    pub fn set_authentication(
        &mut self,
        authentication: &Authentication,
    ) -> Result<(), ChirpyError> {
        let (name, value) = authentication.to_header()?;
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        self.set_header(name.as_str(), value);
        tracing::debug!(%authentication, "authentication set");
        Ok(())
    }

    /// Sends `Authorization: Bearer <token>` with every subsequent call.
    ///
    /// # Errors
    ///
    /// Fails if the token cannot be carried by a header value.
    pub fn set_bearer_token(&mut self, token: &SecureString) -> Result<(), ChirpyError> {
        self.set_authentication(&Authentication::Bearer(token.clone()))
    }

    /// Issues one call against `path`.
    ///
    /// Per-call headers from `options` override client headers of the same
    /// name. Any received response is returned as is, whatever its status.
    ///
    /// # Errors
    ///
    /// See [`transport::fetch`]; an invalid `path` fails with [`ChirpyError::Url`].
    pub async fn make_request(
        &self,
        path: &str,
        mut options: RequestOptions,
    ) -> Result<UniformResponse, ChirpyError> {
        let url = self.config.resolve(path)?;
        options.headers = self.config.merged_headers(&options.headers);
        transport::fetch(&self.handle, url, options).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client_for(server: &MockServer) -> BaseClient {
        BaseClient::builder()
            .with_base_url(&server.base_url())
            .expect("valid mock url")
            .with_header("X-Client", "chirpy-contract")
            .with_header("Accept", "application/json")
            .build()
            .expect("valid client")
    }

    #[tokio::test]
    async fn should_merge_client_and_call_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/chirps/1")
                    .header("x-client", "chirpy-contract")
                    .header("accept", "text/plain")
                    .header("x-request-id", "42");
                then.status(200).body("ok");
            })
            .await;
        let client = client_for(&server);

        let options = RequestOptions::get()
            .with_header("accept", "text/plain")
            .with_header("X-Request-Id", "42");
        let response = client
            .make_request("/api/chirps/1", options)
            .await
            .expect("response");

        mock.assert_async().await;
        assert_eq!(response.data().as_untyped(), &json!("ok"));
        assert_eq!(client.config().header("accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn should_send_bearer_token_once_set() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/chirps")
                    .header("authorization", "Bearer the-token");
                then.status(201);
            })
            .await;
        let mut client = client_for(&server);

        client
            .set_bearer_token(&SecureString::from("the-token"))
            .expect("valid token");
        let response = client
            .make_request("api/chirps", RequestOptions::post())
            .await
            .expect("response");

        mock.assert_async().await;
        assert_eq!(response.status().as_u16(), 201);
    }

    #[tokio::test]
    async fn should_keep_headers_of_clones_independent() {
        let server = MockServer::start_async().await;
        let mut client = client_for(&server);
        let other = client.clone();

        client
            .set_bearer_token(&SecureString::from("the-token"))
            .expect("valid token");

        assert!(client.config().header("authorization").is_some());
        assert!(other.config().header("authorization").is_none());
        assert_eq!(
            client.remove_header("AUTHORIZATION").as_deref(),
            Some("Bearer the-token")
        );
    }

    #[tokio::test]
    async fn should_reject_invalid_header_before_sending() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.path("/api/healthz");
                then.status(200);
            })
            .await;
        let mut client = client_for(&server);
        client.set_header("X-Broken", "line\nbreak");

        let result = client.make_request("/api/healthz", RequestOptions::get()).await;

        assert!(matches!(result, Err(ChirpyError::InvalidHeaderValue(_))));
        mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn should_send_put_and_delete_with_custom_http_client() {
        let server = MockServer::start_async().await;
        let put = server
            .mock_async(|when, then| {
                when.method(Method::PUT)
                    .path("/api/chirps/42")
                    .header("user-agent", "chirpy-contract-tests")
                    .json_body(json!({"body": "edited"}));
                then.status(200);
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(Method::DELETE)
                    .path("/api/chirps/42")
                    .header("user-agent", "chirpy-contract-tests");
                then.status(204);
            })
            .await;
        let http_client = reqwest::Client::builder()
            .user_agent("chirpy-contract-tests")
            .build()
            .expect("valid http client");
        let client = BaseClient::builder()
            .with_base_url(&server.base_url())
            .expect("valid mock url")
            .with_http_client(http_client)
            .build()
            .expect("valid client");

        let options = RequestOptions::put()
            .json(&json!({"body": "edited"}))
            .expect("serializable");
        let updated = client
            .make_request("/api/chirps/42", options)
            .await
            .expect("response");
        let deleted = client
            .make_request("/api/chirps/42", RequestOptions::delete())
            .await
            .expect("response");

        put.assert_async().await;
        delete.assert_async().await;
        assert_eq!(updated.status().as_u16(), 200);
        assert_eq!(deleted.status().as_u16(), 204);
    }
}
