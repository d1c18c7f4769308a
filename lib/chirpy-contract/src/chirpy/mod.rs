//! The Chirpy domain client.
//!
//! Each operation binds one HTTP call to one expected status and one response
//! schema. A status mismatch is reported before the body is even looked at;
//! a body breaking its schema is reported with every offending field.

use http::StatusCode;
use http::header::AUTHORIZATION;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::ChirpyError;
use crate::client::BaseClient;
use crate::config::ChirpyConfig;
use crate::transport::{RequestOptions, UniformResponse};

mod schemas;
pub use self::schemas::{Chirp, CreateChirp, ErrorResponse, LoginRequest, LoginResponse};

const LOGIN_PATH: &str = "/api/login";
const CHIRPS_PATH: &str = "/api/chirps";

/// Validated client of the Chirpy API.
///
/// # Example
///
/// ```rust,no_run
/// use chirpy_contract::ChirpyClient;
/// use chirpy_contract::chirpy::{CreateChirp, LoginRequest};
///
/// # async fn example() -> Result<(), chirpy_contract::ChirpyError> {
/// let mut client = ChirpyClient::new(
///     chirpy_contract::BaseClient::builder()
///         .with_base_url("http://localhost:8080")?
///         .build()?,
/// );
/// client
///     .authenticate(&LoginRequest::new("walt@breakingbad.com", "123456"))
///     .await?;
///
/// let created = client
///     .create_chirp(&CreateChirp::new("Say my name", "2026-12-31T23:59:59Z"))
///     .await?;
/// let fetched = client.get_chirp(&created.id).await?;
/// assert_eq!(fetched.body, created.body);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChirpyClient {
    base: BaseClient,
}

impl ChirpyClient {
    /// Wraps a base client.
    pub fn new(base: BaseClient) -> Self {
        Self { base }
    }

    /// A fresh, unauthenticated client targeting `config.base_url`.
    ///
    /// # Errors
    ///
    /// See [`BaseClientBuilder::build`](crate::BaseClientBuilder::build).
    pub fn from_config(config: &ChirpyConfig) -> Result<Self, ChirpyError> {
        let base = BaseClient::builder()
            .with_url(config.base_url.clone())
            .build()?;
        Ok(Self::new(base))
    }

    /// The underlying base client.
    pub fn base(&self) -> &BaseClient {
        &self.base
    }

    /// Whether calls carry an `Authorization` header.
    pub fn is_authenticated(&self) -> bool {
        self.base.config().header(AUTHORIZATION.as_str()).is_some()
    }

    /// `POST /api/login`, expecting `200 OK` and a [`LoginResponse`].
    ///
    /// # Errors
    ///
    /// [`ChirpyError::StatusMismatch`] on any other status (e.g. `401` for wrong
    /// credentials), [`ChirpyError::SchemaValidation`] on a malformed payload.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ChirpyError> {
        let options = RequestOptions::post()
            .json(credentials)?
            .with_sensitive_field(LoginRequest::PASSWORD_POINTER);
        self.base
            .make_request(LOGIN_PATH, options)
            .await?
            .into_validated(StatusCode::OK)
    }

    /// Logs in, then sends the returned token with every subsequent call.
    ///
    /// # Errors
    ///
    /// See [`ChirpyClient::login`]; the client headers are left untouched on error.
    pub async fn authenticate(&mut self, credentials: &LoginRequest) -> Result<(), ChirpyError> {
        let response = self.login(credentials).await?;
        self.base.set_bearer_token(&response.token)?;
        tracing::info!(email = %response.email, token = %response.token, "authenticated");
        Ok(())
    }

    /// `POST /api/chirps`, expecting `201 Created` and a [`Chirp`].
    ///
    /// # Errors
    ///
    /// [`ChirpyError::StatusMismatch`] on any other status (e.g. `401` when not
    /// authenticated), [`ChirpyError::SchemaValidation`] on a malformed chirp.
    pub async fn create_chirp(&self, chirp: &CreateChirp) -> Result<Chirp, ChirpyError> {
        let options = RequestOptions::post().json(chirp)?;
        self.base
            .make_request(CHIRPS_PATH, options)
            .await?
            .into_validated(StatusCode::CREATED)
    }

    /// `GET /api/chirps/{id}`, expecting `200 OK` and a [`Chirp`].
    ///
    /// The id is percent-encoded as one path segment.
    ///
    /// # Errors
    ///
    /// [`ChirpyError::InvalidPathSegment`] for an empty, `.` or `..` id,
    /// [`ChirpyError::StatusMismatch`] on any other status than `200` (e.g. `404`
    /// for an unknown id), [`ChirpyError::SchemaValidation`] on a malformed chirp.
    pub async fn get_chirp(&self, id: &str) -> Result<Chirp, ChirpyError> {
        self.base
            .make_request(&chirp_path(id)?, RequestOptions::get())
            .await?
            .into_validated(StatusCode::OK)
    }

    /// Issues an arbitrary call, with neither status check nor validation.
    ///
    /// Meant for negative tests: inspect the [`UniformResponse`] and validate
    /// its body against the schema of your choice.
    ///
    /// # Errors
    ///
    /// Only when no response is received, see [`BaseClient::make_request`].
    pub async fn raw_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<UniformResponse, ChirpyError> {
        self.base.make_request(path, options).await
    }
}

fn chirp_path(id: &str) -> Result<String, ChirpyError> {
    // `%2E%2E` is still a parent segment for URL parsers
    if matches!(id, "" | "." | "..") {
        return Err(ChirpyError::InvalidPathSegment {
            value: id.to_owned(),
        });
    }
    let id = utf8_percent_encode(id, NON_ALPHANUMERIC);
    Ok(format!("{CHIRPS_PATH}/{id}"))
}
