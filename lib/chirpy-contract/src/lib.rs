//! # Chirpy Contract
//!
//! Catch breaking changes of the Chirpy API from your test code.
//!
//! Every call goes through the same pipeline:
//!
//! 1. [`transport::fetch`] issues the HTTP call and normalizes the answer into
//!    a [`UniformResponse`](transport::UniformResponse) whose body stays
//!    [untyped](schema::UntypedBody),
//! 2. the status is checked against the one the operation is bound to,
//! 3. the body is validated against the JSON Schema derived from its Rust type,
//!    reporting **every** mismatched field,
//! 4. the typed value is handed back.
//!
//! The crate splits into:
//!
//! - **[`BaseClient`]**: base URL, client-level headers and one
//!   `make_request` entry point, no validation,
//! - **[`ChirpyClient`]**: `login`, `authenticate`, `create_chirp`,
//!   `get_chirp`, each validated, plus `raw_request` for negative tests,
//! - **[`ChirpySession`]**: an authenticated client scoped to one test,
//! - **[`schema`]**: schema declarations and the validation registry.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chirpy_contract::ChirpySession;
//! use chirpy_contract::chirpy::CreateChirp;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads CHIRPY_BASE_URL, CHIRPY_EMAIL and CHIRPY_PASSWORD
//! let session = ChirpySession::from_env().await?;
//!
//! let created = session
//!     .create_chirp(&CreateChirp::new("Say my name", "2026-12-31T23:59:59Z"))
//!     .await?;
//! let fetched = session.get_chirp(&created.id).await?;
//! assert_eq!(fetched.body, created.body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Negative tests
//!
//! [`ChirpyClient::raw_request`] performs neither status check nor validation,
//! the body can then be validated against any schema:
//!
//! ```rust,no_run
//! use chirpy_contract::ChirpyClient;
//! use chirpy_contract::chirpy::{ErrorResponse, LoginRequest};
//! use chirpy_contract::transport::RequestOptions;
//!
//! # async fn example(client: ChirpyClient) -> Result<(), chirpy_contract::ChirpyError> {
//! let credentials = LoginRequest::new("notExistingUser123@test.com", "invalid");
//! let options = RequestOptions::post()
//!     .json(&credentials)?
//!     .with_sensitive_field(LoginRequest::PASSWORD_POINTER);
//! let response = client.raw_request("/api/login", options).await?;
//!
//! assert_eq!(response.status().as_u16(), 401);
//! let error = response.data().parse::<ErrorResponse>()?;
//! assert_eq!(error.error, "Incorrect email or password");
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Calls are traced with [`tracing`]: one `info` event per request inside a
//! `request` span. Secrets are only ever logged masked: the `Authorization`
//! header is flagged sensitive, body fields named with
//! [`RequestOptions::with_sensitive_field`](transport::RequestOptions::with_sensitive_field)
//! are replaced in the logged body. Install a subscriber
//! to see them, e.g. `tracing_subscriber::fmt().with_test_writer().try_init()`.

mod auth;
pub use self::auth::{Authentication, SecureString};

pub mod chirpy;
pub use self::chirpy::ChirpyClient;

mod client;
pub use self::client::{BaseClient, BaseClientBuilder, FetchConfig};

mod config;
pub use self::config::{ChirpyConfig, DEFAULT_BASE_URL, ENV_PREFIX};

mod error;
pub use self::error::ChirpyError;

mod fixture;
pub use self::fixture::ChirpySession;

pub mod schema;

pub mod transport;
