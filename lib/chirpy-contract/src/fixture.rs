use crate::ChirpyError;
use crate::chirpy::{ChirpyClient, LoginRequest};
use crate::config::ChirpyConfig;

/// An authenticated [`ChirpyClient`] scoped to one test.
///
/// The session derefs to its client. Dropping it, whether the test passed,
/// failed or panicked, releases the client and its connection pool.
///
/// ```rust,no_run
/// use chirpy_contract::ChirpySession;
/// use chirpy_contract::chirpy::CreateChirp;
///
/// # async fn example() -> Result<(), chirpy_contract::ChirpyError> {
/// let session = ChirpySession::from_env().await?;
/// let chirp = session
///     .create_chirp(&CreateChirp::new("Say my name", "2026-12-31T23:59:59Z"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, derive_more::Deref, derive_more::DerefMut)]
pub struct ChirpySession {
    #[deref]
    #[deref_mut]
    client: ChirpyClient,
    email: String,
}

impl ChirpySession {
    /// Builds a fresh client for `config.base_url` and logs in with the
    /// configured account.
    ///
    /// # Errors
    ///
    /// Fails if the login does not answer `200 OK` with a valid token payload.
    pub async fn start(config: &ChirpyConfig) -> Result<Self, ChirpyError> {
        tracing::info!(base_url = %config.base_url, email = %config.email, "starting session");
        let mut client = ChirpyClient::from_config(config)?;
        let credentials = LoginRequest::new(config.email.clone(), config.password.clone());
        client.authenticate(&credentials).await?;

        Ok(Self {
            client,
            email: config.email.clone(),
        })
    }

    /// Loads [`ChirpyConfig::from_env`], then starts a session.
    ///
    /// # Errors
    ///
    /// See [`ChirpyConfig::load`] and [`ChirpySession::start`].
    pub async fn from_env() -> Result<Self, ChirpyError> {
        let config = ChirpyConfig::from_env()?;
        Self::start(&config).await
    }

    /// Email of the logged-in account.
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Drop for ChirpySession {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::warn!(email = %self.email, "session released during panic");
        } else {
            tracing::info!(email = %self.email, "session released");
        }
    }
}
