#![allow(dead_code, missing_docs, clippy::expect_used)]
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;
use url::Url;

use chirpy_contract::{ChirpyConfig, SecureString};

pub const EMAIL: &str = "walt@breakingbad.com";
pub const PASSWORD: &str = "123456";

/// How the mock answers chirp payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractVersion {
    /// The shape clients rely on.
    Current,
    /// A release that renamed `author_name` and turned `user_id` into a number.
    Breaking,
}

#[derive(Debug)]
struct User {
    id: String,
    email: String,
    password: String,
    created_at: String,
}

#[derive(Debug)]
struct Store {
    contract: ContractVersion,
    users: Vec<User>,
    tokens: HashMap<String, String>,
    chirps: HashMap<String, Value>,
}

type SharedStore = Arc<Mutex<Store>>;

/// In-process stand-in for the three Chirpy endpoints, one seeded account.
///
/// The server task is aborted on drop.
#[derive(Debug)]
pub struct MockChirpy {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockChirpy {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(ContractVersion::Current).await
    }

    pub async fn start_with(contract: ContractVersion) -> anyhow::Result<Self> {
        let store = Store {
            contract,
            users: vec![User {
                id: uuid::Uuid::now_v7().to_string(),
                email: EMAIL.to_owned(),
                password: PASSWORD.to_owned(),
                created_at: jiff::Timestamp::now().to_string(),
            }],
            tokens: HashMap::new(),
            chirps: HashMap::new(),
        };
        let router = Router::new()
            .route("/api/login", post(login))
            .route("/api/chirps", post(create_chirp))
            .route("/api/chirps/{id}", get(get_chirp))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::new(Mutex::new(store)));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        info!(%addr, ?contract, "launching mock chirpy");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("mock chirpy stopped");
        });

        Ok(Self { addr, handle })
    }

    pub fn base_url(&self) -> Url {
        format!("http://{}", self.addr)
            .parse()
            .expect("valid local url")
    }

    /// A configuration pointing at this server with the seeded account.
    pub fn config(&self) -> ChirpyConfig {
        ChirpyConfig {
            base_url: self.base_url(),
            email: EMAIL.to_owned(),
            password: SecureString::from(PASSWORD),
        }
    }
}

impl Drop for MockChirpy {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct NewChirp {
    body: String,
    expiration_datetime: String,
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn login(
    State(store): State<SharedStore>,
    Json(credentials): Json<Credentials>,
) -> Response {
    let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
    let Some((id, email, created_at)) = store
        .users
        .iter()
        .find(|user| user.email == credentials.email && user.password == credentials.password)
        .map(|user| (user.id.clone(), user.email.clone(), user.created_at.clone()))
    else {
        return error(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    };

    let token = uuid::Uuid::now_v7().simple().to_string();
    let refresh_token = uuid::Uuid::now_v7().simple().to_string();
    store.tokens.insert(token.clone(), id.clone());

    Json(json!({
        "id": id,
        "created_at": created_at,
        "updated_at": created_at,
        "email": email,
        "is_chirpy_red": false,
        "token": token,
        "refresh_token": refresh_token,
    }))
    .into_response()
}

async fn create_chirp(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Json(chirp): Json<NewChirp>,
) -> Response {
    let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
    let user_id = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| store.tokens.get(token))
        .cloned();
    let Some(user_id) = user_id else {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    let id = uuid::Uuid::now_v7().to_string();
    let now = jiff::Timestamp::now().to_string();
    let payload = match store.contract {
        ContractVersion::Current => json!({
            "id": id,
            "author_name": "Walter White",
            "body": chirp.body,
            "created_at": now,
            "updated_at": now,
            "expiration_datetime": chirp.expiration_datetime,
            "user_id": user_id,
        }),
        ContractVersion::Breaking => json!({
            "id": id,
            "author": "Walter White",
            "body": chirp.body,
            "created_at": now,
            "updated_at": now,
            "expiration_datetime": chirp.expiration_datetime,
            "user_id": 1,
        }),
    };
    store.chirps.insert(id, payload.clone());

    (StatusCode::CREATED, Json(payload)).into_response()
}

async fn get_chirp(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    let store = store.lock().unwrap_or_else(PoisonError::into_inner);
    match store.chirps.get(&id) {
        Some(chirp) => Json(chirp.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Chirp not found"),
    }
}
