use std::future::Future;

use serde::Serialize;
use spdlog::{debug, warn};

use crate::client::session::{KeyValueStore, Session, SessionError, SessionStore};
use crate::client::{failure_message, ApiClient, ClientError};

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Remote authentication endpoints.
pub trait AuthApi {
    fn login(&self, request: &LoginRequest) -> impl Future<Output = Result<Session, ClientError>> + Send;
    fn register(&self, registration: &Registration) -> impl Future<Output = Result<Session, ClientError>> + Send;
}

impl ApiClient {
    async fn post_auth<T: Serialize + Sync>(&self, path: &str, body: &T, failure: &'static str) -> Result<Session, ClientError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let resp = self.http().post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { context: failure, source })?;

        if !resp.status().is_success() {
            return Err(ClientError::Failed(failure_message(resp, failure).await));
        }

        resp.json::<Session>()
            .await
            .map_err(|source| ClientError::Transport { context: failure, source })
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError> {
        self.post_auth("/api/auth/login", request, "Login failed").await
    }

    async fn register(&self, registration: &Registration) -> Result<Session, ClientError> {
        self.post_auth("/api/auth/register", registration, "Registration failed").await
    }
}

/// Login, register and logout on top of a session store.
pub struct Auth<A: AuthApi, K: KeyValueStore> {
    api: A,
    sessions: SessionStore<K>,
}

impl<A: AuthApi, K: KeyValueStore> Auth<A, K> {
    pub fn new(api: A, storage: K) -> Self {
        Auth {
            api,
            sessions: SessionStore::new(storage),
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session = self.api.login(&request).await.inspect_err(|e| {
            warn!("Login of {} failed: {}", email, e);
        })?;
        self.sessions.save(&session)?;
        Ok(session)
    }

    pub async fn register(&mut self, registration: &Registration) -> Result<Session, ClientError> {
        let session = self.api.register(registration).await.inspect_err(|e| {
            warn!("Registration of {} failed: {}", registration.email, e);
        })?;
        self.sessions.save(&session)?;
        Ok(session)
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.sessions.clear()
    }

    pub fn token(&self) -> Option<String> {
        self.sessions.token()
    }

    pub fn current(&self) -> Option<Session> {
        self.sessions.current()
    }
}
