use std::future::Future;

use serde::Deserialize;

use crate::client::{ApiClient, ClientError};

/// Body of `GET /api/auth/get-user-by-id/{id}`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UserEnvelope {
    pub message: Option<UserProfile>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Read-only access to user profiles.
pub trait UserDirectory {
    fn fetch_user_by_id(&self, id: &str) -> impl Future<Output = Result<UserEnvelope, ClientError>> + Send;
}

impl UserDirectory for ApiClient {
    async fn fetch_user_by_id(&self, id: &str) -> Result<UserEnvelope, ClientError> {
        self.get_json(&format!("/api/auth/get-user-by-id/{}", id), "Failed to fetch user data").await
    }
}
