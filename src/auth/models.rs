//! Wire types for the `/api/auth/` endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub plan: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub timezone: String,
    pub currency: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Response body of login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: UserProfile,
    pub org: Option<Organization>,
    pub tokens: TokenPair,
}

/// Response body of `/api/auth/me/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Me {
    pub user: UserProfile,
    pub organizations: Vec<Organization>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub name: String,
    pub org_name: String,
}

/// The refresh endpoint returns a new access token and may rotate the
/// refresh token alongside it.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}
