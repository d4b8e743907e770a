//! Session lifecycle and the refresh path shared by every
//! authenticated request.
//!
//! All authenticated calls go through [`Session::send_with_auth`]: attach
//! the stored access token, and on a 401 refresh it and retry the request
//! exactly once. Concurrent 401s share a single refresh request; whoever
//! wins the lock talks to the server, everyone else picks up the rotated
//! token from the store.

use std::sync::Arc;

use anyhow::{Error, Result, anyhow, bail};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::Mutex;

use crate::auth::models::{AuthPayload, Me, RefreshResponse, RegisterRequest};
use crate::auth::store::SessionStore;
use crate::core::config::AppConfig;

#[derive(Clone)]
pub struct Session {
    base_url: String,
    http: Client,
    store: SessionStore,
    refresh_lock: Arc<Mutex<()>>,
}

impl Session {
    pub fn new(config: &AppConfig, store: SessionStore) -> Self {
        Self {
            base_url: config.backend_url.clone(),
            http: Client::new(),
            store,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// POST /api/auth/login/ and persist the returned session. A 401
    /// here means invalid credentials, never an expired token, so this
    /// path does not touch the refresh flow.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload> {
        let url = format!("{}/api/auth/login/", self.base_url);
        let res = self
            .http
            .post(&url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let payload: AuthPayload = read_json(res, "Login").await?;
        self.persist(&payload).await?;
        tracing::info!("Logged in as {}", payload.user.email);
        Ok(payload)
    }

    /// POST /api/auth/register/ creating a user plus their organization,
    /// then persist the returned session.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthPayload> {
        let url = format!("{}/api/auth/register/", self.base_url);
        let res = self.http.post(&url).json(req).send().await?;
        let payload: AuthPayload = read_json(res, "Registration").await?;
        self.persist(&payload).await?;
        Ok(payload)
    }

    async fn persist(&self, payload: &AuthPayload) -> Result<()> {
        self.store
            .save_tokens(&payload.tokens.access, &payload.tokens.refresh)
            .await?;
        self.store.save_user(&payload.user).await?;
        if let Some(org) = &payload.org {
            self.store.save_org_id(&org.id).await?;
        }
        Ok(())
    }

    /// GET /api/auth/me/ for the signed-in user.
    pub async fn me(&self) -> Result<Me> {
        let url = format!("{}/api/auth/me/", self.base_url);
        let res = self.send_with_auth(|| self.http.get(&url)).await?;
        read_json(res, "Profile fetch").await
    }

    /// Best-effort server logout followed by a local wipe. The wipe
    /// always happens.
    pub async fn logout(&self) -> Result<()> {
        if let Some(access) = self.store.access_token().await? {
            let url = format!("{}/api/auth/logout/", self.base_url);
            match self.http.post(&url).bearer_auth(&access).send().await {
                Ok(res) if !res.status().is_success() => {
                    tracing::warn!("Logout request returned {}", res.status());
                }
                Err(err) => tracing::warn!("Logout request failed: {}", err),
                Ok(_) => {}
            }
        }
        self.store.clear().await
    }

    /// Send an authenticated request, refreshing the access token and
    /// retrying the request exactly once on 401. A 401 on the retry is
    /// returned to the caller as-is; no second refresh is attempted.
    pub async fn send_with_auth<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let access = self
            .store
            .access_token()
            .await?
            .ok_or_else(not_logged_in)?;
        let res = build().bearer_auth(&access).send().await?;
        if res.status() != StatusCode::UNAUTHORIZED {
            return Ok(res);
        }

        let fresh = self.refresh_access_token(&access).await?;
        Ok(build().bearer_auth(&fresh).send().await?)
    }

    /// Exchange the refresh token for a new access token. At most one
    /// refresh request is in flight at a time: callers that lose the
    /// race wait on the lock, then find the rotated token already in
    /// the store and return it without another round trip. Any failure
    /// clears both tokens so every waiter sees the session end.
    pub async fn refresh_access_token(&self, stale_access: &str) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.store.access_token().await? {
            if current != stale_access {
                return Ok(current);
            }
        }

        let Some(refresh) = self.store.refresh_token().await? else {
            self.store.clear_tokens().await?;
            bail!("Session expired: no refresh token stored. Run `finpilot login`.");
        };

        match self.request_refresh(&refresh).await {
            Ok(parsed) => {
                // The server may rotate the refresh token; keep the old
                // one when it doesn't.
                let rotated = parsed.refresh.unwrap_or(refresh);
                self.store.save_tokens(&parsed.access, &rotated).await?;
                tracing::debug!("Access token refreshed");
                Ok(parsed.access)
            }
            Err(err) => {
                self.store.clear_tokens().await?;
                Err(err)
            }
        }
    }

    async fn request_refresh(&self, refresh: &str) -> Result<RefreshResponse> {
        let url = format!("{}/api/auth/refresh/", self.base_url);
        let res = self
            .http
            .post(&url)
            .json(&json!({ "refresh": refresh }))
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            bail!("Token refresh failed: {} ({})", status, text);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn not_logged_in() -> Error {
    anyhow!("Not logged in. Run `finpilot login` first.")
}

/// Parse a JSON response body, turning non-2xx statuses into errors that
/// carry the server's message when it sends one.
pub(crate) async fn read_json<T: DeserializeOwned>(res: Response, what: &str) -> Result<T> {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        bail!("{} failed: {} ({})", what, status, server_error(&text));
    }
    Ok(serde_json::from_str(&text)?)
}

/// Pull the message out of an `{"error": ...}` or `{"detail": ...}` body,
/// falling back to the raw body.
pub(crate) fn server_error(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        detail: Option<String>,
    }
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.error.or(parsed.detail) {
            return msg;
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::initialize_db;
    use tokio_rusqlite::Connection;

    const LOGIN_BODY: &str = r#"{
        "user": {
            "id": "7f1f4a02-9d71-4a5e-a8a0-1c9f35b3f001",
            "email": "owner@acme.test",
            "name": "Acme Owner",
            "plan": "free",
            "created_at": "2025-05-01T10:00:00Z"
        },
        "org": {
            "id": "b52b3b8c-30d1-4e64-a9d6-2a8f17f3d002",
            "name": "Acme LLC",
            "timezone": "UTC",
            "currency": "USD",
            "created_at": "2025-05-01T10:00:00Z"
        },
        "tokens": {"access": "acc_1", "refresh": "ref_1"}
    }"#;

    async fn test_session(base_url: &str) -> Session {
        let db = Connection::open_in_memory().await.unwrap();
        db.call(|conn| {
            initialize_db(conn)?;
            Ok(())
        })
        .await
        .unwrap();
        let config = AppConfig {
            backend_url: base_url.to_string(),
            chat_service_url: "http://localhost:8081".to_string(),
            ml_service_url: "http://localhost:8001".to_string(),
            storage_path: "./storage".to_string(),
            db_path: "./storage/finpilot.sqlite3".to_string(),
        };
        Session::new(&config, SessionStore::new(db))
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LOGIN_BODY)
            .create_async()
            .await;

        let session = test_session(&server.url()).await;
        let payload = session.login("owner@acme.test", "hunter2").await.unwrap();

        assert_eq!(payload.tokens.access, "acc_1");
        let store = session.store();
        assert_eq!(store.access_token().await.unwrap().unwrap(), "acc_1");
        assert_eq!(store.refresh_token().await.unwrap().unwrap(), "ref_1");
        assert_eq!(
            store.org_id().await.unwrap().unwrap(),
            "b52b3b8c-30d1-4e64-a9d6-2a8f17f3d002"
        );
        assert_eq!(store.user().await.unwrap().unwrap().name, "Acme Owner");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_error_and_stores_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/login/")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Invalid credentials"}"#)
            .create_async()
            .await;

        let session = test_session(&server.url()).await;
        let err = session
            .login("owner@acme.test", "wrong")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid credentials"));
        assert!(session.store().access_token().await.unwrap().is_none());
        assert!(session.store().user().await.unwrap().is_none());
    }

    /// Concurrent callers holding the same stale token produce exactly
    /// one request to the refresh endpoint.
    #[tokio::test]
    async fn test_concurrent_refreshes_share_one_request() {
        let mut server = mockito::Server::new_async().await;
        let refresh_mock = server
            .mock("POST", "/api/auth/refresh/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access": "fresh"}"#)
            .expect(1)
            .create_async()
            .await;

        let session = test_session(&server.url()).await;
        session.store().save_tokens("stale", "ref_1").await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let session = session.clone();
            handles.push(tokio::spawn(async move {
                session.refresh_access_token("stale").await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "fresh");
        }

        refresh_mock.assert_async().await;
        // No rotation in the response keeps the old refresh token
        assert_eq!(
            session.store().refresh_token().await.unwrap().unwrap(),
            "ref_1"
        );
    }

    #[tokio::test]
    async fn test_request_retried_once_with_refreshed_token() {
        let mut server = mockito::Server::new_async().await;
        let stale_mock = server
            .mock("GET", "/api/auth/me/")
            .match_header("authorization", "Bearer stale")
            .with_status(401)
            .with_body(r#"{"detail": "Token expired"}"#)
            .create_async()
            .await;
        let fresh_mock = server
            .mock("GET", "/api/auth/me/")
            .match_header("authorization", "Bearer fresh")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "user": {
                        "id": "u1", "email": "owner@acme.test", "name": "Acme Owner",
                        "plan": "free", "created_at": "2025-05-01T10:00:00Z"
                    },
                    "organizations": []
                }"#,
            )
            .create_async()
            .await;
        let refresh_mock = server
            .mock("POST", "/api/auth/refresh/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access": "fresh", "refresh": "ref_2"}"#)
            .expect(1)
            .create_async()
            .await;

        let session = test_session(&server.url()).await;
        session.store().save_tokens("stale", "ref_1").await.unwrap();

        let me = session.me().await.unwrap();
        assert_eq!(me.user.email, "owner@acme.test");

        stale_mock.assert_async().await;
        fresh_mock.assert_async().await;
        refresh_mock.assert_async().await;
        // Rotated pair persisted
        assert_eq!(
            session.store().access_token().await.unwrap().unwrap(),
            "fresh"
        );
        assert_eq!(
            session.store().refresh_token().await.unwrap().unwrap(),
            "ref_2"
        );
    }

    /// A 401 on the retried request surfaces as an auth error without a
    /// second refresh attempt.
    #[tokio::test]
    async fn test_second_401_does_not_refresh_again() {
        let mut server = mockito::Server::new_async().await;
        let _unauthorized = server
            .mock("GET", "/api/auth/me/")
            .with_status(401)
            .with_body(r#"{"detail": "Token expired"}"#)
            .expect(2)
            .create_async()
            .await;
        let refresh_mock = server
            .mock("POST", "/api/auth/refresh/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access": "fresh"}"#)
            .expect(1)
            .create_async()
            .await;

        let session = test_session(&server.url()).await;
        session.store().save_tokens("stale", "ref_1").await.unwrap();

        let err = session.me().await.unwrap_err();
        assert!(err.to_string().contains("401"));
        refresh_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_tokens() {
        let mut server = mockito::Server::new_async().await;
        let refresh_mock = server
            .mock("POST", "/api/auth/refresh/")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Invalid refresh token"}"#)
            .expect(1)
            .create_async()
            .await;

        let session = test_session(&server.url()).await;
        session.store().save_tokens("stale", "bad_ref").await.unwrap();

        let err = session.refresh_access_token("stale").await.unwrap_err();
        assert!(err.to_string().contains("Token refresh failed"));
        assert!(session.store().access_token().await.unwrap().is_none());
        assert!(session.store().refresh_token().await.unwrap().is_none());

        // A later caller finds no session left, with no second request
        let err = session.refresh_access_token("stale").await.unwrap_err();
        assert!(err.to_string().contains("Session expired"));
        refresh_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_when_server_fails() {
        // No logout route mocked: the server answers 501
        let mut server = mockito::Server::new_async().await;
        let session = test_session(&server.url()).await;
        session.store().save_tokens("acc", "ref").await.unwrap();
        session.store().save_org_id("org_1").await.unwrap();

        session.logout().await.unwrap();
        assert!(session.store().access_token().await.unwrap().is_none());
        assert!(session.store().org_id().await.unwrap().is_none());
    }

    #[test]
    fn test_server_error_extraction() {
        assert_eq!(server_error(r#"{"error": "Invalid credentials"}"#), "Invalid credentials");
        assert_eq!(server_error(r#"{"detail": "Upload failed"}"#), "Upload failed");
        assert_eq!(server_error("plain text"), "plain text");
    }
}
