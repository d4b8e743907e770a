//! Persisted session state: the JWT pair, the signed-in user's profile,
//! and the active organization id.

use anyhow::{Error, Result};
use tokio_rusqlite::Connection;

use crate::auth::models::UserProfile;

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const USER_KEY: &str = "user";
const ORG_ID_KEY: &str = "org_id";

#[derive(Clone)]
pub struct SessionStore {
    db: Connection,
}

impl SessionStore {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }

    async fn get(&self, key: &'static str) -> Result<Option<String>, Error> {
        let value = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM session WHERE key = ?")?;
                let rows = stmt
                    .query_map([key], |row| row.get::<_, String>(0))?
                    .filter_map(Result::ok)
                    .collect::<Vec<String>>();
                Ok(rows.into_iter().next())
            })
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &'static str, value: String) -> Result<(), Error> {
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO session (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    [key, value.as_str()],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn access_token(&self) -> Result<Option<String>> {
        self.get(ACCESS_TOKEN_KEY).await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>> {
        self.get(REFRESH_TOKEN_KEY).await
    }

    /// Store both tokens in one transaction so a crash can't leave a
    /// half-written pair behind.
    pub async fn save_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        let access = access.to_owned();
        let refresh = refresh.to_owned();
        self.db
            .call(move |conn| {
                let tx = conn.transaction()?;
                for (key, value) in [(ACCESS_TOKEN_KEY, &access), (REFRESH_TOKEN_KEY, &refresh)] {
                    tx.execute(
                        "INSERT INTO session (key, value) VALUES (?1, ?2)
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                        [key, value.as_str()],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn clear_tokens(&self) -> Result<()> {
        self.db
            .call(|conn| {
                conn.execute(
                    "DELETE FROM session WHERE key IN (?1, ?2)",
                    [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn save_user(&self, user: &UserProfile) -> Result<()> {
        self.set(USER_KEY, serde_json::to_string(user)?).await
    }

    pub async fn user(&self) -> Result<Option<UserProfile>> {
        match self.get(USER_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn save_org_id(&self, org_id: &str) -> Result<()> {
        self.set(ORG_ID_KEY, org_id.to_owned()).await
    }

    pub async fn org_id(&self) -> Result<Option<String>> {
        self.get(ORG_ID_KEY).await
    }

    /// Full logout wipe.
    pub async fn clear(&self) -> Result<()> {
        self.db
            .call(|conn| {
                conn.execute("DELETE FROM session", [])?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}
