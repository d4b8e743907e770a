//! Request plumbing for the backend REST API. Endpoint groups add their
//! typed methods in their own modules.

use anyhow::{Result, anyhow, bail};
use reqwest::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::Session;
use crate::auth::session::{read_json, server_error};

#[derive(Clone)]
pub struct BackendClient {
    session: Session,
}

impl BackendClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Active organization id persisted at login. Every org-scoped route
    /// needs it.
    pub async fn org_id(&self) -> Result<String> {
        self.session
            .store()
            .org_id()
            .await?
            .ok_or_else(|| anyhow!("No active organization. Run `finpilot login` first."))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.session.base_url(), path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = self.url(path);
        let res = self
            .session
            .send_with_auth(|| self.session.http().get(&url))
            .await?;
        read_json(res, what).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B, what: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let res = self
            .session
            .send_with_auth(|| self.session.http().post(&url).json(body))
            .await?;
        read_json(res, what).await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B, what: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let res = self
            .session
            .send_with_auth(|| self.session.http().put(&url).json(body))
            .await?;
        read_json(res, what).await
    }

    pub(crate) async fn delete(&self, path: &str, what: &str) -> Result<()> {
        let url = self.url(path);
        let res = self
            .session
            .send_with_auth(|| self.session.http().delete(&url))
            .await?;
        expect_success(res, what).await
    }

    pub(crate) async fn get_bytes(&self, path: &str, what: &str) -> Result<Vec<u8>> {
        let url = self.url(path);
        let res = self
            .session
            .send_with_auth(|| self.session.http().get(&url))
            .await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            bail!("{} failed: {} ({})", what, status, server_error(&text));
        }
        Ok(res.bytes().await?.to_vec())
    }

    /// Multipart upload. The form is rebuilt from the owned bytes on the
    /// post-refresh retry since a multipart body can only be sent once.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        filename: &str,
        bytes: Vec<u8>,
        what: &str,
    ) -> Result<T> {
        let url = self.url(path);
        let res = self
            .session
            .send_with_auth(|| {
                let part = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(filename.to_string());
                let form = reqwest::multipart::Form::new().part(field.to_string(), part);
                self.session.http().post(&url).multipart(form)
            })
            .await?;
        read_json(res, what).await
    }
}

pub(crate) async fn expect_success(res: Response, what: &str) -> Result<()> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        bail!("{} failed: {} ({})", what, status, server_error(&text));
    }
    Ok(())
}
