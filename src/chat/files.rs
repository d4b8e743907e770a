//! Chat-service HTTP surface: file upload, parsing, and scam checks.
//!
//! Unlike the backend API these routes take no bearer token. Uploads are
//! validated locally before any bytes leave the machine.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::auth::session::read_json;
use crate::core::AppConfig;

/// Extensions the service knows how to ingest.
const ALLOWED_TYPES: &[&str] = &["csv", "xlsx", "xls", "pdf", "png", "jpg", "jpeg", "zip"];
const MAX_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub upload_id: String,
    pub filename: String,
    pub detected_type: String,
    pub preview_records: i64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseRequest<'a> {
    upload_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mapping: Option<&'a HashMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub records: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScamCheckResult {
    pub score: f64,
    pub is_scam: bool,
    pub reason: String,
}

/// Reject files the service would bounce anyway: unknown extensions and
/// anything over the 10 MB cap. The messages match what the dashboard
/// shows its users.
pub fn validate_file(filename: &str, size: u64) -> Result<()> {
    let ext = filename
        .rsplit('.')
        .next()
        .filter(|ext| *ext != filename)
        .map(str::to_lowercase);
    match ext {
        Some(ext) if ALLOWED_TYPES.contains(&ext.as_str()) => {}
        _ => bail!(
            "File type not allowed. Allowed types: {}",
            ALLOWED_TYPES.join(", ")
        ),
    }
    if size > MAX_SIZE {
        bail!("File too large. Maximum size: {}MB", MAX_SIZE / 1024 / 1024);
    }
    Ok(())
}

#[derive(Clone)]
pub struct ChatServiceClient {
    base_url: String,
    http: Client,
}

impl ChatServiceClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.chat_service_url.clone(),
            http: Client::new(),
        }
    }

    /// Upload a local file for ingestion. Validation happens before the
    /// request, so a rejected file never touches the network.
    pub async fn upload(&self, path: &Path) -> Result<UploadResponse> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("Invalid file path: {}", path.display()))?
            .to_string();
        let meta = tokio::fs::metadata(path).await?;
        validate_file(&filename, meta.len())?;

        let bytes = tokio::fs::read(path).await?;
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename));
        let res = self
            .http
            .post(format!("{}/api/upload/", self.base_url))
            .multipart(form)
            .send()
            .await?;
        read_json(res, "File upload").await
    }

    /// Kick off parsing of an uploaded file, optionally remapping columns.
    pub async fn parse(
        &self,
        upload_id: &str,
        mapping: Option<&HashMap<String, String>>,
    ) -> Result<ParseResponse> {
        let res = self
            .http
            .post(format!("{}/api/upload/parse", self.base_url))
            .json(&ParseRequest { upload_id, mapping })
            .send()
            .await?;
        read_json(res, "File parse").await
    }

    /// Score a piece of text for scam likelihood.
    pub async fn check_scam(&self, text: &str) -> Result<ScamCheckResult> {
        let res = self
            .http
            .post(format!("{}/api/scam/check", self.base_url))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;
        read_json(res, "Scam check").await
    }
}
