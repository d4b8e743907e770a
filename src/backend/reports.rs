//! Report generation and download.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::BackendClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Excel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    pub id: String,
    pub period_start: String,
    pub period_end: String,
    pub gpt_summary: String,
    /// Free-form metrics blob (revenue, expenses, net, runway, top
    /// transactions). Shape varies by report type.
    #[serde(default)]
    pub metrics: Value,
    pub created_at: String,
}

impl BackendClient {
    pub async fn generate_report(
        &self,
        org_id: &str,
        report_type: &str,
        format: ReportFormat,
    ) -> Result<Report> {
        self.post_json(
            &format!("/api/orgs/{}/reports/generate/", org_id),
            &serde_json::json!({ "type": report_type, "format": format }),
            "Report generation",
        )
        .await
    }

    /// Raw document bytes in whatever format the report was generated in.
    pub async fn download_report(&self, org_id: &str, report_id: &str) -> Result<Vec<u8>> {
        self.get_bytes(
            &format!("/api/orgs/{}/reports/{}/download/", org_id, report_id),
            "Report download",
        )
        .await
    }
}
