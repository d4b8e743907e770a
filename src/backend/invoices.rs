//! Invoicing endpoints: invoices, customers, and the AR aging report.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::BackendClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Viewed,
    Partial,
    Paid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPrediction {
    pub predicted_date: Option<String>,
    pub risk_level: String,
    pub confidence: f64,
}

/// Invoice as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub customer_name: Option<String>,
    pub issue_date: String,
    pub due_date: String,
    pub total_amount: String,
    pub amount_paid: String,
    pub amount_remaining: f64,
    pub status: InvoiceStatus,
    pub is_overdue: bool,
    #[serde(default)]
    pub latest_prediction: Option<PaymentPrediction>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub payment_terms_default: String,
    pub preferred_payment_method: String,
    pub payment_reliability_score: String,
    pub average_days_to_pay: i64,
    pub total_invoiced: String,
    pub total_paid: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub invoice_count: i64,
    pub outstanding_balance: f64,
    pub created_at: String,
}

/// Receivables bucketed by days overdue. Amounts are decimal strings
/// like everywhere else in the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArAgingReport {
    pub current: String,
    pub days_1_30: String,
    pub days_31_60: String,
    pub days_61_90: String,
    pub days_over_90: String,
    pub total_outstanding: String,
    pub invoice_count: i64,
    pub average_dso: String,
}

impl BackendClient {
    pub async fn invoices(&self, org_id: &str) -> Result<Vec<Invoice>> {
        self.get_json(
            &format!("/api/orgs/{}/invoices/invoices/", org_id),
            "Invoice list fetch",
        )
        .await
    }

    pub async fn customers(&self, org_id: &str) -> Result<Vec<Customer>> {
        self.get_json(
            &format!("/api/orgs/{}/invoices/customers/", org_id),
            "Customer list fetch",
        )
        .await
    }

    pub async fn ar_aging(&self, org_id: &str) -> Result<ArAgingReport> {
        self.get_json(
            &format!("/api/orgs/{}/invoices/ar-aging/", org_id),
            "AR aging fetch",
        )
        .await
    }
}
