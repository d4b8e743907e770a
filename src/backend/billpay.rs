//! Vendors, bills, and the approval pipeline.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::BackendClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Draft,
    PendingApproval,
    Approved,
    Scheduled,
    Paid,
    Rejected,
    Cancelled,
    Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub category: String,
    pub payment_terms: String,
    pub is_active: bool,
    pub is_1099_vendor: bool,
    pub total_paid: String,
    pub total_bills: i64,
    pub average_bill_amount: String,
    pub on_time_payment_rate: String,
    pub spending_last_12_months: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

/// Writable vendor fields for create and update.
#[derive(Debug, Clone, Serialize)]
pub struct VendorRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub category: String,
    pub payment_terms: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub vendor: String,
    pub vendor_name: String,
    pub bill_number: String,
    pub bill_date: String,
    pub due_date: String,
    pub subtotal: String,
    pub tax_amount: String,
    pub total_amount: String,
    pub status: BillStatus,
    pub amount_paid: String,
    pub amount_remaining: f64,
    pub paid_at: Option<String>,
    pub scheduled_payment_date: Option<String>,
    pub capture_method: String,
    pub ocr_confidence: Option<String>,
    pub category: String,
    pub is_recurring: bool,
    pub requires_approval: bool,
    pub description: String,
    pub is_overdue: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

/// Writable bill fields for create and update. Amounts are decimal
/// strings, matching what the API hands back.
#[derive(Debug, Clone, Serialize)]
pub struct BillRequest {
    pub vendor: String,
    pub bill_number: String,
    pub bill_date: String,
    pub due_date: String,
    pub subtotal: String,
    pub total_amount: String,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalRule {
    pub id: String,
    pub condition_type: String,
    pub condition_value: String,
    pub approval_type: String,
    pub priority: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalWorkflow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_default: bool,
    pub is_active: bool,
    pub escalation_hours: i64,
    #[serde(default)]
    pub rules: Vec<ApprovalRule>,
}

/// Outcome of an approve or reject decision. `pending_approvals` is how
/// many approvers still have to weigh in before the bill moves on.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalDecision {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub pending_approvals: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadBillResponse {
    pub success: bool,
    pub bill: Bill,
}

impl BackendClient {
    pub async fn vendors(&self, org_id: &str) -> Result<Vec<Vendor>> {
        self.get_json(
            &format!("/api/orgs/{}/billpay/vendors/", org_id),
            "Vendor list fetch",
        )
        .await
    }

    pub async fn create_vendor(&self, org_id: &str, req: &VendorRequest) -> Result<Vendor> {
        self.post_json(
            &format!("/api/orgs/{}/billpay/vendors/", org_id),
            req,
            "Vendor create",
        )
        .await
    }

    pub async fn update_vendor(
        &self,
        org_id: &str,
        vendor_id: &str,
        req: &VendorRequest,
    ) -> Result<Vendor> {
        self.put_json(
            &format!("/api/orgs/{}/billpay/vendors/{}/", org_id, vendor_id),
            req,
            "Vendor update",
        )
        .await
    }

    pub async fn delete_vendor(&self, org_id: &str, vendor_id: &str) -> Result<()> {
        self.delete(
            &format!("/api/orgs/{}/billpay/vendors/{}/", org_id, vendor_id),
            "Vendor delete",
        )
        .await
    }

    pub async fn bills(&self, org_id: &str) -> Result<Vec<Bill>> {
        self.get_json(
            &format!("/api/orgs/{}/billpay/bills/", org_id),
            "Bill list fetch",
        )
        .await
    }

    pub async fn create_bill(&self, org_id: &str, req: &BillRequest) -> Result<Bill> {
        self.post_json(
            &format!("/api/orgs/{}/billpay/bills/", org_id),
            req,
            "Bill create",
        )
        .await
    }

    pub async fn update_bill(&self, org_id: &str, bill_id: &str, req: &BillRequest) -> Result<Bill> {
        self.put_json(
            &format!("/api/orgs/{}/billpay/bills/{}/", org_id, bill_id),
            req,
            "Bill update",
        )
        .await
    }

    pub async fn delete_bill(&self, org_id: &str, bill_id: &str) -> Result<()> {
        self.delete(
            &format!("/api/orgs/{}/billpay/bills/{}/", org_id, bill_id),
            "Bill delete",
        )
        .await
    }

    /// Post a bill document (invoice scan, PDF, photo) for capture.
    pub async fn upload_bill(
        &self,
        org_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadBillResponse> {
        self.post_multipart(
            &format!("/api/orgs/{}/billpay/bills/upload/", org_id),
            "file",
            filename,
            bytes,
            "Bill upload",
        )
        .await
    }

    pub async fn approve_bill(
        &self,
        org_id: &str,
        bill_id: &str,
        comments: &str,
    ) -> Result<ApprovalDecision> {
        self.post_json(
            &format!("/api/orgs/{}/billpay/bills/{}/approve/", org_id, bill_id),
            &serde_json::json!({ "comments": comments }),
            "Bill approve",
        )
        .await
    }

    pub async fn reject_bill(
        &self,
        org_id: &str,
        bill_id: &str,
        comments: &str,
    ) -> Result<ApprovalDecision> {
        self.post_json(
            &format!("/api/orgs/{}/billpay/bills/{}/reject/", org_id, bill_id),
            &serde_json::json!({ "comments": comments }),
            "Bill reject",
        )
        .await
    }

    pub async fn approval_workflows(&self, org_id: &str) -> Result<Vec<ApprovalWorkflow>> {
        self.get_json(
            &format!("/api/orgs/{}/billpay/workflows/", org_id),
            "Workflow list fetch",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_status_wire_format() {
        let s = serde_json::to_string(&BillStatus::PendingApproval).unwrap();
        assert_eq!(s, "\"pending_approval\"");
        let parsed: BillStatus = serde_json::from_str("\"overdue\"").unwrap();
        assert_eq!(parsed, BillStatus::Overdue);
    }

    #[test]
    fn test_approval_decision_without_pending_count() {
        let decision: ApprovalDecision =
            serde_json::from_str(r#"{"success": true, "message": "Bill rejected"}"#).unwrap();
        assert!(decision.success);
        assert_eq!(decision.pending_approvals, None);
    }
}
