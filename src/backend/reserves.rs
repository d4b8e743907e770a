//! Cash reserve goals.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::BackendClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveGoal {
    pub id: String,
    pub name: String,
    pub goal_type: String,
    pub target_amount: String,
    pub current_amount: String,
    /// Computed server-side as current over target, so unlike the
    /// amounts it comes back as a plain number.
    pub progress_percent: f64,
    pub auto_transfer_enabled: bool,
    pub monthly_contribution: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Writable reserve goal fields. `goal_type` is one of `emergency`,
/// `tax`, `seasonal`, or `custom`.
#[derive(Debug, Clone, Serialize)]
pub struct ReserveGoalRequest {
    pub name: String,
    pub goal_type: String,
    pub target_amount: String,
    pub current_amount: String,
    pub monthly_contribution: String,
}

impl BackendClient {
    pub async fn reserve_goals(&self, org_id: &str) -> Result<Vec<ReserveGoal>> {
        self.get_json(
            &format!("/api/orgs/{}/reserves/goals/", org_id),
            "Reserve goal list fetch",
        )
        .await
    }

    pub async fn create_reserve_goal(
        &self,
        org_id: &str,
        req: &ReserveGoalRequest,
    ) -> Result<ReserveGoal> {
        self.post_json(
            &format!("/api/orgs/{}/reserves/goals/", org_id),
            req,
            "Reserve goal create",
        )
        .await
    }

    pub async fn update_reserve_goal(
        &self,
        org_id: &str,
        goal_id: &str,
        req: &ReserveGoalRequest,
    ) -> Result<ReserveGoal> {
        self.put_json(
            &format!("/api/orgs/{}/reserves/goals/{}/", org_id, goal_id),
            req,
            "Reserve goal update",
        )
        .await
    }

    pub async fn delete_reserve_goal(&self, org_id: &str, goal_id: &str) -> Result<()> {
        self.delete(
            &format!("/api/orgs/{}/reserves/goals/{}/", org_id, goal_id),
            "Reserve goal delete",
        )
        .await
    }
}
