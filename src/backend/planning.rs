//! Scenario planning, budgets, and goals.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::BackendClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    pub id: String,
    pub name: String,
    pub adjustment_type: String,
    pub change_type: String,
    pub value: String,
    pub category: String,
    pub start_month: i64,
    pub end_month: Option<i64>,
    pub description: String,
    pub assumptions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub id: String,
    pub month_labels: Vec<String>,
    pub monthly_revenue: Vec<f64>,
    pub monthly_expenses: Vec<f64>,
    pub monthly_profit: Vec<f64>,
    pub monthly_cash_balance: Vec<f64>,
    pub total_revenue: String,
    pub total_expenses: String,
    pub total_profit: String,
    pub profit_margin: String,
    pub ending_cash: String,
    pub lowest_cash: String,
    pub runway_days: Option<i64>,
    pub break_even_month: Option<i64>,
    pub break_even_revenue: Option<String>,
    pub simulated_at: String,
    pub confidence_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scenario_type: String,
    pub base_year: i64,
    pub base_month: i64,
    pub forecast_months: i64,
    pub is_active: bool,
    pub last_simulated_at: Option<String>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub adjustments: Vec<ScenarioAdjustment>,
    #[serde(default)]
    pub latest_result: Option<ScenarioResult>,
}

/// Writable scenario fields for create and update.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRequest {
    pub name: String,
    pub description: String,
    pub scenario_type: String,
    pub base_year: i64,
    pub base_month: i64,
    pub forecast_months: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunScenarioResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Option<ScenarioResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub description: String,
    pub budget_type: String,
    pub period_type: String,
    pub start_date: String,
    pub end_date: String,
    pub total_amount: String,
    pub is_active: bool,
    pub is_approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub description: String,
    pub goal_type: String,
    pub target_value: String,
    pub current_value: String,
    pub progress_percent: String,
    pub status: String,
    pub start_date: String,
    pub target_date: String,
    pub is_active: bool,
}

impl BackendClient {
    pub async fn scenarios(&self, org_id: &str) -> Result<Vec<Scenario>> {
        self.get_json(
            &format!("/api/orgs/{}/planning/scenarios/", org_id),
            "Scenario list fetch",
        )
        .await
    }

    pub async fn create_scenario(&self, org_id: &str, req: &ScenarioRequest) -> Result<Scenario> {
        self.post_json(
            &format!("/api/orgs/{}/planning/scenarios/", org_id),
            req,
            "Scenario create",
        )
        .await
    }

    pub async fn update_scenario(
        &self,
        org_id: &str,
        scenario_id: &str,
        req: &ScenarioRequest,
    ) -> Result<Scenario> {
        self.put_json(
            &format!("/api/orgs/{}/planning/scenarios/{}/", org_id, scenario_id),
            req,
            "Scenario update",
        )
        .await
    }

    pub async fn delete_scenario(&self, org_id: &str, scenario_id: &str) -> Result<()> {
        self.delete(
            &format!("/api/orgs/{}/planning/scenarios/{}/", org_id, scenario_id),
            "Scenario delete",
        )
        .await
    }

    /// Kick off a simulation and return its result.
    pub async fn run_scenario(&self, org_id: &str, scenario_id: &str) -> Result<RunScenarioResponse> {
        self.post_json(
            &format!("/api/orgs/{}/planning/scenarios/{}/run/", org_id, scenario_id),
            &serde_json::json!({}),
            "Scenario run",
        )
        .await
    }

    /// Past simulation results, newest first.
    pub async fn scenario_results(
        &self,
        org_id: &str,
        scenario_id: &str,
    ) -> Result<Vec<ScenarioResult>> {
        self.get_json(
            &format!(
                "/api/orgs/{}/planning/scenarios/{}/results/",
                org_id, scenario_id
            ),
            "Scenario results fetch",
        )
        .await
    }

    pub async fn budgets(&self, org_id: &str) -> Result<Vec<Budget>> {
        self.get_json(
            &format!("/api/orgs/{}/planning/budgets/", org_id),
            "Budget list fetch",
        )
        .await
    }

    pub async fn goals(&self, org_id: &str) -> Result<Vec<Goal>> {
        self.get_json(
            &format!("/api/orgs/{}/planning/goals/", org_id),
            "Goal list fetch",
        )
        .await
    }
}
