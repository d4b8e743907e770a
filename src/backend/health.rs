//! Financial health scoring.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::BackendClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecommendation {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub estimated_impact: String,
    #[serde(default)]
    pub action_items: Vec<String>,
}

/// Composite 0-100 health score with its component breakdown. The
/// nullable metrics are absent until the org has enough data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    pub id: String,
    pub overall_score: String,
    pub liquidity_score: String,
    pub profitability_score: String,
    pub efficiency_score: String,
    pub growth_score: String,
    pub current_ratio: Option<String>,
    pub quick_ratio: Option<String>,
    pub profit_margin: Option<String>,
    pub revenue_growth: Option<String>,
    pub burn_rate: Option<String>,
    pub runway_days: Option<i64>,
    pub vs_industry_avg: Option<String>,
    pub percentile_rank: Option<i64>,
    #[serde(default)]
    pub recommendations: Vec<HealthRecommendation>,
    pub calculated_at: String,
}

impl BackendClient {
    /// Health score history, newest first.
    pub async fn health_scores(&self, org_id: &str) -> Result<Vec<HealthScore>> {
        self.get_json(
            &format!("/api/orgs/{}/health/scores/", org_id),
            "Health score fetch",
        )
        .await
    }

    /// Recompute the score from current financials and return it.
    pub async fn calculate_health_score(&self, org_id: &str) -> Result<HealthScore> {
        self.post_json(
            &format!("/api/orgs/{}/health/scores/calculate/", org_id),
            &serde_json::json!({}),
            "Health score calculation",
        )
        .await
    }
}
