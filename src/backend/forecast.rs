//! Cashflow forecasting.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::BackendClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastPeriod {
    #[default]
    Month,
    Quarter,
    Year,
}

impl ForecastPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastPeriod::Month => "month",
            ForecastPeriod::Quarter => "quarter",
            ForecastPeriod::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: String,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub id: String,
    pub generated_at: String,
    pub horizon_days: i64,
    pub runway_days: i64,
    pub forecast_points: Vec<ForecastPoint>,
}

impl BackendClient {
    /// Latest cashflow forecast at the requested granularity.
    pub async fn forecast(&self, org_id: &str, period: ForecastPeriod) -> Result<Forecast> {
        self.get_json(
            &format!("/api/orgs/{}/forecast/?period={}", org_id, period.as_str()),
            "Forecast fetch",
        )
        .await
    }
}
