use anyhow::Result;

use super::open_session;
use crate::backend::BackendClient;
use crate::backend::forecast::ForecastPeriod;
use crate::core::AppConfig;

#[derive(clap::ValueEnum, Clone, Copy)]
pub enum Period {
    Month,
    Quarter,
    Year,
}

impl Period {
    fn to_forecast(self) -> ForecastPeriod {
        match self {
            Period::Month => ForecastPeriod::Month,
            Period::Quarter => ForecastPeriod::Quarter,
            Period::Year => ForecastPeriod::Year,
        }
    }
}

pub async fn run(config: &AppConfig, period: Period) -> Result<()> {
    let client = BackendClient::new(open_session(config).await?);
    let org_id = client.org_id().await?;

    let forecast = client.forecast(&org_id, period.to_forecast()).await?;
    println!(
        "Forecast from {} ({} day horizon), runway {} days",
        forecast.generated_at, forecast.horizon_days, forecast.runway_days
    );
    for point in &forecast.forecast_points {
        println!("{}  {:>14.2}", point.date, point.balance);
    }

    Ok(())
}
