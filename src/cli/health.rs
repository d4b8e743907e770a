use anyhow::Result;

use super::open_session;
use crate::backend::BackendClient;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig, calculate: bool) -> Result<()> {
    let client = BackendClient::new(open_session(config).await?);
    let org_id = client.org_id().await?;

    let score = if calculate {
        println!("Calculating health score...");
        client.calculate_health_score(&org_id).await?
    } else {
        match client.health_scores(&org_id).await?.into_iter().next() {
            Some(score) => score,
            None => {
                println!("No health score yet. Re-run with --calculate");
                return Ok(());
            }
        }
    };

    println!(
        "Overall score: {} (as of {})",
        score.overall_score, score.calculated_at
    );
    println!("  liquidity:     {}", score.liquidity_score);
    println!("  profitability: {}", score.profitability_score);
    println!("  efficiency:    {}", score.efficiency_score);
    println!("  growth:        {}", score.growth_score);
    if let Some(runway) = score.runway_days {
        println!("  runway:        {} days", runway);
    }
    for rec in &score.recommendations {
        println!("[{}] {}: {}", rec.priority, rec.title, rec.description);
    }

    Ok(())
}
